use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Card, CardUpdate, LedgerError, LedgerResult, SpendingSummary, UserRecord};

/// Persistence for the user list.
pub trait LedgerRepository {
    /// Load every user.
    ///
    /// # Errors
    ///
    /// Returns an error when stored data exists but cannot be read.
    fn load(&self) -> LedgerResult<Vec<UserRecord>>;

    /// Replace the stored users.
    ///
    /// # Errors
    ///
    /// Returns an error when the users cannot be written.
    fn save(&mut self, users: &[UserRecord]) -> LedgerResult<()>;
}

/// Users stored as a pretty-printed JSON array.
///
/// A missing file loads as an empty ledger. So does a corrupt one, with a
/// warning; the next save overwrites it.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LedgerRepository for JsonFileStore {
    fn load(&self) -> LedgerResult<Vec<UserRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "ledger file not found, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str(&text) {
            Ok(users) => Ok(users),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ledger file is corrupt or empty, starting empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, users: &[UserRecord]) -> LedgerResult<()> {
        let text = serde_json::to_string_pretty(users)?;
        fs::write(&self.path, text).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), users = users.len(), "ledger saved");
        Ok(())
    }
}

/// In-memory store that counts saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Vec<UserRecord>,
    saves: usize,
}

impl MemoryStore {
    /// Store preloaded with `users`.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self { users, saves: 0 }
    }

    /// Number of completed saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl LedgerRepository for MemoryStore {
    fn load(&self) -> LedgerResult<Vec<UserRecord>> {
        Ok(self.users.clone())
    }

    fn save(&mut self, users: &[UserRecord]) -> LedgerResult<()> {
        self.users = users.to_vec();
        self.saves += 1;
        Ok(())
    }
}

/// User and card operations over a repository. Every successful mutation is
/// saved before it returns.
#[derive(Debug)]
pub struct Ledger<R> {
    repository: R,
    users: Vec<UserRecord>,
}

/// Ledger backed by a JSON file.
pub type JsonLedger = Ledger<JsonFileStore>;

impl JsonLedger {
    /// Open the ledger stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> LedgerResult<Self> {
        Self::load(JsonFileStore::new(path))
    }
}

impl<R: LedgerRepository> Ledger<R> {
    /// Load the users from `repository`.
    ///
    /// # Errors
    ///
    /// Propagates the repository's load error.
    pub fn load(repository: R) -> LedgerResult<Self> {
        let users = repository.load()?;
        Ok(Self { repository, users })
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Every user, in insertion order.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// User with this id.
    pub fn get_user(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    fn user_mut(&mut self, user_id: &str) -> LedgerResult<&mut UserRecord> {
        self.users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))
    }

    fn persist(&mut self) -> LedgerResult<()> {
        self.repository.save(&self.users)
    }

    /// Add a user with profile fields `extra`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateUser`] if the id is taken, or
    /// [`LedgerError::ReservedField`] for managed keys in `extra`.
    pub fn add_user(&mut self, user_id: &str, extra: Map<String, Value>) -> LedgerResult<()> {
        if self.get_user(user_id).is_some() {
            return Err(LedgerError::DuplicateUser(user_id.to_string()));
        }
        self.users.push(UserRecord::new(user_id, extra)?);
        self.persist()?;
        tracing::info!(user_id, "user added");
        Ok(())
    }

    /// Merge `updates` into a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`] or [`LedgerError::ReservedField`].
    pub fn update_user(&mut self, user_id: &str, updates: Map<String, Value>) -> LedgerResult<()> {
        let fields = updates.len();
        self.user_mut(user_id)?.merge(updates)?;
        self.persist()?;
        tracing::info!(user_id, fields, "user updated");
        Ok(())
    }

    /// Give a user a new card.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`] or [`LedgerError::DuplicateCard`].
    pub fn add_card(&mut self, user_id: &str, card: Card) -> LedgerResult<()> {
        let user = self.user_mut(user_id)?;
        if user.card(&card.card_number).is_some() {
            return Err(LedgerError::DuplicateCard {
                user_id: user_id.to_string(),
                card_number: card.card_number,
            });
        }
        let card_number = card.card_number.clone();
        user.user_cards.push(card);
        self.persist()?;
        tracing::info!(user_id, card_number = %card_number, "card added");
        Ok(())
    }

    /// Change some fields of a card.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`] or [`LedgerError::CardNotFound`].
    pub fn update_card(&mut self, user_id: &str, card_number: &str, update: CardUpdate) -> LedgerResult<()> {
        update.apply(self.user_mut(user_id)?.card_mut(card_number)?);
        self.persist()?;
        tracing::info!(user_id, card_number, "card updated");
        Ok(())
    }

    /// Replace a card's whole spending map.
    ///
    /// # Errors
    ///
    /// See [`update_card`](Self::update_card).
    pub fn set_spending(
        &mut self,
        user_id: &str,
        card_number: &str,
        monthly_spending: IndexMap<String, f64>,
    ) -> LedgerResult<()> {
        self.update_card(
            user_id,
            card_number,
            CardUpdate {
                monthly_spending: Some(monthly_spending),
                ..CardUpdate::default()
            },
        )
    }

    /// Remove a card.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`] or [`LedgerError::CardNotFound`].
    pub fn delete_card(&mut self, user_id: &str, card_number: &str) -> LedgerResult<Card> {
        let user = self.user_mut(user_id)?;
        let position = user
            .user_cards
            .iter()
            .position(|c| c.card_number == card_number)
            .ok_or_else(|| LedgerError::CardNotFound {
                user_id: user_id.to_string(),
                card_number: card_number.to_string(),
            })?;
        let card = user.user_cards.remove(position);
        self.persist()?;
        tracing::info!(user_id, card_number, "card deleted");
        Ok(card)
    }

    /// Spending statistics for a user.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`].
    pub fn summary(&self, user_id: &str) -> LedgerResult<SpendingSummary> {
        self.get_user(user_id)
            .map(SpendingSummary::from_user)
            .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(number: &str) -> Card {
        Card::new(number, "12/27", 123, [("Jan".to_string(), 10.0)].into_iter().collect())
    }

    fn profile(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_mutations_are_saved() {
        let mut ledger = Ledger::load(MemoryStore::default()).unwrap();
        ledger.add_user("u1", profile(json!({"name": "Ann"}))).unwrap();
        ledger.add_card("u1", card("1111")).unwrap();
        ledger.update_user("u1", profile(json!({"city": "Kyiv"}))).unwrap();

        assert_eq!(ledger.repository().saves(), 3);
        let user = ledger.get_user("u1").unwrap();
        assert_eq!(user.extra["city"], "Kyiv");
        assert_eq!(user.user_cards.len(), 1);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut ledger = Ledger::load(MemoryStore::default()).unwrap();
        ledger.add_user("u1", Map::new()).unwrap();
        ledger.add_card("u1", card("1111")).unwrap();

        assert!(matches!(ledger.add_user("u1", Map::new()), Err(LedgerError::DuplicateUser(_))));
        assert!(matches!(ledger.add_card("u1", card("1111")), Err(LedgerError::DuplicateCard { .. })));
        assert_eq!(ledger.repository().saves(), 2);
    }

    #[test]
    fn test_missing_user_and_card() {
        let mut ledger = Ledger::load(MemoryStore::default()).unwrap();
        assert!(matches!(ledger.add_card("ghost", card("1")), Err(LedgerError::UserNotFound(_))));

        ledger.add_user("u1", Map::new()).unwrap();
        assert!(matches!(
            ledger.delete_card("u1", "9999"),
            Err(LedgerError::CardNotFound { .. })
        ));
        assert!(matches!(
            ledger.update_card("u1", "9999", CardUpdate::default()),
            Err(LedgerError::CardNotFound { .. })
        ));
        assert!(ledger.summary("ghost").is_err());
    }

    #[test]
    fn test_update_and_delete_card() {
        let mut ledger = Ledger::load(MemoryStore::default()).unwrap();
        ledger.add_user("u1", Map::new()).unwrap();
        ledger.add_card("u1", card("1111")).unwrap();

        ledger
            .set_spending("u1", "1111", [("Feb".to_string(), 42.0)].into_iter().collect())
            .unwrap();
        assert_eq!(ledger.summary("u1").unwrap().total, 42.0);

        let removed = ledger.delete_card("u1", "1111").unwrap();
        assert_eq!(removed.card_number, "1111");
        assert!(ledger.get_user("u1").unwrap().user_cards.is_empty());
    }
}
