use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{LedgerError, LedgerResult};

const USER_ID_FIELD: &str = "user_id";
const CARDS_FIELD: &str = "user_cards";

/// A payment card and its spending per month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Card number, unique per user.
    pub card_number: String,
    /// Expiry date, `MM/YY`.
    pub expiry_date: String,
    /// Verification code.
    pub cvv_code: u32,
    /// Month label to amount spent, in insertion order.
    #[serde(default)]
    pub monthly_spending: IndexMap<String, f64>,
}

impl Card {
    /// New card.
    pub fn new(
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        cvv_code: u32,
        monthly_spending: IndexMap<String, f64>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            expiry_date: expiry_date.into(),
            cvv_code,
            monthly_spending,
        }
    }

    /// Sum over every month.
    pub fn total(&self) -> f64 {
        self.monthly_spending.values().sum()
    }
}

/// Partial card update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardUpdate {
    /// New expiry date.
    pub expiry_date: Option<String>,
    /// New verification code.
    pub cvv_code: Option<u32>,
    /// Replacement spending map.
    pub monthly_spending: Option<IndexMap<String, f64>>,
}

impl CardUpdate {
    /// Returns `true` when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.expiry_date.is_none() && self.cvv_code.is_none() && self.monthly_spending.is_none()
    }

    pub(crate) fn apply(self, card: &mut Card) {
        if let Some(expiry_date) = self.expiry_date {
            card.expiry_date = expiry_date;
        }
        if let Some(cvv_code) = self.cvv_code {
            card.cvv_code = cvv_code;
        }
        if let Some(monthly_spending) = self.monthly_spending {
            card.monthly_spending = monthly_spending;
        }
    }
}

/// One user with free-form profile fields and their cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Unique user id.
    pub user_id: String,
    /// Cards owned by the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_cards: Vec<Card>,
    /// Any other profile fields, kept as given.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// User without cards.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReservedField`] when `extra` contains `user_id`
    /// or `user_cards`.
    pub fn new(user_id: impl Into<String>, extra: Map<String, Value>) -> LedgerResult<Self> {
        check_reserved(&extra)?;
        Ok(Self {
            user_id: user_id.into(),
            user_cards: Vec::new(),
            extra,
        })
    }

    /// Card with this number.
    pub fn card(&self, card_number: &str) -> Option<&Card> {
        self.user_cards.iter().find(|c| c.card_number == card_number)
    }

    pub(crate) fn card_mut(&mut self, card_number: &str) -> LedgerResult<&mut Card> {
        let user_id = &self.user_id;
        self.user_cards
            .iter_mut()
            .find(|c| c.card_number == card_number)
            .ok_or_else(|| LedgerError::CardNotFound {
                user_id: user_id.clone(),
                card_number: card_number.to_string(),
            })
    }

    /// Merge profile fields, replacing existing keys.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ReservedField`] for `user_id` or `user_cards`.
    pub fn merge(&mut self, updates: Map<String, Value>) -> LedgerResult<()> {
        check_reserved(&updates)?;
        self.extra.extend(updates);
        Ok(())
    }
}

fn check_reserved(fields: &Map<String, Value>) -> LedgerResult<()> {
    match [USER_ID_FIELD, CARDS_FIELD].into_iter().find(|f| fields.contains_key(*f)) {
        Some(field) => Err(LedgerError::ReservedField(field.to_string())),
        None => Ok(()),
    }
}
