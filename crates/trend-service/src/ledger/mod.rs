//! Spending ledger.
//!
//! A small JSON-file database of users, their payment cards and each card's
//! spending per month. [`SpendingSummary`] condenses one user's spending and
//! can hand the monthly totals to the analyzer as a series.

mod model;
mod store;
mod summary;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use model::{Card, CardUpdate, UserRecord};
pub use store::{JsonFileStore, JsonLedger, Ledger, LedgerRepository, MemoryStore};
pub use summary::SpendingSummary;

/// Result type for ledger operations.
pub type LedgerResult<T> = std::result::Result<T, LedgerError>;

/// Errors raised by ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// No user with this id.
    #[error("User '{0}' not found")]
    UserNotFound(String),

    /// The user has no card with this number.
    #[error("Card '{card_number}' not found for user '{user_id}'")]
    CardNotFound {
        /// Owner looked up.
        user_id: String,
        /// Card number looked up.
        card_number: String,
    },

    /// A user with this id already exists.
    #[error("User '{0}' already exists")]
    DuplicateUser(String),

    /// The user already has a card with this number.
    #[error("Card '{card_number}' already exists for user '{user_id}'")]
    DuplicateCard {
        /// Owner.
        user_id: String,
        /// Card number.
        card_number: String,
    },

    /// User data tried to overwrite a field managed by the ledger.
    #[error("Field '{0}' cannot be set through user data")]
    ReservedField(String),

    /// The database file could not be read or written.
    #[error("Ledger I/O error on {}: {source}", .path.display())]
    Io {
        /// Database file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The database could not be serialized.
    #[error("Ledger JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(LedgerError::UserNotFound("u1".into()).to_string(), "User 'u1' not found");
        let err = LedgerError::CardNotFound {
            user_id: "u1".into(),
            card_number: "1111".into(),
        };
        assert_eq!(err.to_string(), "Card '1111' not found for user 'u1'");
    }
}
