//! Unified error type for the property ledger.
//!
//! Every fallible operation in the crate returns [`Result`], so callers only ever
//! match on one enum regardless of whether the failure came from the database,
//! configuration loading, or a business rule.

use rust_decimal::Decimal;
use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Input failed a business validation rule
    #[error("Validation failed: {message}")]
    Validation {
        /// Which rule was violated
        message: String,
    },

    /// A monetary amount was negative, had sub-cent precision, or was otherwise unusable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// A lookup by id or code found nothing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"Unit"`
        entity: &'static str,
        /// The identifier that was looked up
        id: String,
    },

    /// Another account already uses this code
    #[error("Account code already in use: {code}")]
    DuplicateAccountCode {
        /// The conflicting code
        code: String,
    },

    /// Debits and credits of a journal entry differ
    #[error("Journal entry {id} is unbalanced: debits {debits} != credits {credits}")]
    UnbalancedEntry {
        /// Journal entry id
        id: i64,
        /// Sum of debit amounts
        debits: Decimal,
        /// Sum of credit amounts
        credits: Decimal,
    },

    /// A journal entry has no lines or only zero amounts
    #[error("Journal entry {id} has nothing to post")]
    EmptyEntry {
        /// Journal entry id
        id: i64,
    },

    /// The operation requires a draft entry
    #[error("Journal entry {id} is {status}, expected Draft")]
    EntryNotDraft {
        /// Journal entry id
        id: i64,
        /// Current status of the entry
        status: String,
    },

    /// A posted entry has already been reversed (or is itself a reversal)
    #[error("Journal entry {id} cannot be reversed again")]
    AlreadyReversed {
        /// Journal entry id
        id: i64,
    },

    /// A status change is not allowed from the current state
    #[error("{entity} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Entity kind, e.g. `"Lease"`
        entity: &'static str,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// The unit cannot take a new lease in its current state
    #[error("Unit {unit_id} is not available for leasing")]
    UnitUnavailable {
        /// Unit id
        unit_id: i64,
    },

    /// The requested lease dates collide with a current lease on the unit
    #[error("Unit {unit_id} already has a current lease for the requested dates")]
    LeaseOverlap {
        /// Unit id
        unit_id: i64,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON column (de)serialisation failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Integer conversion overflow
    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

impl Error {
    /// Shorthand for a [`Error::NotFound`] keyed by a numeric id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`Error::Validation`] error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
