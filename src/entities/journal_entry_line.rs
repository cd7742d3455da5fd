//! Journal entry line entity - One debit or credit against one account.
//!
//! Exactly one of `debit` and `credit` is non-zero on a stored line; the
//! journal operations reject anything else before it reaches the table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal entry line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entry_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning journal entry
    pub journal_entry_id: i64,
    /// Account the amount is booked against
    pub account_id: i64,
    /// Counterparty, if any
    pub party_id: Option<i64>,
    /// Line memo
    pub description: Option<String>,
    /// Debit amount (zero when this is a credit line)
    pub debit: Decimal,
    /// Credit amount (zero when this is a debit line)
    pub credit: Decimal,
}

/// Defines relationships between `JournalEntryLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one journal entry
    #[sea_orm(
        belongs_to = "super::journal_entry::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entry::Column::Id"
    )]
    JournalEntry,
    /// Each line books against one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Each line optionally names one party
    #[sea_orm(
        belongs_to = "super::party::Entity",
        from = "Column::PartyId",
        to = "super::party::Column::Id"
    )]
    Party,
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::party::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Party.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
