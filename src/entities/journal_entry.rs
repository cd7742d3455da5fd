//! Journal entry entity - A dated transaction made of balanced debit/credit lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Posting state of a journal entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    /// Editable, has not touched any balance
    #[sea_orm(string_value = "Draft")]
    Draft,
    /// Final, balances have been updated
    #[sea_orm(string_value = "Posted")]
    Posted,
}

/// Journal entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Accounting date
    pub date: Date,
    /// What the transaction was
    pub description: String,
    /// External reference (invoice number, rent period)
    pub reference: Option<String>,
    /// Draft or posted
    pub status: EntryStatus,
    /// Entry this one reverses, if it is a reversal
    pub reversal_of: Option<i64>,
    /// When the entry was posted
    pub posted_at: Option<DateTime>,
    /// When the entry was created
    pub created_at: DateTime,
}

/// Defines relationships between `JournalEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One entry has many lines
    #[sea_orm(has_many = "super::journal_entry_line::Entity")]
    Lines,
}

impl Related<super::journal_entry_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
