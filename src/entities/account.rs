//! Account entity - One line of the chart of accounts.
//!
//! `balance` is kept in the account's natural sign: debit-normal accounts
//! (assets, expenses) grow with debits, credit-normal accounts grow with credits.
//! It only changes when journal entries are posted or reversed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Top-level classification of an account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    /// Things owned (cash, receivables)
    #[sea_orm(string_value = "Asset")]
    Asset,
    /// Amounts owed (payables, deposits held)
    #[sea_orm(string_value = "Liability")]
    Liability,
    /// Owner's stake
    #[sea_orm(string_value = "Equity")]
    Equity,
    /// Income earned (rent)
    #[sea_orm(string_value = "Revenue")]
    Revenue,
    /// Costs incurred (repairs, utilities)
    #[sea_orm(string_value = "Expense")]
    Expense,
}

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Chart-of-accounts code (e.g., "1000")
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Classification
    pub account_type: AccountType,
    /// Optional sub-classification (e.g., "Cash", "Receivables")
    pub category: Option<String>,
    /// Running balance in the account's natural sign
    pub balance: Decimal,
    /// When the account was created
    pub created_at: DateTime,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many journal lines
    #[sea_orm(has_many = "super::journal_entry_line::Entity")]
    JournalEntryLines,
}

impl Related<super::journal_entry_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
