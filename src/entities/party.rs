//! Party entity - A vendor, customer, tenant or employee the ledger deals with.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of counterparty
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PartyType {
    /// Supplier of goods or services
    #[sea_orm(string_value = "Vendor")]
    Vendor,
    /// Buyer of services
    #[sea_orm(string_value = "Customer")]
    Customer,
    /// Rent payer
    #[sea_orm(string_value = "Tenant")]
    Tenant,
    /// Staff member
    #[sea_orm(string_value = "Employee")]
    Employee,
    /// Anything else
    #[sea_orm(string_value = "Other")]
    Other,
}

/// Whether the party is still dealt with
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PartyStatus {
    /// Current counterparty
    #[sea_orm(string_value = "Active")]
    Active,
    /// Kept for history only
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

/// Party database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    /// Unique identifier for the party
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Kind of counterparty
    pub party_type: PartyType,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Active on creation
    pub status: PartyStatus,
    /// Net of posted debits minus credits on lines naming this party
    pub balance: Decimal,
    /// When the party was created
    pub created_at: DateTime,
}

/// Defines relationships between Party and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One party appears on many journal lines
    #[sea_orm(has_many = "super::journal_entry_line::Entity")]
    JournalEntryLines,
}

impl Related<super::journal_entry_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntryLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
