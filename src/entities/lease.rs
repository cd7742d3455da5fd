//! Lease entity - Links one unit to one tenant for a date range.
//!
//! `documents` holds a JSON array of document references (URLs or storage keys).
//! Use [`crate::core::lease::documents_of`] to read it as a typed list.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a lease
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LeaseStatus {
    /// In force
    #[sea_orm(string_value = "Active")]
    Active,
    /// In force, ending within the configured notice window
    #[sea_orm(string_value = "Expiring Soon")]
    ExpiringSoon,
    /// Ran past its end date
    #[sea_orm(string_value = "Expired")]
    Expired,
    /// Ended early by the manager
    #[sea_orm(string_value = "Terminated")]
    Terminated,
}

impl LeaseStatus {
    /// Whether the lease still binds the unit (Active or Expiring Soon).
    #[must_use]
    pub const fn is_current(self) -> bool {
        matches!(self, Self::Active | Self::ExpiringSoon)
    }
}

/// Lease database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    /// Unique identifier for the lease
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Leased unit
    pub unit_id: i64,
    /// Leasing tenant
    pub tenant_id: i64,
    /// First day of the lease
    pub start_date: Date,
    /// Last day of the lease
    pub end_date: Date,
    /// Agreed monthly rent
    pub rent_amount: Decimal,
    /// Security deposit held
    pub security_deposit: Decimal,
    /// Lifecycle state
    pub status: LeaseStatus,
    /// JSON array of document references
    pub documents: Json,
    /// When the lease was created
    pub created_at: DateTime,
}

/// Defines relationships between Lease and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each lease covers one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    /// Each lease is held by one tenant
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id"
    )]
    Tenant,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
