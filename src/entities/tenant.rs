//! Tenant entity - A person who holds or has held a lease.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Relationship of a tenant to the business
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TenantStatus {
    /// Holds a current lease
    #[sea_orm(string_value = "Active")]
    Active,
    /// Former tenant with no current lease
    #[sea_orm(string_value = "Past")]
    Past,
    /// Prospect who has never signed a lease
    #[sea_orm(string_value = "Lead")]
    Lead,
}

/// Tenant database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Lead, active or past tenant
    pub status: TenantStatus,
    /// Optional avatar reference
    pub avatar: Option<String>,
    /// When the tenant record was created
    pub created_at: DateTime,
}

/// Defines relationships between Tenant and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One tenant has many leases
    #[sea_orm(has_many = "super::lease::Entity")]
    Leases,
}

impl Related<super::lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
