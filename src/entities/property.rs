//! Property entity - A building or site that contains rentable units.
//!
//! A property may belong to a portfolio and owns its units and maintenance tickets.
//! `units_count` is maintained by the unit operations as units are added.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of property
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PropertyType {
    /// Homes and apartments
    #[sea_orm(string_value = "Residential")]
    Residential,
    /// Offices and retail
    #[sea_orm(string_value = "Commercial")]
    Commercial,
    /// Mixed residential and commercial use
    #[sea_orm(string_value = "Mixed")]
    Mixed,
}

/// Property database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    /// Unique identifier for the property
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning portfolio, if any
    pub portfolio_id: Option<i64>,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Optional cover image reference
    pub image: Option<String>,
    /// Residential, commercial or mixed use
    pub property_type: PropertyType,
    /// Number of units registered under this property
    pub units_count: i32,
    /// When the property was created
    pub created_at: DateTime,
}

/// Defines relationships between Property and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each property optionally belongs to one portfolio
    #[sea_orm(
        belongs_to = "super::portfolio::Entity",
        from = "Column::PortfolioId",
        to = "super::portfolio::Column::Id"
    )]
    Portfolio,
    /// One property has many units
    #[sea_orm(has_many = "super::unit::Entity")]
    Units,
    /// One property has many maintenance tickets
    #[sea_orm(has_many = "super::maintenance_ticket::Entity")]
    MaintenanceTickets,
}

impl Related<super::portfolio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl Related<super::maintenance_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceTickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
