//! Unit entity - A rentable space inside a property.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Occupancy state of a unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UnitStatus {
    /// A current lease covers the unit
    #[sea_orm(string_value = "Occupied")]
    Occupied,
    /// Available to lease
    #[sea_orm(string_value = "Vacant")]
    Vacant,
    /// Taken off the market for repairs
    #[sea_orm(string_value = "Maintenance")]
    Maintenance,
}

/// Unit database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "units")]
pub struct Model {
    /// Unique identifier for the unit
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Property this unit belongs to
    pub property_id: i64,
    /// Unit label within the property (e.g., "4B")
    pub unit_number: String,
    /// Occupancy state
    pub status: UnitStatus,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Number of bathrooms (half baths allowed)
    pub bathrooms: Decimal,
    /// Asking monthly rent
    pub rent: Decimal,
    /// Floor area in square feet
    pub size: Option<i32>,
    /// When the unit was created
    pub created_at: DateTime,
}

/// Defines relationships between Unit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each unit belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
    /// One unit has many leases over time
    #[sea_orm(has_many = "super::lease::Entity")]
    Leases,
    /// One unit has many maintenance tickets
    #[sea_orm(has_many = "super::maintenance_ticket::Entity")]
    MaintenanceTickets,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::lease::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leases.def()
    }
}

impl Related<super::maintenance_ticket::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceTickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
