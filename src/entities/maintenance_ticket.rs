//! Maintenance ticket entity - A work request against a property or unit.
//!
//! Comments, photos and the audit timeline are stored as JSON arrays on the row.
//! The typed shapes live in [`crate::core::maintenance`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Urgency of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TicketPriority {
    /// Can wait
    #[sea_orm(string_value = "Low")]
    Low,
    /// Default priority
    #[sea_orm(string_value = "Medium")]
    Medium,
    /// Needs attention soon
    #[sea_orm(string_value = "High")]
    High,
    /// Safety or habitability issue
    #[sea_orm(string_value = "Critical")]
    Critical,
}

/// Workflow state of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TicketStatus {
    /// Reported, not yet started
    #[sea_orm(string_value = "Open")]
    Open,
    /// Work has started
    #[sea_orm(string_value = "In Progress")]
    InProgress,
    /// Work is done
    #[sea_orm(string_value = "Completed")]
    Completed,
}

/// Maintenance ticket database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_tickets")]
pub struct Model {
    /// Unique identifier for the ticket
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Property the work is for
    pub property_id: i64,
    /// Unit the work is for, if it is unit-specific
    pub unit_id: Option<i64>,
    /// Kind of task (e.g., "Maintenance Request", "Inspection")
    pub task_type: String,
    /// Trade or area (e.g., "Plumbing")
    pub category: Option<String>,
    /// Short summary
    pub title: String,
    /// Full problem description
    pub description: String,
    /// Urgency
    pub priority: TicketPriority,
    /// Workflow state
    pub status: TicketStatus,
    /// Day the problem was reported
    pub date_reported: Date,
    /// Person or vendor doing the work
    pub assigned_to: Option<String>,
    /// On-site contact name
    pub contact_name: Option<String>,
    /// On-site contact phone
    pub contact_phone: Option<String>,
    /// JSON array of comments
    pub comments: Json,
    /// JSON array of photos
    pub photos: Json,
    /// JSON array of timeline events
    pub timeline: Json,
    /// When the ticket was created
    pub created_at: DateTime,
}

/// Defines relationships between `MaintenanceTicket` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each ticket belongs to one property
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
    /// Each ticket optionally targets one unit
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
