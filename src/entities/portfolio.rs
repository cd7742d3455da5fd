//! Portfolio entity - A named grouping of properties under common management.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a portfolio is still being managed
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PortfolioStatus {
    /// Portfolio is under management
    #[sea_orm(string_value = "Active")]
    Active,
    /// Portfolio is archived
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

/// Portfolio database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    /// Unique identifier for the portfolio
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Downtown Holdings")
    pub name: String,
    /// Short code used in reports (e.g., "DTH")
    pub code: String,
    /// Management status
    pub status: PortfolioStatus,
    /// When the portfolio was created
    pub created_at: DateTime,
}

/// Defines relationships between Portfolio and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One portfolio has many properties
    #[sea_orm(has_many = "super::property::Entity")]
    Properties,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Properties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
