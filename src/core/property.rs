//! Property business logic.
//!
//! Provides functions for creating, retrieving and editing properties.
//! The unit counter on a property is advanced by [`crate::core::unit::create_unit`].

use crate::{
    entities::{Property, PropertyType, property},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Input for creating or editing a property
#[derive(Debug, Clone)]
pub struct PropertyInput {
    /// Owning portfolio, if any
    pub portfolio_id: Option<i64>,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Residential, commercial or mixed use
    pub property_type: PropertyType,
    /// Optional cover image reference
    pub image: Option<String>,
}

impl PropertyInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("Property name cannot be empty"));
        }
        if self.address.trim().is_empty() {
            return Err(Error::validation("Property address cannot be empty"));
        }
        Ok(())
    }
}

async fn ensure_portfolio_exists(db: &DatabaseConnection, portfolio_id: Option<i64>) -> Result<()> {
    if let Some(portfolio_id) = portfolio_id {
        crate::core::portfolio::get_portfolio_by_id(db, portfolio_id)
            .await?
            .ok_or_else(|| Error::not_found("Portfolio", portfolio_id))?;
    }
    Ok(())
}

/// Creates a new property with no units.
///
/// # Errors
/// Returns an error if the name or address is empty, the portfolio does not
/// exist, or the insert fails.
pub async fn create_property(
    db: &DatabaseConnection,
    input: PropertyInput,
) -> Result<property::Model> {
    input.validate()?;
    ensure_portfolio_exists(db, input.portfolio_id).await?;

    let property = property::ActiveModel {
        portfolio_id: Set(input.portfolio_id),
        name: Set(input.name.trim().to_string()),
        address: Set(input.address.trim().to_string()),
        image: Set(input.image),
        property_type: Set(input.property_type),
        units_count: Set(0),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    property.insert(db).await.map_err(Into::into)
}

/// Finds a property by id.
pub async fn get_property_by_id<C>(db: &C, property_id: i64) -> Result<Option<property::Model>>
where
    C: ConnectionTrait,
{
    Property::find_by_id(property_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists properties ordered by name.
///
/// `portfolio_id` restricts to one portfolio; `search` keeps properties whose
/// name or address contains the term (case-insensitive).
pub async fn list_properties(
    db: &DatabaseConnection,
    portfolio_id: Option<i64>,
    search: Option<&str>,
) -> Result<Vec<property::Model>> {
    let mut query = Property::find().order_by_asc(property::Column::Name);
    if let Some(portfolio_id) = portfolio_id {
        query = query.filter(property::Column::PortfolioId.eq(portfolio_id));
    }
    let properties = query.all(db).await?;

    let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(properties);
    };
    let term = term.to_lowercase();

    Ok(properties
        .into_iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&term) || p.address.to_lowercase().contains(&term)
        })
        .collect())
}

/// Replaces the editable details of a property. The unit counter is untouched.
pub async fn update_property(
    db: &DatabaseConnection,
    property_id: i64,
    input: PropertyInput,
) -> Result<property::Model> {
    input.validate()?;
    ensure_portfolio_exists(db, input.portfolio_id).await?;

    let mut property: property::ActiveModel = get_property_by_id(db, property_id)
        .await?
        .ok_or_else(|| Error::not_found("Property", property_id))?
        .into();

    property.portfolio_id = Set(input.portfolio_id);
    property.name = Set(input.name.trim().to_string());
    property.address = Set(input.address.trim().to_string());
    property.image = Set(input.image);
    property.property_type = Set(input.property_type);

    property.update(db).await.map_err(Into::into)
}
