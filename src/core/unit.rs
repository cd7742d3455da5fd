//! Unit business logic.
//!
//! Units start Vacant. Leases move them to Occupied and back; managers can take a
//! unit off the market (Maintenance) or return it, but cannot hand-set occupancy
//! in a way that contradicts the unit's current lease.

use crate::{
    entities::{Property, Unit, UnitStatus, property, unit},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Input for creating a unit
#[derive(Debug, Clone)]
pub struct UnitInput {
    /// Property the unit belongs to
    pub property_id: i64,
    /// Label within the property
    pub unit_number: String,
    /// Number of bedrooms
    pub bedrooms: i32,
    /// Number of bathrooms
    pub bathrooms: Decimal,
    /// Asking monthly rent
    pub rent: Decimal,
    /// Floor area in square feet
    pub size: Option<i32>,
}

/// Creates a vacant unit and bumps the property's unit counter in one transaction.
///
/// # Errors
/// Returns an error if:
/// - The unit number is empty, or already used in the same property
/// - Bedrooms, bathrooms, size or rent are negative
/// - The property does not exist
pub async fn create_unit(db: &DatabaseConnection, input: UnitInput) -> Result<unit::Model> {
    let unit_number = input.unit_number.trim().to_string();
    if unit_number.is_empty() {
        return Err(Error::validation("Unit number cannot be empty"));
    }
    if input.bedrooms < 0 || input.size.is_some_and(|s| s < 0) {
        return Err(Error::validation("Bedrooms and size cannot be negative"));
    }
    if input.bathrooms < Decimal::ZERO {
        return Err(Error::validation("Bathrooms cannot be negative"));
    }
    crate::core::money::ensure_non_negative(input.rent)?;

    let txn = db.begin().await?;

    Property::find_by_id(input.property_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Property", input.property_id))?;

    let duplicate = Unit::find()
        .filter(unit::Column::PropertyId.eq(input.property_id))
        .filter(unit::Column::UnitNumber.eq(unit_number.as_str()))
        .one(&txn)
        .await?;
    if duplicate.is_some() {
        return Err(Error::validation(format!(
            "Unit {unit_number} already exists in property {}",
            input.property_id
        )));
    }

    let unit = unit::ActiveModel {
        property_id: Set(input.property_id),
        unit_number: Set(unit_number),
        status: Set(UnitStatus::Vacant),
        bedrooms: Set(input.bedrooms),
        bathrooms: Set(input.bathrooms),
        rent: Set(input.rent),
        size: Set(input.size),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    Property::update_many()
        .col_expr(
            property::Column::UnitsCount,
            Expr::col(property::Column::UnitsCount).add(1),
        )
        .filter(property::Column::Id.eq(input.property_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(unit)
}

/// Finds a unit by id.
pub async fn get_unit_by_id<C>(db: &C, unit_id: i64) -> Result<Option<unit::Model>>
where
    C: ConnectionTrait,
{
    Unit::find_by_id(unit_id).one(db).await.map_err(Into::into)
}

/// Lists the units of a property ordered by unit number.
pub async fn list_units_for_property(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<Vec<unit::Model>> {
    Unit::find()
        .filter(unit::Column::PropertyId.eq(property_id))
        .order_by_asc(unit::Column::UnitNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists units in a given status across all properties.
pub async fn list_units_by_status(
    db: &DatabaseConnection,
    status: UnitStatus,
) -> Result<Vec<unit::Model>> {
    Unit::find()
        .filter(unit::Column::Status.eq(status))
        .order_by_asc(unit::Column::PropertyId)
        .order_by_asc(unit::Column::UnitNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Manually changes a unit's status.
///
/// Occupied can only be set while a current lease covers the unit, and Vacant
/// cannot be set while one does.
pub async fn set_unit_status(
    db: &DatabaseConnection,
    unit_id: i64,
    status: UnitStatus,
) -> Result<unit::Model> {
    let unit = get_unit_by_id(db, unit_id)
        .await?
        .ok_or_else(|| Error::not_found("Unit", unit_id))?;

    let has_lease = crate::core::lease::get_current_lease_for_unit(db, unit_id)
        .await?
        .is_some();

    let allowed = match status {
        UnitStatus::Occupied => has_lease,
        UnitStatus::Vacant => !has_lease,
        UnitStatus::Maintenance => true,
    };
    if !allowed {
        return Err(Error::InvalidTransition {
            entity: "Unit",
            from: format!("{:?}", unit.status),
            to: format!("{status:?}"),
        });
    }

    update_unit_status(db, unit_id, status).await
}

/// Writes a unit status without checking lease state. Used by the lease lifecycle.
pub(crate) async fn update_unit_status<C>(
    db: &C,
    unit_id: i64,
    status: UnitStatus,
) -> Result<unit::Model>
where
    C: ConnectionTrait,
{
    let mut unit: unit::ActiveModel = get_unit_by_id(db, unit_id)
        .await?
        .ok_or_else(|| Error::not_found("Unit", unit_id))?
        .into();
    unit.status = Set(status);
    unit.update(db).await.map_err(Into::into)
}
