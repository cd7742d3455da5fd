//! Lease business logic - Lease lifecycle and its effect on units and tenants.
//!
//! A lease is *current* while it is Active or Expiring Soon. A unit has at most
//! one current lease. Creating a lease occupies the unit and activates the tenant;
//! ending one (termination or expiry) frees the unit and marks the tenant Past
//! once they hold no other current lease. Each of these runs in one transaction.

use crate::{
    entities::{Lease, LeaseStatus, TenantStatus, UnitStatus, lease},
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

const CURRENT_STATUSES: [LeaseStatus; 2] = [LeaseStatus::Active, LeaseStatus::ExpiringSoon];

/// Input for signing a new lease
#[derive(Debug, Clone)]
pub struct LeaseInput {
    /// Unit being leased
    pub unit_id: i64,
    /// Tenant signing the lease
    pub tenant_id: i64,
    /// First day of the lease
    pub start_date: NaiveDate,
    /// Last day of the lease
    pub end_date: NaiveDate,
    /// Monthly rent
    pub rent_amount: Decimal,
    /// Security deposit
    pub security_deposit: Decimal,
}

impl LeaseInput {
    fn validate(&self) -> Result<()> {
        if self.end_date <= self.start_date {
            return Err(Error::validation("Lease end date must be after its start date"));
        }
        crate::core::money::ensure_positive(self.rent_amount)?;
        crate::core::money::ensure_non_negative(self.security_deposit)
    }
}

/// Outcome of [`refresh_lease_statuses`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaseRefreshSummary {
    /// Leases that moved to Expired
    pub expired: Vec<i64>,
    /// Leases that moved to Expiring Soon
    pub expiring_soon: Vec<i64>,
}

impl LeaseRefreshSummary {
    /// Whether nothing changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expired.is_empty() && self.expiring_soon.is_empty()
    }
}

/// Signs a new lease.
///
/// # Errors
/// Returns an error if:
/// - The end date is not after the start date, rent is not positive, or the deposit is negative
/// - The unit or tenant does not exist
/// - The unit is under maintenance (`UnitUnavailable`)
/// - The unit already has a current lease (`LeaseOverlap`)
pub async fn create_lease(db: &DatabaseConnection, input: LeaseInput) -> Result<lease::Model> {
    input.validate()?;

    let txn = db.begin().await?;

    let unit = crate::core::unit::get_unit_by_id(&txn, input.unit_id)
        .await?
        .ok_or_else(|| Error::not_found("Unit", input.unit_id))?;
    crate::core::tenant::get_tenant_by_id(&txn, input.tenant_id)
        .await?
        .ok_or_else(|| Error::not_found("Tenant", input.tenant_id))?;

    if unit.status == UnitStatus::Maintenance {
        return Err(Error::UnitUnavailable { unit_id: unit.id });
    }
    if get_current_lease_for_unit(&txn, unit.id).await?.is_some() {
        return Err(Error::LeaseOverlap { unit_id: unit.id });
    }

    let lease = lease::ActiveModel {
        unit_id: Set(input.unit_id),
        tenant_id: Set(input.tenant_id),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        rent_amount: Set(input.rent_amount),
        security_deposit: Set(input.security_deposit),
        status: Set(LeaseStatus::Active),
        documents: Set(serde_json::json!([])),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    crate::core::unit::update_unit_status(&txn, unit.id, UnitStatus::Occupied).await?;
    crate::core::tenant::set_tenant_status(&txn, input.tenant_id, TenantStatus::Active).await?;

    txn.commit().await?;

    info!(
        lease_id = lease.id,
        unit_id = lease.unit_id,
        tenant_id = lease.tenant_id,
        "Lease created"
    );
    Ok(lease)
}

/// Finds a lease by id.
pub async fn get_lease_by_id<C>(db: &C, lease_id: i64) -> Result<Option<lease::Model>>
where
    C: ConnectionTrait,
{
    Lease::find_by_id(lease_id).one(db).await.map_err(Into::into)
}

/// Returns the current (Active or Expiring Soon) lease on a unit, if any.
pub async fn get_current_lease_for_unit<C>(db: &C, unit_id: i64) -> Result<Option<lease::Model>>
where
    C: ConnectionTrait,
{
    Lease::find()
        .filter(lease::Column::UnitId.eq(unit_id))
        .filter(lease::Column::Status.is_in(CURRENT_STATUSES))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists all current leases ordered by id.
pub async fn list_current_leases<C>(db: &C) -> Result<Vec<lease::Model>>
where
    C: ConnectionTrait,
{
    Lease::find()
        .filter(lease::Column::Status.is_in(CURRENT_STATUSES))
        .order_by_asc(lease::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the past (non-current) leases of a unit, most recent end date first.
pub async fn list_lease_history_for_unit(
    db: &DatabaseConnection,
    unit_id: i64,
) -> Result<Vec<lease::Model>> {
    Lease::find()
        .filter(lease::Column::UnitId.eq(unit_id))
        .filter(lease::Column::Status.is_not_in(CURRENT_STATUSES))
        .order_by_desc(lease::Column::EndDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists every lease a tenant has held, most recent start date first.
pub async fn list_leases_for_tenant(
    db: &DatabaseConnection,
    tenant_id: i64,
) -> Result<Vec<lease::Model>> {
    Lease::find()
        .filter(lease::Column::TenantId.eq(tenant_id))
        .order_by_desc(lease::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Ends a current lease early.
///
/// The unit becomes Vacant (unless it is under maintenance) and the tenant becomes
/// Past if they hold no other current lease.
pub async fn terminate_lease(db: &DatabaseConnection, lease_id: i64) -> Result<lease::Model> {
    let txn = db.begin().await?;

    let lease = get_lease_by_id(&txn, lease_id)
        .await?
        .ok_or_else(|| Error::not_found("Lease", lease_id))?;

    if !lease.status.is_current() {
        return Err(Error::InvalidTransition {
            entity: "Lease",
            from: format!("{:?}", lease.status),
            to: format!("{:?}", LeaseStatus::Terminated),
        });
    }

    let lease = close_lease(&txn, lease, LeaseStatus::Terminated).await?;
    txn.commit().await?;

    info!(lease_id, "Lease terminated");
    Ok(lease)
}

/// Brings lease statuses in line with `as_of`.
///
/// Current leases whose end date is before `as_of` become Expired and release
/// their unit and tenant. Active leases ending within `expiring_soon_days` become
/// Expiring Soon.
pub async fn refresh_lease_statuses(
    db: &DatabaseConnection,
    as_of: NaiveDate,
    expiring_soon_days: i64,
) -> Result<LeaseRefreshSummary> {
    let horizon = as_of + Duration::days(expiring_soon_days.max(0));
    let txn = db.begin().await?;
    let mut summary = LeaseRefreshSummary::default();

    for lease in list_current_leases(&txn).await? {
        if lease.end_date < as_of {
            summary.expired.push(lease.id);
            close_lease(&txn, lease, LeaseStatus::Expired).await?;
        } else if lease.status == LeaseStatus::Active && lease.end_date <= horizon {
            summary.expiring_soon.push(lease.id);
            let mut active: lease::ActiveModel = lease.into();
            active.status = Set(LeaseStatus::ExpiringSoon);
            active.update(&txn).await?;
        }
    }

    txn.commit().await?;

    if !summary.is_empty() {
        info!(
            expired = summary.expired.len(),
            expiring_soon = summary.expiring_soon.len(),
            "Lease statuses refreshed"
        );
    }
    Ok(summary)
}

/// Sets a final status on a lease and releases its unit and tenant.
async fn close_lease<C>(db: &C, lease: lease::Model, status: LeaseStatus) -> Result<lease::Model>
where
    C: ConnectionTrait,
{
    let unit_id = lease.unit_id;
    let tenant_id = lease.tenant_id;
    let lease_id = lease.id;

    let mut active: lease::ActiveModel = lease.into();
    active.status = Set(status);
    let lease = active.update(db).await?;

    let unit = crate::core::unit::get_unit_by_id(db, unit_id).await?;
    if unit.is_some_and(|u| u.status == UnitStatus::Occupied) {
        crate::core::unit::update_unit_status(db, unit_id, UnitStatus::Vacant).await?;
    }

    let other_current = Lease::find()
        .filter(lease::Column::TenantId.eq(tenant_id))
        .filter(lease::Column::Id.ne(lease_id))
        .filter(lease::Column::Status.is_in(CURRENT_STATUSES))
        .one(db)
        .await?;
    if other_current.is_none() {
        crate::core::tenant::set_tenant_status(db, tenant_id, TenantStatus::Past).await?;
    }

    Ok(lease)
}

/// Reads the document references stored on a lease.
pub fn documents_of(lease: &lease::Model) -> Result<Vec<String>> {
    if lease.documents.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(lease.documents.clone()).map_err(Into::into)
}

/// Appends a document reference to a lease.
pub async fn add_lease_document(
    db: &DatabaseConnection,
    lease_id: i64,
    reference: &str,
) -> Result<lease::Model> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(Error::validation("Document reference cannot be empty"));
    }

    let lease = get_lease_by_id(db, lease_id)
        .await?
        .ok_or_else(|| Error::not_found("Lease", lease_id))?;

    let mut documents = documents_of(&lease)?;
    documents.push(reference.to_string());

    let mut active: lease::ActiveModel = lease.into();
    active.documents = Set(serde_json::to_value(documents)?);
    active.update(db).await.map_err(Into::into)
}
