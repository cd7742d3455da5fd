//! Tenant business logic.
//!
//! New tenants start as Lead. Signing a lease makes them Active and losing their
//! last current lease makes them Past; see [`crate::core::lease`].

use crate::{
    entities::{Tenant, TenantStatus, tenant},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new tenant in Lead status.
///
/// # Errors
/// Returns an error if the name is empty, the email has no `@`, or the insert fails.
pub async fn create_tenant(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    phone: Option<String>,
) -> Result<tenant::Model> {
    let name = name.trim();
    let email = email.trim();

    if name.is_empty() {
        return Err(Error::validation("Tenant name cannot be empty"));
    }
    if !is_plausible_email(email) {
        return Err(Error::validation(format!("Invalid email address: {email}")));
    }

    let tenant = tenant::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_lowercase()),
        phone: Set(phone),
        status: Set(TenantStatus::Lead),
        avatar: Set(None),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    tenant.insert(db).await.map_err(Into::into)
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

/// Finds a tenant by id.
pub async fn get_tenant_by_id<C>(db: &C, tenant_id: i64) -> Result<Option<tenant::Model>>
where
    C: ConnectionTrait,
{
    Tenant::find_by_id(tenant_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists tenants ordered by name with an optional status filter and a
/// case-insensitive search over name and email.
pub async fn list_tenants(
    db: &DatabaseConnection,
    status: Option<TenantStatus>,
    search: Option<&str>,
) -> Result<Vec<tenant::Model>> {
    let mut query = Tenant::find().order_by_asc(tenant::Column::Name);
    if let Some(status) = status {
        query = query.filter(tenant::Column::Status.eq(status));
    }
    let tenants = query.all(db).await?;

    let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(tenants);
    };
    let term = term.to_lowercase();

    Ok(tenants
        .into_iter()
        .filter(|t| t.name.to_lowercase().contains(&term) || t.email.contains(&term))
        .collect())
}

/// Sets a tenant's status.
pub async fn set_tenant_status<C>(
    db: &C,
    tenant_id: i64,
    status: TenantStatus,
) -> Result<tenant::Model>
where
    C: ConnectionTrait,
{
    let mut tenant: tenant::ActiveModel = get_tenant_by_id(db, tenant_id)
        .await?
        .ok_or_else(|| Error::not_found("Tenant", tenant_id))?
        .into();

    tenant.status = Set(status);
    tenant.update(db).await.map_err(Into::into)
}
