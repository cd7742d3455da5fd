//! Shared test utilities for `PropertyLedger`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::settings::default_chart_of_accounts,
    core::{
        account, journal, lease, maintenance, portfolio,
        property::{self, PropertyInput},
        tenant,
        unit::{self, UnitInput},
    },
    entities::{self, AccountType, PropertyType, TicketPriority},
    errors::Result,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test database with the default chart of accounts seeded.
pub async fn setup_seeded_db() -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    account::seed_chart_of_accounts(&db, &default_chart_of_accounts()).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
///
/// # Panics
/// Panics if the date does not exist.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test portfolio whose code is the first three letters of its name.
pub async fn create_test_portfolio(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::portfolio::Model> {
    let code: String = name.chars().filter(char::is_ascii_alphabetic).take(3).collect();
    portfolio::create_portfolio(db, name, &code).await
}

/// Creates a residential test property with no portfolio.
///
/// # Defaults
/// * `address`: "100 Main St"
/// * `property_type`: Residential
pub async fn create_test_property(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::property::Model> {
    property::create_property(
        db,
        PropertyInput {
            portfolio_id: None,
            name: name.to_string(),
            address: "100 Main St".to_string(),
            property_type: PropertyType::Residential,
            image: None,
        },
    )
    .await
}

/// Creates a vacant test unit.
///
/// # Defaults
/// * `bedrooms`: 2
/// * `bathrooms`: 1
/// * `rent`: 1500
pub async fn create_test_unit(
    db: &DatabaseConnection,
    property_id: i64,
    unit_number: &str,
) -> Result<entities::unit::Model> {
    unit::create_unit(
        db,
        UnitInput {
            property_id,
            unit_number: unit_number.to_string(),
            bedrooms: 2,
            bathrooms: dec!(1),
            rent: dec!(1500),
            size: Some(800),
        },
    )
    .await
}

/// Creates a "Maple Court" property with one vacant unit "1A".
pub async fn setup_with_unit(
    db: &DatabaseConnection,
) -> Result<(entities::property::Model, entities::unit::Model)> {
    let property = create_test_property(db, "Maple Court").await?;
    let unit = create_test_unit(db, property.id, "1A").await?;
    Ok((property, unit))
}

/// Creates a lead tenant with an email derived from the name,
/// e.g. "Ana Ruiz" gets `ana.ruiz@example.com`.
pub async fn create_test_tenant(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::tenant::Model> {
    let local = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".");
    tenant::create_tenant(db, name, &format!("{local}@example.com"), None).await
}

/// Signs a lease running through calendar year 2025.
///
/// # Defaults
/// * `start_date`: 2025-01-01
/// * `end_date`: 2025-12-31
/// * `rent_amount`: 1500
/// * `security_deposit`: 1500
pub async fn create_test_lease(
    db: &DatabaseConnection,
    unit_id: i64,
    tenant_id: i64,
) -> Result<entities::lease::Model> {
    lease::create_lease(
        db,
        lease::LeaseInput {
            unit_id,
            tenant_id,
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            rent_amount: dec!(1500),
            security_deposit: dec!(1500),
        },
    )
    .await
}

/// Opens a property-wide ticket with the given priority.
pub async fn create_test_ticket(
    db: &DatabaseConnection,
    property_id: i64,
    priority: TicketPriority,
) -> Result<entities::maintenance_ticket::Model> {
    maintenance::create_ticket(
        db,
        maintenance::TicketInput {
            property_id,
            unit_id: None,
            task_type: "Maintenance Request".to_string(),
            category: None,
            title: "Hallway light out".to_string(),
            description: "Second floor hallway light does not turn on".to_string(),
            priority,
            date_reported: date(2025, 3, 1),
            contact_name: None,
            contact_phone: None,
            reported_by: "front desk".to_string(),
        },
    )
    .await
}

/// Creates an account named after its code.
pub async fn create_test_account(
    db: &DatabaseConnection,
    code: &str,
    account_type: AccountType,
) -> Result<entities::account::Model> {
    account::create_account(db, code, &format!("Account {code}"), account_type, None).await
}

/// Creates a cash asset account "1000" and a rental income account "4000".
pub async fn setup_cash_and_revenue(
    db: &DatabaseConnection,
) -> Result<(entities::account::Model, entities::account::Model)> {
    let cash = create_test_account(db, "1000", AccountType::Asset).await?;
    let revenue = create_test_account(db, "4000", AccountType::Revenue).await?;
    Ok((cash, revenue))
}

/// A two-line entry dated 2025-02-01 debiting `debit_account` and crediting
/// `credit_account` by `amount`.
pub fn balanced_entry(
    debit_account: i64,
    credit_account: i64,
    amount: Decimal,
) -> journal::NewJournalEntry {
    journal::NewJournalEntry {
        date: date(2025, 2, 1),
        description: "Test entry".to_string(),
        reference: None,
        lines: vec![
            journal::JournalLineInput::debit(debit_account, amount),
            journal::JournalLineInput::credit(credit_account, amount),
        ],
    }
}
