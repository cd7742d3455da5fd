//! Rent business logic
//!
//! Posts the monthly rent charges for current leases and records rent payments
//! and security deposits as journal entries. The date of the last rent run is
//! kept in the `system_state` table so charges are posted at most once per
//! calendar month.

use crate::{
    config::settings::LedgerSettings,
    core::{
        account::require_account_by_code,
        journal::{self, JournalEntryWithLines, JournalLineInput, NewJournalEntry},
        lease::{get_lease_by_id, list_current_leases},
        money,
    },
    entities::{JournalEntry, SystemState, journal_entry, lease, system_state},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::info;

const LAST_RENT_RUN_KEY: &str = "last_rent_run";

/// One posted rent charge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentCharge {
    /// Lease charged
    pub lease_id: i64,
    /// Unit the lease covers
    pub unit_id: i64,
    /// Journal entry that carries the charge
    pub entry_id: i64,
    /// Amount charged
    pub amount: Decimal,
}

/// Result of a monthly rent run
#[derive(Debug, Clone)]
pub struct RentRunResult {
    /// Date the run was performed for
    pub run_date: NaiveDate,
    /// Charges posted by this run
    pub charges: Vec<RentCharge>,
    /// Leases that already had a charge for the month
    pub already_charged: usize,
    /// Sum of the posted charges
    pub total_charged: Decimal,
}

/// Reference stamped on the rent charge of a lease for the month of `date`.
#[must_use]
pub fn rent_reference(lease_id: i64, date: NaiveDate) -> String {
    format!("RENT-{lease_id}-{}", date.format("%Y-%m"))
}

/// Checks whether a rent run is due: true if no run was recorded, or the last
/// one happened in an earlier month than `as_of`.
pub async fn is_rent_run_needed(db: &DatabaseConnection, as_of: NaiveDate) -> Result<bool> {
    let last_run = get_last_rent_run_date(db).await?;
    Ok(rent_run_due(last_run, as_of))
}

/// A run is due unless the last one fell in the same calendar month as `as_of`.
fn rent_run_due(last_run: Option<NaiveDate>, as_of: NaiveDate) -> bool {
    last_run.is_none_or(|last| last.year() != as_of.year() || last.month() != as_of.month())
}

/// Retrieves the date of the last rent run from the `system_state` table.
pub async fn get_last_rent_run_date<C>(db: &C) -> Result<Option<NaiveDate>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_RENT_RUN_KEY))
        .one(db)
        .await?;

    match state {
        Some(s) => NaiveDate::parse_from_str(&s.value, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("Failed to parse last rent run date: {e}"),
            }),
        None => Ok(None),
    }
}

async fn set_last_rent_run_date<C>(db: &C, date: NaiveDate) -> Result<()>
where
    C: ConnectionTrait,
{
    let date_str = date.format("%Y-%m-%d").to_string();
    let now = Utc::now().naive_utc();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_RENT_RUN_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(date_str);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        system_state::ActiveModel {
            key: Set(LAST_RENT_RUN_KEY.to_string()),
            value: Set(date_str),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

async fn find_entry_by_reference<C>(db: &C, reference: &str) -> Result<Option<journal_entry::Model>>
where
    C: ConnectionTrait,
{
    JournalEntry::find()
        .filter(journal_entry::Column::Reference.eq(reference))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether the lease term touches the calendar month of `date`.
fn covers_month(lease: &lease::Model, date: NaiveDate) -> bool {
    let Some(month_start) = date.with_day(1) else {
        return false;
    };
    let month_end = month_start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(month_start);

    lease.start_date <= month_end && lease.end_date >= month_start
}

/// Posts one rent charge per current lease for the month of `as_of`.
///
/// 1. Returns `None` when a run was already recorded this month
/// 2. For each current lease covering the month, posts debit receivables /
///    credit rental income for the lease rent, referenced `RENT-<lease>-<YYYY-MM>`
/// 3. Records the run date in `system_state`
///
/// All charges and the run date are written in one transaction.
///
/// # Errors
/// Returns an error if a configured account code does not exist or any
/// posting fails; nothing is written in that case.
pub async fn process_monthly_rent_charges(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    as_of: NaiveDate,
) -> Result<Option<RentRunResult>> {
    if !is_rent_run_needed(db, as_of).await? {
        return Ok(None);
    }

    let txn = db.begin().await?;

    // Another run may have committed since the check above
    if !rent_run_due(get_last_rent_run_date(&txn).await?, as_of) {
        return Ok(None);
    }

    let receivables = require_account_by_code(&txn, &settings.receivables_account).await?;
    let income = require_account_by_code(&txn, &settings.rental_income_account).await?;

    let mut charges = Vec::new();
    let mut already_charged = 0;

    for lease in list_current_leases(&txn).await? {
        if !covers_month(&lease, as_of) {
            continue;
        }

        let reference = rent_reference(lease.id, as_of);
        if find_entry_by_reference(&txn, &reference).await?.is_some() {
            already_charged += 1;
            continue;
        }

        let posted = journal::record_entry_in(
            &txn,
            NewJournalEntry {
                date: as_of,
                description: format!("Rent for {} - lease #{}", as_of.format("%B %Y"), lease.id),
                reference: Some(reference),
                lines: vec![
                    JournalLineInput::debit(receivables.id, lease.rent_amount),
                    JournalLineInput::credit(income.id, lease.rent_amount),
                ],
            },
        )
        .await?;

        charges.push(RentCharge {
            lease_id: lease.id,
            unit_id: lease.unit_id,
            entry_id: posted.entry.id,
            amount: lease.rent_amount,
        });
    }

    set_last_rent_run_date(&txn, as_of).await?;
    txn.commit().await?;

    let total_charged = charges.iter().map(|c| c.amount).sum();
    info!(
        month = %as_of.format("%Y-%m"),
        charged = charges.len(),
        total = %total_charged,
        "Monthly rent run complete"
    );

    Ok(Some(RentRunResult {
        run_date: as_of,
        charges,
        already_charged,
        total_charged,
    }))
}

/// Records a rent payment against a lease: debit cash, credit receivables.
///
/// # Errors
/// Returns an error if the lease does not exist, the amount is not a positive
/// whole-cent value, or a configured account is missing.
pub async fn record_rent_payment(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    lease_id: i64,
    amount: Decimal,
    date: NaiveDate,
) -> Result<JournalEntryWithLines> {
    money::ensure_positive(amount)?;
    let lease = get_lease_by_id(db, lease_id)
        .await?
        .ok_or_else(|| Error::not_found("Lease", lease_id))?;

    let cash = require_account_by_code(db, &settings.cash_account).await?;
    let receivables = require_account_by_code(db, &settings.receivables_account).await?;

    let posted = journal::record_entry(
        db,
        NewJournalEntry {
            date,
            description: format!("Rent payment - lease #{}", lease.id),
            reference: Some(format!("PAY-{}-{}", lease.id, date.format("%Y%m%d"))),
            lines: vec![
                JournalLineInput::debit(cash.id, amount),
                JournalLineInput::credit(receivables.id, amount),
            ],
        },
    )
    .await?;

    info!(lease_id, amount = %amount, "Recorded rent payment");
    Ok(posted)
}

/// Records the lease's security deposit: debit cash, credit deposits held.
///
/// # Errors
/// Returns an error if the lease does not exist, carries no deposit, or its
/// deposit was already recorded.
pub async fn record_security_deposit(
    db: &DatabaseConnection,
    settings: &LedgerSettings,
    lease_id: i64,
    date: NaiveDate,
) -> Result<JournalEntryWithLines> {
    let lease = get_lease_by_id(db, lease_id)
        .await?
        .ok_or_else(|| Error::not_found("Lease", lease_id))?;

    if lease.security_deposit <= Decimal::ZERO {
        return Err(Error::validation(format!(
            "Lease #{lease_id} has no security deposit"
        )));
    }

    let reference = format!("DEP-{lease_id}");
    if find_entry_by_reference(db, &reference).await?.is_some() {
        return Err(Error::validation(format!(
            "Security deposit for lease #{lease_id} is already recorded"
        )));
    }

    let cash = require_account_by_code(db, &settings.cash_account).await?;
    let deposits = require_account_by_code(db, &settings.security_deposit_account).await?;

    let posted = journal::record_entry(
        db,
        NewJournalEntry {
            date,
            description: format!("Security deposit - lease #{lease_id}"),
            reference: Some(reference),
            lines: vec![
                JournalLineInput::debit(cash.id, lease.security_deposit),
                JournalLineInput::credit(deposits.id, lease.security_deposit),
            ],
        },
    )
    .await?;

    info!(lease_id, amount = %lease.security_deposit, "Recorded security deposit");
    Ok(posted)
}

/// Formats a rent run result into a human-readable summary for the log.
#[must_use]
pub fn format_rent_run_summary(result: &RentRunResult) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Rent Run - {} - Charged {} leases, {}\n",
        result.run_date.format("%B %Y"),
        result.charges.len(),
        crate::core::report::format_currency(result.total_charged)
    );

    if result.already_charged > 0 {
        // write! is infallible when writing to String
        let _ = writeln!(
            summary,
            "  Skipped {} leases already charged this month",
            result.already_charged
        );
    }

    for charge in &result.charges {
        let _ = writeln!(
            summary,
            "  Lease #{} (unit {}) | {} | entry #{}",
            charge.lease_id,
            charge.unit_id,
            crate::core::report::format_currency(charge.amount),
            charge.entry_id
        );
    }

    summary
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{account::get_account_by_code, lease::terminate_lease};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_is_rent_run_needed_no_previous_run() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(is_rent_run_needed(&db, date(2025, 3, 1)).await?);
        assert!(get_last_rent_run_date(&db).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_set_last_rent_run_date_updates_existing() -> Result<()> {
        let db = setup_test_db().await?;

        set_last_rent_run_date(&db, date(2025, 1, 1)).await?;
        set_last_rent_run_date(&db, date(2025, 2, 1)).await?;

        assert_eq!(get_last_rent_run_date(&db).await?, Some(date(2025, 2, 1)));
        let count = SystemState::find()
            .filter(system_state::Column::Key.eq(LAST_RENT_RUN_KEY))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        assert!(!is_rent_run_needed(&db, date(2025, 2, 20)).await?);
        assert!(is_rent_run_needed(&db, date(2025, 3, 1)).await?);
        assert!(is_rent_run_needed(&db, date(2026, 2, 1)).await?);

        Ok(())
    }

    #[test]
    fn test_rent_run_due_by_calendar_month() {
        assert!(rent_run_due(None, date(2025, 3, 1)));
        assert!(!rent_run_due(Some(date(2025, 3, 1)), date(2025, 3, 31)));
        assert!(rent_run_due(Some(date(2025, 3, 31)), date(2025, 4, 1)));
        // Same month number a year later is still due
        assert!(rent_run_due(Some(date(2024, 3, 15)), date(2025, 3, 15)));
    }

    #[test]
    fn test_rent_reference() {
        assert_eq!(rent_reference(7, date(2025, 3, 14)), "RENT-7-2025-03");
    }

    #[tokio::test]
    async fn test_rent_run_posts_once_per_month() -> Result<()> {
        let db = setup_seeded_db().await?;
        let settings = LedgerSettings::default();
        let (_, unit) = setup_with_unit(&db).await?;
        let tenant = create_test_tenant(&db, "Avery Quinn").await?;
        let lease = create_test_lease(&db, unit.id, tenant.id).await?;

        let result = process_monthly_rent_charges(&db, &settings, date(2025, 3, 1))
            .await?
            .unwrap();
        assert_eq!(result.charges.len(), 1);
        assert_eq!(result.charges[0].lease_id, lease.id);
        assert_eq!(result.total_charged, lease.rent_amount);

        let receivables = get_account_by_code(&db, "1100").await?.unwrap();
        let income = get_account_by_code(&db, "4000").await?.unwrap();
        assert_eq!(receivables.balance, lease.rent_amount);
        assert_eq!(income.balance, lease.rent_amount);

        let entry = find_entry_by_reference(&db, &rent_reference(lease.id, date(2025, 3, 1)))
            .await?
            .unwrap();
        assert_eq!(entry.id, result.charges[0].entry_id);

        // Same month again is a no-op
        let again = process_monthly_rent_charges(&db, &settings, date(2025, 3, 28)).await?;
        assert!(again.is_none());

        // Next month charges again
        let april = process_monthly_rent_charges(&db, &settings, date(2025, 4, 1))
            .await?
            .unwrap();
        assert_eq!(april.charges.len(), 1);
        let receivables = get_account_by_code(&db, "1100").await?.unwrap();
        assert_eq!(receivables.balance, lease.rent_amount * dec!(2));

        Ok(())
    }

    #[tokio::test]
    async fn test_rent_run_skips_ended_and_uncovered_leases() -> Result<()> {
        let db = setup_seeded_db().await?;
        let settings = LedgerSettings::default();
        let (property, unit) = setup_with_unit(&db).await?;
        let other_unit = create_test_unit(&db, property.id, "2B").await?;
        let tenant = create_test_tenant(&db, "Avery Quinn").await?;
        let other_tenant = create_test_tenant(&db, "Rowan Diaz").await?;

        let ended = create_test_lease(&db, unit.id, tenant.id).await?;
        terminate_lease(&db, ended.id).await?;
        let current = create_test_lease(&db, other_unit.id, other_tenant.id).await?;

        let march = process_monthly_rent_charges(&db, &settings, date(2025, 3, 1))
            .await?
            .unwrap();
        assert_eq!(march.charges.len(), 1);
        assert_eq!(march.charges[0].lease_id, current.id);

        // Test leases run through 2025, so a 2026 run charges nothing
        let outside = process_monthly_rent_charges(&db, &settings, date(2026, 2, 1))
            .await?
            .unwrap();
        assert!(outside.charges.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_rent_run_without_receivables_account_writes_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = LedgerSettings::default();

        let result = process_monthly_rent_charges(&db, &settings, date(2025, 3, 1)).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "Account", .. })));
        assert!(get_last_rent_run_date(&db).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_record_rent_payment() -> Result<()> {
        let db = setup_seeded_db().await?;
        let settings = LedgerSettings::default();
        let (_, unit) = setup_with_unit(&db).await?;
        let tenant = create_test_tenant(&db, "Avery Quinn").await?;
        let lease = create_test_lease(&db, unit.id, tenant.id).await?;

        process_monthly_rent_charges(&db, &settings, date(2025, 3, 1)).await?;
        record_rent_payment(&db, &settings, lease.id, dec!(1000.50), date(2025, 3, 5)).await?;

        let cash = get_account_by_code(&db, "1000").await?.unwrap();
        let receivables = get_account_by_code(&db, "1100").await?.unwrap();
        assert_eq!(cash.balance, dec!(1000.50));
        assert_eq!(receivables.balance, lease.rent_amount - dec!(1000.50));

        let bad = record_rent_payment(&db, &settings, lease.id, dec!(0), date(2025, 3, 5)).await;
        assert!(matches!(bad, Err(Error::InvalidAmount { .. })));

        let missing = record_rent_payment(&db, &settings, 999, dec!(10), date(2025, 3, 5)).await;
        assert!(matches!(missing, Err(Error::NotFound { entity: "Lease", .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_record_security_deposit_once() -> Result<()> {
        let db = setup_seeded_db().await?;
        let settings = LedgerSettings::default();
        let (_, unit) = setup_with_unit(&db).await?;
        let tenant = create_test_tenant(&db, "Avery Quinn").await?;
        let lease = create_test_lease(&db, unit.id, tenant.id).await?;

        record_security_deposit(&db, &settings, lease.id, date(2025, 1, 1)).await?;

        let deposits = get_account_by_code(&db, "2100").await?.unwrap();
        assert_eq!(deposits.balance, lease.security_deposit);

        let twice = record_security_deposit(&db, &settings, lease.id, date(2025, 1, 2)).await;
        assert!(matches!(twice, Err(Error::Validation { .. })));

        Ok(())
    }

    #[test]
    fn test_format_rent_run_summary() {
        let result = RentRunResult {
            run_date: date(2025, 3, 1),
            charges: vec![RentCharge {
                lease_id: 4,
                unit_id: 9,
                entry_id: 12,
                amount: dec!(1500),
            }],
            already_charged: 1,
            total_charged: dec!(1500),
        };

        let summary = format_rent_run_summary(&result);
        assert!(summary.contains("March 2025"));
        assert!(summary.contains("Charged 1 leases"));
        assert!(summary.contains("$1,500.00"));
        assert!(summary.contains("Skipped 1 leases"));
        assert!(summary.contains("Lease #4 (unit 9)"));
    }
}
