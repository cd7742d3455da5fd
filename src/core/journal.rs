//! Journal business logic - Drafting, posting and reversing journal entries.
//!
//! An entry is postable when the sum of its debits equals the sum of its credits
//! to the cent and that sum is greater than zero. Entries with no lines or only
//! zero amounts are never postable. Drafts may be unbalanced while they are being
//! edited; posting is the trust boundary where the rule is enforced.
//!
//! Posting runs in one database transaction: every line moves its account
//! balance (in the account's natural sign) and, when it names a party, the
//! party balance by `debit - credit`. Either all of that happens together with
//! the status change to Posted, or none of it does. Posted entries are never
//! edited; they are corrected with [`reverse_entry`].

use crate::{
    core::{account, money, party},
    entities::{
        EntryStatus, JournalEntry, JournalEntryLine, journal_entry, journal_entry_line,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// One line of a journal entry being drafted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineInput {
    /// Account to book against
    pub account_id: i64,
    /// Counterparty, if any
    pub party_id: Option<i64>,
    /// Line memo
    pub description: Option<String>,
    /// Debit amount
    pub debit: Decimal,
    /// Credit amount
    pub credit: Decimal,
}

impl JournalLineInput {
    /// A debit line
    #[must_use]
    pub const fn debit(account_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            party_id: None,
            description: None,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// A credit line
    #[must_use]
    pub const fn credit(account_id: i64, amount: Decimal) -> Self {
        Self {
            account_id,
            party_id: None,
            description: None,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// Names a counterparty on the line
    #[must_use]
    pub const fn with_party(mut self, party_id: i64) -> Self {
        self.party_id = Some(party_id);
        self
    }

    /// Adds a memo to the line
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A new journal entry with its lines
#[derive(Debug, Clone)]
pub struct NewJournalEntry {
    /// Accounting date
    pub date: NaiveDate,
    /// What the transaction was
    pub description: String,
    /// External reference
    pub reference: Option<String>,
    /// Debit and credit lines
    pub lines: Vec<JournalLineInput>,
}

/// Anything that carries a debit and a credit amount.
pub trait LineAmounts {
    /// The `(debit, credit)` pair of the line
    fn amounts(&self) -> (Decimal, Decimal);
}

impl LineAmounts for JournalLineInput {
    fn amounts(&self) -> (Decimal, Decimal) {
        (self.debit, self.credit)
    }
}

impl LineAmounts for journal_entry_line::Model {
    fn amounts(&self) -> (Decimal, Decimal) {
        (self.debit, self.credit)
    }
}

/// Debit and credit sums of a set of lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalTotals {
    /// Sum of debit amounts
    pub debits: Decimal,
    /// Sum of credit amounts
    pub credits: Decimal,
}

impl JournalTotals {
    /// Debits equal credits to the cent.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        money::to_cents(self.debits) == money::to_cents(self.credits)
    }

    /// Balanced and moving a non-zero amount.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        self.is_balanced() && self.debits > Decimal::ZERO
    }

    /// `debits - credits`
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}

/// Sums the debits and credits of `lines`.
#[must_use]
pub fn compute_totals<L: LineAmounts>(lines: &[L]) -> JournalTotals {
    lines
        .iter()
        .map(LineAmounts::amounts)
        .fold(JournalTotals::default(), |totals, (debit, credit)| {
            JournalTotals {
                debits: totals.debits + debit,
                credits: totals.credits + credit,
            }
        })
}

/// Checks one line in isolation: amounts are non-negative whole cents and at
/// most one side is non-zero.
pub fn validate_line(line: &JournalLineInput) -> Result<()> {
    money::ensure_non_negative(line.debit)?;
    money::ensure_non_negative(line.credit)?;
    if !line.debit.is_zero() && !line.credit.is_zero() {
        return Err(Error::validation(format!(
            "Line for account {} has both a debit and a credit",
            line.account_id
        )));
    }
    Ok(())
}

/// A journal entry together with its lines
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntryWithLines {
    /// The entry header
    pub entry: journal_entry::Model,
    /// Its lines in insertion order
    pub lines: Vec<journal_entry_line::Model>,
}

impl JournalEntryWithLines {
    /// Debit and credit sums of the lines
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        compute_totals(&self.lines)
    }
}

async fn check_line_references<C>(db: &C, lines: &[JournalLineInput]) -> Result<()>
where
    C: ConnectionTrait,
{
    for line in lines {
        validate_line(line)?;
        account::get_account_by_id(db, line.account_id)
            .await?
            .ok_or_else(|| Error::not_found("Account", line.account_id))?;
        if let Some(party_id) = line.party_id {
            party::get_party_by_id(db, party_id)
                .await?
                .ok_or_else(|| Error::not_found("Party", party_id))?;
        }
    }
    Ok(())
}

async fn insert_lines<C>(
    db: &C,
    entry_id: i64,
    lines: Vec<JournalLineInput>,
) -> Result<Vec<journal_entry_line::Model>>
where
    C: ConnectionTrait,
{
    let mut inserted = Vec::with_capacity(lines.len());
    for line in lines {
        let model = journal_entry_line::ActiveModel {
            journal_entry_id: Set(entry_id),
            account_id: Set(line.account_id),
            party_id: Set(line.party_id),
            description: Set(line.description),
            debit: Set(line.debit),
            credit: Set(line.credit),
            ..Default::default()
        }
        .insert(db)
        .await?;
        inserted.push(model);
    }
    Ok(inserted)
}

async fn load_lines<C>(db: &C, entry_id: i64) -> Result<Vec<journal_entry_line::Model>>
where
    C: ConnectionTrait,
{
    JournalEntryLine::find()
        .filter(journal_entry_line::Column::JournalEntryId.eq(entry_id))
        .order_by_asc(journal_entry_line::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn require_entry<C>(db: &C, entry_id: i64) -> Result<journal_entry::Model>
where
    C: ConnectionTrait,
{
    JournalEntry::find_by_id(entry_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("JournalEntry", entry_id))
}

fn ensure_draft(entry: &journal_entry::Model) -> Result<()> {
    if entry.status != EntryStatus::Draft {
        return Err(Error::EntryNotDraft {
            id: entry.id,
            status: format!("{:?}", entry.status),
        });
    }
    Ok(())
}

async fn insert_draft<C>(
    db: &C,
    new_entry: NewJournalEntry,
    reversal_of: Option<i64>,
) -> Result<JournalEntryWithLines>
where
    C: ConnectionTrait,
{
    let description = new_entry.description.trim().to_string();
    if description.is_empty() {
        return Err(Error::validation("Journal entry description cannot be empty"));
    }
    check_line_references(db, &new_entry.lines).await?;

    let entry = journal_entry::ActiveModel {
        date: Set(new_entry.date),
        description: Set(description),
        reference: Set(new_entry
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())),
        status: Set(EntryStatus::Draft),
        reversal_of: Set(reversal_of),
        posted_at: Set(None),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let lines = insert_lines(db, entry.id, new_entry.lines).await?;
    Ok(JournalEntryWithLines { entry, lines })
}

/// Posts a draft inside the caller's transaction.
async fn post_in<C>(db: &C, entry_id: i64) -> Result<JournalEntryWithLines>
where
    C: ConnectionTrait,
{
    let entry = require_entry(db, entry_id).await?;
    ensure_draft(&entry)?;

    let lines = load_lines(db, entry_id).await?;
    let totals = compute_totals(&lines);

    if !totals.is_balanced() {
        return Err(Error::UnbalancedEntry {
            id: entry_id,
            debits: totals.debits,
            credits: totals.credits,
        });
    }
    if !totals.is_postable() {
        return Err(Error::EmptyEntry { id: entry_id });
    }

    for line in &lines {
        let account = account::get_account_by_id(db, line.account_id)
            .await?
            .ok_or_else(|| Error::not_found("Account", line.account_id))?;
        let delta = account::balance_delta(account.account_type, line.debit, line.credit);
        account::adjust_account_balance_atomic(db, account.id, delta).await?;

        if let Some(party_id) = line.party_id {
            party::adjust_party_balance_atomic(db, party_id, line.debit - line.credit).await?;
        }
    }

    let mut active: journal_entry::ActiveModel = entry.into();
    active.status = Set(EntryStatus::Posted);
    active.posted_at = Set(Some(Utc::now().naive_utc()));
    let entry = active.update(db).await?;

    debug!(entry_id, debits = %totals.debits, "Journal entry posted");
    Ok(JournalEntryWithLines { entry, lines })
}

/// Saves a new draft entry. Drafts may be unbalanced.
///
/// # Errors
/// Returns an error if:
/// - The description is empty
/// - A line has a negative or sub-cent amount, or both a debit and a credit
/// - A line names an account or party that does not exist
pub async fn create_draft(
    db: &DatabaseConnection,
    new_entry: NewJournalEntry,
) -> Result<JournalEntryWithLines> {
    let txn = db.begin().await?;
    let draft = insert_draft(&txn, new_entry, None).await?;
    txn.commit().await?;
    Ok(draft)
}

/// Replaces all lines of a draft.
pub async fn replace_lines(
    db: &DatabaseConnection,
    entry_id: i64,
    lines: Vec<JournalLineInput>,
) -> Result<JournalEntryWithLines> {
    let txn = db.begin().await?;

    let entry = require_entry(&txn, entry_id).await?;
    ensure_draft(&entry)?;
    check_line_references(&txn, &lines).await?;

    JournalEntryLine::delete_many()
        .filter(journal_entry_line::Column::JournalEntryId.eq(entry_id))
        .exec(&txn)
        .await?;
    let lines = insert_lines(&txn, entry_id, lines).await?;

    txn.commit().await?;
    Ok(JournalEntryWithLines { entry, lines })
}

/// Deletes a draft and its lines.
pub async fn delete_draft(db: &DatabaseConnection, entry_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let entry = require_entry(&txn, entry_id).await?;
    ensure_draft(&entry)?;

    JournalEntryLine::delete_many()
        .filter(journal_entry_line::Column::JournalEntryId.eq(entry_id))
        .exec(&txn)
        .await?;
    entry.delete(&txn).await?;

    txn.commit().await?;
    Ok(())
}

/// Posts a draft entry and applies it to account and party balances.
///
/// # Errors
/// Returns an error if:
/// - The entry does not exist (`NotFound`) or is not a draft (`EntryNotDraft`)
/// - Debits and credits differ (`UnbalancedEntry`)
/// - The entry has no lines or only zero amounts (`EmptyEntry`)
///
/// On error no balance is changed.
pub async fn post_entry(db: &DatabaseConnection, entry_id: i64) -> Result<JournalEntryWithLines> {
    let txn = db.begin().await?;
    let posted = post_in(&txn, entry_id).await?;
    txn.commit().await?;

    info!(entry_id, "Posted journal entry");
    Ok(posted)
}

/// Creates and posts an entry in one step, inside the caller's transaction.
pub(crate) async fn record_entry_in<C>(
    db: &C,
    new_entry: NewJournalEntry,
) -> Result<JournalEntryWithLines>
where
    C: ConnectionTrait,
{
    let draft = insert_draft(db, new_entry, None).await?;
    post_in(db, draft.entry.id).await
}

/// Creates and posts an entry in one step.
///
/// Nothing is stored if the entry cannot be posted.
pub async fn record_entry(
    db: &DatabaseConnection,
    new_entry: NewJournalEntry,
) -> Result<JournalEntryWithLines> {
    let txn = db.begin().await?;
    let posted = record_entry_in(&txn, new_entry).await?;
    txn.commit().await?;

    info!(entry_id = posted.entry.id, "Recorded journal entry");
    Ok(posted)
}

/// Reverses a posted entry by posting a mirror entry with debits and credits swapped.
///
/// # Errors
/// Returns an error if:
/// - The entry does not exist
/// - The entry is still a draft (`InvalidTransition`)
/// - The entry is itself a reversal, or has already been reversed (`AlreadyReversed`)
pub async fn reverse_entry(
    db: &DatabaseConnection,
    entry_id: i64,
    date: NaiveDate,
) -> Result<JournalEntryWithLines> {
    let txn = db.begin().await?;

    let original = require_entry(&txn, entry_id).await?;
    if original.status != EntryStatus::Posted {
        return Err(Error::InvalidTransition {
            entity: "JournalEntry",
            from: format!("{:?}", original.status),
            to: "Reversed".to_string(),
        });
    }
    if original.reversal_of.is_some() || find_reversal_of(&txn, entry_id).await?.is_some() {
        return Err(Error::AlreadyReversed { id: entry_id });
    }

    let mirrored = load_lines(&txn, entry_id)
        .await?
        .into_iter()
        .map(|line| JournalLineInput {
            account_id: line.account_id,
            party_id: line.party_id,
            description: line.description,
            debit: line.credit,
            credit: line.debit,
        })
        .collect();

    let reversal = NewJournalEntry {
        date,
        description: format!("Reversal of #{entry_id}: {}", original.description),
        reference: Some(format!("REV-{entry_id}")),
        lines: mirrored,
    };

    let draft = insert_draft(&txn, reversal, Some(entry_id)).await?;
    let posted = post_in(&txn, draft.entry.id).await?;
    txn.commit().await?;

    info!(entry_id, reversal_id = posted.entry.id, "Reversed journal entry");
    Ok(posted)
}

/// Finds the entry that reverses `entry_id`, if one exists.
pub async fn find_reversal_of<C>(db: &C, entry_id: i64) -> Result<Option<journal_entry::Model>>
where
    C: ConnectionTrait,
{
    JournalEntry::find()
        .filter(journal_entry::Column::ReversalOf.eq(entry_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Loads an entry with its lines.
pub async fn get_entry_with_lines(
    db: &DatabaseConnection,
    entry_id: i64,
) -> Result<Option<JournalEntryWithLines>> {
    let Some(entry) = JournalEntry::find_by_id(entry_id).one(db).await? else {
        return Ok(None);
    };
    let lines = load_lines(db, entry_id).await?;
    Ok(Some(JournalEntryWithLines { entry, lines }))
}

/// Lists entry headers, newest date first, optionally by status.
pub async fn list_entries(
    db: &DatabaseConnection,
    status: Option<EntryStatus>,
) -> Result<Vec<journal_entry::Model>> {
    let mut query = JournalEntry::find()
        .order_by_desc(journal_entry::Column::Date)
        .order_by_desc(journal_entry::Column::Id);
    if let Some(status) = status {
        query = query.filter(journal_entry::Column::Status.eq(status));
    }
    query.all(db).await.map_err(Into::into)
}

/// Lists the posted lines booked against an account with their entries,
/// oldest first.
pub async fn list_posted_lines_for_account(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Vec<(journal_entry_line::Model, journal_entry::Model)>> {
    let rows = JournalEntryLine::find()
        .find_also_related(JournalEntry)
        .filter(journal_entry_line::Column::AccountId.eq(account_id))
        .filter(journal_entry::Column::Status.eq(EntryStatus::Posted))
        .order_by_asc(journal_entry::Column::Date)
        .order_by_asc(journal_entry_line::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(line, entry)| entry.map(|entry| (line, entry)))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{AccountType, PartyType};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    fn entry(description: &str, lines: Vec<JournalLineInput>) -> NewJournalEntry {
        NewJournalEntry {
            date: date(2025, 2, 1),
            description: description.to_string(),
            reference: None,
            lines,
        }
    }

    #[test]
    fn test_totals_balanced_to_the_cent() {
        let lines = vec![
            JournalLineInput::debit(1, dec!(100.10)),
            JournalLineInput::debit(2, dec!(0.20)),
            JournalLineInput::credit(3, dec!(100.30)),
        ];
        let totals = compute_totals(&lines);
        assert_eq!(totals.debits, dec!(100.30));
        assert_eq!(totals.credits, dec!(100.30));
        assert!(totals.is_balanced());
        assert!(totals.is_postable());
    }

    #[test]
    fn test_one_cent_off_is_unbalanced() {
        let lines = vec![
            JournalLineInput::debit(1, dec!(100.00)),
            JournalLineInput::credit(2, dec!(99.99)),
        ];
        let totals = compute_totals(&lines);
        assert!(!totals.is_balanced());
        assert!(!totals.is_postable());
        assert_eq!(totals.difference(), dec!(0.01));
    }

    #[test]
    fn test_empty_and_zero_entries_are_never_postable() {
        let none: Vec<JournalLineInput> = Vec::new();
        let totals = compute_totals(&none);
        assert!(totals.is_balanced());
        assert!(!totals.is_postable());

        let zeros = vec![
            JournalLineInput::debit(1, Decimal::ZERO),
            JournalLineInput::credit(2, Decimal::ZERO),
        ];
        assert!(!compute_totals(&zeros).is_postable());
    }

    #[test]
    fn test_validate_line() {
        assert!(validate_line(&JournalLineInput::debit(1, dec!(5))).is_ok());
        assert!(validate_line(&JournalLineInput::credit(1, Decimal::ZERO)).is_ok());

        let both = JournalLineInput {
            credit: dec!(5),
            ..JournalLineInput::debit(1, dec!(5))
        };
        assert!(matches!(validate_line(&both), Err(Error::Validation { .. })));

        let negative = JournalLineInput::debit(1, dec!(-5));
        assert!(matches!(validate_line(&negative), Err(Error::InvalidAmount { .. })));

        let fractional = JournalLineInput::credit(1, dec!(0.005));
        assert!(matches!(validate_line(&fractional), Err(Error::InvalidAmount { .. })));
    }

    #[tokio::test]
    async fn test_create_draft_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_draft(&db, entry("   ", vec![])).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(list_entries(&db, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_post_balanced_entry_updates_balances() -> Result<()> {
        let db = setup_test_db().await?;
        let cash = create_test_account(&db, "1000", AccountType::Asset).await?;
        let repairs = create_test_account(&db, "5000", AccountType::Expense).await?;
        let vendor =
            crate::core::party::create_party(&db, "Ace Plumbing", PartyType::Vendor, None, None)
                .await?;

        let draft = create_draft(
            &db,
            entry(
                "Sink repair",
                vec![
                    JournalLineInput::debit(repairs.id, dec!(250.50)).with_party(vendor.id),
                    JournalLineInput::credit(cash.id, dec!(250.50)).with_description("Check 1042"),
                ],
            ),
        )
        .await?;
        assert_eq!(draft.entry.status, EntryStatus::Draft);

        // Drafts do not move balances
        let cash_before = account::get_account_by_id(&db, cash.id).await?.unwrap();
        assert_eq!(cash_before.balance, Decimal::ZERO);

        let posted = post_entry(&db, draft.entry.id).await?;
        assert_eq!(posted.entry.status, EntryStatus::Posted);
        assert!(posted.entry.posted_at.is_some());
        assert!(posted.totals().is_postable());

        let cash = account::get_account_by_id(&db, cash.id).await?.unwrap();
        let repairs = account::get_account_by_id(&db, repairs.id).await?.unwrap();
        assert_eq!(cash.balance, dec!(-250.50));
        assert_eq!(repairs.balance, dec!(250.50));

        let vendor = party::get_party_by_id(&db, vendor.id).await?.unwrap();
        assert_eq!(vendor.balance, dec!(250.50));

        Ok(())
    }

    #[tokio::test]
    async fn test_party_balance_nets_to_exact_zero() -> Result<()> {
        let db = setup_test_db().await?;
        let cash = create_test_account(&db, "1000", AccountType::Asset).await?;
        let repairs = create_test_account(&db, "5000", AccountType::Expense).await?;
        let vendor =
            crate::core::party::create_party(&db, "Ace Plumbing", PartyType::Vendor, None, None)
                .await?;

        for amount in [dec!(0.10), dec!(0.20)] {
            let lines = vec![
                JournalLineInput::debit(repairs.id, amount).with_party(vendor.id),
                JournalLineInput::credit(cash.id, amount),
            ];
            record_entry(&db, entry("Parts", lines)).await?;
        }
        let refund = vec![
            JournalLineInput::debit(cash.id, dec!(0.30)),
            JournalLineInput::credit(repairs.id, dec!(0.30)).with_party(vendor.id),
        ];
        record_entry(&db, entry("Parts refund", refund)).await?;

        let vendor = party::get_party_by_id(&db, vendor.id).await?.unwrap();
        assert_eq!(vendor.balance, Decimal::ZERO);
        assert!(party::list_parties_with_balance(&db).await?.is_empty());

        let cash = account::get_account_by_id(&db, cash.id).await?.unwrap();
        let repairs = account::get_account_by_id(&db, repairs.id).await?.unwrap();
        assert_eq!(cash.balance, Decimal::ZERO);
        assert_eq!(repairs.balance, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_unbalanced_entry_is_rejected_without_side_effects() -> Result<()> {
        let db = setup_test_db().await?;
        let cash = create_test_account(&db, "1000", AccountType::Asset).await?;
        let rent = create_test_account(&db, "4000", AccountType::Revenue).await?;

        let draft = create_draft(
            &db,
            entry(
                "Rent",
                vec![
                    JournalLineInput::debit(cash.id, dec!(1500)),
                    JournalLineInput::credit(rent.id, dec!(1499.99)),
                ],
            ),
        )
        .await?;

        let result = post_entry(&db, draft.entry.id).await;
        assert!(matches!(
            result,
            Err(Error::UnbalancedEntry { debits, credits, .. })
                if debits == dec!(1500) && credits == dec!(1499.99)
        ));

        let cash = account::get_account_by_id(&db, cash.id).await?.unwrap();
        assert_eq!(cash.balance, Decimal::ZERO);
        let still_draft = get_entry_with_lines(&db, draft.entry.id).await?.unwrap();
        assert_eq!(still_draft.entry.status, EntryStatus::Draft);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_entries_cannot_be_posted() -> Result<()> {
        let db = setup_test_db().await?;
        let cash = create_test_account(&db, "1000", AccountType::Asset).await?;
        let rent = create_test_account(&db, "4000", AccountType::Revenue).await?;

        let no_lines = create_draft(&db, entry("Nothing", vec![])).await?;
        let result = post_entry(&db, no_lines.entry.id).await;
        assert!(matches!(result, Err(Error::EmptyEntry { .. })));

        let zero_lines = create_draft(
            &db,
            entry(
                "Zeros",
                vec![
                    JournalLineInput::debit(cash.id, Decimal::ZERO),
                    JournalLineInput::credit(rent.id, Decimal::ZERO),
                ],
            ),
        )
        .await?;
        let result = post_entry(&db, zero_lines.entry.id).await;
        assert!(matches!(result, Err(Error::EmptyEntry { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_posted_entries_are_frozen() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let posted = record_entry(&db, balanced_entry(cash.id, rent.id, dec!(100))).await?;

        let again = post_entry(&db, posted.entry.id).await;
        assert!(matches!(again, Err(Error::EntryNotDraft { .. })));

        let replace = replace_lines(&db, posted.entry.id, vec![]).await;
        assert!(matches!(replace, Err(Error::EntryNotDraft { .. })));

        let delete = delete_draft(&db, posted.entry.id).await;
        assert!(matches!(delete, Err(Error::EntryNotDraft { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_replace_lines_then_post() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;

        let draft = create_draft(
            &db,
            entry("Rent", vec![JournalLineInput::debit(cash.id, dec!(900))]),
        )
        .await?;
        assert!(!draft.totals().is_balanced());

        let fixed = replace_lines(
            &db,
            draft.entry.id,
            vec![
                JournalLineInput::debit(cash.id, dec!(900)),
                JournalLineInput::credit(rent.id, dec!(900)),
            ],
        )
        .await?;
        assert_eq!(fixed.lines.len(), 2);

        post_entry(&db, draft.entry.id).await?;
        let rent = account::get_account_by_id(&db, rent.id).await?.unwrap();
        assert_eq!(rent.balance, dec!(900));

        Ok(())
    }

    #[tokio::test]
    async fn test_draft_with_unknown_account_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_draft(
            &db,
            entry("Bad", vec![JournalLineInput::debit(404, dec!(1))]),
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { entity: "Account", .. })));
        assert!(list_entries(&db, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_draft() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let draft = create_draft(&db, balanced_entry(cash.id, rent.id, dec!(10))).await?;

        delete_draft(&db, draft.entry.id).await?;
        assert!(get_entry_with_lines(&db, draft.entry.id).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_reverse_entry_restores_balances() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let posted = record_entry(&db, balanced_entry(cash.id, rent.id, dec!(1200))).await?;

        let reversal = reverse_entry(&db, posted.entry.id, date(2025, 2, 5)).await?;
        assert_eq!(reversal.entry.reversal_of, Some(posted.entry.id));
        assert_eq!(reversal.entry.status, EntryStatus::Posted);
        assert_eq!(reversal.entry.reference.as_deref(), Some(&*format!("REV-{}", posted.entry.id)));

        let cash = account::get_account_by_id(&db, cash.id).await?.unwrap();
        let rent = account::get_account_by_id(&db, rent.id).await?.unwrap();
        assert_eq!(cash.balance, Decimal::ZERO);
        assert_eq!(rent.balance, Decimal::ZERO);

        let twice = reverse_entry(&db, posted.entry.id, date(2025, 2, 6)).await;
        assert!(matches!(twice, Err(Error::AlreadyReversed { .. })));

        let of_reversal = reverse_entry(&db, reversal.entry.id, date(2025, 2, 6)).await;
        assert!(matches!(of_reversal, Err(Error::AlreadyReversed { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_drafts_cannot_be_reversed() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let draft = create_draft(&db, balanced_entry(cash.id, rent.id, dec!(10))).await?;

        let result = reverse_entry(&db, draft.entry.id, date(2025, 2, 5)).await;
        assert!(matches!(result, Err(Error::InvalidTransition { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_entries_and_account_lines() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;

        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(100))).await?;
        create_draft(&db, balanced_entry(cash.id, rent.id, dec!(50))).await?;

        assert_eq!(list_entries(&db, None).await?.len(), 2);
        assert_eq!(list_entries(&db, Some(EntryStatus::Draft)).await?.len(), 1);

        let cash_lines = list_posted_lines_for_account(&db, cash.id).await?;
        assert_eq!(cash_lines.len(), 1);
        assert_eq!(cash_lines[0].0.debit, dec!(100));
        assert_eq!(cash_lines[0].1.status, EntryStatus::Posted);

        Ok(())
    }
}
