//! Ledger reporting - Trial balance, balance recomputation and financial statements.
//!
//! Everything here is derived from account balances or from posted journal lines.
//! Draft entries never contribute.

use crate::{
    core::{
        account::{self, NormalSide, balance_delta, normal_side},
        money, party,
    },
    entities::{
        AccountType, EntryStatus, JournalEntry, JournalEntryLine, account as account_entity,
        journal_entry, journal_entry_line, party as party_entity,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Condition, QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{info, warn};

/// One row of the trial balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalanceRow {
    /// Account id
    pub account_id: i64,
    /// Chart-of-accounts code
    pub code: String,
    /// Account name
    pub name: String,
    /// Account type
    pub account_type: AccountType,
    /// Amount shown in the debit column
    pub debit: Decimal,
    /// Amount shown in the credit column
    pub credit: Decimal,
}

/// Trial balance over every account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialBalance {
    /// One row per account, ordered by code
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column
    pub total_debits: Decimal,
    /// Sum of the credit column
    pub total_credits: Decimal,
}

impl TrialBalance {
    /// Debit and credit columns agree to the cent.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        money::to_cents(self.total_debits) == money::to_cents(self.total_credits)
    }
}

/// Places a natural-sign balance into the debit or credit column.
///
/// A debit-normal account with a negative balance shows in the credit column and
/// vice versa.
#[must_use]
pub fn trial_balance_columns(account_type: AccountType, balance: Decimal) -> (Decimal, Decimal) {
    match (normal_side(account_type), balance >= Decimal::ZERO) {
        (NormalSide::Debit, true) => (balance, Decimal::ZERO),
        (NormalSide::Debit, false) => (Decimal::ZERO, -balance),
        (NormalSide::Credit, true) => (Decimal::ZERO, balance),
        (NormalSide::Credit, false) => (-balance, Decimal::ZERO),
    }
}

/// Builds the trial balance from current account balances.
pub async fn trial_balance(db: &DatabaseConnection) -> Result<TrialBalance> {
    let accounts = account::list_accounts(db).await?;

    let rows: Vec<TrialBalanceRow> = accounts
        .into_iter()
        .map(|acct| {
            let (debit, credit) = trial_balance_columns(acct.account_type, acct.balance);
            TrialBalanceRow {
                account_id: acct.id,
                code: acct.code,
                name: acct.name,
                account_type: acct.account_type,
                debit,
                credit,
            }
        })
        .collect();

    let total_debits = rows.iter().map(|r| r.debit).sum();
    let total_credits = rows.iter().map(|r| r.credit).sum();

    Ok(TrialBalance {
        rows,
        total_debits,
        total_credits,
    })
}

/// An account whose stored balance disagreed with its posted lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDrift {
    /// Account id
    pub account_id: i64,
    /// Chart-of-accounts code
    pub code: String,
    /// Balance that was stored
    pub stored: Decimal,
    /// Balance rebuilt from posted lines, now stored
    pub computed: Decimal,
}

/// Posted lines with their entries, optionally restricted to an inclusive date range.
async fn posted_lines(
    db: &DatabaseConnection,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<(journal_entry_line::Model, journal_entry::Model)>> {
    let mut condition = Condition::all();
    if let Some((from, to)) = range {
        condition = condition
            .add(journal_entry::Column::Date.gte(from))
            .add(journal_entry::Column::Date.lte(to));
    }
    posted_lines_matching(db, condition).await
}

/// Posted lines matching `condition`, in posting order (date, entry, line).
async fn posted_lines_matching(
    db: &DatabaseConnection,
    condition: Condition,
) -> Result<Vec<(journal_entry_line::Model, journal_entry::Model)>> {
    Ok(JournalEntryLine::find()
        .find_also_related(JournalEntry)
        .filter(journal_entry::Column::Status.eq(EntryStatus::Posted))
        .filter(condition)
        .order_by_asc(journal_entry::Column::Date)
        .order_by_asc(journal_entry::Column::Id)
        .order_by_asc(journal_entry_line::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(line, entry)| entry.map(|entry| (line, entry)))
        .collect())
}

/// Sums natural-sign deltas of posted lines per account id.
fn net_by_account(
    accounts: &[account_entity::Model],
    lines: &[(journal_entry_line::Model, journal_entry::Model)],
) -> HashMap<i64, Decimal> {
    let types: HashMap<i64, AccountType> = accounts.iter().map(|a| (a.id, a.account_type)).collect();

    let mut net: HashMap<i64, Decimal> = HashMap::new();
    for (line, _) in lines {
        if let Some(&account_type) = types.get(&line.account_id) {
            *net.entry(line.account_id).or_default() +=
                balance_delta(account_type, line.debit, line.credit);
        }
    }
    net
}

/// Rebuilds every account balance from posted lines and stores the result.
///
/// # Returns
/// The accounts whose stored balance had drifted
pub async fn recompute_account_balances(db: &DatabaseConnection) -> Result<Vec<BalanceDrift>> {
    let accounts = account::list_accounts(db).await?;
    let lines = posted_lines(db, None).await?;
    let net = net_by_account(&accounts, &lines);

    let mut drifted = Vec::new();
    for acct in accounts {
        let computed = money::to_cents(net.get(&acct.id).copied().unwrap_or_default());
        if computed == money::to_cents(acct.balance) {
            continue;
        }

        warn!(
            account = %acct.code,
            stored = %acct.balance,
            computed = %computed,
            "Account balance drifted from posted lines"
        );
        let drift = BalanceDrift {
            account_id: acct.id,
            code: acct.code.clone(),
            stored: acct.balance,
            computed,
        };

        let mut active: account_entity::ActiveModel = acct.into();
        active.balance = Set(computed);
        active.update(db).await?;
        drifted.push(drift);
    }

    info!(drifted = drifted.len(), "Recomputed account balances");
    Ok(drifted)
}

/// One account line on a financial statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine {
    /// Chart-of-accounts code
    pub code: String,
    /// Account name
    pub name: String,
    /// Amount in the account's natural sign
    pub amount: Decimal,
}

/// Revenue and expenses over a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeStatement {
    /// First day included
    pub from: NaiveDate,
    /// Last day included
    pub to: NaiveDate,
    /// Revenue accounts with activity
    pub revenue: Vec<StatementLine>,
    /// Expense accounts with activity
    pub expenses: Vec<StatementLine>,
    /// Sum of revenue
    pub total_revenue: Decimal,
    /// Sum of expenses
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`
    pub net_income: Decimal,
}

fn statement_lines(
    accounts: &[account_entity::Model],
    account_type: AccountType,
    amount_of: impl Fn(&account_entity::Model) -> Option<Decimal>,
) -> (Vec<StatementLine>, Decimal) {
    let lines: Vec<StatementLine> = accounts
        .iter()
        .filter(|a| a.account_type == account_type)
        .filter_map(|a| {
            amount_of(a).map(|amount| StatementLine {
                code: a.code.clone(),
                name: a.name.clone(),
                amount,
            })
        })
        .collect();
    let total = lines.iter().map(|l| l.amount).sum();
    (lines, total)
}

/// Builds an income statement from posted entries dated within `from..=to`.
///
/// # Errors
/// Returns a validation error if `from` is after `to`.
pub async fn income_statement(
    db: &DatabaseConnection,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<IncomeStatement> {
    if from > to {
        return Err(Error::validation(format!(
            "Statement period starts ({from}) after it ends ({to})"
        )));
    }

    let accounts = account::list_accounts(db).await?;
    let lines = posted_lines(db, Some((from, to))).await?;
    let net = net_by_account(&accounts, &lines);

    let activity = |a: &account_entity::Model| net.get(&a.id).copied().filter(|n| !n.is_zero());
    let (revenue, total_revenue) = statement_lines(&accounts, AccountType::Revenue, activity);
    let (expenses, total_expenses) = statement_lines(&accounts, AccountType::Expense, activity);

    Ok(IncomeStatement {
        from,
        to,
        revenue,
        expenses,
        total_revenue,
        total_expenses,
        net_income: total_revenue - total_expenses,
    })
}

/// Assets, liabilities and equity at current balances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheet {
    /// Asset accounts
    pub assets: Vec<StatementLine>,
    /// Liability accounts
    pub liabilities: Vec<StatementLine>,
    /// Equity accounts
    pub equity: Vec<StatementLine>,
    /// Sum of assets
    pub total_assets: Decimal,
    /// Sum of liabilities
    pub total_liabilities: Decimal,
    /// Sum of equity accounts
    pub total_equity: Decimal,
    /// Revenue minus expenses not yet closed to equity
    pub retained_earnings: Decimal,
}

impl BalanceSheet {
    /// Assets equal liabilities plus equity plus retained earnings, to the cent.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        money::to_cents(self.total_assets)
            == money::to_cents(self.total_liabilities + self.total_equity + self.retained_earnings)
    }
}

/// Builds the balance sheet from current account balances.
pub async fn balance_sheet(db: &DatabaseConnection) -> Result<BalanceSheet> {
    let accounts = account::list_accounts(db).await?;
    let balance = |a: &account_entity::Model| Some(a.balance);

    let (assets, total_assets) = statement_lines(&accounts, AccountType::Asset, balance);
    let (liabilities, total_liabilities) =
        statement_lines(&accounts, AccountType::Liability, balance);
    let (equity, total_equity) = statement_lines(&accounts, AccountType::Equity, balance);
    let (_, revenue) = statement_lines(&accounts, AccountType::Revenue, balance);
    let (_, expenses) = statement_lines(&accounts, AccountType::Expense, balance);

    Ok(BalanceSheet {
        assets,
        liabilities,
        equity,
        total_assets,
        total_liabilities,
        total_equity,
        retained_earnings: revenue - expenses,
    })
}


/// One posted line on an account or party statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    /// Journal entry the line belongs to
    pub entry_id: i64,
    /// Entry date
    pub date: NaiveDate,
    /// Line memo, or the entry description when the line has none
    pub description: String,
    /// Entry reference
    pub reference: Option<String>,
    /// Account the line books against
    pub account_id: i64,
    /// Debit amount
    pub debit: Decimal,
    /// Credit amount
    pub credit: Decimal,
    /// Running balance after this line
    pub balance: Decimal,
}

/// Turns posted lines into statement rows, carrying a running balance from `opening`.
fn running_rows<F>(
    lines: Vec<(journal_entry_line::Model, journal_entry::Model)>,
    opening: Decimal,
    delta: F,
) -> Vec<ActivityRow>
where
    F: Fn(&journal_entry_line::Model) -> Decimal,
{
    let mut balance = opening;
    lines
        .into_iter()
        .map(|(line, entry)| {
            balance = money::to_cents(balance + delta(&line));
            ActivityRow {
                entry_id: entry.id,
                date: entry.date,
                description: line.description.unwrap_or(entry.description),
                reference: entry.reference,
                account_id: line.account_id,
                debit: line.debit,
                credit: line.credit,
                balance,
            }
        })
        .collect()
}

/// Posted activity on one account over a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountActivity {
    /// The account
    pub account: account_entity::Model,
    /// First day of the period
    pub from: NaiveDate,
    /// Last day of the period
    pub to: NaiveDate,
    /// Balance from posted lines dated before `from`
    pub opening_balance: Decimal,
    /// Posted lines dated within the period, in posting order
    pub rows: Vec<ActivityRow>,
    /// Balance after the last line of the period
    pub closing_balance: Decimal,
}

/// General-ledger detail for one account: opening balance, every posted line in
/// `from..=to` with a running balance in the account's natural sign, and the
/// closing balance.
///
/// # Errors
/// Returns a validation error if `from` is after `to`, or `NotFound` if the
/// account does not exist.
pub async fn account_activity(
    db: &DatabaseConnection,
    account_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<AccountActivity> {
    if from > to {
        return Err(Error::validation(format!(
            "Activity period starts ({from}) after it ends ({to})"
        )));
    }

    let account = account::get_account_by_id(db, account_id)
        .await?
        .ok_or_else(|| Error::not_found("Account", account_id))?;

    let lines = posted_lines_matching(
        db,
        Condition::all()
            .add(journal_entry_line::Column::AccountId.eq(account_id))
            .add(journal_entry::Column::Date.lte(to)),
    )
    .await?;

    let account_type = account.account_type;
    let (before, within): (Vec<_>, Vec<_>) =
        lines.into_iter().partition(|(_, entry)| entry.date < from);

    let opening_balance = money::to_cents(
        before
            .iter()
            .map(|(line, _)| balance_delta(account_type, line.debit, line.credit))
            .sum(),
    );
    let rows = running_rows(within, opening_balance, |line| {
        balance_delta(account_type, line.debit, line.credit)
    });
    let closing_balance = rows.last().map_or(opening_balance, |row| row.balance);

    Ok(AccountActivity {
        account,
        from,
        to,
        opening_balance,
        rows,
        closing_balance,
    })
}

/// Every posted line naming a party, with a running `debit - credit` balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyStatement {
    /// The party
    pub party: party_entity::Model,
    /// Posted lines naming the party, in posting order
    pub rows: Vec<ActivityRow>,
    /// Net of the statement; matches the stored party balance
    pub balance: Decimal,
}

/// Builds the statement of a party from the posted lines that name it.
///
/// # Errors
/// Returns `NotFound` if the party does not exist.
pub async fn party_statement(db: &DatabaseConnection, party_id: i64) -> Result<PartyStatement> {
    let party = party::get_party_by_id(db, party_id)
        .await?
        .ok_or_else(|| Error::not_found("Party", party_id))?;

    let lines = posted_lines_matching(
        db,
        Condition::all().add(journal_entry_line::Column::PartyId.eq(party_id)),
    )
    .await?;

    let rows = running_rows(lines, Decimal::ZERO, |line| line.debit - line.credit);
    let balance = rows.last().map_or(Decimal::ZERO, |row| row.balance);

    Ok(PartyStatement {
        party,
        rows,
        balance,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::journal::{JournalLineInput, record_entry, reverse_entry};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trial_balance_columns() {
        assert_eq!(
            trial_balance_columns(AccountType::Asset, dec!(100)),
            (dec!(100), Decimal::ZERO)
        );
        assert_eq!(
            trial_balance_columns(AccountType::Asset, dec!(-40)),
            (Decimal::ZERO, dec!(40))
        );
        assert_eq!(
            trial_balance_columns(AccountType::Revenue, dec!(100)),
            (Decimal::ZERO, dec!(100))
        );
        assert_eq!(
            trial_balance_columns(AccountType::Liability, dec!(-25)),
            (dec!(25), Decimal::ZERO)
        );
    }

    #[tokio::test]
    async fn test_trial_balance_after_posts_and_reversals() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let repairs = create_test_account(&db, "5000", AccountType::Expense).await?;
        let payable = create_test_account(&db, "2000", AccountType::Liability).await?;

        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(1500))).await?;
        let bill = record_entry(
            &db,
            crate::core::journal::NewJournalEntry {
                date: date(2025, 2, 10),
                description: "Plumber invoice".to_string(),
                reference: None,
                lines: vec![
                    JournalLineInput::debit(repairs.id, dec!(320.50)),
                    JournalLineInput::credit(payable.id, dec!(320.50)),
                ],
            },
        )
        .await?;
        reverse_entry(&db, bill.entry.id, date(2025, 2, 11)).await?;

        let tb = trial_balance(&db).await?;
        assert!(tb.is_balanced());
        assert_eq!(tb.total_debits, dec!(1500));
        assert_eq!(tb.rows.len(), 4);
        assert_eq!(tb.rows[0].code, "1000");

        assert!(recompute_account_balances(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_repairs_drift() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(750))).await?;

        // Simulate a stray write outside the journal
        account::adjust_account_balance_atomic(&db, cash.id, dec!(10)).await?;
        assert!(!trial_balance(&db).await?.is_balanced());

        let drifted = recompute_account_balances(&db).await?;
        assert_eq!(drifted.len(), 1);
        assert_eq!(drifted[0].code, "1000");
        assert_eq!(drifted[0].stored, dec!(760));
        assert_eq!(drifted[0].computed, dec!(750));

        let cash = account::get_account_by_id(&db, cash.id).await?.unwrap();
        assert_eq!(cash.balance, dec!(750));
        assert!(trial_balance(&db).await?.is_balanced());

        Ok(())
    }

    #[tokio::test]
    async fn test_drafts_do_not_count_toward_recompute() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        crate::core::journal::create_draft(&db, balanced_entry(cash.id, rent.id, dec!(99)))
            .await?;

        assert!(recompute_account_balances(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_income_statement_period() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let utilities = create_test_account(&db, "5100", AccountType::Expense).await?;

        // balanced_entry is dated 2025-02-01
        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(2000))).await?;
        record_entry(
            &db,
            crate::core::journal::NewJournalEntry {
                date: date(2025, 2, 15),
                description: "Water bill".to_string(),
                reference: None,
                lines: vec![
                    JournalLineInput::debit(utilities.id, dec!(120.25)),
                    JournalLineInput::credit(cash.id, dec!(120.25)),
                ],
            },
        )
        .await?;
        record_entry(
            &db,
            crate::core::journal::NewJournalEntry {
                date: date(2025, 3, 1),
                description: "March rent".to_string(),
                reference: None,
                lines: vec![
                    JournalLineInput::debit(cash.id, dec!(2000)),
                    JournalLineInput::credit(rent.id, dec!(2000)),
                ],
            },
        )
        .await?;

        let february = income_statement(&db, date(2025, 2, 1), date(2025, 2, 28)).await?;
        assert_eq!(february.total_revenue, dec!(2000));
        assert_eq!(february.total_expenses, dec!(120.25));
        assert_eq!(february.net_income, dec!(1879.75));
        assert_eq!(february.expenses.len(), 1);

        let backwards = income_statement(&db, date(2025, 3, 1), date(2025, 2, 1)).await;
        assert!(matches!(backwards, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_balance_sheet_balances() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let equity = create_test_account(&db, "3000", AccountType::Equity).await?;
        let deposits = create_test_account(&db, "2100", AccountType::Liability).await?;

        record_entry(
            &db,
            crate::core::journal::NewJournalEntry {
                date: date(2025, 1, 1),
                description: "Owner contribution".to_string(),
                reference: None,
                lines: vec![
                    JournalLineInput::debit(cash.id, dec!(10000)),
                    JournalLineInput::credit(equity.id, dec!(10000)),
                ],
            },
        )
        .await?;
        record_entry(
            &db,
            crate::core::journal::NewJournalEntry {
                date: date(2025, 1, 2),
                description: "Deposit received".to_string(),
                reference: None,
                lines: vec![
                    JournalLineInput::debit(cash.id, dec!(1500)),
                    JournalLineInput::credit(deposits.id, dec!(1500)),
                ],
            },
        )
        .await?;
        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(1500))).await?;

        let sheet = balance_sheet(&db).await?;
        assert_eq!(sheet.total_assets, dec!(13000));
        assert_eq!(sheet.total_liabilities, dec!(1500));
        assert_eq!(sheet.total_equity, dec!(10000));
        assert_eq!(sheet.retained_earnings, dec!(1500));
        assert!(sheet.is_balanced());

        Ok(())
    }

    fn dated_entry(
        on: NaiveDate,
        description: &str,
        lines: Vec<JournalLineInput>,
    ) -> crate::core::journal::NewJournalEntry {
        crate::core::journal::NewJournalEntry {
            date: on,
            description: description.to_string(),
            reference: Some(format!("REF-{}", on.format("%m%d"))),
            lines,
        }
    }

    #[tokio::test]
    async fn test_account_activity_running_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let (cash, rent) = setup_cash_and_revenue(&db).await?;
        let utilities = create_test_account(&db, "5100", AccountType::Expense).await?;

        let rent_lines = |amount| {
            vec![
                JournalLineInput::debit(cash.id, amount),
                JournalLineInput::credit(rent.id, amount),
            ]
        };
        record_entry(&db, dated_entry(date(2025, 1, 15), "January rent", rent_lines(dec!(1000))))
            .await?;
        // balanced_entry is dated 2025-02-01
        record_entry(&db, balanced_entry(cash.id, rent.id, dec!(2000))).await?;
        record_entry(
            &db,
            dated_entry(
                date(2025, 2, 15),
                "Water bill",
                vec![
                    JournalLineInput::debit(utilities.id, dec!(120.25)),
                    JournalLineInput::credit(cash.id, dec!(120.25)).with_description("Check 1042"),
                ],
            ),
        )
        .await?;
        record_entry(&db, dated_entry(date(2025, 3, 1), "March rent", rent_lines(dec!(2000))))
            .await?;
        crate::core::journal::create_draft(
            &db,
            dated_entry(date(2025, 2, 20), "Unposted", rent_lines(dec!(99))),
        )
        .await?;

        let february = account_activity(&db, cash.id, date(2025, 2, 1), date(2025, 2, 28)).await?;
        assert_eq!(february.opening_balance, dec!(1000));
        assert_eq!(february.rows.len(), 2);
        assert_eq!(february.rows[0].description, "Test entry");
        assert_eq!(february.rows[0].debit, dec!(2000));
        assert_eq!(february.rows[0].balance, dec!(3000));
        assert_eq!(february.rows[1].description, "Check 1042");
        assert_eq!(february.rows[1].reference.as_deref(), Some("REF-0215"));
        assert_eq!(february.rows[1].credit, dec!(120.25));
        assert_eq!(february.rows[1].balance, dec!(2879.75));
        assert_eq!(february.closing_balance, dec!(2879.75));

        // Revenue runs in its natural credit sign
        let income = account_activity(&db, rent.id, date(2025, 1, 1), date(2025, 2, 28)).await?;
        assert_eq!(income.opening_balance, Decimal::ZERO);
        let balances: Vec<Decimal> = income.rows.iter().map(|r| r.balance).collect();
        assert_eq!(balances, vec![dec!(1000), dec!(3000)]);

        let quiet = account_activity(&db, utilities.id, date(2025, 3, 1), date(2025, 3, 31)).await?;
        assert!(quiet.rows.is_empty());
        assert_eq!(quiet.opening_balance, dec!(120.25));
        assert_eq!(quiet.closing_balance, dec!(120.25));

        let backwards = account_activity(&db, cash.id, date(2025, 3, 1), date(2025, 2, 1)).await;
        assert!(matches!(backwards, Err(Error::Validation { .. })));
        let missing = account_activity(&db, 999, date(2025, 1, 1), date(2025, 1, 31)).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_party_statement_matches_party_balance() -> Result<()> {
        let db = setup_test_db().await?;
        let cash = create_test_account(&db, "1000", AccountType::Asset).await?;
        let payables = create_test_account(&db, "2000", AccountType::Liability).await?;
        let repairs = create_test_account(&db, "5000", AccountType::Expense).await?;
        let vendor = party::create_party(
            &db,
            "Ace Plumbing",
            crate::entities::PartyType::Vendor,
            None,
            None,
        )
        .await?;
        let idle =
            party::create_party(&db, "City Water", crate::entities::PartyType::Vendor, None, None)
                .await?;

        record_entry(
            &db,
            dated_entry(
                date(2025, 1, 10),
                "Boiler repair",
                vec![
                    JournalLineInput::debit(repairs.id, dec!(800)),
                    JournalLineInput::credit(payables.id, dec!(800)).with_party(vendor.id),
                ],
            ),
        )
        .await?;
        record_entry(
            &db,
            dated_entry(
                date(2025, 1, 20),
                "Partial payment",
                vec![
                    JournalLineInput::debit(payables.id, dec!(500)).with_party(vendor.id),
                    JournalLineInput::credit(cash.id, dec!(500)),
                ],
            ),
        )
        .await?;

        let statement = party_statement(&db, vendor.id).await?;
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.rows[0].description, "Boiler repair");
        assert_eq!(statement.rows[0].account_id, payables.id);
        assert_eq!(statement.rows[0].balance, dec!(-800));
        assert_eq!(statement.rows[1].balance, dec!(-300));
        assert_eq!(statement.balance, dec!(-300));

        let stored = party::get_party_by_id(&db, vendor.id).await?.unwrap();
        assert_eq!(statement.balance, stored.balance);

        let empty = party_statement(&db, idle.id).await?;
        assert!(empty.rows.is_empty());
        assert_eq!(empty.balance, Decimal::ZERO);

        let missing = party_statement(&db, 999).await;
        assert!(matches!(missing, Err(Error::NotFound { .. })));

        Ok(())
    }
}
