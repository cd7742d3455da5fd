//! Chart of accounts - Handles account creation, lookup and balance adjustment.
//!
//! Account balances are stored in each account's natural sign. A debit raises a
//! debit-normal account (assets, expenses) and lowers a credit-normal one
//! (liabilities, equity, revenue). [`balance_delta`] is the single place that
//! rule lives; posting and recomputation both go through it.

use crate::{
    config::settings::AccountConfig,
    core::money,
    entities::{Account, AccountType, account},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Which column of the trial balance an account normally sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalSide {
    /// Debits increase the balance
    Debit,
    /// Credits increase the balance
    Credit,
}

/// Returns the normal balance side for an account type.
#[must_use]
pub const fn normal_side(account_type: AccountType) -> NormalSide {
    match account_type {
        AccountType::Asset | AccountType::Expense => NormalSide::Debit,
        AccountType::Liability | AccountType::Equity | AccountType::Revenue => NormalSide::Credit,
    }
}

/// Change in an account's natural-sign balance caused by a debit/credit pair.
#[must_use]
pub fn balance_delta(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    match normal_side(account_type) {
        NormalSide::Debit => debit - credit,
        NormalSide::Credit => credit - debit,
    }
}

/// Creates a new account with a zero balance.
///
/// # Errors
/// Returns an error if:
/// - The code or name is empty or whitespace-only
/// - Another account already uses the code
/// - The database insert fails
pub async fn create_account<C>(
    db: &C,
    code: &str,
    name: &str,
    account_type: AccountType,
    category: Option<String>,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let code = code.trim();
    let name = name.trim();

    if code.is_empty() {
        return Err(Error::validation("Account code cannot be empty"));
    }
    if name.is_empty() {
        return Err(Error::validation("Account name cannot be empty"));
    }

    if get_account_by_code(db, code).await?.is_some() {
        return Err(Error::DuplicateAccountCode {
            code: code.to_string(),
        });
    }

    let account = account::ActiveModel {
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        account_type: Set(account_type),
        category: Set(category),
        balance: Set(Decimal::ZERO),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    account.insert(db).await.map_err(Into::into)
}

/// Finds an account by its primary key.
pub async fn get_account_by_id<C>(db: &C, account_id: i64) -> Result<Option<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by its chart-of-accounts code.
pub async fn get_account_by_code<C>(db: &C, code: &str) -> Result<Option<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find()
        .filter(account::Column::Code.eq(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by code, failing with `NotFound` when it is missing.
pub async fn require_account_by_code<C>(db: &C, code: &str) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    get_account_by_code(db, code)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "Account",
            id: code.to_string(),
        })
}

/// Lists the whole chart of accounts ordered by code.
pub async fn list_accounts<C>(db: &C) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Account::find()
        .order_by_asc(account::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the accounts of one type ordered by code.
pub async fn list_accounts_by_type(
    db: &DatabaseConnection,
    account_type: AccountType,
) -> Result<Vec<account::Model>> {
    Account::find()
        .filter(account::Column::AccountType.eq(account_type))
        .order_by_asc(account::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds `amount_delta` to an account balance with a single UPDATE statement:
/// `UPDATE accounts SET balance = ROUND(balance + delta, 2) WHERE id = ?`
///
/// # Returns
/// The updated account model
pub async fn adjust_account_balance_atomic<C>(
    db: &C,
    account_id: i64,
    amount_delta: Decimal,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let result = Account::update_many()
        .col_expr(
            account::Column::Balance,
            money::add_in_cents(account::Column::Balance, amount_delta),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("Account", account_id));
    }

    get_account_by_id(db, account_id)
        .await?
        .ok_or_else(|| Error::not_found("Account", account_id))
}

/// Inserts every configured account whose code is not in the database yet.
///
/// Existing accounts are left untouched, so seeding is safe to run on every start.
///
/// # Returns
/// The number of accounts created
pub async fn seed_chart_of_accounts(
    db: &DatabaseConnection,
    accounts: &[AccountConfig],
) -> Result<usize> {
    let mut created = 0;
    for config in accounts {
        if get_account_by_code(db, &config.code).await?.is_some() {
            tracing::debug!("Account {} already exists, skipping", config.code);
            continue;
        }
        create_account(
            db,
            &config.code,
            &config.name,
            config.account_type,
            config.category.clone(),
        )
        .await?;
        created += 1;
    }
    Ok(created)
}
