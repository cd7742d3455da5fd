//! Portfolio business logic.
//!
//! Provides functions for creating, retrieving and archiving portfolios.

use crate::{
    entities::{Portfolio, PortfolioStatus, portfolio},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new active portfolio.
///
/// Name and code are trimmed; the code is upper-cased.
pub async fn create_portfolio(
    db: &DatabaseConnection,
    name: &str,
    code: &str,
) -> Result<portfolio::Model> {
    let name = name.trim();
    let code = code.trim().to_uppercase();

    if name.is_empty() {
        return Err(Error::validation("Portfolio name cannot be empty"));
    }
    if code.is_empty() {
        return Err(Error::validation("Portfolio code cannot be empty"));
    }

    let portfolio = portfolio::ActiveModel {
        name: Set(name.to_string()),
        code: Set(code),
        status: Set(PortfolioStatus::Active),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    portfolio.insert(db).await.map_err(Into::into)
}

/// Finds a portfolio by id.
pub async fn get_portfolio_by_id<C>(db: &C, portfolio_id: i64) -> Result<Option<portfolio::Model>>
where
    C: ConnectionTrait,
{
    Portfolio::find_by_id(portfolio_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists portfolios ordered by name, optionally keeping only those whose name or
/// code contains `search` (case-insensitive).
pub async fn list_portfolios(
    db: &DatabaseConnection,
    search: Option<&str>,
) -> Result<Vec<portfolio::Model>> {
    let portfolios = Portfolio::find()
        .order_by_asc(portfolio::Column::Name)
        .all(db)
        .await?;

    let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(portfolios);
    };
    let term = term.to_lowercase();

    Ok(portfolios
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&term) || p.code.to_lowercase().contains(&term))
        .collect())
}

/// Changes the status of a portfolio.
pub async fn set_portfolio_status(
    db: &DatabaseConnection,
    portfolio_id: i64,
    status: PortfolioStatus,
) -> Result<portfolio::Model> {
    let mut portfolio: portfolio::ActiveModel = get_portfolio_by_id(db, portfolio_id)
        .await?
        .ok_or_else(|| Error::not_found("Portfolio", portfolio_id))?
        .into();

    portfolio.status = Set(status);
    portfolio.update(db).await.map_err(Into::into)
}
