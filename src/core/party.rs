//! Party business logic - Vendors, customers, tenants and employees.
//!
//! A party's balance is the net of posted debits minus credits on journal lines
//! that name it. Only the journal module moves it.

use crate::{
    core::money,
    entities::{Party, PartyStatus, PartyType, party},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates a new active party with a zero balance.
///
/// # Errors
/// Returns an error if the name is empty or the insert fails.
pub async fn create_party(
    db: &DatabaseConnection,
    name: &str,
    party_type: PartyType,
    email: Option<String>,
    phone: Option<String>,
) -> Result<party::Model> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("Party name cannot be empty"));
    }

    let party = party::ActiveModel {
        name: Set(name.to_string()),
        party_type: Set(party_type),
        email: Set(email),
        phone: Set(phone),
        status: Set(PartyStatus::Active),
        balance: Set(Decimal::ZERO),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    party.insert(db).await.map_err(Into::into)
}

/// Finds a party by id.
pub async fn get_party_by_id<C>(db: &C, party_id: i64) -> Result<Option<party::Model>>
where
    C: ConnectionTrait,
{
    Party::find_by_id(party_id).one(db).await.map_err(Into::into)
}

/// Lists parties ordered by name, optionally filtered by type and a
/// case-insensitive search over name and email.
pub async fn list_parties(
    db: &DatabaseConnection,
    party_type: Option<PartyType>,
    search: Option<&str>,
) -> Result<Vec<party::Model>> {
    let mut query = Party::find().order_by_asc(party::Column::Name);

    if let Some(party_type) = party_type {
        query = query.filter(party::Column::PartyType.eq(party_type));
    }

    let parties = query.all(db).await?;

    Ok(match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(term) => {
            let term = term.to_lowercase();
            parties
                .into_iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&term)
                        || p.email
                            .as_deref()
                            .is_some_and(|e| e.to_lowercase().contains(&term))
                })
                .collect()
        }
        None => parties,
    })
}

/// Marks a party active or inactive. The balance is left as it is.
pub async fn set_party_status<C>(db: &C, party_id: i64, status: PartyStatus) -> Result<party::Model>
where
    C: ConnectionTrait,
{
    let mut party: party::ActiveModel = get_party_by_id(db, party_id)
        .await?
        .ok_or_else(|| Error::not_found("Party", party_id))?
        .into();

    party.status = Set(status);
    party.update(db).await.map_err(Into::into)
}

/// Lists parties with a non-zero balance, largest absolute balance first.
pub async fn list_parties_with_balance(db: &DatabaseConnection) -> Result<Vec<party::Model>> {
    let mut parties = Party::find()
        .filter(party::Column::Balance.ne(Decimal::ZERO))
        .all(db)
        .await?;
    parties.sort_by(|a, b| b.balance.abs().cmp(&a.balance.abs()));
    Ok(parties)
}

/// Adds `amount_delta` to a party balance with a single UPDATE statement.
pub async fn adjust_party_balance_atomic<C>(
    db: &C,
    party_id: i64,
    amount_delta: Decimal,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Party::update_many()
        .col_expr(
            party::Column::Balance,
            money::add_in_cents(party::Column::Balance, amount_delta),
        )
        .filter(party::Column::Id.eq(party_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::not_found("Party", party_id));
    }
    Ok(())
}
