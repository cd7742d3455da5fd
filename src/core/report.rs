//! Report generation business logic.
//!
//! Dashboard, property and portfolio summaries plus formatting helpers for log
//! output. All functions return structured data; formatting is left to the caller.

use crate::{
    core::{lease, property::get_property_by_id},
    entities::{
        MaintenanceTicket, Portfolio, Property, TicketPriority, TicketStatus, Unit, UnitStatus,
        lease as lease_entity, maintenance_ticket, portfolio, property, unit,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Select, prelude::*};

/// Unit counts and rent roll over a set of units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccupancyCounts {
    /// All units
    pub total_units: u64,
    /// Units with a tenant in place
    pub occupied: u64,
    /// Units available to lease
    pub vacant: u64,
    /// Units out of service
    pub maintenance: u64,
    /// Monthly rent of occupied units
    pub rent_roll: Decimal,
}

impl OccupancyCounts {
    /// Tallies a set of units.
    #[must_use]
    pub fn from_units(units: &[unit::Model]) -> Self {
        units.iter().fold(Self::default(), |mut counts, u| {
            counts.total_units += 1;
            match u.status {
                UnitStatus::Occupied => {
                    counts.occupied += 1;
                    counts.rent_roll += u.rent;
                }
                UnitStatus::Vacant => counts.vacant += 1,
                UnitStatus::Maintenance => counts.maintenance += 1,
            }
            counts
        })
    }

    /// Percent of units occupied, 0 when there are no units
    #[must_use]
    pub fn occupancy_rate(&self) -> f64 {
        calculate_occupancy_rate(self.occupied, self.total_units)
    }
}

/// Portfolio-wide figures for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Number of properties
    pub property_count: u64,
    /// Unit tallies across every property
    pub units: OccupancyCounts,
    /// Percent of units occupied
    pub occupancy_rate: f64,
    /// Tickets not yet completed
    pub active_maintenance: u64,
    /// High or critical tickets not yet completed
    pub high_priority_open: u64,
}

/// Figures for a single property
#[derive(Debug, Clone)]
pub struct PropertySummary {
    /// The property being reported on
    pub property: property::Model,
    /// Unit tallies for the property
    pub units: OccupancyCounts,
    /// Percent of units occupied
    pub occupancy_rate: f64,
    /// Tickets not yet completed
    pub open_tickets: u64,
    /// Current leases on the property's units
    pub current_leases: Vec<lease_entity::Model>,
}

/// Figures for a single portfolio
#[derive(Debug, Clone)]
pub struct PortfolioSummary {
    /// The portfolio being reported on
    pub portfolio: portfolio::Model,
    /// Number of properties in the portfolio
    pub property_count: u64,
    /// Unit tallies across the portfolio's properties
    pub units: OccupancyCounts,
    /// Percent of units occupied
    pub occupancy_rate: f64,
}

/// Calculates the percentage of occupied units.
///
/// Returns 0 when there are no units.
#[must_use]
pub fn calculate_occupancy_rate(occupied: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }

    // Unit counts stay far below f64's exact integer range
    #[allow(clippy::cast_precision_loss)]
    let rate = (occupied as f64 / total as f64) * 100.0;
    rate
}

fn open_ticket_query() -> Select<MaintenanceTicket> {
    MaintenanceTicket::find().filter(maintenance_ticket::Column::Status.ne(TicketStatus::Completed))
}

/// Builds the portfolio-wide dashboard summary.
pub async fn generate_dashboard_summary(db: &DatabaseConnection) -> Result<DashboardSummary> {
    let property_count = Property::find().count(db).await?;
    let units = OccupancyCounts::from_units(&Unit::find().all(db).await?);

    let active_maintenance = open_ticket_query().count(db).await?;
    let high_priority_open = open_ticket_query()
        .filter(
            maintenance_ticket::Column::Priority
                .is_in([TicketPriority::High, TicketPriority::Critical]),
        )
        .count(db)
        .await?;

    Ok(DashboardSummary {
        property_count,
        occupancy_rate: units.occupancy_rate(),
        units,
        active_maintenance,
        high_priority_open,
    })
}

/// Builds the summary for one property.
///
/// # Errors
/// Returns `NotFound` if the property does not exist.
pub async fn generate_property_summary(
    db: &DatabaseConnection,
    property_id: i64,
) -> Result<PropertySummary> {
    let property = get_property_by_id(db, property_id)
        .await?
        .ok_or_else(|| Error::not_found("Property", property_id))?;

    let units = Unit::find()
        .filter(unit::Column::PropertyId.eq(property_id))
        .all(db)
        .await?;
    let unit_ids: Vec<i64> = units.iter().map(|u| u.id).collect();
    let counts = OccupancyCounts::from_units(&units);

    let open_tickets = open_ticket_query()
        .filter(maintenance_ticket::Column::PropertyId.eq(property_id))
        .count(db)
        .await?;

    let current_leases = lease::list_current_leases(db)
        .await?
        .into_iter()
        .filter(|l| unit_ids.contains(&l.unit_id))
        .collect();

    Ok(PropertySummary {
        property,
        occupancy_rate: counts.occupancy_rate(),
        units: counts,
        open_tickets,
        current_leases,
    })
}

/// Builds one summary per portfolio, ordered by name.
pub async fn generate_portfolio_summaries(
    db: &DatabaseConnection,
) -> Result<Vec<PortfolioSummary>> {
    let portfolios = Portfolio::find()
        .order_by_asc(portfolio::Column::Name)
        .all(db)
        .await?;

    let mut summaries = Vec::with_capacity(portfolios.len());
    for portfolio in portfolios {
        let property_ids: Vec<i64> = Property::find()
            .filter(property::Column::PortfolioId.eq(portfolio.id))
            .all(db)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        let units = Unit::find()
            .filter(unit::Column::PropertyId.is_in(property_ids.clone()))
            .all(db)
            .await?;
        let counts = OccupancyCounts::from_units(&units);

        summaries.push(PortfolioSummary {
            portfolio,
            property_count: u64::try_from(property_ids.len())?,
            occupancy_rate: counts.occupancy_rate(),
            units: counts,
        });
    }

    Ok(summaries)
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based bar like: `[████████░░] 80.0%`
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // Cast safety: clamped_progress ∈ [0, 100], length is small (10-20).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent:.1}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

/// Formats an amount as dollars with thousands separators, e.g. `-$1,234.50`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.abs().round_dp(2);
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// One-line dashboard summary for the log.
#[must_use]
pub fn format_dashboard_summary(summary: &DashboardSummary) -> String {
    format!(
        "{} properties | {} units ({} occupied, {} vacant, {} maintenance) | occupancy {} | rent roll {} | {} open tickets ({} high priority)",
        summary.property_count,
        summary.units.total_units,
        summary.units.occupied,
        summary.units.vacant,
        summary.units.maintenance,
        format_progress_bar(summary.occupancy_rate, None),
        format_currency(summary.units.rent_roll),
        summary.active_maintenance,
        summary.high_priority_open
    )
}
