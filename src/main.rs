use chrono::Utc;
use dotenvy::dotenv;
use property_ledger::{
    config::{database, settings},
    core::{account, lease, ledger, rent, report},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!(
        accounts = app_config.accounts.len(),
        "Successfully processed application configuration."
    );

    // 4. Connect and make sure every table exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the chart of accounts
    let created = account::seed_chart_of_accounts(&db, &app_config.chart_of_accounts())
        .await
        .inspect_err(|e| error!("Failed to seed chart of accounts: {}", e))?;
    info!(created, "Chart of accounts seeded.");

    let today = Utc::now().date_naive();

    // 6. Bring lease statuses up to date
    lease::refresh_lease_statuses(&db, today, app_config.leases.expiring_soon_days).await?;

    // 7. Post this month's rent if it has not been posted yet
    match rent::process_monthly_rent_charges(&db, &app_config.ledger, today).await? {
        Some(result) => info!("\n{}", rent::format_rent_run_summary(&result)),
        None => info!("Rent already posted for {}.", today.format("%B %Y")),
    }

    // 8. Report where things stand
    let summary = report::generate_dashboard_summary(&db).await?;
    info!("{}", report::format_dashboard_summary(&summary));

    let trial_balance = ledger::trial_balance(&db).await?;
    if trial_balance.is_balanced() {
        info!(
            debits = %report::format_currency(trial_balance.total_debits),
            credits = %report::format_currency(trial_balance.total_credits),
            "Trial balance is balanced."
        );
    } else {
        warn!(
            debits = %trial_balance.total_debits,
            credits = %trial_balance.total_credits,
            "Trial balance is out of balance."
        );
    }

    Ok(())
}
