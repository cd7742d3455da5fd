//! Application settings loaded from config.toml
//!
//! The file seeds the chart of accounts and tells the ledger which account codes
//! the rent operations book against. Every section is optional; missing values
//! fall back to a standard property-management setup.

use crate::{
    entities::AccountType,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Chart of accounts to seed; empty means use [`default_chart_of_accounts`]
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Account codes used by rent posting
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Lease status thresholds
    #[serde(default)]
    pub leases: LeaseSettings,
}

/// Configuration for a single chart-of-accounts entry
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    /// Account code (e.g., "1000")
    pub code: String,
    /// Display name
    pub name: String,
    /// Asset, Liability, Equity, Revenue or Expense
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Optional sub-classification
    #[serde(default)]
    pub category: Option<String>,
}

/// Account codes the rent operations post to
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerSettings {
    /// Operating cash account
    pub cash_account: String,
    /// Rent receivable account
    pub receivables_account: String,
    /// Security deposits held (liability)
    pub security_deposit_account: String,
    /// Rental income account
    pub rental_income_account: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            cash_account: "1000".to_string(),
            receivables_account: "1100".to_string(),
            security_deposit_account: "2100".to_string(),
            rental_income_account: "4000".to_string(),
        }
    }
}

/// Lease status thresholds
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LeaseSettings {
    /// Leases ending within this many days are marked Expiring Soon
    pub expiring_soon_days: i64,
}

impl Default for LeaseSettings {
    fn default() -> Self {
        Self {
            expiring_soon_days: 60,
        }
    }
}

impl AppConfig {
    /// The accounts to seed: the configured list, or the default chart when none is given.
    #[must_use]
    pub fn chart_of_accounts(&self) -> Vec<AccountConfig> {
        if self.accounts.is_empty() {
            default_chart_of_accounts()
        } else {
            self.accounts.clone()
        }
    }
}

/// Standard chart of accounts for a small property manager.
#[must_use]
pub fn default_chart_of_accounts() -> Vec<AccountConfig> {
    let account = |code: &str, name: &str, account_type, category: &str| AccountConfig {
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        category: Some(category.to_string()),
    };

    vec![
        account("1000", "Operating Cash", AccountType::Asset, "Cash"),
        account("1100", "Accounts Receivable", AccountType::Asset, "Receivables"),
        account("1500", "Buildings", AccountType::Asset, "Fixed Assets"),
        account("2000", "Accounts Payable", AccountType::Liability, "Payables"),
        account("2100", "Security Deposits Held", AccountType::Liability, "Deposits"),
        account("3000", "Owner's Equity", AccountType::Equity, "Capital"),
        account("4000", "Rental Income", AccountType::Revenue, "Rent"),
        account("4100", "Late Fees", AccountType::Revenue, "Fees"),
        account("5000", "Repairs & Maintenance", AccountType::Expense, "Operations"),
        account("5100", "Utilities", AccountType::Expense, "Operations"),
        account("5200", "Property Management Fees", AccountType::Expense, "Operations"),
    ]
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Loading configuration from {}", path_ref.display());

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;

    parse_config(&contents)
}

/// Parses application settings from TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `CONFIG_PATH`, or `./config.toml` when unset.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_default_config() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        load_config(path)
    } else {
        tracing::info!("No configuration file at {path}, using defaults");
        Ok(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [[accounts]]
            code = "1000"
            name = "Cash"
            type = "Asset"
            category = "Cash"

            [[accounts]]
            code = "4000"
            name = "Rent"
            type = "Revenue"

            [ledger]
            cash_account = "1000"
            receivables_account = "1200"

            [leases]
            expiring_soon_days = 30
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].account_type, AccountType::Asset);
        assert_eq!(config.accounts[1].category, None);
        assert_eq!(config.ledger.receivables_account, "1200");
        // Unset keys keep their defaults
        assert_eq!(config.ledger.rental_income_account, "4000");
        assert_eq!(config.leases.expiring_soon_days, 30);
        assert_eq!(config.chart_of_accounts().len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.accounts.is_empty());
        assert_eq!(config.leases.expiring_soon_days, 60);
        assert_eq!(config.ledger, LedgerSettings::default());
        assert_eq!(config.chart_of_accounts(), default_chart_of_accounts());
    }

    #[test]
    fn test_default_chart_covers_ledger_settings() {
        let chart = default_chart_of_accounts();
        let ledger = LedgerSettings::default();
        for code in [
            &ledger.cash_account,
            &ledger.receivables_account,
            &ledger.security_deposit_account,
            &ledger.rental_income_account,
        ] {
            assert!(chart.iter().any(|a| &a.code == code), "missing {code}");
        }
    }

    #[test]
    fn test_unknown_account_type_is_rejected() {
        let toml_str = r#"
            [[accounts]]
            code = "9000"
            name = "Mystery"
            type = "Liabilityish"
        "#;
        let result = parse_config(toml_str);
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = load_config("/nonexistent/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert_eq!(config.ledger, LedgerSettings::default());
        assert_eq!(config.leases.expiring_soon_days, 60);
        assert!(config.chart_of_accounts().iter().any(|a| a.code == "1100"));
    }
}
