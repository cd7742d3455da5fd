/// Database configuration and connection management
pub mod database;

/// Chart of accounts and ledger settings loaded from config.toml
pub mod settings;
