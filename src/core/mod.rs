//! Core business logic - framework-agnostic property and ledger operations.
//!
//! Every operation is an async function over a `SeaORM` connection returning
//! [`crate::errors::Result`]. Multi-row changes run inside a database transaction.

/// Chart of accounts and atomic balance adjustments
pub mod account;
/// Journal entries, balancing, posting and reversal
pub mod journal;
/// Lease lifecycle and unit/tenant status effects
pub mod lease;
/// Trial balance, financial statements and balance recomputation
pub mod ledger;
/// Maintenance ticket workflow
pub mod maintenance;
/// Money validation helpers
pub mod money;
/// Vendors, customers and other counterparties
pub mod party;
/// Portfolio management
pub mod portfolio;
/// Property management
pub mod property;
/// Monthly rent charges and rent receipts
pub mod rent;
/// Dashboard and occupancy reporting
pub mod report;
/// Tenant management
pub mod tenant;
/// Unit management
pub mod unit;
