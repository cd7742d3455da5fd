//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod journal_entry;
pub mod journal_entry_line;
pub mod lease;
pub mod maintenance_ticket;
pub mod party;
pub mod portfolio;
pub mod property;
pub mod system_state;
pub mod tenant;
pub mod unit;

// Re-export specific types to avoid conflicts
pub use account::{AccountType, Entity as Account, Model as AccountModel};
pub use journal_entry::{Entity as JournalEntry, EntryStatus, Model as JournalEntryModel};
pub use journal_entry_line::{Entity as JournalEntryLine, Model as JournalEntryLineModel};
pub use lease::{Entity as Lease, LeaseStatus, Model as LeaseModel};
pub use maintenance_ticket::{
    Entity as MaintenanceTicket, Model as MaintenanceTicketModel, TicketPriority, TicketStatus,
};
pub use party::{Entity as Party, Model as PartyModel, PartyStatus, PartyType};
pub use portfolio::{Entity as Portfolio, Model as PortfolioModel, PortfolioStatus};
pub use property::{Entity as Property, Model as PropertyModel, PropertyType};
pub use system_state::{Entity as SystemState, Model as SystemStateModel};
pub use tenant::{Entity as Tenant, Model as TenantModel, TenantStatus};
pub use unit::{Entity as Unit, Model as UnitModel, UnitStatus};
