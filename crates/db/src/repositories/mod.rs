//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod commodity;
pub mod inventory;
pub mod party;
pub mod trading;

pub use account::{AccountError, AccountRepository};
pub use commodity::{CommodityError, CommodityRepository};
pub use inventory::{InventoryRepository, StockError};
pub use party::PartyRepository;
pub use trading::{TradeError, TradingRepository};
