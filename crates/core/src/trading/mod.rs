//! Purchase, sale and expense workflows.
//!
//! - `service` validates requests and plans the writes of each workflow
//! - `book` executes plans atomically in memory
//! - `roles` maps semantic posting roles to accounts

pub mod book;
pub mod error;
pub mod roles;
pub mod service;
pub mod types;


pub use book::TradingBook;
pub use error::TradingError;
pub use roles::{default_chart, AccountRole, AccountRoles};
pub use service::{ExpensePlan, PurchasePlan, SalePlan, TradeQuantities, TradingService};
pub use types::{
    ExpenseRecord, ExpenseRequest, ExpenseResult, Party, PaymentStatus, PurchaseRecord,
    PurchaseRequest, PurchaseResult, SaleRecord, SaleRequest, SaleResult,
};
