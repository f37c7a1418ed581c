//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Account codes backing each semantic posting role.
    #[serde(default)]
    pub accounts: AccountRoleCodes,
}

/// Account codes for the well-known posting roles.
///
/// The workflows never reference accounts directly; these codes are
/// resolved to account IDs once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountRoleCodes {
    /// Inventory asset account.
    #[serde(default = "default_inventory")]
    pub inventory: String,
    /// Accounts payable (suppliers).
    #[serde(default = "default_accounts_payable")]
    pub accounts_payable: String,
    /// Accounts receivable (customers).
    #[serde(default = "default_accounts_receivable")]
    pub accounts_receivable: String,
    /// Sales revenue.
    #[serde(default = "default_sales_revenue")]
    pub sales_revenue: String,
    /// Cost of goods sold.
    #[serde(default = "default_cost_of_goods_sold")]
    pub cost_of_goods_sold: String,
    /// Main cash account.
    #[serde(default = "default_cash")]
    pub cash: String,
}

fn default_inventory() -> String {
    "10103".to_string()
}

fn default_accounts_payable() -> String {
    "20101".to_string()
}

fn default_accounts_receivable() -> String {
    "10104".to_string()
}

fn default_sales_revenue() -> String {
    "40101".to_string()
}

fn default_cost_of_goods_sold() -> String {
    "50101".to_string()
}

fn default_cash() -> String {
    "10101".to_string()
}

impl Default for AccountRoleCodes {
    fn default() -> Self {
        Self {
            inventory: default_inventory(),
            accounts_payable: default_accounts_payable(),
            accounts_receivable: default_accounts_receivable(),
            sales_revenue: default_sales_revenue(),
            cost_of_goods_sold: default_cost_of_goods_sold(),
            cash: default_cash(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if configuration cannot be loaded.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("GRANARY").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
