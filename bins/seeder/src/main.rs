//! Database seeder for Granary.
//!
//! Creates, if absent, the accounts behind the configured posting roles
//! plus a few general accounts. With `--demo` it also adds a demo
//! commodity traded in kg and tons, a supplier and a customer.
//!
//! Usage: cargo run --bin seeder [-- --demo]

use anyhow::Context;
use granary_core::inventory::Commodity;
use granary_core::ledger::{AccountSubtype, AccountType, CreateAccountInput};
use granary_core::trading::{default_chart, Party};
use granary_db::{AccountRepository, CommodityRepository, PartyRepository};
use granary_shared::AppConfig;
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_COMMODITY: &str = "Wheat";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "granary=info,seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = granary_db::connect_with(&config.database)
        .await
        .context("failed to connect to database")?;
    info!("Connected to database");

    seed_accounts(&db, &config).await?;

    if std::env::args().any(|arg| arg == "--demo") {
        seed_demo_data(&db).await?;
    }

    info!("Seeding complete");
    Ok(())
}

/// General accounts seeded next to the role accounts.
fn general_accounts() -> Vec<CreateAccountInput> {
    vec![
        CreateAccountInput::new("10102", "Bank", AccountType::Asset)
            .with_subtype(AccountSubtype::Bank),
        CreateAccountInput::new("30101", "Owner's Capital", AccountType::Equity)
            .with_subtype(AccountSubtype::Capital),
        CreateAccountInput::new(
            "50102",
            "General and Administrative Expenses",
            AccountType::Expense,
        )
        .with_subtype(AccountSubtype::OperatingExpense),
    ]
}

async fn seed_accounts(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    let accounts = AccountRepository::new(db.clone());
    let chart = default_chart(&config.ledger.accounts)
        .into_iter()
        .chain(general_accounts());

    for input in chart {
        let code = input.code.clone();
        let (account, created) = accounts
            .ensure_account(input)
            .await
            .with_context(|| format!("failed to seed account {code}"))?;
        if created {
            info!(code = %account.code, name = %account.name, "account created");
        } else {
            info!(code = %account.code, "account already present");
        }
    }

    // Fails early when a configured role code is still missing.
    accounts
        .resolve_roles(&config.ledger.accounts)
        .await
        .context("posting roles do not resolve")?;
    Ok(())
}

async fn seed_demo_data(db: &DatabaseConnection) -> anyhow::Result<()> {
    let commodities = CommodityRepository::new(db.clone());
    if commodities.find_by_name(DEMO_COMMODITY).await?.is_some() {
        info!("demo data already present");
        return Ok(());
    }

    let mut wheat = Commodity::new(DEMO_COMMODITY);
    wheat.add_unit("ton", dec!(1000))?;
    let wheat = commodities.create_commodity(&wheat).await?;
    info!(id = %wheat.id, name = %wheat.name, "demo commodity created");

    let parties = PartyRepository::new(db.clone());
    let mut supplier = Party::supplier("Valley Farms");
    supplier.phone = Some("+20 100 000 0001".to_string());
    let supplier = parties.create_party(&supplier).await?;
    let customer = parties.create_party(&Party::customer("City Mill")).await?;
    info!(supplier = %supplier.id, customer = %customer.id, "demo parties created");

    Ok(())
}
