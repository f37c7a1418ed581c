//! Initial database migration.
//!
//! Creates the chart of accounts, the trading tables and the ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: MASTER DATA
        // ============================================================
        db.execute_unprepared(COMMODITIES_SQL).await?;
        db.execute_unprepared(PARTIES_SQL).await?;
        db.execute_unprepared(INVENTORY_POSITIONS_SQL).await?;

        // ============================================================
        // PART 4: BUSINESS RECORDS
        // ============================================================
        db.execute_unprepared(PURCHASES_SQL).await?;
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 5: LEDGER
        // ============================================================
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Account subtypes (labelling only)
CREATE TYPE account_subtype AS ENUM (
    'cash',
    'bank',
    'inventory',
    'accounts_receivable',
    'accounts_payable',
    'capital',
    'operating_revenue',
    'cost_of_goods_sold',
    'operating_expense'
);

-- Side on which an account balance grows
CREATE TYPE normal_side AS ENUM (
    'debit',
    'credit'
);

-- Business transaction a ledger entry belongs to
CREATE TYPE source_type AS ENUM (
    'purchase',
    'sale',
    'expense',
    'adjustment'
);

-- Settlement state of purchases and sales
CREATE TYPE payment_status AS ENUM (
    'pending',
    'partial',
    'paid'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    account_subtype account_subtype,
    normal_side normal_side NOT NULL,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    version BIGINT NOT NULL DEFAULT 1,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_code UNIQUE (code),
    CONSTRAINT uq_accounts_name UNIQUE (name)
);
";

const COMMODITIES_SQL: &str = r"
CREATE TABLE commodities (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    base_unit VARCHAR(20) NOT NULL DEFAULT 'kg',
    allowed_pricing_units JSONB NOT NULL DEFAULT '[]',
    conversion_factors JSONB NOT NULL DEFAULT '{}',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_commodities_name UNIQUE (name)
);
";

const PARTIES_SQL: &str = r"
CREATE TABLE parties (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    is_supplier BOOLEAN NOT NULL DEFAULT false,
    is_customer BOOLEAN NOT NULL DEFAULT false,
    phone VARCHAR(50),
    address TEXT,
    email VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_parties_name ON parties(name);
";

const INVENTORY_POSITIONS_SQL: &str = r"
CREATE TABLE inventory_positions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    commodity_id UUID NOT NULL REFERENCES commodities(id),
    stock NUMERIC(19, 4) NOT NULL DEFAULT 0,
    average_cost NUMERIC(19, 6) NOT NULL DEFAULT 0,
    carrying_value NUMERIC(19, 4) NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_inventory_commodity UNIQUE (commodity_id),
    CONSTRAINT chk_stock_non_negative CHECK (stock >= 0),
    CONSTRAINT chk_average_cost_non_negative CHECK (average_cost >= 0),
    CONSTRAINT chk_carrying_value_non_negative CHECK (carrying_value >= 0)
);
";

const PURCHASES_SQL: &str = r"
CREATE TABLE purchases (
    id UUID PRIMARY KEY,
    commodity_id UUID NOT NULL REFERENCES commodities(id),
    supplier_id UUID NOT NULL REFERENCES parties(id),
    purchase_date DATE NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    unit_price NUMERIC(19, 6) NOT NULL,
    total_cost NUMERIC(19, 4) NOT NULL,
    payment_status payment_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_purchase_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_purchase_total_positive CHECK (total_cost > 0)
);

CREATE INDEX idx_purchases_commodity ON purchases(commodity_id, purchase_date);
CREATE INDEX idx_purchases_supplier ON purchases(supplier_id);
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    commodity_id UUID NOT NULL REFERENCES commodities(id),
    customer_id UUID NOT NULL REFERENCES parties(id),
    sale_date DATE NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    unit_price NUMERIC(19, 6) NOT NULL,
    total_amount NUMERIC(19, 4) NOT NULL,
    cogs NUMERIC(19, 4) NOT NULL DEFAULT 0,
    payment_status payment_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_sale_quantity_positive CHECK (quantity > 0),
    CONSTRAINT chk_sale_total_positive CHECK (total_amount > 0),
    CONSTRAINT chk_sale_cogs_non_negative CHECK (cogs >= 0)
);

CREATE INDEX idx_sales_commodity ON sales(commodity_id, sale_date);
CREATE INDEX idx_sales_customer ON sales(customer_id);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    expense_date DATE NOT NULL,
    description VARCHAR(500) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    debit_account_id UUID NOT NULL REFERENCES accounts(id),
    credit_account_id UUID NOT NULL REFERENCES accounts(id),
    supplier_id UUID REFERENCES parties(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_expense_distinct_accounts CHECK (debit_account_id <> credit_account_id)
);

CREATE INDEX idx_expenses_date ON expenses(expense_date);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    entry_date DATE NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description VARCHAR(500) NOT NULL,
    source_type source_type NOT NULL,
    source_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    )
);

CREATE INDEX idx_le_account ON ledger_entries(account_id);
CREATE INDEX idx_le_source ON ledger_entries(source_type, source_id);
CREATE INDEX idx_le_account_date ON ledger_entries(account_id, entry_date);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS purchases CASCADE;
DROP TABLE IF EXISTS inventory_positions CASCADE;
DROP TABLE IF EXISTS parties CASCADE;
DROP TABLE IF EXISTS commodities CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

-- Drop enums
DROP TYPE IF EXISTS payment_status CASCADE;
DROP TYPE IF EXISTS source_type CASCADE;
DROP TYPE IF EXISTS normal_side CASCADE;
DROP TYPE IF EXISTS account_subtype CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
";
