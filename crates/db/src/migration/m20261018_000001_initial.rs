//! Initial database migration.
//!
//! Creates the users, materials, parties, and transactions tables with their
//! check constraints, foreign keys, and indexes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(MATERIALS_SQL).await?;
        db.execute_unprepared(PARTIES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    role VARCHAR(20) NOT NULL CHECK (role IN ('admin', 'storeBoy', 'finalBoy')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one admin account
CREATE UNIQUE INDEX idx_users_single_admin ON users(role) WHERE role = 'admin';
";

const MATERIALS_SQL: &str = r"
CREATE TABLE materials (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(20) NOT NULL CHECK (category IN ('Raw', 'Semi-Finished', 'Final')),
    unit VARCHAR(10) NOT NULL CHECK (unit IN ('kg', 'pcs')),
    quantity NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    unit_price NUMERIC(19, 4) CHECK (unit_price >= 0),
    description TEXT,
    low_stock_threshold NUMERIC(19, 4) NOT NULL DEFAULT 0 CHECK (low_stock_threshold >= 0),
    owner_id UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_materials_owner ON materials(owner_id, created_at DESC);
CREATE INDEX idx_materials_category ON materials(category);
";

const PARTIES_SQL: &str = r"
CREATE TABLE parties (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    type VARCHAR(20) NOT NULL CHECK (type IN ('Buyer', 'Supplier')),
    contact VARCHAR(255),
    items JSONB NOT NULL DEFAULT '[]',
    owner_id UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_parties_name ON parties(name);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    date TIMESTAMPTZ NOT NULL,
    bill_no VARCHAR(64) NOT NULL,
    material_id UUID REFERENCES materials(id) ON DELETE SET NULL,
    material_name VARCHAR(255),
    category VARCHAR(20),
    type VARCHAR(20) NOT NULL CHECK (type IN ('Purchase', 'Sale', 'Payment', 'Receipt')),
    quantity NUMERIC(19, 4) NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(19, 4) NOT NULL CHECK (unit_price >= 0),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    total NUMERIC(19, 4) NOT NULL DEFAULT 0,
    party_id UUID REFERENCES parties(id) ON DELETE SET NULL,
    party_name VARCHAR(255),
    notes TEXT,
    owner_id UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    -- Exactly one side carries the amount
    CONSTRAINT chk_single_side CHECK (debit = 0 OR credit = 0)
);

CREATE UNIQUE INDEX idx_transactions_bill_no ON transactions(bill_no);
CREATE INDEX idx_transactions_ledger ON transactions(owner_id, party_id, date, id);
CREATE INDEX idx_transactions_date ON transactions(date DESC);
CREATE INDEX idx_transactions_material ON transactions(material_id);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_materials_updated_at
    BEFORE UPDATE ON materials
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_parties_updated_at
    BEFORE UPDATE ON parties
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS parties CASCADE;
DROP TABLE IF EXISTS materials CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS touch_updated_at() CASCADE;
";
