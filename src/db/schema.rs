//! SQL DDL for the account and record tables.

/// SQLite schema with:
/// - `users`: UUID primary key stored as BLOB, `username`/`email` UNIQUE
/// - `dim_brands` / `dim_octanes`: AUTOINCREMENT ids (never reused), UNIQUE name/grade
/// - `fct_refills`: foreign keys to both dimensions, quantities as REAL
/// - `is_active` BOOLEAN stored as INTEGER 0/1, timestamps and dates as TEXT
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE CHECK (length(username) <= 32),
    email TEXT NOT NULL UNIQUE CHECK (length(email) <= 64),
    hashed_password TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS dim_brands (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE CHECK (length(name) <= 32)
);

CREATE TABLE IF NOT EXISTS dim_octanes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    grade INTEGER NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS fct_refills (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fill_date TEXT NOT NULL,
    odometer REAL NOT NULL,
    liters_filled REAL NOT NULL,
    brand_id INTEGER NOT NULL REFERENCES dim_brands(id),
    octane_id INTEGER NOT NULL REFERENCES dim_octanes(id),
    ethanol_percent REAL NOT NULL,
    cost REAL NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_fct_refills_brand_id ON fct_refills(brand_id);
CREATE INDEX IF NOT EXISTS idx_fct_refills_octane_id ON fct_refills(octane_id);
"#;
