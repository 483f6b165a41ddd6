//! Database module: pool lifecycle, row models and schema.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and conversions to value types
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool ownership and per-operation units of work

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbAccount, DbBrand, DbOctane, DbRefill};
pub use schema::SQLITE_INIT;
pub use sqlite::{Database, SqlitePool, UnitOfWork, is_unique_violation};
