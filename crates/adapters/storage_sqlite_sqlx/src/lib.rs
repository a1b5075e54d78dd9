//! # pageshell-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the `IconStore` port defined in `pageshell-app::ports`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `pageshell-app` (for port traits) and `pageshell-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod icon_store;
pub mod pool;

pub use icon_store::SqliteIconStore;
pub use pool::{Config, Database};
