//! SQLite backend for the labor-calendar import store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Confirm and revert each run inside one
//! `BEGIN IMMEDIATE` transaction; see [`ledger`](crate::ledger).

mod encode;
mod ledger;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
