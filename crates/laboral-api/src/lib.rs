//! JSON REST API for the labor-calendar import pipeline.
//!
//! Exposes an axum [`Router`] backed by any
//! [`laboral_core::store::CalendarStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", laboral_api::api_router(store.clone()))
//! ```

pub mod calendar;
pub mod error;
pub mod imports;
pub mod preview;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use laboral_core::store::CalendarStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CalendarStore + 'static,
{
  Router::new()
    // Parsing
    .route("/preview", post(preview::handler))
    // Imports
    .route("/imports", get(imports::list::<S>).post(imports::create::<S>))
    .route("/imports/{id}", get(imports::get_one::<S>))
    .route("/imports/{id}/revert", post(imports::revert::<S>))
    // Ledger
    .route("/calendar/{empresa_id}", get(calendar::list::<S>))
    .route("/calendar/{empresa_id}/{fecha}", get(calendar::get_one::<S>))
    .with_state(store)
}
