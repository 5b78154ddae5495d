//! Core types and trait definitions for the labor-calendar import pipeline.
//!
//! This crate is deliberately free of HTTP, OCR and database dependencies.
//! The parser, the storage backends and the API all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod calendar;
pub mod candidate;
pub mod error;
pub mod import;
pub mod store;

pub use error::{Coded, Error, ErrorCode, Result};
