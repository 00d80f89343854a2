//! Pennywise Core - Domain entities, engines, services, and traits.
//!
//! This crate contains the financial logic for Pennywise: period
//! aggregation, favorite goal resolution, the credit engine and the delta
//! calculator, plus the live worker that keeps derived views current.
//! It is storage-agnostic and defines traits that are implemented by the
//! `storage-memory` crate.

pub mod cards;
pub mod constants;
pub mod errors;
pub mod events;
pub mod goals;
pub mod live;
pub mod settings;
pub mod subscriptions;
pub mod summary;
pub mod transactions;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
