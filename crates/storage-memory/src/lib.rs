//! In-process storage implementation for Pennywise.
//!
//! This crate plays the role of the document store behind the engine. It
//! implements the repository traits defined in `pennywise-core` and
//! contains:
//! - Shared record tables and a single writer actor that runs every write
//!   as a transaction against a draft copy
//! - Repository implementations for transactions, goals, cards and
//!   subscriptions
//! - A change bus delivering per-user, per-collection notices
//! - JSON seed import and export
//!
//! # Architecture
//!
//! ```text
//!   core (domain, live worker)
//!            │ traits
//!            ▼
//!   storage-memory (this crate) ──► DomainEventSink / ChangeBus
//!            │
//!            ▼
//!     Arc<RwLock<Tables>>
//! ```

pub mod cards;
pub mod change_bus;
pub mod db;
pub mod errors;
pub mod goals;
pub mod seed;
pub mod store;
pub mod subscriptions;
pub mod transactions;

pub use change_bus::{ChangeBus, ChangeStream};
pub use db::{spawn_writer, Tables, WriteHandle, WriteTx};
pub use errors::StorageError;
pub use seed::SeedDocument;
pub use store::MemoryStore;

// Re-export from pennywise-core for convenience
pub use pennywise_core::errors::{Error, Result};
