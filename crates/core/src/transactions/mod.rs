//! Transactions module - domain models, services, and traits.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

pub use transactions_model::{NewTransaction, TransactionKind, TransactionRecord};
pub use transactions_service::{TransactionOutcome, TransactionService};
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
