//! Cards module - card models, the credit engine, services, and traits.

mod cards_model;
mod cards_service;
mod cards_traits;
mod credit_engine;

pub use cards_model::{Card, ChargePreview, Installment, InstallmentPlan, NewCard};
pub use cards_service::CardService;
pub use cards_traits::{CardRepositoryTrait, CardServiceTrait};
pub use credit_engine::{apply_charge, authorize, authorize_and_apply, plan};
