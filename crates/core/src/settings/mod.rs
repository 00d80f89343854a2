//! Engine settings module.

mod settings_model;

pub use settings_model::EngineSettings;
