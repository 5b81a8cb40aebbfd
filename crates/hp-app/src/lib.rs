//! hotpaste application layer
//!
//! Use cases that drive the conversion pipeline through the core ports.

pub mod app_paths;
pub mod deps;
pub mod settings_store;
pub mod usecases;

pub use deps::PipelineDeps;
pub use settings_store::SettingsStore;
pub use usecases::run_pipeline::{PipelineCoordinator, RunReport};
