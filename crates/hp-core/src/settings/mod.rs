pub mod defaults;
pub mod model;

pub use model::{Settings, CURRENT_SCHEMA_VERSION};
