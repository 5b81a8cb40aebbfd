pub mod daemon;
pub mod tracing;
pub mod wiring;
