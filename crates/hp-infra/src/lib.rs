pub mod config;
pub mod converter;
pub mod fs;
pub mod settings;
pub mod time;

pub use time::SystemClock;
