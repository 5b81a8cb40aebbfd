mod pandoc;

pub use pandoc::PandocConverter;
