//! Office automation: insert a generated document at the host's cursor.

mod office;

pub use office::OfficeAutomationHost;
