mod patient;
mod visit;

pub use patient::*;
pub use visit::*;

/// Storage format for server-assigned timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
