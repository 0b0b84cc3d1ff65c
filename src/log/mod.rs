//! Reader for the Ninja build log (`.ninja_log`).

pub mod parse;
pub mod row;

pub use parse::LogEntries;
pub use row::LogEntry;
