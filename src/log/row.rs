/// A single record from the Ninja build log.
///
/// Only `start`, `end` and `target` feed the report; `restat` and `cmdhash`
/// are kept so a record always carries the full five-column shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub start: i64,
    pub end: i64,
    pub restat: i64,
    pub target: String,
    pub cmdhash: String,
}

impl LogEntry {
    /// Wall time of the step in seconds. Negative when `end < start`.
    pub fn duration_secs(&self) -> f64 {
        // Widened so any pair of i64 timestamps subtracts without overflow.
        (i128::from(self.end) - i128::from(self.start)) as f64 / 1000.0
    }
}
