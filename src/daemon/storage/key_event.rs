use chrono::{DateTime, Local};

/// A single key-down produced by a key source and timestamped by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u16,
    pub timestamp: DateTime<Local>,
}
