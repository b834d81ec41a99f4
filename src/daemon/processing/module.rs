use std::future::Future;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::daemon::storage::key_event::KeyEvent;

/// Represents an event processor. Besides handling events one by one a processor can ask to be
/// woken up at a certain moment, which is handled on the same loop as the events.
pub trait EventProcessor {
    fn process_next(&mut self, event: KeyEvent) -> impl Future<Output = Result<()>>;

    /// Moment at which [EventProcessor::on_deadline] should be called next, if any.
    fn next_deadline(&self) -> Option<DateTime<Local>>;

    fn on_deadline(&mut self, now: DateTime<Local>) -> impl Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl Future<Output = Result<()>>;
}
