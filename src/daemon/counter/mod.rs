//! Counting of key presses for the current day.
//!
//! [ActivityCounter] owns the only [ActivityState] in the process. Every key event goes through
//! [ActivityCounter::apply], which handles the day rollover and updates the buckets. The rollover
//! keeps the last 20 minutes of the previous day visible for a while, so the minutes chart doesn't
//! go blank right after midnight. Those slots are cleared later by a deadline the counter tracks
//! itself; whoever drives the counter has to call [ActivityCounter::clear_tail_if_due] once the
//! deadline passes.

pub mod charts;
pub mod state;

use chrono::{DateTime, Local, NaiveDate, TimeDelta, Timelike};
use tracing::{debug, info, trace};

use crate::{
    daemon::storage::key_event::KeyEvent,
    utils::time::{minute_slot, MINUTES_PER_DAY},
};

use state::ActivityState;

/// First minute slot that survives the rollover until the deferred clear.
pub const TAIL_START: usize = 1420;
const TAIL_LEN: usize = MINUTES_PER_DAY - TAIL_START;
pub const TAIL_CLEAR_DELAY: TimeDelta = TimeDelta::seconds(1200);

/// What a single [ActivityCounter::apply] changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub total: u64,
    /// First event seen in this minute slot. Used to trigger uploads.
    pub minute_changed: bool,
    pub rolled_over: bool,
}

pub struct ActivityCounter {
    state: ActivityState,
    tail_clear_due: Option<DateTime<Local>>,
}

impl ActivityCounter {
    pub fn new(state: ActivityState) -> Self {
        Self {
            state,
            tail_clear_due: None,
        }
    }

    /// Continues counting from a restored state. Before slot [TAIL_START] today's own events
    /// can't have reached the tail, so anything there was left by the previous day's rollover
    /// and gets the same deferred clear, counted from midnight.
    pub fn resume(state: ActivityState, now: DateTime<Local>) -> Self {
        let mut counter = Self::new(state);
        let has_tail = counter.state.minutes[TAIL_START..].iter().any(|v| *v > 0);
        if has_tail && minute_slot(&now) < TAIL_START {
            let midnight = now - TimeDelta::seconds(now.num_seconds_from_midnight().into());
            counter.tail_clear_due = Some(midnight + TAIL_CLEAR_DELAY);
            if counter.clear_tail_if_due(now) {
                info!("Dropped the previous day's last minutes left in restored counters");
            }
        }
        counter
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    /// Moment at which the previous day's last minutes get cleared, if a clear is pending.
    pub fn tail_clear_due(&self) -> Option<DateTime<Local>> {
        self.tail_clear_due
    }

    pub fn apply(&mut self, event: &KeyEvent) -> ApplyOutcome {
        self.clear_tail_if_due(event.timestamp);

        let today = event.timestamp.date_naive();
        let rolled_over = self.state.last_seen_day != Some(today);
        if rolled_over {
            self.roll_over(today, event.timestamp);
        }

        self.state.total += 1;

        let slot = minute_slot(&event.timestamp);
        self.state.minutes[slot] += 1;

        if !self.state.count_key(event.key_code) {
            trace!("Key code {} has no histogram slot", event.key_code);
        }

        let minute_changed = self.state.last_seen_slot != Some(slot);
        if minute_changed {
            self.state.last_seen_slot = Some(slot);
        }

        ApplyOutcome {
            total: self.state.total,
            minute_changed,
            rolled_over,
        }
    }

    /// Runs the pending tail clear if its deadline is not after `now`. Returns whether anything
    /// was cleared.
    pub fn clear_tail_if_due(&mut self, now: DateTime<Local>) -> bool {
        match self.tail_clear_due {
            Some(due) if due <= now => {
                self.tail_clear_due = None;
                self.clear_tail();
                debug!("Cleared the last minutes of the previous day");
                true
            }
            _ => false,
        }
    }

    fn roll_over(&mut self, today: NaiveDate, now: DateTime<Local>) {
        let previous = self.state.last_seen_day.replace(today);
        info!("Day changed from {previous:?} to {today}, resetting counters");

        self.state.total = 0;
        self.state.keys.fill(0);
        self.state.minutes[..TAIL_START].fill(0);

        if let Some(due) = self.tail_clear_due.take() {
            debug!("Cancelled the tail clear scheduled for {due}");
        }

        // The clear must land before today's own events can reach the tail, otherwise it would
        // wipe fresh data.
        if minute_slot(&now) + TAIL_LEN <= TAIL_START {
            self.tail_clear_due = Some(now + TAIL_CLEAR_DELAY);
        } else {
            self.clear_tail();
        }
    }

    fn clear_tail(&mut self) {
        self.state.minutes[TAIL_START..].fill(0);
    }
}
