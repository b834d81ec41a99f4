use chrono::NaiveDate;

use crate::daemon::storage::entities::{CountSnapshot, KeyBuckets, MinuteBuckets, PartialSnapshot};

/// Counters for the current day. Owned by [ActivityCounter](super::ActivityCounter), which is
/// the only thing allowed to mutate it.
#[derive(Debug, Clone)]
pub struct ActivityState {
    pub(super) total: u64,
    pub(super) minutes: Box<MinuteBuckets>,
    pub(super) keys: Box<KeyBuckets>,
    pub(super) last_seen_day: Option<NaiveDate>,
    pub(super) last_seen_slot: Option<usize>,
}

impl ActivityState {
    pub fn new() -> Self {
        Self::from_snapshot(CountSnapshot::zeroed(), None)
    }

    /// Seeds the state with whatever was persisted today. If anything was restored, `today`
    /// counts as already seen so that the first key doesn't trigger a rollover.
    pub fn restore(partial: PartialSnapshot, today: NaiveDate) -> Self {
        let last_seen_day = (!partial.is_empty()).then_some(today);
        Self::from_snapshot(partial.into_snapshot(), last_seen_day)
    }

    fn from_snapshot(snapshot: CountSnapshot, last_seen_day: Option<NaiveDate>) -> Self {
        Self {
            total: snapshot.total,
            minutes: snapshot.minutes,
            keys: snapshot.keys,
            last_seen_day,
            last_seen_slot: None,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn minutes(&self) -> &MinuteBuckets {
        &self.minutes
    }

    pub fn keys(&self) -> &KeyBuckets {
        &self.keys
    }

    pub fn last_seen_day(&self) -> Option<NaiveDate> {
        self.last_seen_day
    }

    pub fn snapshot(&self) -> CountSnapshot {
        CountSnapshot {
            total: self.total,
            minutes: self.minutes.clone(),
            keys: self.keys.clone(),
        }
    }

    /// Bumps the histogram. Returns false for codes the histogram has no slot for.
    pub(super) fn count_key(&mut self, key_code: u16) -> bool {
        match self.keys.get_mut(key_code as usize) {
            Some(bucket) => {
                *bucket += 1;
                true
            }
            None => false,
        }
    }
}

impl Default for ActivityState {
    fn default() -> Self {
        Self::new()
    }
}
