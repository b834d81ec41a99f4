//! Read-only views over [ActivityState]. None of them allocate or mutate.

use crate::utils::time::{MINUTES_PER_DAY, MINUTES_PER_HOUR};

use super::state::ActivityState;

pub const MINUTES_CHART_LEN: usize = 21;
pub const HOURS_CHART_LEN: usize = 24;
pub const ALPHABET_CHART_LEN: usize = 26;
pub const SYMBOLS_CHART_LEN: usize = 25;

/// Key code of `a`.
const ALPHABET_START: usize = 97;
/// Key code of `!`. The symbols chart spans `!` through `9`.
const SYMBOLS_START: usize = 33;

impl ActivityState {
    /// Counts for `current_slot` and the 20 minutes before it, oldest first. Wraps around
    /// midnight, so slot 5 is preceded by slot 1439.
    pub fn minutes_chart(&self, current_slot: usize) -> [u64; MINUTES_CHART_LEN] {
        let current_slot = current_slot % MINUTES_PER_DAY;
        std::array::from_fn(|i| {
            let back = MINUTES_CHART_LEN - 1 - i;
            self.minutes[(current_slot + MINUTES_PER_DAY - back) % MINUTES_PER_DAY]
        })
    }

    pub fn hours_chart(&self) -> [u64; HOURS_CHART_LEN] {
        let mut hours = [0; HOURS_CHART_LEN];
        for (hour, minutes) in hours
            .iter_mut()
            .zip(self.minutes.chunks_exact(MINUTES_PER_HOUR))
        {
            *hour = minutes.iter().sum();
        }
        hours
    }

    /// Presses of `a` through `z`.
    pub fn alphabet_chart(&self) -> [u64; ALPHABET_CHART_LEN] {
        std::array::from_fn(|i| self.keys[ALPHABET_START + i])
    }

    /// Presses of `!` through `9`, which covers digits and the punctuation before them.
    pub fn symbols_chart(&self) -> [u64; SYMBOLS_CHART_LEN] {
        std::array::from_fn(|i| self.keys[SYMBOLS_START + i])
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        daemon::{counter::state::ActivityState, storage::entities::CountSnapshot},
        utils::time::MINUTES_PER_DAY,
    };

    use super::{MINUTES_CHART_LEN, SYMBOLS_CHART_LEN};

    fn state_with(snapshot: CountSnapshot) -> ActivityState {
        let mut state = ActivityState::new();
        state.total = snapshot.total;
        state.minutes = snapshot.minutes;
        state.keys = snapshot.keys;
        state
    }

    fn numbered_minutes() -> ActivityState {
        let mut snapshot = CountSnapshot::zeroed();
        for (slot, bucket) in snapshot.minutes.iter_mut().enumerate() {
            *bucket = slot as u64;
        }
        state_with(snapshot)
    }

    #[test]
    fn test_minutes_chart_contiguous_window() {
        let state = numbered_minutes();
        let chart = state.minutes_chart(630);

        assert_eq!(chart.len(), MINUTES_CHART_LEN);
        assert_eq!(chart[0], 610);
        assert_eq!(chart[MINUTES_CHART_LEN - 1], 630);
        assert!(chart.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_minutes_chart_wraps_midnight() {
        let state = numbered_minutes();
        let chart = state.minutes_chart(5);

        // Ten minutes before slot 5 is slot 1435.
        assert_eq!(chart[MINUTES_CHART_LEN - 1 - 10], 1435);
        assert_eq!(chart[0], 1425);
        assert_eq!(chart[14], 1439);
        assert_eq!(chart[15], 0);
        assert_eq!(chart[20], 5);
    }

    #[test]
    fn test_minutes_chart_at_first_slots() {
        let state = numbered_minutes();

        assert_eq!(state.minutes_chart(0)[20], 0);
        assert_eq!(state.minutes_chart(0)[19], MINUTES_PER_DAY as u64 - 1);
        assert_eq!(state.minutes_chart(20)[0], 0);
    }

    #[test]
    fn test_hours_chart_sums() {
        let state = numbered_minutes();
        let hours = state.hours_chart();

        for (h, value) in hours.iter().enumerate() {
            let expected: u64 = state.minutes()[h * 60..h * 60 + 60].iter().sum();
            assert_eq!(*value, expected);
        }
        assert_eq!(hours.iter().sum::<u64>(), state.minutes().iter().sum::<u64>());
    }

    #[test]
    fn test_key_charts() {
        let mut snapshot = CountSnapshot::zeroed();
        snapshot.keys[b'a' as usize] = 4;
        snapshot.keys[b'z' as usize] = 2;
        snapshot.keys[b'!' as usize] = 1;
        snapshot.keys[b'9' as usize] = 7;
        snapshot.keys[b':' as usize] = 100;
        let state = state_with(snapshot);

        let alphabet = state.alphabet_chart();
        assert_eq!(alphabet[0], 4);
        assert_eq!(alphabet[25], 2);
        assert_eq!(alphabet.iter().sum::<u64>(), 6);

        let symbols = state.symbols_chart();
        assert_eq!(symbols[0], 1);
        assert_eq!(symbols[SYMBOLS_CHART_LEN - 1], 7);
        assert_eq!(symbols.iter().sum::<u64>(), 8);
    }
}
