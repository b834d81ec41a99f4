use crate::utils::time::MINUTES_PER_DAY;

/// Number of slots in the key histogram. Codes at or above this value are not tracked.
pub const KEY_CODES: usize = 256;

pub type MinuteBuckets = [u64; MINUTES_PER_DAY];
pub type KeyBuckets = [u64; KEY_CODES];

/// Full copy of the counters as they are written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSnapshot {
    pub total: u64,
    pub minutes: Box<MinuteBuckets>,
    pub keys: Box<KeyBuckets>,
}

impl CountSnapshot {
    pub fn zeroed() -> Self {
        Self {
            total: 0,
            minutes: Box::new([0; MINUTES_PER_DAY]),
            keys: Box::new([0; KEY_CODES]),
        }
    }
}

/// Result of loading the artifacts. Every field is checked for freshness on its own, so any
/// subset of them may be missing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PartialSnapshot {
    pub total: Option<u64>,
    pub minutes: Option<Box<MinuteBuckets>>,
    pub keys: Option<Box<KeyBuckets>>,
}

impl PartialSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total.is_none() && self.minutes.is_none() && self.keys.is_none()
    }

    /// Fills whatever wasn't loaded with zeros.
    pub fn into_snapshot(self) -> CountSnapshot {
        let zero = CountSnapshot::zeroed();
        CountSnapshot {
            total: self.total.unwrap_or(zero.total),
            minutes: self.minutes.unwrap_or(zero.minutes),
            keys: self.keys.unwrap_or(zero.keys),
        }
    }
}

pub fn encode_total(total: u64) -> String {
    total.to_string()
}

pub fn encode_buckets(buckets: &[u64]) -> String {
    buckets
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Garbage is read as zero, the same way an absent file is.
pub fn decode_total(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

/// Parses comma separated counts into a fixed number of buckets. Unparsable tokens become zero,
/// missing trailing tokens stay zero and extra tokens are dropped.
pub fn decode_buckets<const N: usize>(text: &str) -> Box<[u64; N]> {
    let mut buckets = Box::new([0; N]);
    let text = text.trim();
    if text.is_empty() {
        return buckets;
    }
    for (bucket, token) in buckets.iter_mut().zip(text.split(',')) {
        *bucket = token.trim().parse().unwrap_or(0);
    }
    buckets
}
