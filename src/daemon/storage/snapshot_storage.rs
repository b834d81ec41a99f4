use std::{
    future::Future,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::fs::operations::{read_if_modified_on, write_atomic};

use super::entities::{
    decode_buckets, decode_total, encode_buckets, encode_total, CountSnapshot, PartialSnapshot,
};

pub const TOTAL_FILE_NAME: &str = ".keyrace.tmp";
pub const MINUTES_FILE_NAME: &str = ".keyrace.minutes.tmp";
pub const KEYS_FILE_NAME: &str = ".keyrace.histogram.tmp";

/// Interface for abstracting storage of the daily counters.
pub trait SnapshotStore {
    /// Writes every artifact. A failure of one artifact doesn't stop the others from being
    /// written.
    fn save(&self, snapshot: &CountSnapshot) -> impl Future<Output = Result<()>>;

    /// Loads whatever was written on `today`. Unreadable or stale artifacts are treated as
    /// absent.
    fn load(&self, today: NaiveDate) -> impl Future<Output = PartialSnapshot>;
}

/// The main realization of [SnapshotStore]. Keeps the artifacts as plain text files at fixed
/// names inside a directory, which is the home directory outside of tests.
pub struct FileSnapshotStore {
    total_path: PathBuf,
    minutes_path: PathBuf,
    keys_path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            total_path: dir.join(TOTAL_FILE_NAME),
            minutes_path: dir.join(MINUTES_FILE_NAME),
            keys_path: dir.join(KEYS_FILE_NAME),
        }
    }

    async fn read_fresh(path: &Path, today: NaiveDate) -> Option<String> {
        match read_if_modified_on(path, today).await {
            Ok(Some(contents)) => Some(contents),
            Ok(None) => {
                debug!("No data for {today} in {path:?}");
                None
            }
            Err(e) => {
                warn!("Failed to read {path:?}, treating it as empty: {e}");
                None
            }
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn save(&self, snapshot: &CountSnapshot) -> Result<()> {
        let artifacts = [
            (&self.total_path, encode_total(snapshot.total)),
            (&self.minutes_path, encode_buckets(snapshot.minutes.as_slice())),
            (&self.keys_path, encode_buckets(snapshot.keys.as_slice())),
        ];

        let mut failed = vec![];
        for (path, contents) in artifacts {
            if let Err(e) = write_atomic(path, contents.as_bytes()).await {
                warn!("Could not write {path:?}: {e}");
                failed.push(path.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Failed to write {failed:?}"))
        }
    }

    async fn load(&self, today: NaiveDate) -> PartialSnapshot {
        let total = Self::read_fresh(&self.total_path, today)
            .await
            .map(|text| decode_total(&text));
        let minutes = Self::read_fresh(&self.minutes_path, today)
            .await
            .map(|text| decode_buckets(&text));
        let keys = Self::read_fresh(&self.keys_path, today)
            .await
            .map(|text| decode_buckets(&text));

        PartialSnapshot {
            total,
            minutes,
            keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs::FileTimes, time::SystemTime};

    use anyhow::Result;
    use chrono::{Days, Local};
    use tempfile::tempdir;

    use crate::daemon::storage::entities::{CountSnapshot, PartialSnapshot};

    use super::{FileSnapshotStore, SnapshotStore, KEYS_FILE_NAME, MINUTES_FILE_NAME, TOTAL_FILE_NAME};

    fn sample_snapshot() -> CountSnapshot {
        let mut snapshot = CountSnapshot::zeroed();
        snapshot.total = 4;
        snapshot.minutes[630] = 3;
        snapshot.minutes[631] = 1;
        snapshot.keys[97] = 3;
        snapshot.keys[98] = 1;
        snapshot
    }

    #[tokio::test]
    async fn test_save_load_same_day() -> Result<()> {
        let dir = tempdir()?;
        let store = FileSnapshotStore::new(dir.path());
        let snapshot = sample_snapshot();

        store.save(&snapshot).await?;
        let loaded = store.load(Local::now().date_naive()).await;

        assert_eq!(loaded.total, Some(4));
        assert_eq!(loaded.into_snapshot(), snapshot);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_other_day_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let store = FileSnapshotStore::new(dir.path());
        store.save(&sample_snapshot()).await?;

        let tomorrow = Local::now()
            .date_naive()
            .checked_add_days(Days::new(1))
            .unwrap();
        assert_eq!(store.load(tomorrow).await, PartialSnapshot::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_files() -> Result<()> {
        let dir = tempdir()?;
        let store = FileSnapshotStore::new(dir.path());

        let loaded = store.load(Local::now().date_naive()).await;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_artifacts_expire_independently() -> Result<()> {
        let dir = tempdir()?;
        let store = FileSnapshotStore::new(dir.path());
        store.save(&sample_snapshot()).await?;

        let two_days_ago = SystemTime::now() - std::time::Duration::from_secs(2 * 24 * 60 * 60);
        let minutes = std::fs::File::options()
            .write(true)
            .open(dir.path().join(MINUTES_FILE_NAME))?;
        minutes.set_times(FileTimes::new().set_modified(two_days_ago))?;

        let loaded = store.load(Local::now().date_naive()).await;
        assert_eq!(loaded.total, Some(4));
        assert_eq!(loaded.minutes, None);
        assert_eq!(loaded.keys.map(|keys| keys[97]), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_corrupted_values() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join(TOTAL_FILE_NAME), "not a number")?;
        std::fs::write(dir.path().join(MINUTES_FILE_NAME), "1,2,oops,4")?;
        std::fs::write(dir.path().join(KEYS_FILE_NAME), "")?;
        let store = FileSnapshotStore::new(dir.path());

        let loaded = store.load(Local::now().date_naive()).await;

        assert_eq!(loaded.total, Some(0));
        let minutes = loaded.minutes.unwrap();
        assert_eq!(&minutes[..5], &[1u64, 2, 0, 4, 0]);
        assert!(loaded.keys.unwrap().iter().all(|v| *v == 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() -> Result<()> {
        let dir = tempdir()?;
        let store = FileSnapshotStore::new(&dir.path().join("gone"));

        assert!(store.save(&sample_snapshot()).await.is_err());
        Ok(())
    }
}
