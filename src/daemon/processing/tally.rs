use anyhow::Result;
use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::{
    cli::output::label::format_count,
    daemon::{
        counter::ActivityCounter,
        reporting::scheduler::UploadScheduler,
        storage::{key_event::KeyEvent, snapshot_storage::SnapshotStore},
    },
};

use super::module::EventProcessor;

/// Bridges [ProcessingModule](super::ProcessingModule) with the counter, the storage and the
/// uploads. The counters are written to storage after every change.
pub struct TallyProcessor<S: SnapshotStore> {
    counter: ActivityCounter,
    store: S,
    uploads: UploadScheduler,
}

impl<S: SnapshotStore> TallyProcessor<S> {
    pub fn new(counter: ActivityCounter, store: S, uploads: UploadScheduler) -> Self {
        Self {
            counter,
            store,
            uploads,
        }
    }

    /// In-memory counters stay authoritative when writing fails; the next successful write
    /// catches the files up.
    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.counter.state().snapshot()).await {
            warn!("Failed to persist counters: {e:?}");
        }
    }
}

impl<S: SnapshotStore> EventProcessor for TallyProcessor<S> {
    async fn process_next(&mut self, event: KeyEvent) -> Result<()> {
        let outcome = self.counter.apply(&event);

        if outcome.minute_changed {
            info!("{}", format_count(outcome.total));
            self.uploads.maybe_upload(&outcome);
        }

        self.persist().await;
        Ok(())
    }

    fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.counter.tail_clear_due()
    }

    async fn on_deadline(&mut self, now: DateTime<Local>) -> Result<()> {
        if self.counter.clear_tail_if_due(now) {
            self.persist().await;
        }
        Ok(())
    }

    async fn finalize(&mut self) -> Result<()> {
        self.persist().await;
        Ok(())
    }
}
