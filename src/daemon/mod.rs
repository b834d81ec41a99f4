use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use collection::collector::KeyCollectionModule;
use counter::{state::ActivityState, ActivityCounter};
use processing::{tally::TallyProcessor, ProcessingModule};
use reporting::{
    http::HttpReportingClient, leaderboard::LeaderboardModule, scheduler::UploadScheduler,
    ReportingClient, UploadOutcome,
};
use storage::{
    key_event::KeyEvent,
    snapshot_storage::{FileSnapshotStore, SnapshotStore},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    config::{SettingsFile, SettingsSource},
    key_source::KeySource,
    utils::clock::{Clock, DefaultClock},
};

pub mod args;
pub mod collection;
pub mod counter;
pub mod processing;
pub mod reporting;
pub mod shutdown;
pub mod storage;

/// Key presses waiting to be counted. Capturing blocks once this many are queued.
const EVENT_BUFFER: usize = 256;
const OUTCOME_BUFFER: usize = 8;

pub struct DaemonPaths {
    /// Logs and settings.
    pub app_dir: PathBuf,
    /// The three count files.
    pub counts_dir: PathBuf,
}

/// Represents the starting point for the daemon
pub async fn start_daemon(paths: DaemonPaths, source: Box<dyn KeySource>) -> Result<()> {
    let settings = Arc::new(SettingsFile::in_dir(&paths.app_dir));
    let initial = settings.current();
    let client = HttpReportingClient::new(&initial.host, initial.upload_timeout())?;

    let (sender, receiver) = mpsc::channel::<KeyEvent>(EVENT_BUFFER);
    let (outcome_sender, outcome_receiver) = mpsc::channel::<UploadOutcome>(OUTCOME_BUFFER);

    let shutdown_token = CancellationToken::new();

    let collector = create_collector(sender, source, &shutdown_token, DefaultClock);

    let uploads = UploadScheduler::new(Arc::new(client), settings, outcome_sender);
    let processor = create_processor(
        FileSnapshotStore::new(&paths.counts_dir),
        receiver,
        uploads,
        DefaultClock,
    )
    .await;

    let (leaderboard, _) = LeaderboardModule::new(outcome_receiver);

    info!("Counting keys into {:?}", paths.counts_dir);
    let (_, collection_result, processing_result, leaderboard_result) = tokio::join!(
        shutdown::detect_shutdown(shutdown_token),
        collector.run(),
        processor.run(),
        leaderboard.run(),
    );

    if let Err(collection_result) = collection_result {
        error!("Collection module got an error {:?}", collection_result);
    }

    if let Err(processing_result) = processing_result {
        error!("Processing module got an error {:?}", processing_result);
    }

    if let Err(leaderboard_result) = leaderboard_result {
        error!("Leaderboard module got an error {:?}", leaderboard_result);
    }

    Ok(())
}

fn create_collector(
    sender: mpsc::Sender<KeyEvent>,
    source: Box<dyn KeySource>,
    shutdown_token: &CancellationToken,
    clock: impl Clock,
) -> KeyCollectionModule {
    KeyCollectionModule::new(sender, source, shutdown_token.clone(), Box::new(clock))
}

/// Restores today's counters from `store` and reports them right away, so the leaderboard is
/// fresh even before the first key press.
async fn create_processor<S: SnapshotStore>(
    store: S,
    receiver: mpsc::Receiver<KeyEvent>,
    uploads: UploadScheduler,
    clock: impl Clock,
) -> ProcessingModule<TallyProcessor<S>> {
    let now = clock.time();
    let today = now.date_naive();
    let state = ActivityState::restore(store.load(today).await, today);
    info!("Restored {} keys for {today}", state.total());

    uploads.upload(state.total());

    let processor = TallyProcessor::new(ActivityCounter::resume(state, now), store, uploads);
    ProcessingModule::new(receiver, processor, Box::new(clock))
}

/// Builds the client used by the one-shot `upload` command.
pub fn create_reporting_client(settings: &dyn SettingsSource) -> Result<impl ReportingClient> {
    let settings = settings.current();
    HttpReportingClient::new(&settings.host, settings.upload_timeout())
}
