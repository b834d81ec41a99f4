use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info_span, Instrument};

use crate::{config::SettingsSource, daemon::counter::ApplyOutcome};

use super::{CountReport, ReportingClient, UploadError, UploadOutcome};

/// Decides when the total is pushed to the leaderboard and runs the pushes in the background.
/// Results are reported through the outcome channel, so a failed or slow upload never reaches
/// the key processing path.
pub struct UploadScheduler {
    client: Arc<dyn ReportingClient>,
    settings: Arc<dyn SettingsSource>,
    outcomes: mpsc::Sender<UploadOutcome>,
    next_sequence: AtomicU64,
}

impl UploadScheduler {
    pub fn new(
        client: Arc<dyn ReportingClient>,
        settings: Arc<dyn SettingsSource>,
        outcomes: mpsc::Sender<UploadOutcome>,
    ) -> Self {
        Self {
            client,
            settings,
            outcomes,
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Uploads once per minute: only events that opened a new minute slot trigger anything.
    pub fn maybe_upload(&self, outcome: &ApplyOutcome) -> Option<JoinHandle<()>> {
        if !outcome.minute_changed {
            return None;
        }
        self.upload(outcome.total)
    }

    /// Starts an upload of `count` unless there is no credential to upload with.
    pub fn upload(&self, count: u64) -> Option<JoinHandle<()>> {
        let settings = self.settings.current();
        let timeout = settings.upload_timeout();
        let Some(token) = settings.token else {
            debug!("No credential available, skipping upload");
            return None;
        };

        let report = CountReport {
            count,
            only_follows: settings.only_follows,
            token,
        };
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let client = self.client.clone();
        let outcomes = self.outcomes.clone();

        let task = async move {
            // Abandoned attempts are retried implicitly by the next minute's upload.
            let result = match tokio::time::timeout(timeout, client.upload(report)).await {
                Ok(result) => result,
                Err(_) => Err(UploadError::Timeout(timeout)),
            };
            if outcomes.send(UploadOutcome { sequence, result }).await.is_err() {
                debug!("Nobody is listening for upload results");
            }
        };
        Some(tokio::spawn(task.instrument(info_span!("Uploading count", count))))
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use anyhow::Result;
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use tokio::sync::mpsc;

    use crate::{
        config::{MockSettingsSource, Settings},
        daemon::{
            counter::ApplyOutcome,
            reporting::{
                test_leaderboard, CountReport, MockReportingClient, ReportingClient, UploadError,
                UploadOutcome, UploadResult,
            },
        },
        utils::logging::TEST_LOGGING,
    };

    use super::UploadScheduler;

    fn settings(token: Option<&str>, only_follows: bool) -> MockSettingsSource {
        let settings = Settings {
            token: token.map(String::from),
            only_follows,
            ..Default::default()
        };
        let mut source = MockSettingsSource::new();
        source.expect_current().returning(move || settings.clone());
        source
    }

    fn outcome(total: u64, minute_changed: bool) -> ApplyOutcome {
        ApplyOutcome {
            total,
            minute_changed,
            rolled_over: false,
        }
    }

    #[tokio::test]
    async fn test_upload_on_new_minute() -> Result<()> {
        *TEST_LOGGING;
        let mut client = MockReportingClient::new();
        client
            .expect_upload()
            .with(eq(CountReport {
                count: 12,
                only_follows: true,
                token: "secret".into(),
            }))
            .times(1)
            .returning(|_| Ok(test_leaderboard()));
        let (sender, mut receiver) = mpsc::channel(4);
        let scheduler =
            UploadScheduler::new(Arc::new(client), Arc::new(settings(Some("secret"), true)), sender);

        let task = scheduler.maybe_upload(&outcome(12, true));
        task.expect("upload should be dispatched").await?;

        let outcome = receiver.recv().await.unwrap();
        assert_eq!(outcome.sequence, 0);
        assert_eq!(outcome.result?, test_leaderboard());
        Ok(())
    }

    #[tokio::test]
    async fn test_no_upload_within_same_minute() {
        let mut client = MockReportingClient::new();
        client.expect_upload().never();
        let (sender, _receiver) = mpsc::channel(4);
        let scheduler =
            UploadScheduler::new(Arc::new(client), Arc::new(settings(Some("secret"), false)), sender);

        assert!(scheduler.maybe_upload(&outcome(12, false)).is_none());
    }

    #[tokio::test]
    async fn test_no_upload_without_credential() {
        let mut client = MockReportingClient::new();
        client.expect_upload().never();
        let (sender, mut receiver) = mpsc::channel(4);
        let scheduler = UploadScheduler::new(Arc::new(client), Arc::new(settings(None, false)), sender);

        assert!(scheduler.maybe_upload(&outcome(12, true)).is_none());
        drop(scheduler);
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_reported() -> Result<()> {
        let mut client = MockReportingClient::new();
        client
            .expect_upload()
            .returning(|_| Err(UploadError::Status(503)));
        let (sender, mut receiver) = mpsc::channel(4);
        let scheduler =
            UploadScheduler::new(Arc::new(client), Arc::new(settings(Some("secret"), false)), sender);

        scheduler.upload(3).expect("upload should be dispatched").await?;

        assert!(matches!(
            receiver.recv().await,
            Some(UploadOutcome {
                result: Err(UploadError::Status(503)),
                ..
            })
        ));
        Ok(())
    }

    struct HangingClient;

    #[async_trait]
    impl ReportingClient for HangingClient {
        async fn upload(&self, _report: CountReport) -> UploadResult {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(test_leaderboard())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_upload_times_out() -> Result<()> {
        let (sender, mut receiver) = mpsc::channel(4);
        let scheduler = UploadScheduler::new(
            Arc::new(HangingClient),
            Arc::new(settings(Some("secret"), false)),
            sender,
        );

        scheduler.upload(3).expect("upload should be dispatched").await?;

        assert!(matches!(
            receiver.recv().await,
            Some(UploadOutcome {
                result: Err(UploadError::Timeout(d)),
                ..
            }) if d == Duration::from_secs(5)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_uploads_are_numbered_in_start_order() -> Result<()> {
        let mut client = MockReportingClient::new();
        client.expect_upload().returning(|_| Ok(test_leaderboard()));
        let (sender, mut receiver) = mpsc::channel(4);
        let scheduler =
            UploadScheduler::new(Arc::new(client), Arc::new(settings(Some("secret"), false)), sender);

        for count in [1, 2, 3] {
            scheduler.upload(count).expect("upload should be dispatched").await?;
        }
        drop(scheduler);

        let mut sequences = vec![];
        while let Some(outcome) = receiver.recv().await {
            sequences.push(outcome.sequence);
        }
        assert_eq!(sequences, vec![0, 1, 2]);
        Ok(())
    }
}
