use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::cli::output::leaderboard::render_leaderboard;

use super::{Leaderboard, UploadOutcome};

/// Consumes upload results and publishes the most recent leaderboard. Failed uploads leave the
/// previous leaderboard in place, and so does a late answer to an upload older than the one
/// already shown.
pub struct LeaderboardModule {
    outcomes: mpsc::Receiver<UploadOutcome>,
    snapshot: watch::Sender<Leaderboard>,
}

impl LeaderboardModule {
    pub fn new(outcomes: mpsc::Receiver<UploadOutcome>) -> (Self, watch::Receiver<Leaderboard>) {
        let (snapshot, receiver) = watch::channel(Leaderboard::default());
        (Self { outcomes, snapshot }, receiver)
    }

    /// Runs until every upload result sender is gone.
    pub async fn run(mut self) -> Result<()> {
        let mut shown: Option<u64> = None;
        while let Some(UploadOutcome { sequence, result }) = self.outcomes.recv().await {
            match result {
                Ok(_) if shown.is_some_and(|shown| sequence < shown) => {
                    debug!("Dropping leaderboard of upload {sequence}, a newer one is shown");
                }
                Ok(leaderboard) => {
                    shown = Some(sequence);
                    info!("Leaderboard updated\n{}", render_leaderboard(&leaderboard));
                    if let Some(leader) = leaderboard.leader() {
                        debug!("Leading today: {}", leader.profile_url());
                    }
                    self.snapshot.send_replace(leaderboard);
                }
                Err(e) => {
                    warn!("Upload failed, keeping previous leaderboard: {e}");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tokio::sync::mpsc;

    use crate::daemon::reporting::{
        test_leaderboard, Leaderboard, UploadError, UploadOutcome, UploadResult,
    };

    use super::LeaderboardModule;

    fn outcome(sequence: u64, result: UploadResult) -> UploadOutcome {
        UploadOutcome { sequence, result }
    }

    #[tokio::test]
    async fn test_failures_keep_previous_leaderboard() -> Result<()> {
        let (sender, receiver) = mpsc::channel(4);
        let (module, snapshot) = LeaderboardModule::new(receiver);

        sender.send(outcome(0, Ok(test_leaderboard()))).await?;
        sender.send(outcome(1, Err(UploadError::Status(500)))).await?;
        drop(sender);

        module.run().await?;

        assert_eq!(*snapshot.borrow(), test_leaderboard());
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_leaderboard_replaces_older() -> Result<()> {
        let (sender, receiver) = mpsc::channel(4);
        let (module, snapshot) = LeaderboardModule::new(receiver);

        sender.send(outcome(0, Ok(test_leaderboard()))).await?;
        sender.send(outcome(1, Ok(Leaderboard::default()))).await?;
        drop(sender);

        module.run().await?;

        assert_eq!(*snapshot.borrow(), Leaderboard::default());
        Ok(())
    }

    #[tokio::test]
    async fn test_late_answer_does_not_replace_newer_leaderboard() -> Result<()> {
        let (sender, receiver) = mpsc::channel(4);
        let (module, snapshot) = LeaderboardModule::new(receiver);

        sender.send(outcome(3, Ok(test_leaderboard()))).await?;
        sender.send(outcome(2, Ok(Leaderboard::default()))).await?;
        drop(sender);

        module.run().await?;

        assert_eq!(*snapshot.borrow(), test_leaderboard());
        Ok(())
    }
}
