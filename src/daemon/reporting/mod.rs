//! Reporting of the daily total to the leaderboard service.
//!
//! [UploadScheduler](scheduler::UploadScheduler) fires uploads without blocking key processing,
//! [ReportingClient] talks to the service, and [LeaderboardModule](leaderboard::LeaderboardModule)
//! keeps the latest leaderboard that was received.

pub mod http;
pub mod leaderboard;
pub mod scheduler;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub username: String,
    /// Avatar URL.
    pub gravatar: String,
    pub score: i64,
}

impl Player {
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.username)
    }
}

/// Players in rank order, the leader first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub players: Vec<Player>,
}

impl Leaderboard {
    pub fn leader(&self) -> Option<&Player> {
        self.players.first()
    }

    /// Players paired with their 1-based rank.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &Player)> {
        self.players.iter().enumerate().map(|(i, p)| (i + 1, p))
    }
}

/// Everything a single upload sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountReport {
    pub count: u64,
    pub only_follows: bool,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload took longer than {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("leaderboard is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub type UploadResult = Result<Leaderboard, UploadError>;

/// An upload result tagged with the order in which its upload was started. Uploads run
/// concurrently, so results can arrive out of that order.
#[derive(Debug)]
pub struct UploadOutcome {
    pub sequence: u64,
    pub result: UploadResult,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportingClient: Send + Sync + 'static {
    async fn upload(&self, report: CountReport) -> UploadResult;
}

#[cfg(test)]
pub(crate) fn test_leaderboard() -> Leaderboard {
    Leaderboard {
        players: vec![
            Player {
                username: "octocat".into(),
                gravatar: "https://avatars.example/octocat.png".into(),
                score: 9000,
            },
            Player {
                username: "hubot".into(),
                gravatar: "https://avatars.example/hubot.png".into(),
                score: 120,
            },
        ],
    }
}
