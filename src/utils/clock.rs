use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Represents an entity responsible for providing the current time across the application.
/// Counting happens in local time, since "today" is whatever the user's wall clock says.
#[async_trait]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Local>;

    async fn sleep(&self, duration: Duration);
}

pub struct DefaultClock;

#[async_trait]
impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that starts at a fixed moment and advances together with tokio's clock. With paused
/// tokio time this lets tests jump over hours in an instant.
#[cfg(test)]
#[derive(Clone)]
pub struct TestClock {
    pub start_time: DateTime<Local>,
    pub reference: tokio::time::Instant,
}

#[cfg(test)]
impl TestClock {
    pub fn starting_at(start_time: DateTime<Local>) -> Self {
        Self {
            start_time,
            reference: tokio::time::Instant::now(),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Clock for TestClock {
    fn time(&self) -> DateTime<Local> {
        self.start_time + self.reference.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
