use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace};

use crate::{daemon::storage::key_event::KeyEvent, key_source::KeySource, utils::clock::Clock};

/// Pulls key presses from a [KeySource], timestamps them and hands them over to processing.
/// Capturing runs independently from counting, the bounded channel is the only link between
/// them.
pub struct KeyCollectionModule {
    next: mpsc::Sender<KeyEvent>,
    source: Box<dyn KeySource>,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
}

impl KeyCollectionModule {
    pub fn new(
        next: mpsc::Sender<KeyEvent>,
        source: Box<dyn KeySource>,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            next,
            source,
            shutdown,
            clock,
        }
    }

    /// Executes the collector event loop. When the source runs dry or fails the whole daemon is
    /// asked to shut down, since there is nothing left to count.
    pub async fn run(mut self) -> Result<()> {
        let result = self.collect().await;
        self.shutdown.cancel();
        result
    }

    async fn collect(&mut self) -> Result<()> {
        loop {
            let key = tokio::select! {
                // Dropping the sender on return also stops the processing module.
                _ = self.shutdown.cancelled() => return Ok(()),
                key = self.source.next_key() => key,
            };

            match key {
                Ok(Some(key_code)) => {
                    let event = KeyEvent {
                        key_code,
                        timestamp: self.clock.time(),
                    };
                    trace!("Sending {:?}", event);
                    tokio::select! {
                        _ = self.shutdown.cancelled() => return Ok(()),
                        sent = self.next.send(event) => {
                            sent.inspect_err(|e| error!("Unexpected error during sending {e:?}"))?;
                        }
                    }
                }
                Ok(None) => {
                    info!("Key source is exhausted");
                    return Ok(());
                }
                Err(e) => {
                    error!("Key source failed {e:?}");
                    return Err(e);
                }
            }
        }
    }
}
