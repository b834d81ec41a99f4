use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use module::EventProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, trace};

use crate::utils::clock::Clock;

use super::storage::key_event::KeyEvent;

pub mod module;
pub mod tally;

/// Represents the consumer of key events. Events and deadlines are handled one at a time on a
/// single loop, so the processor never sees concurrent calls.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<KeyEvent>,
    processor: Processor,
    clock: Box<dyn Clock>,
}

impl<P: EventProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<KeyEvent>, processor: P, clock: Box<dyn Clock>) -> Self {
        Self {
            receiver,
            processor,
            clock,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        loop {
            let deadline = self.processor.next_deadline();
            let clock = &self.clock;

            tokio::select! {
                event = self.receiver.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    trace!("Processing event {:?}", event);
                    if let Err(e) = self.processor.process_next(event).await {
                        error!("Error processing event {:?}: {e:?}", event)
                    }
                }
                _ = wait_for(clock.as_ref(), deadline) => {
                    let now = self.clock.time();
                    debug!("Deadline reached at {now}");
                    if let Err(e) = self.processor.on_deadline(now).await {
                        error!("Error handling deadline: {e:?}")
                    }
                }
            }
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}

/// Never resolves without a deadline.
async fn wait_for(clock: &dyn Clock, deadline: Option<DateTime<Local>>) {
    match deadline {
        Some(due) => {
            let remaining = (due - clock.time()).to_std().unwrap_or(Duration::ZERO);
            clock.sleep(remaining).await;
        }
        None => std::future::pending().await,
    }
}
