//! Contains the ways key presses get into keyrace. [open_key_source] picks an implementation
//! based on the command line.

#[cfg(feature = "keyboard")]
pub mod keyboard;
pub mod text;

use anyhow::Result;
use async_trait::async_trait;
use clap::ValueEnum;

/// Intended to serve as a contract every capture mechanism must implement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeySource: Send {
    /// Waits for the next key-down and returns its code. `None` means the source is exhausted.
    async fn next_key(&mut self) -> Result<Option<u16>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Every character typed into standard input is a key press.
    Stdin,
    /// System-wide key presses. Requires the `keyboard` feature.
    Keyboard,
}

impl SourceKind {
    pub fn as_arg(&self) -> &'static str {
        match self {
            SourceKind::Stdin => "stdin",
            SourceKind::Keyboard => "keyboard",
        }
    }
}

pub fn open_key_source(kind: SourceKind) -> Result<Box<dyn KeySource>> {
    match kind {
        SourceKind::Stdin => Ok(Box::new(text::TextKeySource::new(tokio::io::stdin()))),
        SourceKind::Keyboard => {
            cfg_if::cfg_if! {
                if #[cfg(feature = "keyboard")] {
                    Ok(Box::new(keyboard::KeyboardKeySource::start()))
                } else {
                    Err(anyhow::anyhow!("keyrace was built without the `keyboard` feature"))
                }
            }
        }
    }
}
