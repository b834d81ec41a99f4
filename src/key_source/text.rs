use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use super::KeySource;

/// Treats every character of a text stream, line breaks included, as one key press. The code of
/// a key is the character's scalar value, so anything outside of Latin-1 ends up past the
/// histogram and only counts towards the total.
pub struct TextKeySource<R> {
    reader: BufReader<R>,
    pending: VecDeque<u16>,
    line: Vec<u8>,
}

impl<R: AsyncRead + Unpin + Send> TextKeySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: VecDeque::new(),
            line: Vec::new(),
        }
    }
}

pub fn char_key_code(c: char) -> u16 {
    u16::try_from(u32::from(c)).unwrap_or(u16::MAX)
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> KeySource for TextKeySource<R> {
    async fn next_key(&mut self) -> Result<Option<u16>> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(key));
            }

            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(String::from_utf8_lossy(&self.line).chars().map(char_key_code));
        }
    }
}
