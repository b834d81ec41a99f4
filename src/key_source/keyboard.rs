//! System-wide key presses through `rdev`. On Linux this needs an X11 session; on macOS the
//! terminal running the daemon needs the accessibility permission.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rdev::{listen, EventType, Key};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error};

use super::KeySource;

/// Reported for keys without a character equivalent. Past the end of the histogram.
const UNMAPPED_KEY: u16 = 256;

/// `rdev::listen` blocks its thread for good, so it runs on a dedicated one and forwards key
/// codes over a channel.
pub struct KeyboardKeySource {
    keys: UnboundedReceiver<Result<u16>>,
}

impl KeyboardKeySource {
    pub fn start() -> Self {
        let (sender, keys) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let presses = sender.clone();
            let result = listen(move |event| {
                if let EventType::KeyPress(key) = event.event_type {
                    let _ = presses.send(Ok(key_code_for(key)));
                }
            });
            if let Err(e) = result {
                error!("Keyboard listener stopped {e:?}");
                let _ = sender.send(Err(anyhow!("Can't listen to the keyboard: {e:?}")));
            }
        });
        debug!("Listening to the keyboard");

        Self::from_receiver(keys)
    }

    fn from_receiver(keys: UnboundedReceiver<Result<u16>>) -> Self {
        Self { keys }
    }
}

#[async_trait]
impl KeySource for KeyboardKeySource {
    async fn next_key(&mut self) -> Result<Option<u16>> {
        self.keys.recv().await.transpose()
    }
}

/// Maps a key to the character it produces without modifiers on a US layout.
pub fn key_code_for(key: Key) -> u16 {
    let character = match key {
        Key::KeyA => b'a',
        Key::KeyB => b'b',
        Key::KeyC => b'c',
        Key::KeyD => b'd',
        Key::KeyE => b'e',
        Key::KeyF => b'f',
        Key::KeyG => b'g',
        Key::KeyH => b'h',
        Key::KeyI => b'i',
        Key::KeyJ => b'j',
        Key::KeyK => b'k',
        Key::KeyL => b'l',
        Key::KeyM => b'm',
        Key::KeyN => b'n',
        Key::KeyO => b'o',
        Key::KeyP => b'p',
        Key::KeyQ => b'q',
        Key::KeyR => b'r',
        Key::KeyS => b's',
        Key::KeyT => b't',
        Key::KeyU => b'u',
        Key::KeyV => b'v',
        Key::KeyW => b'w',
        Key::KeyX => b'x',
        Key::KeyY => b'y',
        Key::KeyZ => b'z',
        Key::Num0 | Key::Kp0 => b'0',
        Key::Num1 | Key::Kp1 => b'1',
        Key::Num2 | Key::Kp2 => b'2',
        Key::Num3 | Key::Kp3 => b'3',
        Key::Num4 | Key::Kp4 => b'4',
        Key::Num5 | Key::Kp5 => b'5',
        Key::Num6 | Key::Kp6 => b'6',
        Key::Num7 | Key::Kp7 => b'7',
        Key::Num8 | Key::Kp8 => b'8',
        Key::Num9 | Key::Kp9 => b'9',
        Key::Minus | Key::KpMinus => b'-',
        Key::Equal => b'=',
        Key::KpPlus => b'+',
        Key::KpMultiply => b'*',
        Key::Slash | Key::KpDivide => b'/',
        Key::LeftBracket => b'[',
        Key::RightBracket => b']',
        Key::SemiColon => b';',
        Key::Quote => b'\'',
        Key::BackQuote => b'`',
        Key::BackSlash | Key::IntlBackslash => b'\\',
        Key::Comma => b',',
        Key::Dot => b'.',
        Key::Space => b' ',
        Key::Tab => b'\t',
        Key::Return | Key::KpReturn => b'\r',
        Key::Backspace => 0x08,
        Key::Unknown(code) => {
            return u16::try_from(code)
                .map_or(u16::MAX, |code| code.saturating_add(UNMAPPED_KEY));
        }
        _ => return UNMAPPED_KEY,
    };
    character as u16
}
