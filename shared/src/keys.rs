//! Keyboard byte scanning and key-to-message mapping

use crate::{Key, OutboundMessage};
use std::collections::VecDeque;

pub const ESC: u8 = 0x1b;
/// Ctrl-C as delivered by a terminal in raw mode.
pub const ETX: u8 = 0x03;
/// Quits locally without a keypress message.
pub const QUIT_KEY: u8 = b'q';

/// One complete keyboard event as read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUnit {
    Byte(u8),
    /// The two bytes following an ESC.
    Escape([u8; 2]),
}

/// What a key unit asks the client to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyIntent {
    Send(OutboundMessage),
    Cancel,
    Ignore,
}

/// Splits a raw keyboard byte stream into key units.
///
/// Bytes arrive in arbitrary chunks, so an escape sequence may be split across
/// reads. Incomplete sequences stay pending until the rest arrives.
#[derive(Debug, Default)]
pub struct KeyScanner {
    pending: VecDeque<u8>,
}

impl KeyScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Next complete unit, or `None` if nothing complete is buffered.
    pub fn next_unit(&mut self) -> Option<KeyUnit> {
        let first = *self.pending.front()?;

        if first != ESC {
            self.pending.pop_front();
            return Some(KeyUnit::Byte(first));
        }

        if self.pending.len() < 3 {
            return None;
        }

        self.pending.pop_front();
        let introducer = self.pending.pop_front()?;
        let code = self.pending.pop_front()?;
        Some(KeyUnit::Escape([introducer, code]))
    }

    /// Drops a trailing partial escape sequence once the stream has ended.
    /// Returns the number of bytes discarded.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

pub fn encode_key(unit: KeyUnit) -> KeyIntent {
    match unit {
        KeyUnit::Escape([b'[', code]) => match code {
            b'A' => KeyIntent::Send(OutboundMessage::KeyPress(Key::Up)),
            b'B' => KeyIntent::Send(OutboundMessage::KeyPress(Key::Down)),
            b'C' => KeyIntent::Send(OutboundMessage::KeyPress(Key::Right)),
            b'D' => KeyIntent::Send(OutboundMessage::KeyPress(Key::Left)),
            _ => KeyIntent::Ignore,
        },
        KeyUnit::Escape(_) => KeyIntent::Ignore,
        KeyUnit::Byte(QUIT_KEY) | KeyUnit::Byte(ETX) => KeyIntent::Cancel,
        KeyUnit::Byte(b) if b == b' ' || b.is_ascii_graphic() => {
            KeyIntent::Send(OutboundMessage::KeyPress(Key::Char(b as char)))
        }
        KeyUnit::Byte(_) => KeyIntent::Ignore,
    }
}
