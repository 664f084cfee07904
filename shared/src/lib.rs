//! Wire protocol shared by the dotgrid client and its tests.
//!
//! The position-broadcast service speaks a small text protocol over UDP, one
//! message per datagram. This crate holds the typed view of that protocol and
//! the pure functions converting between it and raw bytes:
//!
//! - [`decode`] / [`parse`] turn an inbound datagram into an [`InboundMessage`]
//! - [`OutboundMessage::encode`] produces the bytes the client sends
//! - [`KeyScanner`] and [`encode_key`] turn raw keyboard bytes into intents

mod error;
mod keys;
mod wire;

pub use error::{DecodeError, NumberError};
pub use keys::{encode_key, KeyIntent, KeyScanner, KeyUnit, ESC, ETX, QUIT_KEY};
pub use wire::{decode, parse, parse_number};

/// Largest UDP payload. A receive buffer this size never truncates a datagram.
pub const MAX_DATAGRAM_SIZE: usize = 65_536;
/// Longest username accepted from the server, in bytes.
pub const MAX_USERNAME_LEN: usize = 99;

pub const INIT_REQUEST: &str = "INIT";
pub const INIT_PREFIX: &str = "INIT:";
pub const QUIT: &str = "QUIT";

/// One participant's location inside a position batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub username: String,
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(username: impl Into<String>, x: i32, y: i32) -> Self {
        Self {
            username: username.into(),
            x,
            y,
        }
    }
}

/// Messages received from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Init {
        username: String,
        height: i32,
        width: i32,
    },
    Quit,
    PositionBatch {
        entries: Vec<Position>,
    },
    /// The datagram could not be decoded. Never retried.
    Malformed,
}

impl InboundMessage {
    /// Server-side encoding of this message. `Malformed` has no wire form.
    pub fn encode(&self) -> Option<Vec<u8>> {
        match self {
            InboundMessage::Init {
                username,
                height,
                width,
            } => Some(format!("{INIT_PREFIX}{username}|{height}|{width}").into_bytes()),
            InboundMessage::Quit => Some(QUIT.as_bytes().to_vec()),
            InboundMessage::PositionBatch { entries } => {
                let mut out = String::new();
                for entry in entries {
                    out.push_str(&format!("({}, {}, {})", entry.username, entry.x, entry.y));
                }
                Some(out.into_bytes())
            }
            InboundMessage::Malformed => None,
        }
    }
}

/// A single interpreted keypress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Right,
    Left,
    Char(char),
}

impl Key {
    pub fn label(&self) -> String {
        match self {
            Key::Up => "Up".to_string(),
            Key::Down => "Down".to_string(),
            Key::Right => "Right".to_string(),
            Key::Left => "Left".to_string(),
            Key::Char(c) => format!("Key pressed: {c}"),
        }
    }
}

/// Messages the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    InitRequest,
    QuitNotice,
    KeyPress(Key),
}

impl OutboundMessage {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            OutboundMessage::InitRequest => INIT_REQUEST.as_bytes().to_vec(),
            OutboundMessage::QuitNotice => QUIT.as_bytes().to_vec(),
            OutboundMessage::KeyPress(key) => key.label().into_bytes(),
        }
    }
}
