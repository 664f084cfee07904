//! Decoding of server datagrams

use crate::error::{DecodeError, NumberError};
use crate::{InboundMessage, Position, INIT_PREFIX, MAX_USERNAME_LEN, QUIT};
use log::{debug, warn};
use std::num::IntErrorKind;

/// Decodes one datagram, logging and collapsing any failure into `Malformed`.
pub fn decode(datagram: &[u8]) -> InboundMessage {
    match parse(datagram) {
        Ok(message) => message,
        Err(e) => {
            warn!("Discarding malformed message: {}", e);
            InboundMessage::Malformed
        }
    }
}

/// Decodes one datagram, reporting why it was rejected.
pub fn parse(datagram: &[u8]) -> Result<InboundMessage, DecodeError> {
    let text = std::str::from_utf8(datagram).map_err(|_| DecodeError::NotUtf8)?;

    if text == QUIT {
        return Ok(InboundMessage::Quit);
    }

    if let Some(body) = text.strip_prefix(INIT_PREFIX) {
        return parse_init(body);
    }

    if !text.is_empty() && !text.contains('(') {
        return Err(DecodeError::UnrecognizedShape);
    }

    Ok(InboundMessage::PositionBatch {
        entries: parse_positions(text),
    })
}

/// `<username>|<height>|<width>`, everything after the `INIT:` prefix.
fn parse_init(body: &str) -> Result<InboundMessage, DecodeError> {
    let (username, rest) = body
        .split_once('|')
        .ok_or(DecodeError::MissingUsernameDelimiter)?;

    if username.is_empty() {
        return Err(DecodeError::EmptyUsername);
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(DecodeError::UsernameTooLong(username.len()));
    }

    let (height, width) = rest
        .split_once('|')
        .ok_or(DecodeError::MissingHeightDelimiter)?;

    let height = parse_number(height).map_err(DecodeError::Height)?;
    let width = parse_number(width).map_err(DecodeError::Width)?;

    Ok(InboundMessage::Init {
        username: username.to_string(),
        height,
        width,
    })
}

/// Parses a whole field as a base-10 `i32`.
///
/// Leading ASCII whitespace and a sign are accepted; anything after the digits
/// is not. Values are first read at native width so that an overflowing field
/// and a field outside `i32` are reported separately.
pub fn parse_number(field: &str) -> Result<i32, NumberError> {
    let digits = field.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    let wide = digits.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => NumberError::OutOfRange,
        IntErrorKind::Empty => NumberError::Empty,
        _ => NumberError::NotNumeric,
    })?;

    i32::try_from(wide).map_err(|_| NumberError::OutOfIntRange)
}

/// Every well-formed `(username, x, y)` group, in message order.
fn parse_positions(text: &str) -> Vec<Position> {
    text.split(['(', ')'])
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let position = parse_position(token);
            if position.is_none() {
                debug!("Skipping malformed position group {:?}", token);
            }
            position
        })
        .collect()
}

fn parse_position(token: &str) -> Option<Position> {
    let (username, coords) = token.split_once(',')?;
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return None;
    }

    let (x, y) = coords.split_once(',')?;
    let x = parse_number(x).ok()?;
    let y = parse_number(y.trim_end()).ok()?;

    Some(Position::new(username, x, y))
}
