use std::io;
use thiserror::Error;

/// Unrecoverable client failures. Malformed server messages are not errors;
/// they are logged and dropped by the codec.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to create UDP socket: {0}")]
    Bind(#[source] io::Error),

    #[error("failed to send datagram: {0}")]
    Send(#[source] io::Error),

    #[error("failed to receive datagram: {0}")]
    Receive(#[source] io::Error),

    #[error("terminal error: {0}")]
    Terminal(#[source] io::Error),

    #[error("failed to open log file: {0}")]
    LogFile(#[source] io::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] io::Error),
}
