use thiserror::Error;

/// Outcome of a failed base-10 integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("field is empty")]
    Empty,
    #[error("field is not a base-10 integer")]
    NotNumeric,
    #[error("value does not fit a native integer")]
    OutOfRange,
    #[error("value does not fit a 32-bit integer")]
    OutOfIntRange,
}

/// Why an inbound datagram was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("message is not valid UTF-8")]
    NotUtf8,
    #[error("INIT message has no '|' after the username")]
    MissingUsernameDelimiter,
    #[error("INIT message has no '|' after the height")]
    MissingHeightDelimiter,
    #[error("INIT username is empty")]
    EmptyUsername,
    #[error("INIT username is {0} bytes, longer than {max}", max = crate::MAX_USERNAME_LEN)]
    UsernameTooLong(usize),
    #[error("INIT height: {0}")]
    Height(NumberError),
    #[error("INIT width: {0}")]
    Width(NumberError),
    #[error("message is neither QUIT, INIT nor a position batch")]
    UnrecognizedShape,
}
