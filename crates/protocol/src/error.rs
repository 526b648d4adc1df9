//! Protocol error types

use thiserror::Error;

/// Failures while framing, encoding, or decoding protocol traffic.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Leading flag bytes not in the protocol's flag set.
    #[error("unknown message flag: {0:02X?}")]
    UnknownFlag([u8; 2]),

    /// Frame shorter than the two flag bytes.
    #[error("truncated frame")]
    Truncated,

    /// Payload did not decode as the expected record.
    #[error("bad payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Socket-level failure.
    #[error("connection failure: {0}")]
    Io(#[from] std::io::Error),

    /// The peer did not finish sending within the read deadline.
    #[error("read timed out")]
    Timeout,
}
