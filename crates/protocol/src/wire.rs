//! Close-delimited framing over TCP streams
//!
//! Frames carry no length prefix. The sender writes its bytes and shuts
//! down its write half; the receiver reads to end-of-stream under a
//! deadline. A connection therefore carries one frame per direction at
//! most.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use crate::error::ProtocolError;

/// Write a whole frame and close this side's write half.
pub async fn send_frame(stream: &mut TcpStream, frame: &[u8]) -> Result<(), ProtocolError> {
    stream.write_all(frame).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Read a whole frame, finishing when the peer closes its write half.
///
/// An empty result means the peer connected and said nothing; callers
/// treat that as a probe, not an error.
pub async fn read_frame(
    stream: &mut TcpStream,
    deadline: Duration,
) -> Result<Vec<u8>, ProtocolError> {
    let mut frame = Vec::new();
    match timeout(deadline, stream.read_to_end(&mut frame)).await {
        Ok(Ok(_)) => Ok(frame),
        Ok(Err(error)) => Err(ProtocolError::Io(error)),
        Err(_) => Err(ProtocolError::Timeout),
    }
}
