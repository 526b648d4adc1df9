//! Fireline synchronization protocol
//!
//! The wire exchange between gun units and the FDC. Every message is one
//! short-lived TCP connection carrying `<2-byte flag><JSON payload>`; there
//! is no length prefix, the sender closes its write half and end-of-stream
//! delimits the frame. A connection carries exactly one request and at most
//! one reply.

#![warn(missing_docs)]

pub mod error;
pub mod message;
pub mod wire;

pub use error::ProtocolError;
pub use message::{EomAck, OrderStatus, Reply, Request, FLAG_EOM, FLAG_GUN, FLAG_TGT};
pub use wire::{read_frame, send_frame};
