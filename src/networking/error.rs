//! Error types for networking module
//!
//! [`TransportError`] covers the link and the outbound queue;
//! [`AckError`] is what an acknowledged request resolves to when the server
//! says no or answers with something unreadable.

use thiserror::Error;

/// Errors that can occur while talking to the relay server
#[derive(Error, Debug)]
pub enum TransportError {
    /// Server address could not be used
    #[error("Invalid server URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Join code is not six letters or digits
    #[error("Invalid join code {code:?}")]
    InvalidJoinCode { code: String },

    /// No async runtime to run the socket on
    #[error("Transport runtime unavailable: {0}")]
    Runtime(String),

    /// Connecting to the server failed
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The link has no open socket to write to
    #[error("Link closed")]
    Closed,

    /// Outbound frame could not be serialised
    #[error("Failed to encode frame: {0}")]
    Encode(#[source] serde_json::Error),

    /// Inbound frame could not be parsed
    #[error("Failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Failure of an acknowledged request
#[derive(Error, Debug)]
pub enum AckError {
    /// Server answered with `success: false`
    #[error("Request rejected: {reason}")]
    Rejected { reason: String },

    /// Server answered with a payload of the wrong shape
    #[error("Malformed acknowledgement: {0}")]
    Malformed(#[from] serde_json::Error),
}
