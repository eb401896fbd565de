//! Error types for hsmprobe
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using ProbeError
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Unified error type for hsmprobe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Command Building Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Command body of {len} bytes exceeds the 65535 byte frame capacity")]
    Oversize { len: usize },

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Truncated frame: {len} bytes received, at least 2 required")]
    TruncatedFrame { len: usize },

    #[error("Length mismatch: prefix declares {declared} bytes, {actual} received")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Verb mismatch: expected {expected}, received {returned}")]
    VerbMismatch { expected: String, returned: String },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("TLS error: {0}")]
    Tls(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown protocol '{0}': expected tcp, udp or tls")]
    UnknownProtocol(String),
}

impl From<openssl::error::ErrorStack> for ProbeError {
    fn from(err: openssl::error::ErrorStack) -> Self {
        ProbeError::Tls(err.to_string())
    }
}
