//! Protocol codec
//!
//! Frame encoding and decoding.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Len (2)  │              Body (Len bytes)           │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//! `Len` is an unsigned big-endian 16-bit integer.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProbeError, Result};

/// Size of the length prefix
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest body a frame can carry
pub const MAX_BODY_SIZE: usize = u16::MAX as usize;

/// A decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Declared body length
    pub length: u16,

    /// Body, exactly `length` bytes
    pub body: Bytes,
}

/// Prefix `body` with its length
pub fn encode_frame(body: &[u8]) -> Result<Bytes> {
    let len = u16::try_from(body.len()).map_err(|_| ProbeError::Oversize { len: body.len() })?;

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + body.len());
    frame.put_u16(len);
    frame.put_slice(body);
    Ok(frame.freeze())
}

/// Decode a complete frame
///
/// The declared length is checked against the bytes actually received
/// before it is used.
pub fn decode_frame(raw: &[u8]) -> Result<Frame> {
    let declared = declared_length(raw).ok_or(ProbeError::TruncatedFrame { len: raw.len() })?;

    let actual = raw.len() - LENGTH_PREFIX_SIZE;
    if actual != declared as usize {
        return Err(ProbeError::LengthMismatch {
            declared: declared as usize,
            actual,
        });
    }

    Ok(Frame {
        length: declared,
        body: Bytes::copy_from_slice(&raw[LENGTH_PREFIX_SIZE..]),
    })
}

/// Read the big-endian length prefix, if present
pub fn declared_length(raw: &[u8]) -> Option<u16> {
    match raw {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
