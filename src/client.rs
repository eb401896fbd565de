//! Client
//!
//! Runs one request/response cycle: frame the command, send it, validate
//! the reply and optionally decode it.

use std::fmt;

use bytes::Bytes;

use crate::config::Config;
use crate::decoder::{self, is_printable, DecodedResponse};
use crate::error::Result;
use crate::network::{RoundTrip, Transport};
use crate::protocol::{decode_frame, encode_frame, validate, Command, Validation, LENGTH_PREFIX_SIZE};

/// Sends the configured command over a transport
pub struct Client<T = Transport> {
    transport: T,

    /// Command built once for the whole run
    command: Command,

    /// Framed command bytes
    frame: Bytes,

    header_len: usize,
    decode: bool,
}

impl Client<Transport> {
    /// Build the command and a socket transport from `config`
    pub fn connect(config: &Config) -> Result<Self> {
        let transport = Transport::new(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: RoundTrip> Client<T> {
    /// Build the command and use `transport` for the exchanges
    ///
    /// Encoding and oversize errors surface here, before any network
    /// activity.
    pub fn with_transport(config: &Config, transport: T) -> Result<Self> {
        let header_len = config.header_len();
        let command = Command::from_spec(&config.command, header_len)?;
        let frame = encode_frame(&command.to_bytes())?;

        Ok(Self {
            transport,
            command,
            frame,
            header_len,
            decode: config.decode,
        })
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    /// One round trip
    ///
    /// Transport failures are returned as errors. Protocol problems in the
    /// reply are reported through [`Validation`].
    pub fn exchange(&self) -> Result<Exchange> {
        tracing::debug!("Sending {}", hex::encode(&self.frame));
        let received = self.transport.roundtrip(&self.frame)?;
        tracing::debug!("Received {}", hex::encode(&received));

        if let Err(e) = decode_frame(&received) {
            tracing::warn!("{}", e);
        }

        let validation = validate(&received, self.header_len, &self.command);
        if let Some(mismatch) = validation.verb_mismatch(self.command.verb()) {
            tracing::warn!("{}", mismatch);
        }

        let decoded = if self.decode && validation.is_parsed() {
            decoder::decode(self.command.verb(), &received, self.header_len)
        } else {
            None
        };

        Ok(Exchange {
            sent: self.frame.clone(),
            received,
            validation,
            decoded,
        })
    }
}

/// Result of one round trip
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Framed command as sent
    pub sent: Bytes,

    /// Raw reply, length prefix included
    pub received: Vec<u8>,

    pub validation: Validation,

    /// Structured payload when decoding was requested and available
    pub decoded: Option<DecodedResponse>,
}

fn body(frame: &[u8]) -> &[u8] {
    frame.get(LENGTH_PREFIX_SIZE..).unwrap_or_default()
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sent = body(&self.sent);
        if is_printable(sent) {
            writeln!(f, "sent data (ASCII)    : {}", String::from_utf8_lossy(sent))?;
        }
        writeln!(f, "sent data (HEX)      : {}", hex::encode(&self.sent))?;

        let received = body(&self.received);
        if is_printable(received) {
            writeln!(f, "received data (ASCII): {}", String::from_utf8_lossy(received))?;
        }
        writeln!(f, "received data (HEX)  : {}", hex::encode(&self.received))?;

        writeln!(
            f,
            "status               : {} ({})",
            self.validation.status_code, self.validation.status_text
        )?;
        if self.validation.is_parsed() {
            let returned = self
                .validation
                .returned_verb
                .map(|v| v.to_string())
                .unwrap_or_default();
            let congruence = if self.validation.verb_match { "match" } else { "MISMATCH" };
            writeln!(f, "returned verb        : {} ({})", returned, congruence)?;
        }

        if let Some(decoded) = &self.decoded {
            write!(f, "{}", decoded)?;
        }
        Ok(())
    }
}
