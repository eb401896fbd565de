//! Command definitions
//!
//! A command body is `[header][verb][payload]`. The body is produced from a
//! textual [`CommandSpec`] which is either copied verbatim or scanned for
//! `<...>` hex escape runs.

use std::fmt;

use crate::error::{ProbeError, Result};

/// Two-character operation code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Verb(pub [u8; 2]);

impl Verb {
    /// Build a verb from the first two bytes of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [a, b, ..] => Some(Self([*a, *b])),
            _ => None,
        }
    }

    /// The verb the appliance answers with: the second character advanced
    /// by one code point. No wrap-around, so `'9'` becomes `':'`.
    pub fn reply(&self) -> Option<Verb> {
        self.0[1].checked_add(1).map(|second| Verb([self.0[0], second]))
    }

    pub fn as_bytes(&self) -> &[u8; 2] {
        &self.0
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Textual command specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// Every character is copied as one byte
    Literal(String),

    /// Literal characters interleaved with `<hex>` escape runs
    ///
    /// The first `literal_prefix` bytes of `text` are copied without
    /// scanning for escape runs.
    Escaped { text: String, literal_prefix: usize },
}

impl CommandSpec {
    /// Escape runs are resolved anywhere in `text`
    pub fn escaped(text: impl Into<String>) -> Self {
        CommandSpec::Escaped {
            text: text.into(),
            literal_prefix: 0,
        }
    }

    /// `header` is copied verbatim, escape runs are resolved in `command`
    pub fn escaped_after(header: &str, command: &str) -> Self {
        CommandSpec::Escaped {
            text: format!("{}{}", header, command),
            literal_prefix: header.len(),
        }
    }

    /// Encode the specification into raw body bytes
    ///
    /// Single pass, left to right. Characters outside escape runs must fit
    /// in one byte.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            CommandSpec::Literal(text) => encode_literal(text),
            CommandSpec::Escaped {
                text,
                literal_prefix,
            } => {
                let (Some(prefix), Some(rest)) =
                    (text.get(..*literal_prefix), text.get(*literal_prefix..))
                else {
                    return Err(ProbeError::Encoding(format!(
                        "literal prefix of {} bytes splits a character in '{}'",
                        literal_prefix, text
                    )));
                };
                let mut out = encode_literal(prefix)?;
                out.extend(encode_escaped(rest)?);
                Ok(out)
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommandSpec::Literal(text) | CommandSpec::Escaped { text, .. } => text,
        }
    }
}

fn encode_literal(text: &str) -> Result<Vec<u8>> {
    text.chars().map(char_to_byte).collect()
}

fn char_to_byte(c: char) -> Result<u8> {
    u8::try_from(u32::from(c))
        .map_err(|_| ProbeError::Encoding(format!("character '{}' does not fit in one byte", c)))
}

fn encode_escaped(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.char_indices();

    while let Some((start, c)) = chars.next() {
        if c != '<' {
            out.push(char_to_byte(c)?);
            continue;
        }

        let run_start = start + 1;
        let run_end = loop {
            match chars.next() {
                Some((idx, '>')) => break idx,
                Some(_) => {}
                None => {
                    return Err(ProbeError::Encoding(format!(
                        "unterminated escape run starting at offset {}",
                        start
                    )))
                }
            }
        };

        let run = &text[run_start..run_end];
        if run.len() % 2 != 0 {
            return Err(ProbeError::Encoding(format!(
                "escape run '<{}>' has an odd number of hex digits",
                run
            )));
        }
        let bytes = hex::decode(run).map_err(|e| {
            ProbeError::Encoding(format!("escape run '<{}>' is not valid hex: {}", run, e))
        })?;
        out.extend_from_slice(&bytes);
    }

    Ok(out)
}

/// An encoded host command
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    header: Vec<u8>,
    verb: Verb,
    payload: Vec<u8>,
}

impl Command {
    pub fn new(header: impl Into<Vec<u8>>, verb: Verb, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            verb,
            payload: payload.into(),
        }
    }

    /// Encode `spec` and split the result into header, verb and payload
    pub fn from_spec(spec: &CommandSpec, header_len: usize) -> Result<Self> {
        let body = spec.encode()?;
        Self::from_body(body, header_len)
    }

    /// Split an already encoded body
    pub fn from_body(mut body: Vec<u8>, header_len: usize) -> Result<Self> {
        if body.len() < header_len + 2 {
            return Err(ProbeError::Encoding(format!(
                "command of {} bytes is shorter than header ({}) plus verb",
                body.len(),
                header_len
            )));
        }
        let payload = body.split_off(header_len + 2);
        let verb = Verb([body[header_len], body[header_len + 1]]);
        body.truncate(header_len);

        Ok(Self {
            header: body,
            verb,
            payload,
        })
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Body bytes as sent on the wire, without the length prefix
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(self.header.len() + 2 + self.payload.len());
        body.extend_from_slice(&self.header);
        body.extend_from_slice(self.verb.as_bytes());
        body.extend_from_slice(&self.payload);
        body
    }
}

// =============================================================================
// Command Presets
// =============================================================================

/// RSA modulus lengths accepted by the key generation preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsaKeyLength {
    Bits2048,
    Bits4096,
}

/// Ready-made commands for the stress modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preset {
    /// Generate an RSA key pair
    GenerateRsa(RsaKeyLength),
    /// Perform diagnostics
    Diagnostics,
    /// HSM status
    Status,
    /// HSM loading
    Loading,
    /// Host command volumes
    CommandVolumes,
    /// Health check accumulated counts
    HealthCounts,
    /// Instantaneous health check status
    HealthStatus,
    /// Generate an 8 byte random value
    Random,
    /// Echo the given text back
    Echo(String),
    /// SHA-256 hash of the given text
    Hash(String),
    /// Generate a key under the LMK
    GenerateKey,
}

impl Preset {
    /// Command text following the header
    pub fn body(&self) -> String {
        match self {
            Preset::GenerateRsa(RsaKeyLength::Bits2048) => "EI2204801#0000".to_string(),
            Preset::GenerateRsa(RsaKeyLength::Bits4096) => "EI2409601#0000".to_string(),
            Preset::Diagnostics => "NC".to_string(),
            Preset::Status => "NO00".to_string(),
            Preset::Loading => "J2".to_string(),
            Preset::CommandVolumes => "J4".to_string(),
            Preset::HealthCounts => "J8".to_string(),
            Preset::HealthStatus => "JK".to_string(),
            Preset::Random => "N0008".to_string(),
            Preset::Echo(data) => format!("B2{:04X}{}", data.len(), data),
            Preset::Hash(data) => format!("GM06{:05}{}", data.len(), data),
            Preset::GenerateKey => "A00002U".to_string(),
        }
    }

    /// Full command specification with `header` prepended
    pub fn spec(&self, header: &str) -> CommandSpec {
        CommandSpec::Literal(format!("{}{}", header, self.body()))
    }
}
