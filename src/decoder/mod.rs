//! Decoder Module
//!
//! Interprets reply payloads for the verbs the tool knows about.
//!
//! ## Preamble
//! Every reply starts the same way and is read by [`decode`] before the
//! verb-specific decoder runs:
//! ```text
//! ┌──────────┬──────────────┬──────────┬────────────┬───────────────────┐
//! │ Len (2)  │ Header (H)   │ Verb (2) │ Status (2) │ decoder payload   │
//! └──────────┴──────────────┴──────────┴────────────┴───────────────────┘
//! ```
//! The payload is only interpreted when the status is `00`.
//!
//! ## Registry
//! | Request | Decoder |
//! |---------|---------|
//! | NC | [`diagnostics::Diagnostics`] |
//! | NO | [`diagnostics::HsmStatus`] |
//! | J2 | [`health::Loading`] |
//! | J4 | [`health::CommandVolumes`] |
//! | J8 | [`health::AccumulatedCounts`] |
//! | JK | [`health::InstantStatus`] |
//! | EI | [`keys::RsaKeyPair`] |
//! | A0 | [`keys::GeneratedKey`] |
//! | GM | [`keys::HashValue`] |
//! | N0 | [`data::RandomValue`] |
//! | B2 | [`data::Echo`] |

mod fields;
pub mod data;
pub mod diagnostics;
pub mod health;
pub mod keys;

use std::fmt;

pub use fields::{is_printable, Field, FieldReader, FieldValue, Record};

use crate::protocol::{status, Verb, LENGTH_PREFIX_SIZE};

/// Verb-specific payload interpretation
pub trait ResponseDecoder {
    /// Short description of the command
    fn name(&self) -> &'static str;

    /// Read the payload following a success status
    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record);

    /// Extra detail for failure statuses this command documents
    fn error_detail(&self, _status: &str) -> Option<&'static str> {
        None
    }
}

type DecoderRef = &'static (dyn ResponseDecoder + Sync);

static REGISTRY: &[(&[u8; 2], DecoderRef)] = &[
    (b"NC", &diagnostics::Diagnostics),
    (b"NO", &diagnostics::HsmStatus),
    (b"J2", &health::Loading),
    (b"J4", &health::CommandVolumes),
    (b"J8", &health::AccumulatedCounts),
    (b"JK", &health::InstantStatus),
    (b"EI", &keys::RsaKeyPair),
    (b"A0", &keys::GeneratedKey),
    (b"GM", &keys::HashValue),
    (b"N0", &data::RandomValue),
    (b"B2", &data::Echo),
];

/// Decoder registered for a request verb
pub fn lookup(verb: Verb) -> Option<DecoderRef> {
    REGISTRY
        .iter()
        .find(|(tag, _)| **tag == verb.0)
        .map(|(_, decoder)| *decoder)
}

/// Verbs with a registered decoder
pub fn registered_verbs() -> impl Iterator<Item = Verb> {
    REGISTRY.iter().map(|(tag, _)| Verb(**tag))
}

/// A decoded reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResponse {
    /// Verb of the command that was sent
    pub request_verb: Verb,

    /// Decoder description
    pub command_name: &'static str,

    /// Preamble and payload fields, in wire order
    pub record: Record,
}

impl DecodedResponse {
    pub fn field(&self, label: &str) -> Option<&FieldValue> {
        self.record.get(label)
    }
}

impl fmt::Display for DecodedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}):", self.command_name, self.request_verb)?;
        write_fields(f, self.record.fields(), 1)
    }
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[Field], depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    for field in fields {
        match &field.value {
            FieldValue::Records(records) => {
                writeln!(f, "{}{}: {} record(s)", indent, field.label, records.len())?;
                for (idx, record) in records.iter().enumerate() {
                    writeln!(f, "{}  #{}", indent, idx + 1)?;
                    write_fields(f, record, depth + 2)?;
                }
            }
            value => writeln!(f, "{}{}: [{}]", indent, field.label, value)?,
        }
    }
    Ok(())
}

/// Decode `response` for a command sent with `verb`
///
/// Returns `None` when no decoder is registered for the verb.
pub fn decode(verb: Verb, response: &[u8], header_len: usize) -> Option<DecodedResponse> {
    let decoder = lookup(verb)?;
    let mut reader = FieldReader::new(response);
    let mut record = Record::new();

    // The prefix is binary, not decimal text.
    let length = match reader.take(LENGTH_PREFIX_SIZE) {
        Some(prefix) => FieldValue::Number(u64::from(u16::from_be_bytes([prefix[0], prefix[1]]))),
        None => FieldValue::Missing,
    };
    record.push("Message length", length);
    record.text("Header", &mut reader, header_len);
    record.text("Response code", &mut reader, 2);

    let status_code = match reader.take(2) {
        Some(code) => String::from_utf8_lossy(code).into_owned(),
        None => {
            record.push("Error code", FieldValue::Missing);
            return Some(finish(verb, decoder, record));
        }
    };
    record.push(
        "Error code",
        FieldValue::Text(format!("{} ({})", status_code, status::describe(&status_code))),
    );

    if status_code == status::SUCCESS {
        decoder.decode_payload(&mut reader, &mut record);
    } else if let Some(detail) = decoder.error_detail(&status_code) {
        record.push("Error detail", FieldValue::Text(detail.to_string()));
    }

    Some(finish(verb, decoder, record))
}

fn finish(verb: Verb, decoder: DecoderRef, record: Record) -> DecodedResponse {
    DecodedResponse {
        request_verb: verb,
        command_name: decoder.name(),
        record,
    }
}
