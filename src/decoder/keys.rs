//! Key material replies (EI, A0, GM)
//!
//! These carry raw binary runs, so they work on the reply bytes directly
//! and render key material as hex.

use super::{FieldReader, FieldValue, Record, ResponseDecoder};

/// EI: generate an RSA key pair
///
/// ```text
/// priv_len(4, decimal) priv_key(priv_len bytes) separator(1) pub_key(rest)
/// ```
pub struct RsaKeyPair;

impl ResponseDecoder for RsaKeyPair {
    fn name(&self) -> &'static str {
        "Generate RSA key pair"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        let declared = record.number("Private key length", reader, 4);

        let private_key = match declared {
            Some(len) if len as usize <= reader.remaining() => reader.take(len as usize),
            Some(len) => {
                record.push(
                    "Private key",
                    FieldValue::Malformed(format!(
                        "declares {} bytes, {} available",
                        len,
                        reader.remaining()
                    )),
                );
                record.push("Public key", FieldValue::Missing);
                return;
            }
            None => None,
        };

        match private_key {
            Some(key) => record.hex("Private key", key),
            None => {
                // Without a length the key runs cannot be located.
                record.push("Private key", FieldValue::Missing);
                record.push("Public key", FieldValue::Missing);
                return;
            }
        }

        if reader.take(1).is_none() {
            record.push("Public key", FieldValue::Missing);
            return;
        }
        let public_key = reader.rest();
        record.hex("Public key", public_key);
    }

    fn error_detail(&self, status: &str) -> Option<&'static str> {
        match status {
            "03" => Some("Invalid public exponent length"),
            "04" => Some("Invalid key type"),
            "47" => Some("Requested key length not licensed"),
            _ => None,
        }
    }
}

/// A0: generate a key
pub struct GeneratedKey;

impl ResponseDecoder for GeneratedKey {
    fn name(&self) -> &'static str {
        "Generate key"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        let width = match reader.peek(1) {
            Some([b'U']) | Some([b'X']) => 33,
            Some([b'T']) | Some([b'Y']) => 49,
            Some([b'S']) => reader.remaining().saturating_sub(6),
            _ => 16,
        };
        record.text("Key under LMK", reader, width);
        record.text("Key check value", reader, 6);
    }
}

/// GM: hash a block of data
pub struct HashValue;

impl ResponseDecoder for HashValue {
    fn name(&self) -> &'static str {
        "Hash data"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        let hash = reader.rest();
        record.hex("Hash value", hash);
    }
}
