//! Free-form data replies (N0, B2)

use super::{FieldReader, Record, ResponseDecoder};

/// N0: generate a random value
pub struct RandomValue;

impl ResponseDecoder for RandomValue {
    fn name(&self) -> &'static str {
        "Generate random value"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        let value = reader.rest();
        record.data("Random value", value);
    }
}

/// B2: echo
///
/// Everything after the status is the echoed data.
pub struct Echo;

impl ResponseDecoder for Echo {
    fn name(&self) -> &'static str {
        "Echo"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        let echoed = reader.rest();
        record.data("Echoed data", echoed);
    }

    fn error_detail(&self, status: &str) -> Option<&'static str> {
        match status {
            "15" => Some("Echo data length does not match the declared length"),
            _ => None,
        }
    }
}
