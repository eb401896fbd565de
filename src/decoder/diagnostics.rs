//! Diagnostics and status replies (NC, NO)

use super::{FieldReader, Record, ResponseDecoder};

/// NC: perform diagnostics
pub struct Diagnostics;

impl ResponseDecoder for Diagnostics {
    fn name(&self) -> &'static str {
        "Perform diagnostics"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        record.text("LMK check value", reader, 16);
        record.text("Firmware number", reader, 9);
    }
}

/// Length of the full status dump
const STATUS_DUMP_LEN: usize = 18;

const BUFFER_SIZES: &[(&str, &str)] = &[
    ("0", "2K bytes"),
    ("1", "8K bytes"),
    ("2", "16K bytes"),
    ("3", "32K bytes"),
];

const ETHERNET_TYPES: &[(&str, &str)] = &[
    ("0", "10BaseT"),
    ("1", "100BaseTX"),
    ("2", "1000BaseT"),
];

const COMPLIANCE: &[(&str, &str)] = &[("0", "Not compliant"), ("1", "Compliant")];

/// NO: HSM status
///
/// Mode 00 returns the full status dump; mode 01 returns a shorter PCI HSM
/// compliance report. The two are told apart by what is left after the
/// status code.
pub struct HsmStatus;

impl ResponseDecoder for HsmStatus {
    fn name(&self) -> &'static str {
        "HSM status"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        if reader.remaining() >= STATUS_DUMP_LEN {
            record.coded("I/O buffer size", reader, 1, BUFFER_SIZES);
            record.coded("Ethernet type", reader, 1, ETHERNET_TYPES);
            record.number("Number of TCP sockets", reader, 2);
            record.text("Firmware number", reader, 9);
            record.text("DSP fitted", reader, 1);
            record.text("DSP firmware version", reader, 4);
        } else {
            record.coded("PCI HSM compliance", reader, 1, COMPLIANCE);
            let detail = reader.rest();
            record.data("Compliance detail", detail);
        }
    }

    fn error_detail(&self, status: &str) -> Option<&'static str> {
        match status {
            "15" => Some("Invalid mode flag"),
            _ => None,
        }
    }
}
