//! Loading and health check replies (J2, J4, J8, JK)
//!
//! Dates are `DDMMYY`, times `HHMMSS`, both as sent by the appliance.

use super::{FieldReader, FieldValue, Record, ResponseDecoder};

/// Start, end and current date/time block shared by the statistics replies
fn statistics_period(reader: &mut FieldReader<'_>, record: &mut Record) {
    record.text("Start date", reader, 6);
    record.text("Start time", reader, 6);
    record.text("End date", reader, 6);
    record.text("End time", reader, 6);
    record.text("Current date", reader, 6);
    record.text("Current time", reader, 6);
}

/// J2: HSM loading
pub struct Loading;

impl ResponseDecoder for Loading {
    fn name(&self) -> &'static str {
        "Get HSM loading"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        statistics_period(reader, record);
        record.number("HSM loading (%)", reader, 3);
    }
}

const VOLUME_RECORD_LEN: usize = 2 + 10;
const VOLUME_TOTALS_LEN: usize = 10 + 10;

/// J4: host command volumes
pub struct CommandVolumes;

impl ResponseDecoder for CommandVolumes {
    fn name(&self) -> &'static str {
        "Get host command volumes"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        statistics_period(reader, record);

        // A bad count still leaves the totals at the tail, so infer the
        // number of records from what is left.
        let count = record
            .number("Command types", reader, 3)
            .map(|n| n as usize)
            .unwrap_or_else(|| reader.remaining().saturating_sub(VOLUME_TOTALS_LEN) / VOLUME_RECORD_LEN);

        let mut volumes = Vec::new();
        for _ in 0..count {
            if reader.is_empty() {
                break;
            }
            let mut volume = Record::new();
            volume.text("Command code", reader, 2);
            volume.number("Volume", reader, 10);
            volumes.push(volume);
        }
        record.records("Command volumes", volumes);

        record.number("Total commands", reader, 10);
        record.number("Total errors", reader, 10);
    }
}

/// J8: health check accumulated counts
pub struct AccumulatedCounts;

impl ResponseDecoder for AccumulatedCounts {
    fn name(&self) -> &'static str {
        "Get health check accumulated counts"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        record.text("Serial number", reader, 12);
        statistics_period(reader, record);
        record.number("Number of reboots", reader, 6);
        record.number("Number of tampers", reader, 6);
        record.number("PIN verifications per minute", reader, 7);
        record.number("PIN verifications per hour", reader, 7);
        record.number("PIN attack limit lockouts", reader, 7);
    }
}

/// Separates LMK sub-records
pub const RECORD_SEPARATOR: u8 = 0x14;

/// Ends the LMK sub-records
pub const RECORD_TERMINATOR: u8 = 0x19;

const TAMPER_STATES: &[(&str, &str)] = &[
    ("0", "No tamper"),
    ("1", "Tamper detected"),
    ("2", "Tamper cleared"),
];

const AUTH_STATES: &[(&str, &str)] = &[
    ("0", "Not authorized"),
    ("1", "Authorized"),
    ("2", "Authorized for multiple activities"),
];

const ALGORITHMS: &[(&str, &str)] = &[("D", "3DES"), ("A", "AES")];

const SCHEMES: &[(&str, &str)] = &[("V", "Variant"), ("K", "Key block")];

const LMK_STATUS: &[(&str, &str)] = &[("L", "Live"), ("T", "Test")];

const FLAGS: &[(&str, &str)] = &[("0", "Disabled"), ("1", "Enabled")];

/// JK: instantaneous health check status
///
/// ```text
/// serial(12) date(6) time(6) tamper(1) lmk_count(2)
///   lmk 0x14 lmk 0x14 ... lmk 0x19 flag 0x14 flag
/// ```
/// The count and the number of delimited segments may disagree; whatever
/// is present, up to the count, is decoded.
pub struct InstantStatus;

impl ResponseDecoder for InstantStatus {
    fn name(&self) -> &'static str {
        "Get instantaneous health check status"
    }

    fn decode_payload(&self, reader: &mut FieldReader<'_>, record: &mut Record) {
        record.text("Serial number", reader, 12);
        record.text("Date", reader, 6);
        record.text("Time", reader, 6);
        record.coded("Tamper state", reader, 1, TAMPER_STATES);
        let declared = record.number("LMKs loaded", reader, 2);

        let rest = reader.rest();
        let (body, trailer) = match rest.iter().position(|b| *b == RECORD_TERMINATOR) {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };

        let segments: Vec<&[u8]> = if body.is_empty() {
            Vec::new()
        } else {
            body.split(|b| *b == RECORD_SEPARATOR).collect()
        };
        let take = declared.map_or(segments.len(), |n| segments.len().min(n as usize));

        let lmks = segments.into_iter().take(take).map(decode_lmk).collect();
        record.records("LMKs", lmks);

        let mut flags = trailer
            .unwrap_or_default()
            .split(|b| *b == RECORD_SEPARATOR)
            .filter(|segment| !segment.is_empty());
        flag(record, "Fraud detection", flags.next());
        flag(record, "Secure host comms", flags.next());
    }
}

fn decode_lmk(segment: &[u8]) -> Record {
    let mut reader = FieldReader::new(segment);
    let mut lmk = Record::new();
    lmk.number("LMK identifier", &mut reader, 2);
    lmk.coded("Authorization state", &mut reader, 1, AUTH_STATES);
    lmk.coded("Algorithm", &mut reader, 1, ALGORITHMS);
    lmk.coded("Scheme", &mut reader, 1, SCHEMES);
    lmk.coded("Status", &mut reader, 1, LMK_STATUS);
    let comment = reader.rest();
    lmk.data("Comment", comment);
    lmk
}

fn flag(record: &mut Record, label: &'static str, segment: Option<&[u8]>) {
    match segment {
        Some(segment) => {
            let mut reader = FieldReader::new(segment);
            record.coded(label, &mut reader, 1, FLAGS);
        }
        None => record.push(label, FieldValue::Missing),
    }
}
