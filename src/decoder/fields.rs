//! Field extraction
//!
//! A forward-only cursor over reply bytes plus the record type decoders
//! fill in. Fields that are missing or malformed become placeholders so
//! the rest of the record still decodes.

use std::borrow::Cow;
use std::fmt;

/// Value of a decoded field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Printable text
    Text(String),

    /// Decimal counter or length
    Number(u64),

    /// Raw bytes, shown as hex
    Hex(Vec<u8>),

    /// Repeating sub-records
    Records(Vec<Vec<Field>>),

    /// Bytes were present but did not have the expected form
    Malformed(String),

    /// The reply ended before this field
    Missing,
}

impl FieldValue {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FieldValue::Malformed(_) | FieldValue::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{}", text),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Hex(bytes) => write!(f, "{}", hex::encode_upper(bytes)),
            FieldValue::Records(records) => write!(f, "{} record(s)", records.len()),
            FieldValue::Malformed(raw) => write!(f, "<malformed: {}>", raw),
            FieldValue::Missing => write!(f, "<missing>"),
        }
    }
}

/// A labelled field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: Cow<'static, str>,
    pub value: FieldValue,
}

/// All bytes are printable ASCII
pub fn is_printable(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| (0x20..=0x7e).contains(b))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

// =============================================================================
// Reader
// =============================================================================

/// Left-to-right cursor, never moves backwards
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Next `n` bytes. A short read exhausts the reader and returns `None`.
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if n > self.remaining() {
            self.pos = self.buf.len();
            return None;
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Some(bytes)
    }

    pub fn peek(&self, n: usize) -> Option<&'a [u8]> {
        self.buf.get(self.pos..self.pos + n)
    }

    /// Everything left
    pub fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..];
        self.pos = self.buf.len();
        bytes
    }
}

// =============================================================================
// Record
// =============================================================================

/// Ordered list of decoded fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<Cow<'static, str>>, value: FieldValue) {
        self.fields.push(Field {
            label: label.into(),
            value,
        });
    }

    /// Fixed-width text field
    pub fn text(&mut self, label: &'static str, reader: &mut FieldReader<'_>, width: usize) {
        let value = match reader.take(width) {
            Some(bytes) => FieldValue::Text(lossy(bytes)),
            None => FieldValue::Missing,
        };
        self.push(label, value);
    }

    /// Fixed-width decimal field, returned when it parsed
    pub fn number(
        &mut self,
        label: &'static str,
        reader: &mut FieldReader<'_>,
        width: usize,
    ) -> Option<u64> {
        let (value, parsed) = match reader.take(width) {
            Some(bytes) => match parse_decimal(bytes) {
                Some(n) => (FieldValue::Number(n), Some(n)),
                None => (FieldValue::Malformed(lossy(bytes)), None),
            },
            None => (FieldValue::Missing, None),
        };
        self.push(label, value);
        parsed
    }

    /// Fixed-width coded field, shown with its meaning when `table` has one
    pub fn coded(
        &mut self,
        label: &'static str,
        reader: &mut FieldReader<'_>,
        width: usize,
        table: &[(&str, &str)],
    ) {
        let value = match reader.take(width) {
            Some(bytes) => {
                let code = lossy(bytes);
                match table.iter().find(|(known, _)| *known == code) {
                    Some((_, meaning)) => FieldValue::Text(format!("{} ({})", code, meaning)),
                    None => FieldValue::Text(code),
                }
            }
            None => FieldValue::Missing,
        };
        self.push(label, value);
    }

    /// Raw bytes shown as hex
    pub fn hex(&mut self, label: &'static str, bytes: &[u8]) {
        self.push(label, FieldValue::Hex(bytes.to_vec()));
    }

    /// Text when printable, hex otherwise
    pub fn data(&mut self, label: &'static str, bytes: &[u8]) {
        let value = if is_printable(bytes) {
            FieldValue::Text(lossy(bytes))
        } else {
            FieldValue::Hex(bytes.to_vec())
        };
        self.push(label, value);
    }

    pub fn records(&mut self, label: &'static str, records: Vec<Record>) {
        let records = records.into_iter().map(Record::into_fields).collect();
        self.push(label, FieldValue::Records(records));
    }

    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.label == label).map(|f| &f.value)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

fn parse_decimal(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
