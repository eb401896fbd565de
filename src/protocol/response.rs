//! Response validation
//!
//! Checks a raw reply against the command that produced it.
//!
//! ```text
//! ┌──────────┬──────────────┬──────────┬────────────┬───────────────────┐
//! │ Len (2)  │ Header (H)   │ Verb (2) │ Status (2) │ Verb payload      │
//! └──────────┴──────────────┴──────────┴────────────┴───────────────────┘
//! ```

use super::codec::{declared_length, LENGTH_PREFIX_SIZE};
use super::command::{Command, Verb};
use super::status;
use crate::error::ProbeError;

/// Outcome of validating one reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    /// Two-character status, `ZZ` when validation failed locally
    pub status_code: String,

    /// Catalog description or the local failure reason
    pub status_text: String,

    /// Verb found after the header, if the frame got that far
    pub returned_verb: Option<Verb>,

    /// Returned verb equals the sent verb advanced by one
    pub verb_match: bool,
}

impl Validation {
    fn local_failure(reason: &str) -> Self {
        Self {
            status_code: status::LOCAL_FAILURE.to_string(),
            status_text: reason.to_string(),
            returned_verb: None,
            verb_match: false,
        }
    }

    /// Frame was well formed and the status code was parsed
    pub fn is_parsed(&self) -> bool {
        self.status_code != status::LOCAL_FAILURE
    }

    /// Status is the success code and the verb matched
    pub fn is_success(&self) -> bool {
        self.status_code == status::SUCCESS && self.verb_match
    }

    /// Verb congruence failure as an error value, for reporting
    pub fn verb_mismatch(&self, sent: Verb) -> Option<ProbeError> {
        if !self.is_parsed() || self.verb_match {
            return None;
        }
        Some(ProbeError::VerbMismatch {
            expected: sent
                .reply()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "<none>".to_string()),
            returned: self
                .returned_verb
                .map(|v| v.to_string())
                .unwrap_or_else(|| "<none>".to_string()),
        })
    }
}

pub const INCOMPLETE_MESSAGE: &str = "Incomplete message";
pub const LENGTH_MISMATCH: &str = "Length mismatch";
pub const UNPARSABLE_STATUS: &str = "Unable to parse status code";

/// Validate `response` against `sent`
///
/// Checks, in order: minimum size, length prefix, status code, verb
/// congruence. The verb is checked whatever the status value is.
pub fn validate(response: &[u8], header_len: usize, sent: &Command) -> Validation {
    if response.len() < LENGTH_PREFIX_SIZE + header_len + 2 {
        return Validation::local_failure(INCOMPLETE_MESSAGE);
    }

    let declared = declared_length(response).unwrap_or_default() as usize;
    if response.len() - LENGTH_PREFIX_SIZE != declared {
        return Validation::local_failure(LENGTH_MISMATCH);
    }

    let verb_pos = LENGTH_PREFIX_SIZE + header_len;
    let status_pos = verb_pos + 2;
    let status_code = match response.get(status_pos..status_pos + 2) {
        Some(code) if code.iter().all(u8::is_ascii_graphic) => {
            String::from_utf8_lossy(code).into_owned()
        }
        _ => return Validation::local_failure(UNPARSABLE_STATUS),
    };

    let returned_verb = Verb::from_slice(&response[verb_pos..]);
    let verb_match = match (sent.verb().reply(), returned_verb) {
        (Some(expected), Some(returned)) => expected == returned,
        _ => false,
    };

    Validation {
        status_text: status::describe(&status_code).to_string(),
        status_code,
        returned_verb,
        verb_match,
    }
}
