//! Protocol Module
//!
//! Host command framing, command encoding and reply validation.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬─────────────────────────────────────────┐
//! │ Len (2)  │                 Body                    │
//! └──────────┴─────────────────────────────────────────┘
//! ```
//!
//! ### Command Body
//! `[header (H)][verb (2)][payload]`
//!
//! ### Response Body
//! `[header echo (H)][verb + 1 (2)][status (2)][payload]`
//!
//! ### Status Codes
//! - `00`: success
//! - `ZZ`: reply failed local validation (never sent by the appliance)
//! - anything else: see [`status::describe`]

mod codec;
mod command;
mod response;
pub mod status;

pub use codec::{decode_frame, declared_length, encode_frame, Frame, LENGTH_PREFIX_SIZE, MAX_BODY_SIZE};
pub use command::{Command, CommandSpec, Preset, RsaKeyLength, Verb};
pub use response::{validate, Validation, INCOMPLETE_MESSAGE, LENGTH_MISMATCH, UNPARSABLE_STATUS};
