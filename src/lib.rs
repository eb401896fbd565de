//! # hsmprobe
//!
//! Workload generator and diagnostic client for an HSM host command
//! protocol:
//! - Length-prefixed framing over TCP, UDP or TLS
//! - Command text with `<hex>` escape runs
//! - Reply validation (length prefix, status code, verb congruence)
//! - Structured decoders for the diagnostic and key generation replies
//! - Sequential stress runs, counted or unbounded
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Iteration Harness                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ one cycle at a time
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Client                                │
//! │        CommandSpec → Command → Frame (built once)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────────┐
//!   │  Transport  │  reply   │    Validator    │
//!   │ tcp/udp/tls │ ───────▶ │ status + verb   │
//!   └─────────────┘          └────────┬────────┘
//!                                     ▼
//!                     ┌───────────────────────────────┐
//!                     │ Status catalog + Decoders     │
//!                     └───────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod decoder;
pub mod network;
pub mod client;
pub mod harness;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ProbeError, Result};
pub use config::{Config, Iterations, Protocol, TlsConfig};
pub use client::{Client, Exchange};
pub use harness::{Harness, RunSummary};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of hsmprobe
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
