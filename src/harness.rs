//! Iteration Harness
//!
//! Drives sequential request/response cycles. Each iteration is a single
//! best-effort attempt; a failure is logged and counted, never retried,
//! and never stops the run.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::Exchange;
use crate::config::Iterations;
use crate::error::Result;
use crate::protocol::status;

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Iterations attempted
    pub iterations: u64,

    /// Status `00` with the expected verb
    pub succeeded: u64,

    /// Parsed replies carrying a non-zero status
    pub error_status: u64,

    /// Replies that failed local validation (`ZZ`)
    pub invalid_replies: u64,

    /// Parsed replies whose verb did not match
    pub verb_mismatches: u64,

    /// Iterations that ended in an error before a reply was validated
    pub failed: u64,
}

impl RunSummary {
    fn record(&mut self, exchange: &Exchange) {
        let validation = &exchange.validation;
        if !validation.is_parsed() {
            self.invalid_replies += 1;
            return;
        }
        if !validation.verb_match {
            self.verb_mismatches += 1;
        }
        if validation.status_code != status::SUCCESS {
            self.error_status += 1;
        } else if validation.verb_match {
            self.succeeded += 1;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} iteration(s): {} succeeded, {} error status, {} invalid replies, {} verb mismatches, {} failed",
            self.iterations,
            self.succeeded,
            self.error_status,
            self.invalid_replies,
            self.verb_mismatches,
            self.failed
        )
    }
}

/// Sequential runner
pub struct Harness {
    iterations: Iterations,
    stop: Arc<AtomicBool>,
}

impl Harness {
    pub fn new(iterations: Iterations) -> Self {
        Self {
            iterations,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends the run before the next iteration starts
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run `iteration` with 1-based iteration numbers
    pub fn run<F>(&self, mut iteration: F) -> RunSummary
    where
        F: FnMut(u64) -> Result<Exchange>,
    {
        let mut summary = RunSummary::default();
        tracing::info!("Starting run: {:?}", self.iterations);

        let mut index: u64 = 0;
        loop {
            if let Iterations::Count(count) = self.iterations {
                if index >= count {
                    break;
                }
            }
            if self.stop.load(Ordering::Relaxed) {
                tracing::info!("Run interrupted after {} iteration(s)", index);
                break;
            }

            index += 1;
            summary.iterations = index;
            match iteration(index) {
                Ok(exchange) => summary.record(&exchange),
                Err(e) => {
                    tracing::warn!("Iteration {} failed: {}", index, e);
                    summary.failed += 1;
                }
            }
        }

        tracing::info!("{}", summary);
        summary
    }
}
