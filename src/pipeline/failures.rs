//! Soft failures collected while a report runs
//!
//! Only authentication aborts a run. Everything else is reported to a
//! [`FailureSink`] and the stage carries on with what it has.

use thiserror::Error;
use tracing::{error, warn};

use crate::api::ApiError;
use crate::types::TicketId;

/// A non-fatal problem that dropped part of the result set
#[derive(Debug, Clone, Error)]
pub enum Failure {
    /// A list page failed; no further pages of `resource` were requested
    #[error("Failed to fetch {resource} page {page}: {error}")]
    PageFetch {
        resource: &'static str,
        page: u64,
        error: ApiError,
    },

    /// Notes for one ticket could not be fetched; the ticket contributes nothing
    #[error("Failed to fetch notes for ticket ID {ticket_id}: {error}")]
    DetailFetch { ticket_id: TicketId, error: ApiError },

    /// One note had an unusable `createdOn`; the note was skipped
    #[error("Skipping invalid createdOn format for note in ticket {ticket_id}: {raw:?} ({message})")]
    TimestampParse {
        ticket_id: TicketId,
        raw: String,
        message: String,
    },
}

/// Receives soft failures from pipeline stages
pub trait FailureSink {
    fn record(&mut self, failure: Failure);
}

/// Logs each failure and keeps it for the caller
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Vec<Failure>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get a summary message
    pub fn summary(&self) -> String {
        let mut pages = 0;
        let mut details = 0;
        let mut timestamps = 0;
        for failure in &self.failures {
            match failure {
                Failure::PageFetch { .. } => pages += 1,
                Failure::DetailFetch { .. } => details += 1,
                Failure::TimestampParse { .. } => timestamps += 1,
            }
        }
        format!(
            "Page failures: {pages}, Ticket failures: {details}, Skipped notes: {timestamps}"
        )
    }
}

impl FailureSink for FailureLog {
    fn record(&mut self, failure: Failure) {
        match &failure {
            Failure::TimestampParse { .. } => warn!("{}", failure),
            Failure::PageFetch { .. } | Failure::DetailFetch { .. } => error!("{}", failure),
        }
        self.failures.push(failure);
    }
}

impl FailureSink for Vec<Failure> {
    fn record(&mut self, failure: Failure) {
        self.push(failure);
    }
}
