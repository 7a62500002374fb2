//! The two reporting pipelines and the pieces they share
//!
//! Each pipeline is linear: fetch, filter or aggregate, then hand the result
//! to an exporter. Stages take their inputs and return their outputs; soft
//! failures go to an injected [`FailureSink`].

pub mod agents;
pub mod failures;
pub mod notes;
pub mod pagination;
pub mod window;

pub use agents::{count_computer_agents, run_agent_count, AgentCount};
pub use failures::{Failure, FailureLog, FailureSink};
pub use notes::run_notes_report;
pub use pagination::OffsetPage;
pub use window::{parse_timestamp, TimeWindow, DEFAULT_LOOKBACK_DAYS};
