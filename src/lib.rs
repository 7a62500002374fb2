//! deskreport - reporting against helpdesk and RMM REST APIs
//!
//! Two independent pipelines:
//! - notes report: recent ticket notes exported to CSV
//! - agent count: asset inventory dumped to JSON with a computer-agent count

pub mod api;
pub mod config;
pub mod env_vars;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod types;
