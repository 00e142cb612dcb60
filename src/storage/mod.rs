//! Storage abstractions for run state and feed output.
//!
//! Two artifacts outlive a run:
//!
//! ```text
//! previously_scraped.json   # run state: last run + recently published URLs
//! feed.xml                  # the RSS document
//! ```
//!
//! State is read once at the start of a run and written once at the end.
//! The feed is written only when a run has something to publish.

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::RunState;

// Re-export for convenience
pub use local::LocalStorage;

/// How the run state was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateOrigin {
    /// Read from the state file
    File,
    /// No state file yet
    Missing,
    /// The state file was unreadable and was ignored
    Corrupt,
}

/// Run state together with where it came from.
#[derive(Debug, Clone)]
pub struct StateLoad {
    pub state: RunState,
    pub origin: StateOrigin,
}

/// Trait for run storage backends.
#[async_trait]
pub trait RunStorage: Send + Sync {
    /// Load the previous run's state, or an empty state stamped `now`.
    ///
    /// Never fails: a missing or corrupt file yields the empty state.
    async fn load_state(&self, now: DateTime<Utc>) -> StateLoad;

    /// Persist the run state.
    async fn save_state(&self, state: &RunState) -> Result<()>;

    /// Replace the feed document with `bytes`, all or nothing.
    async fn write_feed(&self, bytes: &[u8]) -> Result<()>;
}
