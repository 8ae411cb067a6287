//! Fired-transition history.
//!
//! Pure observability: the engine records every state change it performs,
//! and the host can reconstruct the path taken or measure how long a
//! workflow ran. History plays no role in control flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one fired transition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State the machine left.
    pub from: String,
    /// State the machine entered.
    pub to: String,
    /// When the transition completed.
    pub at: DateTime<Utc>,
    /// Tick number during which it fired.
    pub tick: u64,
}

/// Ordered log of every transition a machine instance has fired.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<TransitionRecord>,
}

impl History {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// All records in firing order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// States traversed: the starting state, then each destination.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Wall time between the first and last recorded transitions.
    ///
    /// `None` while fewer than one transition has fired.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.at.signed_duration_since(first.at).to_std().ok()
    }
}
