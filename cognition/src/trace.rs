//! Thought trace for pipeline runs.
//!
//! Every stage appends events; the trace is owned by one run and handed to
//! the caller when the run returns. Events are never reordered or merged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::clamp01;

/// Kind of thought event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum ThoughtKind {
    /// Input classification
    Spark,
    /// One reasoning pass
    Iteration,
    /// A pass beat the running best
    NewBest,
    /// Early exit from the loop
    Converged,
    /// Knowledge store was consulted
    Knowledge,
    /// Final text assembled
    Synthesis,
    /// Numeric answer checked
    Verification,
    /// Numeric answer replaced
    Correction,
    /// Parse warning surfaced
    Warning,
}

/// A single explanatory event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ThoughtEvent {
    /// Unique event ID
    pub id: String,
    /// Position in the run's trace, starting at 0
    pub sequence: u64,
    /// Explanatory text
    pub content: String,
    /// Event kind
    pub category: ThoughtKind,
    /// Confidence at the time of the event (0.0 - 1.0)
    pub confidence: f64,
    /// When the event was emitted
    pub timestamp: DateTime<Utc>,
}

/// Append-only trace for one run.
#[derive(Debug, Default)]
pub struct ThoughtTrace {
    events: Vec<ThoughtEvent>,
}

impl ThoughtTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event.
    pub fn emit(&mut self, category: ThoughtKind, content: impl Into<String>, confidence: f64) {
        let content = content.into();
        let sequence = self.events.len() as u64;

        debug!(sequence, kind = ?category, confidence, "{}", content);

        self.events.push(ThoughtEvent {
            id: uuid::Uuid::new_v4().to_string(),
            sequence,
            content,
            category,
            confidence: clamp01(confidence),
            timestamp: Utc::now(),
        });
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[ThoughtEvent] {
        &self.events
    }

    /// Event contents in order.
    pub fn reasoning(&self) -> Vec<String> {
        self.events.iter().map(|e| e.content.clone()).collect()
    }

    /// Count events of one kind.
    pub fn count(&self, category: ThoughtKind) -> usize {
        self.events.iter().filter(|e| e.category == category).count()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event was emitted.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the trace.
    pub fn into_events(self) -> Vec<ThoughtEvent> {
        self.events
    }
}
