//! Change detection and deduplication state for the alert poller.

use chrono::{DateTime, Utc};

/// The last alert text observed and when it was captured.
///
/// An empty `text` means "no active alert". The snapshot is replaced
/// atomically on every evaluation; it is never partially updated.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSnapshot {
    /// The extracted notice content, trimmed. Empty when no alert is active.
    pub text: String,
    /// When this snapshot was captured.
    pub captured_at: DateTime<Utc>,
}

impl AlertSnapshot {
    /// True when the snapshot holds no active alert.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The snapshot text as shown to a status query, with a placeholder for
    /// the no-alert state.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            "No active alerts detected."
        } else {
            &self.text
        }
    }
}

/// The outcome of evaluating one polled alert text against the stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// The polled text equals the stored snapshot (including both empty).
    Unchanged,
    /// This is the first poll since process start; the text is recorded but
    /// never announced, so a pre-existing alert is not re-broadcast.
    FirstObservation,
    /// A previously active alert has been withdrawn.
    ClearedToEmpty,
    /// A new, non-empty alert differs from the stored one.
    Changed,
}

impl AlertDecision {
    /// Whether this decision should produce an outbound notification.
    pub fn should_notify(&self) -> bool {
        matches!(self, AlertDecision::Changed)
    }
}

/// Holds the last-seen alert and decides what each newly polled text means.
///
/// The tracker is owned exclusively by the poller; other components only see
/// snapshot copies through a query handle.
#[derive(Debug)]
pub struct AlertTracker {
    snapshot: AlertSnapshot,
    has_polled: bool,
}

impl AlertTracker {
    /// Creates a tracker in its pre-poll sentinel state.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            snapshot: AlertSnapshot {
                text: String::new(),
                captured_at: started_at,
            },
            has_polled: false,
        }
    }

    /// Evaluates a newly polled text against the stored snapshot.
    ///
    /// The check ordering is deliberate: the first observation after startup
    /// always records without announcing, whatever the text is.
    pub fn evaluate(&mut self, new_text: &str, now: DateTime<Utc>) -> AlertDecision {
        let new_text = new_text.trim();

        if !self.has_polled {
            self.has_polled = true;
            self.store(new_text, now);
            return AlertDecision::FirstObservation;
        }

        if new_text.is_empty() {
            if self.snapshot.text.is_empty() {
                return AlertDecision::Unchanged;
            }
            self.store("", now);
            return AlertDecision::ClearedToEmpty;
        }

        if new_text == self.snapshot.text {
            return AlertDecision::Unchanged;
        }

        self.store(new_text, now);
        AlertDecision::Changed
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> AlertSnapshot {
        self.snapshot.clone()
    }

    fn store(&mut self, text: &str, now: DateTime<Utc>) {
        self.snapshot = AlertSnapshot {
            text: text.to_string(),
            captured_at: now,
        };
    }
}
