//! Parsing and resolution of the deletion range argument.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// The ways a raw range token can fail validation.
///
/// These are surfaced to the invoking collaborator as a rejected request; no
/// deletion is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRangeError {
    /// No range was supplied.
    #[error("a range is required: pass `all` or a number of hours")]
    Missing,

    /// `me` is explicitly rejected: no self-service mass delete of the
    /// invoking context. Policy carve-out, not an oversight.
    #[error("no")]
    SelfTargetDisallowed,

    /// The token is neither `all` nor a positive finite number of hours.
    #[error("`{0}` is not a valid range: pass `all` or a positive number of hours")]
    Unparseable(String),
}

/// A validated time range for the deletion routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeletionRange {
    /// Delete the actor's entire history in the channel.
    All,
    /// Delete messages newer than this many hours. Always positive and
    /// finite.
    SinceHours(f64),
}

impl DeletionRange {
    /// Parses the raw command token into a validated range.
    pub fn parse(token: &str) -> Result<Self, InvalidRangeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(InvalidRangeError::Missing);
        }
        match token.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "me" => Err(InvalidRangeError::SelfTargetDisallowed),
            other => {
                let hours: f64 = other
                    .parse()
                    .map_err(|_| InvalidRangeError::Unparseable(token.to_string()))?;
                if !hours.is_finite() || hours <= 0.0 {
                    return Err(InvalidRangeError::Unparseable(token.to_string()));
                }
                Ok(Self::SinceHours(hours))
            }
        }
    }

    /// Resolves the lower time bound for history retrieval, `None` for an
    /// unbounded range.
    pub fn since(&self, invoked_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::All => None,
            Self::SinceHours(hours) => {
                let millis = (hours * 3_600_000.0) as i64;
                Some(invoked_at - Duration::milliseconds(millis))
            }
        }
    }
}
