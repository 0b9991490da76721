//! Submission parsing and validation.
//!
//! Bodies are decoded with `serde_json` straight into typed submissions, so
//! a numeric field sent as text (`"0.8"`) fails decoding rather than being
//! coerced. The decoded value is then checked with `validator` rules.
//! Nothing is written unless both steps pass.

use chrono::{DateTime, Utc};
use leaderboard_types::{ChallengeRunRecord, RunId, RunRecord};
use serde::Deserialize;
use serde::de::DeserializeOwned;
pub use validator::Validate;

/// Why a submission was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The body is not JSON, or a field is missing or has the wrong type.
    #[error("malformed submission: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The body decoded but a field breaks a rule (e.g. empty name).
    #[error("invalid submission: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Decode and validate a submission body.
///
/// # Errors
///
/// Returns [`SubmissionError::Malformed`] if decoding fails and
/// [`SubmissionError::Invalid`] if a validation rule fails.
pub fn parse<T>(body: &[u8]) -> Result<T, SubmissionError>
where
    T: DeserializeOwned + Validate,
{
    let submission: T = serde_json::from_slice(body)?;
    submission.validate()?;
    Ok(submission)
}

/// A run of a timed game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct RunSubmission {
    /// Player name, free text.
    #[validate(length(min = 1))]
    pub player_name: String,
    /// Completion time in milliseconds.
    #[validate(range(min = 0))]
    pub completion_time_ms: i64,
    /// Optional UI language tag.
    #[serde(default)]
    pub language: Option<String>,
}

impl RunSubmission {
    /// Turn the accepted submission into an immutable record.
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> RunRecord {
        RunRecord {
            id: RunId::new(),
            player_name: self.player_name,
            completion_time_ms: self.completion_time_ms,
            language: normalize_language(self.language),
            submitted_at,
        }
    }
}

/// A run of the Reynolds flow challenge.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct ChallengeSubmission {
    /// Player name, free text.
    #[validate(length(min = 1))]
    pub player_name: String,
    /// Completion time in milliseconds.
    #[validate(range(min = 0))]
    pub completion_time_ms: i64,
    /// Highest flow velocity reached.
    pub peak_velocity: f64,
    /// Average flow ratio, the ranked metric.
    pub flow_ratio_avg: f64,
    /// Flow ratio at stage 3.
    pub flow_ratio_3: f64,
    /// Flow ratio at stage 4.
    pub flow_ratio_4: f64,
    /// Flow ratio at stage 5.
    pub flow_ratio_5: f64,
    /// Optional UI language tag.
    #[serde(default)]
    pub language: Option<String>,
}

impl ChallengeSubmission {
    /// Turn the accepted submission into an immutable record.
    pub fn into_record(self, submitted_at: DateTime<Utc>) -> ChallengeRunRecord {
        ChallengeRunRecord {
            id: RunId::new(),
            player_name: self.player_name,
            completion_time_ms: self.completion_time_ms,
            peak_velocity: self.peak_velocity,
            flow_ratio_avg: self.flow_ratio_avg,
            flow_ratio_3: self.flow_ratio_3,
            flow_ratio_4: self.flow_ratio_4,
            flow_ratio_5: self.flow_ratio_5,
            language: normalize_language(self.language),
            submitted_at,
        }
    }
}

/// A River Guardian score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct ScoreSubmission {
    /// Player name, unique key of the high-score table.
    #[validate(length(min = 1))]
    pub player_name: String,
    /// Score reached in the run.
    pub score: i64,
}

/// An empty language tag means "not reported".
fn normalize_language(language: Option<String>) -> Option<String> {
    language.filter(|l| !l.is_empty())
}
