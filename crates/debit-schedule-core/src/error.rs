use thiserror::Error;

use crate::types::MonthKey;

#[derive(Debug, Error)]
pub enum DebitScheduleError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Occurrence table has no entry for {month}")]
    IncompleteSchedule { month: MonthKey },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DebitScheduleError {
    /// True for errors caused by the caller's payload rather than by the
    /// schedule computation itself.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::MissingField(_)
                | Self::DateError(_)
                | Self::SerializationError(_)
        )
    }
}

impl From<serde_json::Error> for DebitScheduleError {
    fn from(e: serde_json::Error) -> Self {
        DebitScheduleError::SerializationError(e.to_string())
    }
}
