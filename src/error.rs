use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate event id: {0}")]
    DuplicateEventId(u32),

    #[error("Invalid event {id}: {reason}")]
    InvalidEvent { id: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, CalviewError>;

impl CalviewError {
    pub fn invalid_event(id: u32, reason: impl Into<String>) -> Self {
        CalviewError::InvalidEvent {
            id,
            reason: reason.into(),
        }
    }

    /// True for errors caused by the injected event table rather than IO
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalviewError::DuplicateEventId(_) | CalviewError::InvalidEvent { .. } | CalviewError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_event_message() {
        let err = CalviewError::invalid_event(7, "bad date");
        assert_eq!(err.to_string(), "Invalid event 7: bad date");
        assert!(err.is_validation());
    }

    #[test]
    fn test_io_is_not_validation() {
        let err: CalviewError = std::io::Error::other("boom").into();
        assert!(!err.is_validation());
    }
}
