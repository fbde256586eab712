use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("raster has no area ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(String),
}

/// Outcome of a failed submission, surfaced to the user with a retry button.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("could not serialize canvas: {0}")]
    Encode(#[from] RasterError),
    #[error("could not build request: {0}")]
    Request(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl SubmitError {
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitError::Network(_) => true,
            SubmitError::Status(code) => *code >= 500 || *code == 429,
            SubmitError::Encode(_) | SubmitError::Request(_) | SubmitError::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(SubmitError::Network("offline".into()).is_retryable());
        assert!(SubmitError::Status(503).is_retryable());
        assert!(SubmitError::Status(429).is_retryable());
        assert!(!SubmitError::Status(400).is_retryable());
        assert!(!SubmitError::Decode("eof".into()).is_retryable());
        assert!(!SubmitError::Request("key must be a string".into()).is_retryable());
        assert!(!SubmitError::from(RasterError::Empty {
            width: 0,
            height: 0
        })
        .is_retryable());
    }

    #[test]
    fn messages_are_readable() {
        assert_eq!(
            SubmitError::Status(502).to_string(),
            "server responded with status 502"
        );
        assert_eq!(
            SubmitError::from(RasterError::Empty {
                width: 0,
                height: 4
            })
            .to_string(),
            "could not serialize canvas: raster has no area (0x4)"
        );
    }
}
