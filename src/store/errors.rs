//! # Store Errors

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid principal: {0:?}")]
    InvalidPrincipal(String),

    #[error("Query not found: {0}")]
    QueryNotFound(String),

    #[error("Recommendation {recommendation_id} not found for query {query_id}")]
    RecommendationNotFound {
        query_id: String,
        recommendation_id: u32,
    },

    #[error("Checksum mismatch on line {0}")]
    ChecksumMismatch(usize),

    #[error("Corrupt record on line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidPrincipal(_) => "DBO_STORE_INVALID_PRINCIPAL",
            StoreError::QueryNotFound(_) => "DBO_STORE_QUERY_NOT_FOUND",
            StoreError::RecommendationNotFound { .. } => "DBO_STORE_RECOMMENDATION_NOT_FOUND",
            StoreError::ChecksumMismatch(_) => "DBO_STORE_CHECKSUM_MISMATCH",
            StoreError::CorruptRecord { .. } => "DBO_STORE_CORRUPT_RECORD",
            StoreError::Serialization(_) => "DBO_STORE_SERIALIZATION",
            StoreError::IoError(_) => "DBO_STORE_IO",
            StoreError::Internal(_) => "DBO_STORE_INTERNAL",
        }
    }

    /// Returns true if stored data failed verification
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            StoreError::ChecksumMismatch(_) | StoreError::CorruptRecord { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::QueryNotFound("q".into()).code(),
            "DBO_STORE_QUERY_NOT_FOUND"
        );
        assert_eq!(StoreError::ChecksumMismatch(3).code(), "DBO_STORE_CHECKSUM_MISMATCH");
    }

    #[test]
    fn test_corruption_classification() {
        assert!(StoreError::ChecksumMismatch(1).is_corruption());
        assert!(StoreError::CorruptRecord {
            line: 1,
            reason: "x".into()
        }
        .is_corruption());
        assert!(!StoreError::Internal("x".into()).is_corruption());
    }

    #[test]
    fn test_display() {
        let err = StoreError::RecommendationNotFound {
            query_id: "abc-0".into(),
            recommendation_id: 4,
        };
        assert_eq!(err.to_string(), "Recommendation 4 not found for query abc-0");
    }
}
