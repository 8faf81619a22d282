//! Synchronization layer error types.

use std::fmt;

/// Errors that can occur while setting up barrier tracking.
///
/// The tracker itself never fails; these come from configuration and from
/// binding a recorder to a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// An invalid parameter was provided.
    InvalidParameter(String),
    /// A required device feature is not supported.
    FeatureNotSupported(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::FeatureNotSupported(msg) => write!(f, "feature not supported: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::InvalidParameter("bad barrier mode".to_string());
        assert_eq!(err.to_string(), "invalid parameter: bad barrier mode");

        let err = SyncError::FeatureNotSupported("synchronization2".to_string());
        assert_eq!(err.to_string(), "feature not supported: synchronization2");
    }
}
