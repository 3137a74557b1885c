//! Store Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Target document does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Write precondition failed (someone else wrote first)
    #[error("Revision conflict on {path}: expected {expected}, found {actual}")]
    RevisionConflict {
        path: String,
        expected: u64,
        actual: u64,
    },

    /// Backend unavailable or failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Check if re-running the operation against fresh data can succeed
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::RevisionConflict { .. })
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_only_revision_conflicts_are_retryable() {
        let conflict = StoreError::RevisionConflict {
            path: "customers/c-1".into(),
            expected: 1,
            actual: 2,
        };
        assert!(conflict.is_conflict());
        assert!(!StoreError::NotFound("customers/c-1".into()).is_conflict());
        assert!(!StoreError::Backend("timeout".into()).is_conflict());
    }

    #[test]
    fn test_poisoned_lock() {
        let lock = Arc::new(Mutex::new(()));
        let held = lock.clone();
        let _ = std::thread::spawn(move || {
            let _guard = held.lock().unwrap();
            panic!("writer died");
        })
        .join();

        let err: StoreError = lock.lock().unwrap_err().into();
        assert!(matches!(err, StoreError::Poisoned));
    }
}
