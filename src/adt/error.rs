// ABOUTME: Error types for Apple device tree decoding
// ABOUTME: Provides no_std compatible error handling derived with thiserror

use alloc::string::{String, ToString};
use serde_json::error::Category;

/// Main error type for ADT decoding and rendering operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdtError {
    /// A structured read would run past the end of the input buffer
    #[error("read of {needed} bytes at offset {offset} exceeds buffer of {available} bytes")]
    OutOfBounds {
        /// Offset the read started at
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Total length of the buffer
        available: usize,
    },
    /// Node nesting went deeper than the configured limit
    #[error("device tree nesting exceeds maximum depth of {max_depth}")]
    MaxDepthExceeded {
        /// The limit that was tripped
        max_depth: usize,
    },
    /// The JSON backend failed to render or write the tree
    #[error("JSON serialization failed: {0}")]
    Serialize(SerializeError),
}

impl AdtError {
    /// True for errors caused by truncated or inconsistent input
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, AdtError::OutOfBounds { .. })
    }
}

impl From<serde_json::Error> for AdtError {
    fn from(err: serde_json::Error) -> Self {
        AdtError::Serialize(SerializeError::from(err))
    }
}

/// Failure reported by the JSON backend.
///
/// Keeps the backend's classification so callers can tell a failing sink
/// apart from a tree that could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SerializeError {
    category: Category,
    #[cfg(feature = "std")]
    io_kind: Option<std::io::ErrorKind>,
    message: String,
}

impl SerializeError {
    /// Backend classification of the failure
    pub fn category(&self) -> Category {
        self.category
    }

    /// True when writing to the sink failed
    pub fn is_io(&self) -> bool {
        self.category == Category::Io
    }

    /// Kind of the underlying I/O error, if the sink failed
    #[cfg(feature = "std")]
    pub fn io_error_kind(&self) -> Option<std::io::ErrorKind> {
        self.io_kind
    }
}

impl From<serde_json::Error> for SerializeError {
    fn from(err: serde_json::Error) -> Self {
        SerializeError {
            category: err.classify(),
            #[cfg(feature = "std")]
            io_kind: err.io_error_kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_out_of_bounds_message() {
        let err = AdtError::OutOfBounds {
            offset: 8,
            needed: 36,
            available: 20,
        };
        assert_eq!(
            err.to_string(),
            "read of 36 bytes at offset 8 exceeds buffer of 20 bytes"
        );
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn test_max_depth_message() {
        let err = AdtError::MaxDepthExceeded { max_depth: 4 };
        assert_eq!(
            err.to_string(),
            "device tree nesting exceeds maximum depth of 4"
        );
        assert!(!err.is_out_of_bounds());
    }

    #[test]
    fn test_serialize_error_keeps_category() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AdtError::from(json_err);
        match &err {
            AdtError::Serialize(inner) => {
                assert_eq!(inner.category(), Category::Eof);
                assert!(!inner.is_io());
            }
            other => panic!("expected Serialize, got {other:?}"),
        }
        assert!(err.to_string().starts_with("JSON serialization failed: "));
    }
}
