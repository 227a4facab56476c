//! Error types for the document structure library.
//!
//! This module defines all error types that can occur while normalizing a
//! table of contents, splitting text into sections, and building the final
//! hierarchy.

/// Result type alias for document structure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document structure extraction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document reader collaborator failed; fatal for this document
    #[error("Document reader failed: {0}")]
    Reader(String),

    /// The table of contents is empty or no entry could be parsed
    #[error("Table of contents is empty or unparseable")]
    EmptyToc,

    /// A section title could not be located in the document text
    #[error("Title boundary not found for section '{title}'")]
    TitleNotFound {
        /// Title of the section whose boundary search failed
        title: String,
    },

    /// Cleanup configuration could not be read or parsed
    #[error("Invalid cleanup configuration '{path}': {reason}")]
    Config {
        /// Path of the configuration file
        path: String,
        /// Reason the configuration was rejected
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_error_message() {
        let err = Error::Reader("broken stream".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Document reader failed"));
        assert!(msg.contains("broken stream"));
    }

    #[test]
    fn test_title_not_found_message() {
        let err = Error::TitleNotFound {
            title: "1.2 Overview".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("1.2 Overview"));
    }

    #[test]
    fn test_config_error_message() {
        let err = Error::Config {
            path: "cleanup.json".to_string(),
            reason: "trailing comma".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("cleanup.json"));
        assert!(msg.contains("trailing comma"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
