//! All error types for the locsheet crate.
//!
//! These are returned from all fallible operations (table edits, folder
//! loading, snapshot encoding/decoding).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("key `{0}` already exists in the active group")]
    DuplicateKey(String),

    #[error("unknown key `{0}` in the active group")]
    UnknownKey(String),

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("unknown group `{0}`")]
    UnknownGroup(String),

    #[error("no group selected")]
    NoActiveGroup,

    #[error("key must not be empty")]
    EmptyKey,

    #[error("nothing to export")]
    EmptyExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache error: {0}")]
    Cache(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_directory_not_found_display() {
        let error = Error::DirectoryNotFound(PathBuf::from("/no/such/place"));
        assert_eq!(error.to_string(), "directory not found: /no/such/place");
    }

    #[test]
    fn test_duplicate_key_display() {
        let error = Error::DuplicateKey("hello".to_string());
        assert_eq!(
            error.to_string(),
            "key `hello` already exists in the active group"
        );
    }

    #[test]
    fn test_unknown_key_display() {
        let error = Error::UnknownKey("missing".to_string());
        assert_eq!(
            error.to_string(),
            "unknown key `missing` in the active group"
        );
    }

    #[test]
    fn test_unknown_language_display() {
        let error = Error::UnknownLanguage("xx".to_string());
        assert_eq!(error.to_string(), "unknown language `xx`");
    }

    #[test]
    fn test_io_error_wrapping() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error = Error::from(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_empty_export_display() {
        assert_eq!(Error::EmptyExport.to_string(), "nothing to export");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownGroup("Main".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownGroup"));
        assert!(debug.contains("Main"));
    }
}
