use thiserror::Error;

/// Top-level error type for the Fieldeaze workspace.
///
/// Covers the failure modes of loading configuration and reference data.
/// The chat crate defines its own error types for turn-level validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FieldeazeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for FieldeazeError {
    fn from(err: toml::de::Error) -> Self {
        FieldeazeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for FieldeazeError {
    fn from(err: toml::ser::Error) -> Self {
        FieldeazeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for FieldeazeError {
    fn from(err: serde_json::Error) -> Self {
        FieldeazeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Fieldeaze operations.
pub type Result<T> = std::result::Result<T, FieldeazeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldeazeError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(FieldeazeError, &str)> = vec![
            (
                FieldeazeError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                FieldeazeError::Catalog("no services".to_string()),
                "Catalog error: no services",
            ),
            (
                FieldeazeError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FieldeazeError = io_err.into();
        assert!(matches!(err, FieldeazeError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_from_io_preserves_kind() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        match FieldeazeError::from(io_err) {
            FieldeazeError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("Expected Io variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_toml_de() {
        let toml_err = toml::from_str::<toml::Value>("[broken").unwrap_err();
        let err: FieldeazeError = toml_err.into();
        assert!(matches!(err, FieldeazeError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FieldeazeError = json_err.into();
        assert!(matches!(err, FieldeazeError::Serialization(_)));
    }
}
