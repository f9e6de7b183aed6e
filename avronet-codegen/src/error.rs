//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] avronet_schema::ParseError),

    /// Schema graph error (a typed view did not match the node kind).
    #[error("schema error: {0}")]
    Schema(#[from] avronet_schema::SchemaError),

    /// The requested type carries no schema text.
    #[error("no schema text supplied for type '{type_name}'")]
    MissingSchema {
        /// Requested type name.
        type_name: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    /// Creates a missing schema error for the given type.
    pub fn missing_schema(type_name: impl Into<String>) -> Self {
        Self::MissingSchema {
            type_name: type_name.into(),
        }
    }

    /// Returns the diagnostic code reported for this error.
    #[must_use]
    pub const fn diagnostic_code(&self) -> &'static str {
        match self {
            Self::MissingSchema { .. } => "AVRO001",
            Self::Parse(_) => "AVRO002",
            Self::Schema(_) | Self::Io(_) => "AVRO003",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_schema_display() {
        let err = CodegenError::missing_schema("User");
        assert_eq!(err.to_string(), "no schema text supplied for type 'User'");
        assert_eq!(err.diagnostic_code(), "AVRO001");
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse = avronet_schema::parse_schema("{").unwrap_err();
        let err: CodegenError = parse.into();
        assert!(err.to_string().starts_with("schema parse error"));
        assert_eq!(err.diagnostic_code(), "AVRO002");
    }

    #[test]
    fn test_internal_errors_share_code() {
        let io: CodegenError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io.to_string(), "IO error: gone");
        assert_eq!(io.diagnostic_code(), "AVRO003");

        let graph = avronet_schema::parse_schema(r#""int""#).expect("Failed to parse");
        let schema: CodegenError = graph.root_node().as_record().unwrap_err().into();
        assert_eq!(schema.diagnostic_code(), "AVRO003");
    }
}
