//! Error types for schema parsing and graph access.

use crate::types::SchemaTag;
use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on {element} schema")]
    MissingAttribute {
        /// Schema kind.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on {element} schema")]
    InvalidAttribute {
        /// Schema kind.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown type name or reference.
    #[error("unknown type '{type_name}'")]
    UnknownType {
        /// Type name as written in the schema.
        type_name: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (record, enum, etc.).
        kind: String,
        /// Fully-qualified name of the duplicate.
        name: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown type error.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            type_name: type_name.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

/// Error type for operations on a parsed schema graph.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A typed view was requested for a node of another kind.
    #[error("invalid cast: expected {expected} schema, found {found}")]
    InvalidCast {
        /// Requested kind.
        expected: SchemaTag,
        /// Actual kind of the node.
        found: SchemaTag,
    },

    /// Named type not found in the graph.
    #[error("type '{name}' not found")]
    TypeNotFound {
        /// Fully-qualified name.
        name: String,
    },
}

impl SchemaError {
    /// Creates an invalid cast error.
    #[must_use]
    pub const fn invalid_cast(expected: SchemaTag, found: SchemaTag) -> Self {
        Self::InvalidCast { expected, found }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attr_display() {
        let err = ParseError::missing_attr("record", "fields");
        assert_eq!(
            err.to_string(),
            "missing required attribute 'fields' on record schema"
        );
    }

    #[test]
    fn test_invalid_attr_display() {
        let err = ParseError::invalid_attr("fixed", "size", "-1");
        assert_eq!(
            err.to_string(),
            "invalid value '-1' for attribute 'size' on fixed schema"
        );
    }

    #[test]
    fn test_duplicate_display() {
        let err = ParseError::duplicate("record", "com.example.User");
        assert_eq!(
            err.to_string(),
            "duplicate record definition: 'com.example.User'"
        );
    }

    #[test]
    fn test_invalid_cast_display() {
        let err = SchemaError::invalid_cast(SchemaTag::Record, SchemaTag::Enumeration);
        assert_eq!(err.to_string(), "invalid cast: expected record schema, found enum");
    }

    #[test]
    fn test_parse_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ParseError = json_err.into();
        assert!(matches!(err, ParseError::Json(_)));

        let schema_err: SchemaError = err.into();
        assert!(schema_err.to_string().starts_with("parse error: JSON parsing error"));
    }
}
