//! Prelude module for convenient imports.
//!
//! ```
//! use avronet::prelude::*;
//! ```

// Schema types
pub use avronet_schema::{
    FieldSchema, Name, NodeId, ParseError, RecordSchema, SchemaError, SchemaGraph, SchemaNode,
    SchemaTag, parse_schema,
};

// Generation types
pub use avronet_codegen::{
    AccessLevel, CancellationFlag, CodegenError, DeclarationForm, Diagnostic, GeneratedSource,
    GenerationOptions, GenerationOutput, Generator, LanguageFeatures, LanguageVersion,
    ModelSettings, Severity,
};
