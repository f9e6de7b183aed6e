//! # AvroNet Codegen
//!
//! C# model generation from Avro JSON schemas.
//!
//! This crate provides:
//! - Type mapping from Avro schemas to C# types
//! - Record, error, enum and fixed declaration generation
//! - Positional `Get`/`Put` accessors for the Avro specific runtime
//! - Batch generation with per-type diagnostics
//!
//! ```
//! use avronet_codegen::{GenerationOptions, generate};
//!
//! let schema = r#"{"type":"enum","name":"Suit","symbols":["SPADES","HEARTS"]}"#;
//! let source = generate(&GenerationOptions::new("Suit", schema).namespace("Cards"))
//!     .expect("Failed to generate");
//! assert!(source.contains("public enum Suit"));
//! ```

pub mod compiler;
pub mod csharp;
pub mod error;
pub mod generator;
pub mod options;
pub mod writer;

pub use compiler::{CompiledSchema, EmittedDeclarations, SchemaCompiler, compile};
pub use error::CodegenError;
pub use generator::{
    CancellationFlag, Diagnostic, GeneratedSource, GenerationOutput, Generator, Severity,
    attribute_source, generate_one,
};
pub use options::{
    AccessLevel, DeclarationForm, GenerationOptions, LanguageFeatures, LanguageVersion,
    ModelRequest, ModelSettings,
};

/// Generates C# source from the schema text carried by `options`.
///
/// # Errors
/// Returns `CodegenError` if the schema is missing, cannot be parsed or
/// cannot be compiled.
pub fn generate(options: &GenerationOptions) -> Result<String, CodegenError> {
    generate_one(options).map(|source| source.text)
}

/// Generates C# source from an Avro schema file.
///
/// The file contents replace the schema text of `options`.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    options: &GenerationOptions,
) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate(&options.clone().schema_text(json))
}
