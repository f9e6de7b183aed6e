//! # AvroNet
//!
//! Compiles Avro JSON schemas into C# model declarations for the Apache
//! Avro specific-record runtime.
//!
//! ## Features
//!
//! - **Schema graph** - Avro JSON parsed into an arena with named-type
//!   references, recursion and logical types resolved
//! - **C# declarations** - records, errors, enums and fixed types with
//!   positional `Get`/`Put` accessors
//! - **Language-aware output** - nullable annotations, `init`, `required`
//!   and file-scoped namespaces follow the consumer's C# version
//! - **Batch generation** - per-type diagnostics, cancellation, one marker
//!   attribute source per run
//!
//! ## Quick Start
//!
//! ```
//! use avronet::prelude::*;
//!
//! let schema = r#"{"type":"record","name":"User","fields":[{"name":"Name","type":"string"}]}"#;
//! let request = GenerationOptions::new("User", schema)
//!     .namespace("Demo.Models")
//!     .features(LanguageFeatures::detect(LanguageVersion::CSharp11, true));
//!
//! let output = Generator::new().generate(&[request]);
//! assert!(!output.has_errors());
//! assert!(output.source("User.AvroModel.g.cs").is_some());
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Avro JSON parsing into a schema graph
//! - [`codegen`] - C# generation from schema graphs
//! - [`cli`] - Command-line front end used by the `avronet` binary

pub mod cli;
pub mod prelude;

/// Schema parsing into a typed graph.
pub mod schema {
    pub use avronet_schema::*;
}

/// C# code generation from schema graphs.
pub mod codegen {
    pub use avronet_codegen::*;
}

// Re-export commonly used items at the crate root
pub use avronet_codegen::{
    CodegenError, GeneratedSource, GenerationOptions, GenerationOutput, Generator, generate,
    generate_from_file,
};
pub use avronet_schema::{ParseError, SchemaGraph, parse_schema};
