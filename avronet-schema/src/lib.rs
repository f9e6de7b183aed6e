//! # AvroNet Schema
//!
//! Avro JSON schema parser and type definitions.
//!
//! This crate provides:
//! - Schema parsing from Avro JSON text
//! - An arena-backed schema graph with name resolution
//! - Kind classification and per-kind typed views
//! - Record, enum and fixed definitions for code generation

pub mod error;
pub mod parser;
pub mod records;
pub mod types;

pub use error::{ParseError, SchemaError};
pub use parser::{parse_schema, parse_schema_value};
pub use records::{FieldSchema, RecordSchema};
pub use types::{
    ArraySchema, EnumSchema, FixedSchema, LogicalKind, LogicalSchema, MapSchema, Name, NodeId,
    PrimitiveType, SchemaGraph, SchemaNode, SchemaTag, UnionSchema,
};
