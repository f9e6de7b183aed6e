//! Schema-to-source compilation.
//!
//! The compiler walks the schema graph depth-first from the root and emits
//! one declaration per named type. Records are written after the types
//! their fields reference, and a named type is registered before its
//! children are visited, so recursive schemas terminate and every type is
//! declared once.

use crate::csharp::{
    AUTO_GENERATED_BANNER, EnumWriter, FixedWriter, RecordWriter, TypeMapper, to_valid_identifier,
};
use crate::error::CodegenError;
use crate::options::GenerationOptions;
use crate::writer::SourceWriter;
use avronet_schema::{NodeId, SchemaGraph, SchemaTag};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Named types already declared in the current output.
///
/// Declarations are keyed by full Avro name, but C# sees only the simple
/// name, so the registry also remembers which full name took each one.
#[derive(Debug, Default)]
pub struct EmittedDeclarations {
    registered: HashSet<String>,
    type_names: HashMap<String, String>,
}

impl EmittedDeclarations {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fully-qualified name.
    ///
    /// Returns `false` if the name was already registered.
    pub fn try_register(&mut self, full_name: &str) -> bool {
        if self.registered.contains(full_name) {
            return false;
        }
        self.registered.insert(full_name.to_string())
    }

    /// Records that `full_name` is declared as the C# type `type_name`.
    ///
    /// Returns the full name that declared `type_name` first, if it differs.
    pub fn claim_type_name(&mut self, type_name: &str, full_name: &str) -> Option<String> {
        match self.type_names.get(type_name) {
            Some(first) if first != full_name => Some(first.clone()),
            Some(_) => None,
            None => {
                self.type_names
                    .insert(type_name.to_string(), full_name.to_string());
                None
            }
        }
    }
}

/// Result of compiling one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSchema {
    /// Complete source text.
    pub text: String,
    /// Fully-qualified names of the declared types, in output order.
    pub declarations: Vec<String>,
    /// Problems that did not prevent generation.
    pub warnings: Vec<String>,
}

/// Compiles one schema graph into a C# source file.
pub struct SchemaCompiler<'a> {
    graph: &'a SchemaGraph,
    options: &'a GenerationOptions,
    emitted: EmittedDeclarations,
    declarations: Vec<String>,
    warnings: Vec<String>,
    writer: SourceWriter,
}

impl<'a> SchemaCompiler<'a> {
    /// Creates a compiler for `graph`.
    #[must_use]
    pub fn new(graph: &'a SchemaGraph, options: &'a GenerationOptions) -> Self {
        Self {
            graph,
            options,
            emitted: EmittedDeclarations::new(),
            declarations: Vec::new(),
            warnings: Vec::new(),
            writer: SourceWriter::new(),
        }
    }

    /// Compiles the whole graph.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if a node does not match its tag.
    pub fn compile(mut self) -> Result<CompiledSchema, CodegenError> {
        let features = self.options.features;
        let namespace = self.options.namespace.trim();

        self.writer.line(AUTO_GENERATED_BANNER.trim_end());
        if features.nullable_annotations {
            self.writer.line("#nullable enable");
        }

        if namespace.is_empty() {
            self.write_schema(self.graph.root())?;
        } else if features.file_scoped_namespace {
            self.writer.line(format!("namespace {};", namespace));
            self.writer.blank_line();
            self.write_schema(self.graph.root())?;
        } else {
            self.writer.line(format!("namespace {}", namespace));
            self.writer.line("{");
            self.writer.indent();
            let result = self.write_schema(self.graph.root());
            self.writer.outdent();
            self.writer.line("}");
            result?;
        }

        if features.nullable_annotations {
            self.writer.line("#nullable restore");
        }

        Ok(CompiledSchema {
            text: self.writer.into_string(),
            declarations: self.declarations,
            warnings: self.warnings,
        })
    }

    fn write_schema(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let graph = self.graph;
        let node = graph.node(id);
        let tag = node.tag();

        if let Some(name) = node.name() {
            let full_name = name.full_name();
            if !self.emitted.try_register(&full_name) {
                debug!(name = %full_name, "already declared");
                return Ok(());
            }
            let type_name = to_valid_identifier(&name.name);
            if let Some(first) = self.emitted.claim_type_name(&type_name, &full_name) {
                warn!(
                    type_name = %type_name,
                    first = %first,
                    second = %full_name,
                    "duplicate C# type name"
                );
                self.warnings.push(format!(
                    "'{}' and '{}' are both declared as C# type '{}'",
                    first, full_name, type_name
                ));
            }
        }

        let mapper = TypeMapper::new(graph, self.options.features.nullable_annotations);
        match tag {
            SchemaTag::Null
            | SchemaTag::Boolean
            | SchemaTag::Int
            | SchemaTag::Long
            | SchemaTag::Float
            | SchemaTag::Double
            | SchemaTag::Bytes
            | SchemaTag::String
            | SchemaTag::Logical => return Ok(()),
            SchemaTag::Array => self.write_schema(node.as_array()?.items)?,
            SchemaTag::Map => self.write_schema(node.as_map()?.values)?,
            SchemaTag::Union => {
                for member in &node.as_union()?.members {
                    self.write_schema(*member)?;
                }
            }
            SchemaTag::Enumeration => {
                EnumWriter::new(self.options).write(&mut self.writer, node.as_enum()?);
                self.finish_declaration(node.full_name());
            }
            SchemaTag::Fixed => {
                FixedWriter::new(self.options).write(&mut self.writer, node.as_fixed()?);
                self.finish_declaration(node.full_name());
            }
            SchemaTag::Record => {
                let record = node.as_record()?;
                for field in &record.fields {
                    self.write_schema(field.schema)?;
                }
                RecordWriter::new(mapper, self.options).write_record(&mut self.writer, record);
                self.finish_declaration(node.full_name());
            }
            SchemaTag::Error => {
                let record = node.as_error()?;
                for field in &record.fields {
                    self.write_schema(field.schema)?;
                }
                RecordWriter::new(mapper, self.options).write_error(&mut self.writer, record);
                self.finish_declaration(node.full_name());
            }
        }
        Ok(())
    }

    fn finish_declaration(&mut self, full_name: Option<String>) {
        self.writer.blank_line();
        if let Some(name) = full_name {
            trace!(name = %name, "declared");
            self.declarations.push(name);
        }
    }
}

/// Compiles `graph` into C# source text.
///
/// # Errors
/// Returns `CodegenError` if compilation fails.
pub fn compile(graph: &SchemaGraph, options: &GenerationOptions) -> Result<String, CodegenError> {
    SchemaCompiler::new(graph, options)
        .compile()
        .map(|compiled| compiled.text)
}
