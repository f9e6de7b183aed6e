//! C# code generation modules.

pub mod accessors;
pub mod defaults;
pub mod enums;
pub mod identifier;
pub mod literal;
pub mod records;
pub mod types;

pub use accessors::{FieldAccessBuilder, MutationStrategy};
pub use enums::{EnumWriter, FixedWriter};
pub use identifier::{MemberScope, metadata_name, to_valid_identifier};
pub use records::RecordWriter;
pub use types::{TypeMapper, TypeSymbol};

use crate::options::GenerationOptions;
use crate::writer::SourceWriter;
use literal::{string_literal, summary_lines};
use serde_json::Value;

/// `GeneratedCodeAttribute` line placed on every declaration.
pub const GENERATED_CODE_ATTRIBUTE: &str = "[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"AvroNet\", \"1.0.0.0\")]";

/// Banner written at the top of every generated file.
pub const AUTO_GENERATED_BANNER: &str = "\
//------------------------------------------------------------------------------
// <auto-generated>
//     This code was generated by a tool.
//
//     Changes to this file may cause incorrect behavior and will be lost if
//     the code is regenerated.
// </auto-generated>
//------------------------------------------------------------------------------
";

/// Name of the constant holding the annotated type's schema text.
pub const SCHEMA_JSON_CONSTANT: &str = "SchemaJson";

/// Writes the doc comment, attribute and declaration line of a type.
pub(crate) fn write_declaration_header(w: &mut SourceWriter, doc: Option<&str>, declaration: &str) {
    for line in summary_lines(doc) {
        w.line(line);
    }
    w.line(GENERATED_CODE_ATTRIBUTE);
    w.line(declaration);
}

/// Writes the `_SCHEMA` field and the `Schema` property.
pub(crate) fn write_schema_members(
    w: &mut SourceWriter,
    owner: &str,
    json: &Value,
    is_override: bool,
    options: &GenerationOptions,
) {
    let source = if metadata_name(owner) == metadata_name(&options.type_name) {
        SCHEMA_JSON_CONSTANT.to_string()
    } else {
        string_literal(&json.to_string())
    };
    w.line(format!(
        "public static readonly global::Avro.Schema _SCHEMA = global::Avro.Schema.Parse({});",
        source
    ));
    w.line(format!(
        "public {}global::Avro.Schema Schema {{ get => {}._SCHEMA; }}",
        if is_override { "override " } else { "" },
        owner
    ));
}
