//! Enumeration and fixed declaration generation.

use super::identifier::{enum_member_names, to_valid_identifier};
use super::{write_declaration_header, write_schema_members};
use crate::options::GenerationOptions;
use crate::writer::SourceWriter;
use avronet_schema::{EnumSchema, FixedSchema};

const FIXED_BASE: &str = "global::Avro.Specific.SpecificFixed";

/// Generator for enumeration declarations.
pub struct EnumWriter<'a> {
    options: &'a GenerationOptions,
}

impl<'a> EnumWriter<'a> {
    /// Creates a new enum writer.
    #[must_use]
    pub fn new(options: &'a GenerationOptions) -> Self {
        Self { options }
    }

    /// Writes an enumeration with one member per symbol, in declared order.
    pub fn write(&self, w: &mut SourceWriter, schema: &EnumSchema) {
        let name = to_valid_identifier(&schema.name.name);
        write_declaration_header(
            w,
            schema.doc.as_deref(),
            &format!("{} enum {}", self.options.access.keyword(), name),
        );
        w.block(|w| {
            for member in enum_member_names(&name, schema) {
                w.line(format!("{},", member));
            }
        });
    }
}

/// Generator for fixed-size byte blob declarations.
pub struct FixedWriter<'a> {
    options: &'a GenerationOptions,
}

impl<'a> FixedWriter<'a> {
    /// Creates a new fixed writer.
    #[must_use]
    pub fn new(options: &'a GenerationOptions) -> Self {
        Self { options }
    }

    /// Writes a fixed declaration carrying its byte length.
    pub fn write(&self, w: &mut SourceWriter, schema: &FixedSchema) {
        let name = to_valid_identifier(&schema.name.name);
        write_declaration_header(
            w,
            schema.doc.as_deref(),
            &format!(
                "{} partial class {} : {}",
                self.options.access.keyword(),
                name,
                FIXED_BASE
            ),
        );
        w.block(|w| {
            write_schema_members(w, &name, &schema.json, true, self.options);
            w.line(format!("public uint FixedSize {{ get => {}; }}", schema.size));
            w.blank_line();
            w.line(format!("public {}() : base({})", name, schema.size));
            w.block(|w| {
                w.line(format!(
                    "((global::Avro.Generic.GenericFixed)this).Schema = (global::Avro.FixedSchema){}._SCHEMA;",
                    name
                ));
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::AccessLevel;
    use avronet_schema::parse_schema;

    #[test]
    fn test_enum_symbols_in_order() {
        let schema = r#"{"type":"enum","name":"Suit","doc":"Card suit.","symbols":["SPADES","HEARTS","DIAMONDS","CLUBS"]}"#;
        let graph = parse_schema(schema).expect("Failed to parse");
        let options = GenerationOptions::new("Suit", schema);
        let mut w = SourceWriter::new();
        EnumWriter::new(&options).write(&mut w, graph.root_node().as_enum().expect("enum"));
        assert_eq!(
            w.into_string(),
            "/// <summary>\n/// Card suit.\n/// </summary>\n\
             [global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"AvroNet\", \"1.0.0.0\")]\n\
             public enum Suit\n{\n    SPADES,\n    HEARTS,\n    DIAMONDS,\n    CLUBS,\n}\n"
        );
    }

    #[test]
    fn test_enum_keyword_symbols() {
        let schema = r#"{"type":"enum","name":"Kind","symbols":["int","string","OTHER"]}"#;
        let graph = parse_schema(schema).expect("Failed to parse");
        let options = GenerationOptions::new("Kind", schema).access(AccessLevel::Internal);
        let mut w = SourceWriter::new();
        EnumWriter::new(&options).write(&mut w, graph.root_node().as_enum().expect("enum"));
        let text = w.into_string();
        assert!(text.contains("internal enum Kind\n"));
        assert!(text.contains("    @int,\n    @string,\n    OTHER,\n"));
    }

    #[test]
    fn test_fixed_declaration() {
        let schema = r#"{"type":"fixed","name":"Md5","size":16}"#;
        let graph = parse_schema(schema).expect("Failed to parse");
        let options = GenerationOptions::new("Md5", schema);
        let mut w = SourceWriter::new();
        FixedWriter::new(&options).write(&mut w, graph.root_node().as_fixed().expect("fixed"));
        assert_eq!(
            w.into_string(),
            "[global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"AvroNet\", \"1.0.0.0\")]\n\
             public partial class Md5 : global::Avro.Specific.SpecificFixed\n\
             {\n\
             \x20   public static readonly global::Avro.Schema _SCHEMA = global::Avro.Schema.Parse(SchemaJson);\n\
             \x20   public override global::Avro.Schema Schema { get => Md5._SCHEMA; }\n\
             \x20   public uint FixedSize { get => 16; }\n\
             \n\
             \x20   public Md5() : base(16)\n\
             \x20   {\n\
             \x20       ((global::Avro.Generic.GenericFixed)this).Schema = (global::Avro.FixedSchema)Md5._SCHEMA;\n\
             \x20   }\n\
             }\n"
        );
    }
}
