//! Record and error declaration generation.

use super::accessors::FieldAccessBuilder;
use super::identifier::{record_member_names, to_valid_identifier};
use super::literal::summary_lines;
use super::types::TypeMapper;
use super::{write_declaration_header, write_schema_members};
use crate::options::GenerationOptions;
use crate::writer::SourceWriter;
use avronet_schema::RecordSchema;

const RECORD_BASE: &str = "global::Avro.Specific.ISpecificRecord";
const ERROR_BASE: &str = "global::Avro.Specific.SpecificException";

/// Generator for record and error declarations.
pub struct RecordWriter<'a> {
    mapper: TypeMapper<'a>,
    options: &'a GenerationOptions,
}

impl<'a> RecordWriter<'a> {
    /// Creates a new record writer.
    #[must_use]
    pub fn new(mapper: TypeMapper<'a>, options: &'a GenerationOptions) -> Self {
        Self { mapper, options }
    }

    /// Writes a record declaration.
    pub fn write_record(&self, w: &mut SourceWriter, record: &RecordSchema) {
        self.write(w, record, false);
    }

    /// Writes an error declaration, derived from the runtime exception base.
    pub fn write_error(&self, w: &mut SourceWriter, record: &RecordSchema) {
        self.write(w, record, true);
    }

    fn write(&self, w: &mut SourceWriter, record: &RecordSchema, is_error: bool) {
        let features = &self.options.features;
        let name = to_valid_identifier(&record.name.name);
        let base = if is_error { ERROR_BASE } else { RECORD_BASE };
        let members = record_member_names(&name, &record.fields);

        write_declaration_header(
            w,
            record.doc.as_deref(),
            &format!(
                "{} {} {} : {}",
                self.options.access.keyword(),
                self.options.form.keyword(),
                name,
                base
            ),
        );
        w.block(|w| {
            write_schema_members(w, &name, &record.json, is_error, self.options);
            w.blank_line();

            let mut accessors = FieldAccessBuilder::new(&name, is_error, features);
            for (field, member) in record.fields.iter().zip(&members) {
                let symbol = self.mapper.type_for(field.schema, false);
                let required = features.required_modifier && !symbol.is_nullable;
                let mut initializer = self
                    .mapper
                    .default_literal_for(field.schema, field.default.as_ref());
                if initializer.is_none()
                    && !required
                    && !symbol.is_nullable
                    && features.nullable_annotations
                {
                    initializer = Some("default!".to_string());
                }

                for line in summary_lines(field.doc.as_deref()) {
                    w.line(line);
                }
                w.line(format!(
                    "public {}{} {} {{ get; {}; }}{}",
                    if required { "required " } else { "" },
                    symbol,
                    member,
                    if features.init_only_mutators { "init" } else { "set" },
                    initializer
                        .map(|value| format!(" = {};", value))
                        .unwrap_or_default()
                ));
                accessors.add_field(member.as_str(), symbol.expression);
            }
            if !record.fields.is_empty() {
                w.blank_line();
            }

            accessors.write_to(w);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AccessLevel, DeclarationForm, LanguageFeatures};
    use avronet_schema::parse_schema;

    const USER: &str = r#"{
        "type": "record",
        "name": "User",
        "namespace": "demo",
        "doc": "A user.",
        "fields": [
            {"name": "Name", "type": "string"},
            {"name": "Age", "type": "int", "default": 18},
            {"name": "Description", "type": ["null", "string"], "doc": "Free text."}
        ]
    }"#;

    fn render(schema: &str, options: &GenerationOptions) -> String {
        let graph = parse_schema(schema).expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, options.features.nullable_annotations);
        let writer = RecordWriter::new(mapper, options);
        let mut w = SourceWriter::new();
        match graph.root_node() {
            avronet_schema::SchemaNode::Error(r) => writer.write_error(&mut w, r),
            node => writer.write_record(&mut w, node.as_record().expect("record")),
        }
        w.into_string()
    }

    #[test]
    fn test_user_record_all_features() {
        let options = GenerationOptions::new("User", USER).features(LanguageFeatures::all());
        let text = render(USER, &options);
        assert!(text.starts_with(
            "/// <summary>\n/// A user.\n/// </summary>\n\
             [global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"AvroNet\", \"1.0.0.0\")]\n\
             public partial class User : global::Avro.Specific.ISpecificRecord\n{\n"
        ));
        assert!(text.contains("    public static readonly global::Avro.Schema _SCHEMA = global::Avro.Schema.Parse(SchemaJson);\n"));
        assert!(text.contains("    public global::Avro.Schema Schema { get => User._SCHEMA; }\n"));
        assert!(text.contains("    public required string Name { get; init; }\n"));
        assert!(text.contains("    public required int Age { get; init; } = 18;\n"));
        assert!(text.contains(
            "    /// <summary>\n    /// Free text.\n    /// </summary>\n    public string? Description { get; init; }\n"
        ));
        assert!(text.contains("        case 2: Set_Description(this, (string?)fieldValue!); break;\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_user_record_no_features() {
        let options = GenerationOptions::new("User", USER);
        let text = render(USER, &options);
        assert!(text.contains("    public string Name { get; set; }\n"));
        assert!(text.contains("    public int Age { get; set; } = 18;\n"));
        assert!(text.contains("    public string Description { get; set; }\n"));
        assert!(text.contains("        case 0: this.Name = (string)fieldValue; break;\n"));
        assert!(!text.contains("required"));
        assert!(!text.contains("default!"));
    }

    #[test]
    fn test_nullable_without_required() {
        let mut features = LanguageFeatures::all();
        features.required_modifier = false;
        let options = GenerationOptions::new("User", USER).features(features);
        let text = render(USER, &options);
        assert!(text.contains("    public string Name { get; init; } = default!;\n"));
        assert!(text.contains("    public int Age { get; init; } = 18;\n"));
        assert!(text.contains("    public string? Description { get; init; }\n"));
    }

    #[test]
    fn test_nested_record_uses_literal_schema() {
        let options = GenerationOptions::new("Other", USER);
        let text = render(USER, &options);
        assert!(text.contains("global::Avro.Schema.Parse(\"{\\\"type\\\":\\\"record\\\",\\\"name\\\":\\\"User\\\""));
        assert!(!text.contains("Parse(SchemaJson)"));
    }

    #[test]
    fn test_error_declaration_overrides() {
        let schema = r#"{"type":"error","name":"Failure","fields":[{"name":"Reason","type":"string"}]}"#;
        let options = GenerationOptions::new("Failure", schema)
            .access(AccessLevel::Internal)
            .form(DeclarationForm::Record);
        let text = render(schema, &options);
        assert!(text.contains(
            "internal partial record Failure : global::Avro.Specific.SpecificException\n"
        ));
        assert!(text.contains("    public override global::Avro.Schema Schema { get => Failure._SCHEMA; }\n"));
        assert!(text.contains("    public override object Get(int fieldPos)\n"));
        assert!(text.contains("    public override void Put(int fieldPos, object fieldValue)\n"));
    }

    #[test]
    fn test_decimal_field_without_default_has_no_initializer() {
        let schema = r#"{"type":"record","name":"Price","fields":[
            {"name":"Amount","type":{"type":"bytes","logicalType":"decimal","precision":9,"scale":2}}
        ]}"#;
        let text = render(schema, &GenerationOptions::new("Price", schema));
        assert!(text.contains("    public global::Avro.AvroDecimal Amount { get; set; }\n"));

        let options = GenerationOptions::new("Price", schema).features(LanguageFeatures::all());
        let text = render(schema, &options);
        assert!(text.contains("    public required global::Avro.AvroDecimal Amount { get; init; }\n"));
        assert!(!text.contains("Amount { get; init; } ="));
    }

    #[test]
    fn test_field_order_sets_positions() {
        let ordered = r#"{"type":"record","name":"T","fields":[
            {"name":"a","type":"int"},{"name":"b","type":"int"},{"name":"c","type":"int"}
        ]}"#;
        let reordered = r#"{"type":"record","name":"T","fields":[
            {"name":"c","type":"int"},{"name":"a","type":"int"},{"name":"b","type":"int"}
        ]}"#;

        let text = render(ordered, &GenerationOptions::new("T", ordered));
        assert!(text.contains(
            "        case 0: return this.a;\n        case 1: return this.b;\n        case 2: return this.c;\n"
        ));

        let text = render(reordered, &GenerationOptions::new("T", reordered));
        assert!(text.contains(
            "        case 0: return this.c;\n        case 1: return this.a;\n        case 2: return this.b;\n"
        ));
        assert!(text.contains("        case 0: this.c = (int)fieldValue; break;\n"));
        assert!(text.contains("        case 2: this.b = (int)fieldValue; break;\n"));
    }

    #[test]
    fn test_undecodable_decimal_default_is_dropped() {
        let schema = r#"{"type":"record","name":"Price","fields":[
            {"name":"Amount","type":{"type":"bytes","logicalType":"decimal","precision":9,"scale":2},"default":"\u0000"}
        ]}"#;
        let mut features = LanguageFeatures::all();
        features.required_modifier = false;
        features.nullable_annotations = false;
        let options = GenerationOptions::new("Price", schema).features(features);
        let text = render(schema, &options);
        assert!(text.contains("    public global::Avro.AvroDecimal Amount { get; init; }\n"));
    }

    #[test]
    fn test_colliding_field_names() {
        let schema = r#"{"type":"record","name":"Thing","fields":[
            {"name":"Schema","type":"int"},
            {"name":"class","type":"int"}
        ]}"#;
        let options = GenerationOptions::new("Thing", schema);
        let text = render(schema, &options);
        assert!(text.contains("    public int Schema_1 { get; set; }\n"));
        assert!(text.contains("    public int @class { get; set; }\n"));
        assert!(text.contains("        case 1: return this.@class;\n"));
    }
}
