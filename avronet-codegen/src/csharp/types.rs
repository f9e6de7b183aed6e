//! Mapping of Avro schema nodes to C# type expressions.

use super::identifier::to_valid_identifier;
use avronet_schema::{LogicalKind, NodeId, PrimitiveType, SchemaGraph, SchemaNode};
use std::fmt;

/// Interface implemented by generated list types.
pub const LIST_INTERFACE: &str = "global::System.Collections.Generic.IList";
/// Concrete list type used by default values.
pub const LIST_TYPE: &str = "global::System.Collections.Generic.List";
/// Interface implemented by generated map types.
pub const DICTIONARY_INTERFACE: &str = "global::System.Collections.Generic.IDictionary";
/// Concrete map type used by default values.
pub const DICTIONARY_TYPE: &str = "global::System.Collections.Generic.Dictionary";

/// C# type of a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    /// Type expression, including any `?` suffix.
    pub expression: String,
    /// Whether the property may hold `null`.
    pub is_nullable: bool,
    /// Whether the underlying type is a C# value type.
    pub is_value_type: bool,
}

impl fmt::Display for TypeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Maps schema nodes to C# types.
///
/// Value types always carry `?` when nullable. Reference types carry it
/// only when nullable annotations are enabled.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    pub(crate) graph: &'a SchemaGraph,
    nullable_annotations: bool,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper over `graph`.
    #[must_use]
    pub fn new(graph: &'a SchemaGraph, nullable_annotations: bool) -> Self {
        Self {
            graph,
            nullable_annotations,
        }
    }

    /// Returns the C# type of `id`, optionally forced nullable.
    #[must_use]
    pub fn type_for(&self, id: NodeId, nullable: bool) -> TypeSymbol {
        let (base, is_value_type, inherently_nullable) = match self.graph.node(id) {
            SchemaNode::Primitive(p) => {
                let (name, value) = primitive_type(*p);
                (name.to_string(), value, *p == PrimitiveType::Null)
            }
            SchemaNode::Logical(l) => (logical_type(l.kind).to_string(), true, false),
            SchemaNode::Array(a) => {
                let item = self.type_for(a.items, false);
                (format!("{}<{}>", LIST_INTERFACE, item), false, false)
            }
            SchemaNode::Map(m) => {
                let value = self.type_for(m.values, false);
                (
                    format!("{}<string, {}>", DICTIONARY_INTERFACE, value),
                    false,
                    false,
                )
            }
            SchemaNode::Union(u) => {
                if let Some(inner) = self.graph.optional_inner(id) {
                    return self.type_for(inner, true);
                }
                let has_null = u.members.iter().any(|m| self.graph.is_null(*m));
                ("object".to_string(), false, has_null)
            }
            SchemaNode::Enum(e) => (to_valid_identifier(&e.name.name), true, false),
            SchemaNode::Fixed(f) => (to_valid_identifier(&f.name.name), false, false),
            SchemaNode::Record(r) | SchemaNode::Error(r) => {
                (to_valid_identifier(&r.name.name), false, false)
            }
        };

        let is_nullable = nullable || inherently_nullable;
        let expression = if is_nullable && (is_value_type || self.nullable_annotations) {
            format!("{}?", base)
        } else {
            base
        };
        TypeSymbol {
            expression,
            is_nullable,
            is_value_type,
        }
    }

    /// Returns true if a `null` value is valid for `id`.
    #[must_use]
    pub fn accepts_null(&self, id: NodeId) -> bool {
        match self.graph.node(id) {
            SchemaNode::Primitive(PrimitiveType::Null) => true,
            SchemaNode::Union(u) => u.members.iter().any(|m| self.graph.is_null(*m)),
            _ => false,
        }
    }
}

const fn primitive_type(p: PrimitiveType) -> (&'static str, bool) {
    match p {
        PrimitiveType::Null => ("object", false),
        PrimitiveType::Boolean => ("bool", true),
        PrimitiveType::Int => ("int", true),
        PrimitiveType::Long => ("long", true),
        PrimitiveType::Float => ("float", true),
        PrimitiveType::Double => ("double", true),
        PrimitiveType::Bytes => ("byte[]", false),
        PrimitiveType::String => ("string", false),
    }
}

const fn logical_type(kind: LogicalKind) -> &'static str {
    match kind {
        LogicalKind::Decimal => "global::Avro.AvroDecimal",
        LogicalKind::Uuid => "global::System.Guid",
        LogicalKind::Date => "global::System.DateOnly",
        LogicalKind::TimeMillis | LogicalKind::TimeMicros => "global::System.TimeOnly",
        LogicalKind::TimestampMillis | LogicalKind::TimestampMicros => {
            "global::System.DateTimeOffset"
        }
        LogicalKind::LocalTimestampMillis | LogicalKind::LocalTimestampMicros => {
            "global::System.DateTime"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avronet_schema::parse_schema;

    fn field_types(schema: &str, annotations: bool) -> Vec<String> {
        let graph = parse_schema(schema).expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, annotations);
        let record = graph.root_node().as_record().expect("record");
        record
            .fields
            .iter()
            .map(|f| mapper.type_for(f.schema, false).expression)
            .collect()
    }

    const SAMPLE: &str = r#"{"type":"record","name":"Sample","fields":[
        {"name":"a","type":"int"},
        {"name":"b","type":"string"},
        {"name":"c","type":["null","string"]},
        {"name":"d","type":["int","null"]},
        {"name":"e","type":{"type":"array","items":"long"}},
        {"name":"f","type":{"type":"map","values":["null","double"]}},
        {"name":"g","type":["null","int","string"]},
        {"name":"h","type":["int","string"]},
        {"name":"i","type":"null"},
        {"name":"j","type":"bytes"},
        {"name":"k","type":{"type":"enum","name":"Suit","symbols":["A"]}},
        {"name":"l","type":["null","Suit"]},
        {"name":"m","type":{"type":"string","logicalType":"uuid"}}
    ]}"#;

    #[test]
    fn test_types_with_annotations() {
        assert_eq!(
            field_types(SAMPLE, true),
            vec![
                "int",
                "string",
                "string?",
                "int?",
                "global::System.Collections.Generic.IList<long>",
                "global::System.Collections.Generic.IDictionary<string, double?>",
                "object?",
                "object",
                "object?",
                "byte[]",
                "Suit",
                "Suit?",
                "global::System.Guid",
            ]
        );
    }

    #[test]
    fn test_types_without_annotations() {
        assert_eq!(
            field_types(SAMPLE, false),
            vec![
                "int",
                "string",
                "string",
                "int?",
                "global::System.Collections.Generic.IList<long>",
                "global::System.Collections.Generic.IDictionary<string, double?>",
                "object",
                "object",
                "object",
                "byte[]",
                "Suit",
                "Suit?",
                "global::System.Guid",
            ]
        );
    }

    #[test]
    fn test_logical_types() {
        let types = field_types(
            r#"{"type":"record","name":"T","fields":[
                {"name":"a","type":{"type":"bytes","logicalType":"decimal","precision":9,"scale":2}},
                {"name":"b","type":{"type":"int","logicalType":"date"}},
                {"name":"c","type":{"type":"int","logicalType":"time-millis"}},
                {"name":"d","type":{"type":"long","logicalType":"timestamp-micros"}},
                {"name":"e","type":{"type":"long","logicalType":"local-timestamp-millis"}},
                {"name":"f","type":["null",{"type":"long","logicalType":"timestamp-millis"}]}
            ]}"#,
            true,
        );
        assert_eq!(
            types,
            vec![
                "global::Avro.AvroDecimal",
                "global::System.DateOnly",
                "global::System.TimeOnly",
                "global::System.DateTimeOffset",
                "global::System.DateTime",
                "global::System.DateTimeOffset?",
            ]
        );
    }

    #[test]
    fn test_nullability_flags() {
        let graph = parse_schema(r#"["null","string"]"#).expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, false);
        let symbol = mapper.type_for(graph.root(), false);
        assert!(symbol.is_nullable);
        assert!(!symbol.is_value_type);
        assert_eq!(symbol.to_string(), "string");
        assert!(mapper.accepts_null(graph.root()));
    }

    #[test]
    fn test_keyword_named_record() {
        let graph = parse_schema(r#"{"type":"record","name":"event","fields":[]}"#)
            .expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, true);
        assert_eq!(mapper.type_for(graph.root(), false).expression, "@event");
    }
}
