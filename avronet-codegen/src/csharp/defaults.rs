//! C# initializer expressions for Avro field defaults.

use super::identifier::{enum_member_names, record_member_names, to_valid_identifier};
use super::literal::{avro_bytes, byte_array_literal, string_literal};
use super::types::{DICTIONARY_TYPE, LIST_TYPE, TypeMapper};
use avronet_schema::{LogicalKind, NodeId, PrimitiveType, RecordSchema, SchemaNode};
use serde_json::Value;
use tracing::debug;

impl TypeMapper<'_> {
    /// Returns the initializer expression for a field default.
    ///
    /// `None` means the property gets no initializer, either because the
    /// field has no default or because the value has no C# literal form.
    #[must_use]
    pub fn default_literal_for(&self, id: NodeId, default: Option<&Value>) -> Option<String> {
        let value = default?;
        let literal = self.literal(id, value, &mut Vec::new());
        if literal.is_none() {
            debug!(
                kind = %self.graph.type_tag_of(id),
                value = %value,
                "default value has no C# initializer"
            );
        }
        literal
    }

    /// `expanding` holds the record fields whose own defaults are being
    /// expanded. Explicit JSON is finite, so only those fallbacks can loop.
    fn literal(
        &self,
        id: NodeId,
        value: &Value,
        expanding: &mut Vec<(NodeId, usize)>,
    ) -> Option<String> {
        if value.is_null() {
            return self.accepts_null(id).then(|| "null".to_string());
        }
        match self.graph.node(id) {
            SchemaNode::Primitive(p) => primitive_literal(*p, value),
            SchemaNode::Logical(l) => match l.kind {
                LogicalKind::Uuid => value
                    .as_str()
                    .map(|s| format!("global::System.Guid.Parse({})", string_literal(s))),
                _ => None,
            },
            SchemaNode::Array(a) => {
                let items = value
                    .as_array()?
                    .iter()
                    .map(|v| self.literal(a.items, v, expanding))
                    .collect::<Option<Vec<_>>>()?;
                let item_type = self.type_for(a.items, false);
                Some(collection(
                    &format!("{}<{}>", LIST_TYPE, item_type),
                    &items,
                ))
            }
            SchemaNode::Map(m) => {
                let entries = value
                    .as_object()?
                    .iter()
                    .map(|(k, v)| {
                        self.literal(m.values, v, expanding)
                            .map(|lit| format!("[{}] = {}", string_literal(k), lit))
                    })
                    .collect::<Option<Vec<_>>>()?;
                let value_type = self.type_for(m.values, false);
                Some(collection(
                    &format!("{}<string, {}>", DICTIONARY_TYPE, value_type),
                    &entries,
                ))
            }
            SchemaNode::Union(u) => {
                // Non-null defaults of a union match its first member.
                let target = self
                    .graph
                    .optional_inner(id)
                    .or_else(|| u.members.first().copied())?;
                self.literal(target, value, expanding)
            }
            SchemaNode::Enum(e) => {
                let symbol = value.as_str()?;
                let position = e.symbols.iter().position(|s| s == symbol)?;
                let owner = to_valid_identifier(&e.name.name);
                let members = enum_member_names(&owner, e);
                Some(format!("{}.{}", owner, members[position]))
            }
            SchemaNode::Fixed(f) => {
                let bytes = avro_bytes(value.as_str()?)?;
                if bytes.len() != f.size {
                    return None;
                }
                Some(format!(
                    "new {} {{ Value = {} }}",
                    to_valid_identifier(&f.name.name),
                    byte_array_literal(&bytes)
                ))
            }
            SchemaNode::Record(r) | SchemaNode::Error(r) => self.record_literal(id, r, value, expanding),
        }
    }

    fn record_literal(
        &self,
        id: NodeId,
        record: &RecordSchema,
        value: &Value,
        expanding: &mut Vec<(NodeId, usize)>,
    ) -> Option<String> {
        let object = value.as_object()?;
        let owner = to_valid_identifier(&record.name.name);
        let members = record_member_names(&owner, &record.fields);
        let mut assignments = Vec::new();
        for (index, (field, member)) in record.fields.iter().zip(&members).enumerate() {
            let literal = match (object.get(&field.name), field.default.as_ref()) {
                (Some(v), _) => self.literal(field.schema, v, expanding)?,
                // Keys missing from the object take the field's own default.
                (None, Some(fallback)) => {
                    if expanding.contains(&(id, index)) {
                        debug!(
                            record = %record.name.full_name(),
                            field = %field.name,
                            "recursive record default"
                        );
                        return None;
                    }
                    expanding.push((id, index));
                    let literal = self.literal(field.schema, fallback, expanding);
                    expanding.pop();
                    literal?
                }
                (None, None) => continue,
            };
            assignments.push(format!("{} = {}", member, literal));
        }
        Some(collection(&owner, &assignments))
    }
}

fn primitive_literal(p: PrimitiveType, value: &Value) -> Option<String> {
    match p {
        PrimitiveType::Null => None,
        PrimitiveType::Boolean => value.as_bool().map(|b| b.to_string()),
        PrimitiveType::Int => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(|n| n.to_string()),
        PrimitiveType::Long => value.as_i64().map(|n| format!("{}L", n)),
        PrimitiveType::Float => value.as_number().map(|n| format!("{}f", n)),
        PrimitiveType::Double => value.as_number().map(|n| format!("{}d", n)),
        PrimitiveType::Bytes => value
            .as_str()
            .and_then(avro_bytes)
            .map(|b| byte_array_literal(&b)),
        PrimitiveType::String => value.as_str().map(string_literal),
    }
}

fn collection(type_name: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("new {}()", type_name)
    } else {
        format!("new {} {{ {} }}", type_name, items.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avronet_schema::parse_schema;
    use serde_json::json;

    fn defaults(schema: &str) -> Vec<Option<String>> {
        let graph = parse_schema(schema).expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, true);
        let record = graph.root_node().as_record().expect("record");
        record
            .fields
            .iter()
            .map(|f| mapper.default_literal_for(f.schema, f.default.as_ref()))
            .collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_primitive_defaults() {
        let values = defaults(
            r#"{"type":"record","name":"P","fields":[
                {"name":"a","type":"int","default":18},
                {"name":"b","type":"long","default":-5},
                {"name":"c","type":"float","default":1.5},
                {"name":"d","type":"double","default":2},
                {"name":"e","type":"boolean","default":true},
                {"name":"f","type":"string","default":"hi \"you\""},
                {"name":"g","type":"bytes","default":"\u0001ÿ"},
                {"name":"h","type":"int"},
                {"name":"i","type":"int","default":"oops"},
                {"name":"j","type":"int","default":3000000000}
            ]}"#,
        );
        assert_eq!(
            values,
            vec![
                some("18"),
                some("-5L"),
                some("1.5f"),
                some("2d"),
                some("true"),
                some("\"hi \\\"you\\\"\""),
                some("new byte[] { 0x01, 0xFF }"),
                None,
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_union_defaults() {
        let values = defaults(
            r#"{"type":"record","name":"U","fields":[
                {"name":"a","type":["null","string"],"default":null},
                {"name":"b","type":["int","null"],"default":7},
                {"name":"c","type":["string","int"],"default":"x"},
                {"name":"d","type":"string","default":null}
            ]}"#,
        );
        assert_eq!(values, vec![some("null"), some("7"), some("\"x\""), None]);
    }

    #[test]
    fn test_named_type_defaults() {
        let values = defaults(
            r#"{"type":"record","name":"N","fields":[
                {"name":"suit","type":{"type":"enum","name":"Suit","symbols":["SPADES","class"]},"default":"class"},
                {"name":"hash","type":{"type":"fixed","name":"Hash","size":2},"default":"\u0000\u0010"},
                {"name":"badHash","type":"Hash","default":"\u0000"},
                {"name":"point","type":{"type":"record","name":"Point","fields":[
                    {"name":"x","type":"int"},
                    {"name":"y","type":"int","default":0}
                ]},"default":{"x":1}}
            ]}"#,
        );
        assert_eq!(
            values,
            vec![
                some("Suit.@class"),
                some("new Hash { Value = new byte[] { 0x00, 0x10 } }"),
                None,
                some("new Point { x = 1, y = 0 }"),
            ]
        );
    }

    #[test]
    fn test_recursive_record_default_has_no_initializer() {
        let values = defaults(
            r#"{"type":"record","name":"R","fields":[
                {"name":"next","type":["R","null"],"default":{}}
            ]}"#,
        );
        assert_eq!(values, vec![None]);
    }

    #[test]
    fn test_nested_record_default_of_same_type() {
        let values = defaults(
            r#"{"type":"record","name":"Holder","fields":[
                {"name":"r","type":{"type":"record","name":"R","fields":[
                    {"name":"value","type":"int","default":0},
                    {"name":"next","type":["null","R"],"default":null}
                ]},"default":{"next":{"value":1}}}
            ]}"#,
        );
        assert_eq!(
            values,
            vec![some("new R { value = 0, next = new R { value = 1, next = null } }")]
        );
    }

    #[test]
    fn test_collection_defaults() {
        let values = defaults(
            r#"{"type":"record","name":"C","fields":[
                {"name":"a","type":{"type":"array","items":"int"},"default":[1,2]},
                {"name":"b","type":{"type":"array","items":"string"},"default":[]},
                {"name":"c","type":{"type":"map","values":"long"},"default":{"k":1}},
                {"name":"d","type":{"type":"map","values":"int"},"default":{}}
            ]}"#,
        );
        assert_eq!(
            values,
            vec![
                some("new global::System.Collections.Generic.List<int> { 1, 2 }"),
                some("new global::System.Collections.Generic.List<string>()"),
                some(
                    "new global::System.Collections.Generic.Dictionary<string, long> { [\"k\"] = 1L }"
                ),
                some("new global::System.Collections.Generic.Dictionary<string, int>()"),
            ]
        );
    }

    #[test]
    fn test_logical_defaults() {
        let values = defaults(
            r#"{"type":"record","name":"L","fields":[
                {"name":"id","type":{"type":"string","logicalType":"uuid"},"default":"6f1c"},
                {"name":"amount","type":{"type":"bytes","logicalType":"decimal","precision":4,"scale":2},"default":"\u0000"},
                {"name":"at","type":{"type":"long","logicalType":"timestamp-millis"},"default":0}
            ]}"#,
        );
        assert_eq!(
            values,
            vec![some("global::System.Guid.Parse(\"6f1c\")"), None, None]
        );
    }

    #[test]
    fn test_absent_default() {
        let graph = parse_schema(r#""int""#).expect("Failed to parse");
        let mapper = TypeMapper::new(&graph, false);
        assert_eq!(mapper.default_literal_for(graph.root(), None), None);
        assert_eq!(
            mapper.default_literal_for(graph.root(), Some(&json!(4))),
            some("4")
        );
    }
}
