//! Avro JSON schema parser.
//!
//! This module parses Avro schema text into a [`SchemaGraph`]. Named types
//! are registered before their children are parsed so that a record can
//! refer to itself, and every later reference to a name resolves to the
//! node of its single definition.

use crate::error::ParseError;
use crate::records::{FieldSchema, RecordSchema};
use crate::types::{
    ArraySchema, EnumSchema, FixedSchema, LogicalKind, LogicalSchema, MapSchema, Name, NodeId,
    PrimitiveType, SchemaGraph, SchemaNode, UnionSchema,
};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Parses an Avro schema from a string.
///
/// # Arguments
/// * `text` - Schema JSON
///
/// # Returns
/// Parsed schema graph or parse error.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or violates the schema
/// grammar (missing `type`, `name` or `fields`, non-array `fields`, unknown
/// type keyword or reference).
pub fn parse_schema(text: &str) -> Result<SchemaGraph, ParseError> {
    let json: Value = serde_json::from_str(text)?;
    parse_schema_value(&json)
}

/// Parses an Avro schema from an already decoded JSON value.
///
/// # Errors
/// Returns `ParseError` if the value violates the schema grammar.
pub fn parse_schema_value(json: &Value) -> Result<SchemaGraph, ParseError> {
    let mut parser = Parser::default();
    let root = parser.parse_node(json, None)?;
    Ok(SchemaGraph::from_parts(parser.nodes, parser.names, root))
}

#[derive(Default)]
struct Parser {
    nodes: Vec<SchemaNode>,
    names: HashMap<String, NodeId>,
    primitives: HashMap<PrimitiveType, NodeId>,
    pending: HashSet<NodeId>,
}

impl Parser {
    fn push(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn primitive(&mut self, primitive: PrimitiveType) -> NodeId {
        if let Some(&id) = self.primitives.get(&primitive) {
            return id;
        }
        let id = self.push(SchemaNode::Primitive(primitive));
        self.primitives.insert(primitive, id);
        id
    }

    /// Registers a named type and reserves its slot.
    ///
    /// The slot holds a placeholder until `complete` stores the
    /// definition.
    fn reserve(&mut self, kind: &str, name: &Name) -> Result<NodeId, ParseError> {
        let full_name = name.full_name();
        if self.names.contains_key(&full_name) {
            return Err(ParseError::duplicate(kind, full_name));
        }
        let id = self.push(SchemaNode::Primitive(PrimitiveType::Null));
        self.names.insert(full_name, id);
        self.pending.insert(id);
        Ok(id)
    }

    fn complete(&mut self, id: NodeId, node: SchemaNode) {
        self.nodes[id.0] = node;
        self.pending.remove(&id);
    }

    fn parse_node(&mut self, json: &Value, namespace: Option<&str>) -> Result<NodeId, ParseError> {
        match json {
            Value::String(name) => self.parse_type_name(name, namespace),
            Value::Array(members) => self.parse_union(members, namespace),
            Value::Object(map) => self.parse_object(json, map, namespace),
            other => Err(ParseError::structure(format!(
                "expected a type name, union or object, found {}",
                other
            ))),
        }
    }

    fn parse_type_name(&mut self, name: &str, namespace: Option<&str>) -> Result<NodeId, ParseError> {
        match PrimitiveType::from_avro_name(name) {
            Some(primitive) => Ok(self.primitive(primitive)),
            None => self.resolve_reference(name, namespace),
        }
    }

    fn resolve_reference(&self, name: &str, namespace: Option<&str>) -> Result<NodeId, ParseError> {
        let qualified = namespace
            .filter(|ns| !ns.is_empty() && !name.contains('.'))
            .and_then(|ns| self.names.get(&format!("{}.{}", ns, name)));
        if let Some(&id) = qualified {
            return Ok(id);
        }
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::unknown_type(name))
    }

    fn parse_union(&mut self, members: &[Value], namespace: Option<&str>) -> Result<NodeId, ParseError> {
        let members = members
            .iter()
            .map(|member| self.parse_node(member, namespace))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.push(SchemaNode::Union(UnionSchema { members })))
    }

    fn parse_object(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<NodeId, ParseError> {
        let type_value = map
            .get("type")
            .ok_or_else(|| ParseError::missing_attr("schema", "type"))?;

        let keyword = match type_value {
            Value::String(keyword) => keyword.as_str(),
            Value::Object(_) | Value::Array(_) => return self.parse_node(type_value, namespace),
            other => return Err(ParseError::invalid_attr("schema", "type", other.to_string())),
        };

        let id = match keyword {
            "record" => self.parse_record(json, map, namespace, false)?,
            "error" => self.parse_record(json, map, namespace, true)?,
            "enum" => self.parse_enum(json, map, namespace)?,
            "fixed" => self.parse_fixed(json, map, namespace)?,
            "array" => {
                let items = map
                    .get("items")
                    .ok_or_else(|| ParseError::missing_attr("array", "items"))?;
                let items = self.parse_node(items, namespace)?;
                self.push(SchemaNode::Array(ArraySchema { items }))
            }
            "map" => {
                let values = map
                    .get("values")
                    .ok_or_else(|| ParseError::missing_attr("map", "values"))?;
                let values = self.parse_node(values, namespace)?;
                self.push(SchemaNode::Map(MapSchema { values }))
            }
            other => self.parse_type_name(other, namespace)?,
        };

        Ok(self.apply_logical_type(id, map))
    }

    /// Wraps `base` in a logical node when a recognized marker is present.
    ///
    /// Unrecognized markers, and markers on kinds that cannot carry one,
    /// leave the base schema untouched.
    fn apply_logical_type(&mut self, base: NodeId, map: &Map<String, Value>) -> NodeId {
        let Some(marker) = map.get("logicalType").and_then(Value::as_str) else {
            return base;
        };
        // A pending slot is a named type still being defined, never a primitive.
        let carries_logical = !self.pending.contains(&base)
            && matches!(
                self.nodes[base.0],
                SchemaNode::Primitive(_) | SchemaNode::Fixed(_)
            );
        match LogicalKind::from_avro_name(marker) {
            Some(kind) if carries_logical => self.push(SchemaNode::Logical(LogicalSchema {
                base,
                kind,
                precision: read_u32(map, "precision"),
                scale: read_u32(map, "scale"),
            })),
            _ => {
                tracing::debug!(
                    "ignoring logical type '{}' on {} schema",
                    marker,
                    self.nodes[base.0].tag()
                );
                base
            }
        }
    }

    fn parse_name(
        map: &Map<String, Value>,
        kind: &str,
        namespace: Option<&str>,
    ) -> Result<Name, ParseError> {
        let raw = match map.get("name") {
            Some(Value::String(raw)) if !raw.is_empty() => raw,
            Some(other) => return Err(ParseError::invalid_attr(kind, "name", other.to_string())),
            None => return Err(ParseError::missing_attr(kind, "name")),
        };
        let explicit = map.get("namespace").and_then(Value::as_str);
        Ok(Name::resolve(raw, explicit, namespace))
    }

    fn parse_record(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
        is_error: bool,
    ) -> Result<NodeId, ParseError> {
        let kind = if is_error { "error" } else { "record" };
        let name = Self::parse_name(map, kind, namespace)?;
        let id = self.reserve(kind, &name)?;

        let fields = match map.get("fields") {
            Some(Value::Array(fields)) => fields,
            Some(other) => return Err(ParseError::invalid_attr(kind, "fields", other.to_string())),
            None => return Err(ParseError::missing_attr(kind, "fields")),
        };

        let child_namespace = name.namespace.clone();
        let mut record = RecordSchema::new(name, json.clone());
        record.doc = read_doc(map);

        for field in fields {
            let field = self.parse_field(field, child_namespace.as_deref())?;
            record.add_field(field);
        }

        let node = if is_error {
            SchemaNode::Error(record)
        } else {
            SchemaNode::Record(record)
        };
        self.complete(id, node);
        Ok(id)
    }

    fn parse_field(&mut self, json: &Value, namespace: Option<&str>) -> Result<FieldSchema, ParseError> {
        let map = json
            .as_object()
            .ok_or_else(|| ParseError::structure(format!("record field must be an object, found {}", json)))?;

        let name = match map.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => return Err(ParseError::invalid_attr("field", "name", other.to_string())),
            None => return Err(ParseError::missing_attr("field", "name")),
        };
        let type_value = map
            .get("type")
            .ok_or_else(|| ParseError::missing_attr("field", "type"))?;

        let schema = self.parse_node(type_value, namespace)?;
        let mut field = FieldSchema::new(name, schema);
        field.doc = read_doc(map);
        field.default = map.get("default").cloned();
        Ok(field)
    }

    fn parse_enum(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<NodeId, ParseError> {
        let name = Self::parse_name(map, "enum", namespace)?;
        let symbols = match map.get("symbols") {
            Some(Value::Array(symbols)) => symbols
                .iter()
                .map(|symbol| {
                    symbol
                        .as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ParseError::invalid_attr("enum", "symbols", symbol.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(ParseError::invalid_attr("enum", "symbols", other.to_string())),
            None => return Err(ParseError::missing_attr("enum", "symbols")),
        };

        let id = self.reserve("enum", &name)?;
        let mut schema = EnumSchema::new(name, symbols, json.clone());
        schema.doc = read_doc(map);
        schema.default = map.get("default").and_then(Value::as_str).map(str::to_string);
        self.complete(id, SchemaNode::Enum(schema));
        Ok(id)
    }

    fn parse_fixed(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<NodeId, ParseError> {
        let name = Self::parse_name(map, "fixed", namespace)?;
        let size = match map.get("size") {
            Some(value) => value
                .as_u64()
                .and_then(|size| usize::try_from(size).ok())
                .ok_or_else(|| ParseError::invalid_attr("fixed", "size", value.to_string()))?,
            None => return Err(ParseError::missing_attr("fixed", "size")),
        };

        let id = self.reserve("fixed", &name)?;
        let mut schema = FixedSchema::new(name, size, json.clone());
        schema.doc = read_doc(map);
        self.complete(id, SchemaNode::Fixed(schema));
        Ok(id)
    }
}

fn read_doc(map: &Map<String, Value>) -> Option<String> {
    map.get("doc").and_then(Value::as_str).map(str::to_string)
}

fn read_u32(map: &Map<String, Value>, key: &str) -> Option<u32> {
    map.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}
