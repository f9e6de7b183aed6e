//! Schema type definitions.
//!
//! This module contains the data structures representing Avro schema
//! elements: primitives, logical types, containers, named types and the
//! arena-backed graph that ties them together.

use crate::error::SchemaError;
use crate::records::RecordSchema;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Index of a node inside a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Parsed schema graph.
///
/// Container nodes refer to their children by [`NodeId`]. Named types are
/// stored once and every reference to them resolves to the same node, so
/// self-referencing records form cycles inside the arena.
#[derive(Debug, Clone)]
pub struct SchemaGraph {
    nodes: Vec<SchemaNode>,
    names: HashMap<String, NodeId>,
    root: NodeId,
}

impl SchemaGraph {
    pub(crate) fn from_parts(
        nodes: Vec<SchemaNode>,
        names: HashMap<String, NodeId>,
        root: NodeId,
    ) -> Self {
        Self { nodes, names, root }
    }

    /// Returns the id of the root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root node.
    #[must_use]
    pub fn root_node(&self) -> &SchemaNode {
        self.node(self.root)
    }

    /// Returns the node with the given id.
    ///
    /// Ids are only minted by the parser that built this graph, so every
    /// id handed out by the graph is in range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Classifies a node.
    #[must_use]
    pub fn type_tag_of(&self, id: NodeId) -> SchemaTag {
        self.node(id).tag()
    }

    /// Looks up a named type by its fully-qualified name.
    #[must_use]
    pub fn lookup(&self, full_name: &str) -> Option<NodeId> {
        self.names.get(full_name).copied()
    }

    /// Looks up a named type, failing if it is not defined.
    ///
    /// # Errors
    /// Returns `SchemaError::TypeNotFound` if no type has that name.
    pub fn get_named(&self, full_name: &str) -> Result<&SchemaNode, SchemaError> {
        self.lookup(full_name)
            .map(|id| self.node(id))
            .ok_or_else(|| SchemaError::TypeNotFound {
                name: full_name.to_string(),
            })
    }

    /// Returns the inner member of a nullable-optional union.
    ///
    /// A union is nullable-optional when it has exactly two members, one of
    /// which is `null` and the other is not. Any other node yields `None`.
    #[must_use]
    pub fn optional_inner(&self, id: NodeId) -> Option<NodeId> {
        let SchemaNode::Union(union) = self.node(id) else {
            return None;
        };
        match union.members.as_slice() {
            [a, b] => match (self.is_null(*a), self.is_null(*b)) {
                (true, false) => Some(*b),
                (false, true) => Some(*a),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true if the node is the `null` primitive.
    #[must_use]
    pub fn is_null(&self, id: NodeId) -> bool {
        matches!(self.node(id), SchemaNode::Primitive(PrimitiveType::Null))
    }
}

/// Kind tag of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaTag {
    /// `null`.
    Null,
    /// `boolean`.
    Boolean,
    /// `int`.
    Int,
    /// `long`.
    Long,
    /// `float`.
    Float,
    /// `double`.
    Double,
    /// `bytes`.
    Bytes,
    /// `string`.
    String,
    /// Logical type over a base kind.
    Logical,
    /// `array`.
    Array,
    /// `map`.
    Map,
    /// Union of member schemas.
    Union,
    /// `enum`.
    Enumeration,
    /// `fixed`.
    Fixed,
    /// `record`.
    Record,
    /// `error`.
    Error,
}

impl SchemaTag {
    /// Returns the Avro keyword for this kind.
    #[must_use]
    pub const fn avro_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Logical => "logical",
            Self::Array => "array",
            Self::Map => "map",
            Self::Union => "union",
            Self::Enumeration => "enum",
            Self::Fixed => "fixed",
            Self::Record => "record",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SchemaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.avro_name())
    }
}

/// Schema node variants.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    /// Primitive type.
    Primitive(PrimitiveType),
    /// Logical type.
    Logical(LogicalSchema),
    /// Array type.
    Array(ArraySchema),
    /// Map type.
    Map(MapSchema),
    /// Union type.
    Union(UnionSchema),
    /// Enumeration.
    Enum(EnumSchema),
    /// Fixed-size byte blob.
    Fixed(FixedSchema),
    /// Record.
    Record(RecordSchema),
    /// Error (record-shaped, surfaced as an exception).
    Error(RecordSchema),
}

impl SchemaNode {
    /// Classifies the node.
    #[must_use]
    pub const fn tag(&self) -> SchemaTag {
        match self {
            Self::Primitive(p) => p.tag(),
            Self::Logical(_) => SchemaTag::Logical,
            Self::Array(_) => SchemaTag::Array,
            Self::Map(_) => SchemaTag::Map,
            Self::Union(_) => SchemaTag::Union,
            Self::Enum(_) => SchemaTag::Enumeration,
            Self::Fixed(_) => SchemaTag::Fixed,
            Self::Record(_) => SchemaTag::Record,
            Self::Error(_) => SchemaTag::Error,
        }
    }

    /// Returns the name of a named type.
    #[must_use]
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Enum(e) => Some(&e.name),
            Self::Fixed(f) => Some(&f.name),
            Self::Record(r) | Self::Error(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Returns the fully-qualified name of a named type.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        self.name().map(Name::full_name)
    }

    /// Returns the logical view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not a logical type.
    pub fn as_logical(&self) -> Result<&LogicalSchema, SchemaError> {
        match self {
            Self::Logical(l) => Ok(l),
            other => Err(SchemaError::invalid_cast(SchemaTag::Logical, other.tag())),
        }
    }

    /// Returns the array view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not an array.
    pub fn as_array(&self) -> Result<&ArraySchema, SchemaError> {
        match self {
            Self::Array(a) => Ok(a),
            other => Err(SchemaError::invalid_cast(SchemaTag::Array, other.tag())),
        }
    }

    /// Returns the map view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not a map.
    pub fn as_map(&self) -> Result<&MapSchema, SchemaError> {
        match self {
            Self::Map(m) => Ok(m),
            other => Err(SchemaError::invalid_cast(SchemaTag::Map, other.tag())),
        }
    }

    /// Returns the union view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not a union.
    pub fn as_union(&self) -> Result<&UnionSchema, SchemaError> {
        match self {
            Self::Union(u) => Ok(u),
            other => Err(SchemaError::invalid_cast(SchemaTag::Union, other.tag())),
        }
    }

    /// Returns the enumeration view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not an enumeration.
    pub fn as_enum(&self) -> Result<&EnumSchema, SchemaError> {
        match self {
            Self::Enum(e) => Ok(e),
            other => Err(SchemaError::invalid_cast(
                SchemaTag::Enumeration,
                other.tag(),
            )),
        }
    }

    /// Returns the fixed view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not a fixed type.
    pub fn as_fixed(&self) -> Result<&FixedSchema, SchemaError> {
        match self {
            Self::Fixed(f) => Ok(f),
            other => Err(SchemaError::invalid_cast(SchemaTag::Fixed, other.tag())),
        }
    }

    /// Returns the record view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not a record.
    pub fn as_record(&self) -> Result<&RecordSchema, SchemaError> {
        match self {
            Self::Record(r) => Ok(r),
            other => Err(SchemaError::invalid_cast(SchemaTag::Record, other.tag())),
        }
    }

    /// Returns the error view.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidCast` if the node is not an error.
    pub fn as_error(&self) -> Result<&RecordSchema, SchemaError> {
        match self {
            Self::Error(r) => Ok(r),
            other => Err(SchemaError::invalid_cast(SchemaTag::Error, other.tag())),
        }
    }
}

/// Avro primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// No value.
    Null,
    /// Binary value.
    Boolean,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Sequence of 8-bit unsigned bytes.
    Bytes,
    /// Unicode character sequence.
    String,
}

impl PrimitiveType {
    /// Returns the Avro type name.
    #[must_use]
    pub const fn avro_name(&self) -> &'static str {
        self.tag().avro_name()
    }

    /// Returns the kind tag of this primitive.
    #[must_use]
    pub const fn tag(&self) -> SchemaTag {
        match self {
            Self::Null => SchemaTag::Null,
            Self::Boolean => SchemaTag::Boolean,
            Self::Int => SchemaTag::Int,
            Self::Long => SchemaTag::Long,
            Self::Float => SchemaTag::Float,
            Self::Double => SchemaTag::Double,
            Self::Bytes => SchemaTag::Bytes,
            Self::String => SchemaTag::String,
        }
    }

    /// Parses a primitive type from its Avro name.
    #[must_use]
    pub fn from_avro_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "bytes" => Some(Self::Bytes),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

/// Recognized logical type markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKind {
    /// Arbitrary-precision fixed-point number.
    Decimal,
    /// Universally unique identifier.
    Uuid,
    /// Calendar date without time.
    Date,
    /// Time of day, millisecond precision.
    TimeMillis,
    /// Time of day, microsecond precision.
    TimeMicros,
    /// Instant, millisecond precision.
    TimestampMillis,
    /// Instant, microsecond precision.
    TimestampMicros,
    /// Local date-time, millisecond precision.
    LocalTimestampMillis,
    /// Local date-time, microsecond precision.
    LocalTimestampMicros,
}

impl LogicalKind {
    /// Parses a `logicalType` marker.
    #[must_use]
    pub fn from_avro_name(name: &str) -> Option<Self> {
        match name {
            "decimal" => Some(Self::Decimal),
            "uuid" => Some(Self::Uuid),
            "date" => Some(Self::Date),
            "time-millis" => Some(Self::TimeMillis),
            "time-micros" => Some(Self::TimeMicros),
            "timestamp-millis" => Some(Self::TimestampMillis),
            "timestamp-micros" => Some(Self::TimestampMicros),
            "local-timestamp-millis" => Some(Self::LocalTimestampMillis),
            "local-timestamp-micros" => Some(Self::LocalTimestampMicros),
            _ => None,
        }
    }

    /// Returns the `logicalType` marker.
    #[must_use]
    pub const fn avro_name(&self) -> &'static str {
        match self {
            Self::Decimal => "decimal",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::TimeMillis => "time-millis",
            Self::TimeMicros => "time-micros",
            Self::TimestampMillis => "timestamp-millis",
            Self::TimestampMicros => "timestamp-micros",
            Self::LocalTimestampMillis => "local-timestamp-millis",
            Self::LocalTimestampMicros => "local-timestamp-micros",
        }
    }
}

impl fmt::Display for LogicalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.avro_name())
    }
}

/// Logical type over an underlying base schema.
#[derive(Debug, Clone)]
pub struct LogicalSchema {
    /// Underlying schema (a primitive, or a fixed type for decimals).
    pub base: NodeId,
    /// Logical marker.
    pub kind: LogicalKind,
    /// Decimal precision.
    pub precision: Option<u32>,
    /// Decimal scale.
    pub scale: Option<u32>,
}

/// Array schema.
#[derive(Debug, Clone, Copy)]
pub struct ArraySchema {
    /// Element schema.
    pub items: NodeId,
}

/// Map schema (keys are always strings).
#[derive(Debug, Clone, Copy)]
pub struct MapSchema {
    /// Value schema.
    pub values: NodeId,
}

/// Union schema.
#[derive(Debug, Clone)]
pub struct UnionSchema {
    /// Member schemas in declared order.
    pub members: Vec<NodeId>,
}

/// Fully-qualified name of a named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    /// Simple name.
    pub name: String,
    /// Namespace, if any.
    pub namespace: Option<String>,
}

impl Name {
    /// Resolves a name as written in a schema.
    ///
    /// A dotted `raw` name is already fully qualified. Otherwise the
    /// explicit namespace wins over the enclosing one; empty namespaces
    /// count as absent.
    #[must_use]
    pub fn resolve(raw: &str, explicit: Option<&str>, enclosing: Option<&str>) -> Self {
        if let Some((namespace, name)) = raw.rsplit_once('.') {
            return Self {
                name: name.to_string(),
                namespace: non_empty(namespace),
            };
        }
        let namespace = match explicit {
            Some(ns) => non_empty(ns),
            None => enclosing.and_then(non_empty),
        };
        Self {
            name: raw.to_string(),
            namespace,
        }
    }

    /// Returns `namespace.name`, or just `name` without a namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}.{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Enumeration definition.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    /// Type name.
    pub name: Name,
    /// Symbols in declared order.
    pub symbols: Vec<String>,
    /// Documentation.
    pub doc: Option<String>,
    /// Symbol used by readers for unknown values.
    pub default: Option<String>,
    /// JSON subtree of the definition.
    pub json: Value,
}

impl EnumSchema {
    /// Creates a new enumeration definition.
    #[must_use]
    pub fn new(name: Name, symbols: Vec<String>, json: Value) -> Self {
        Self {
            name,
            symbols,
            doc: None,
            default: None,
            json,
        }
    }
}

/// Fixed-size byte blob definition.
#[derive(Debug, Clone)]
pub struct FixedSchema {
    /// Type name.
    pub name: Name,
    /// Size in bytes.
    pub size: usize,
    /// Documentation.
    pub doc: Option<String>,
    /// JSON subtree of the definition.
    pub json: Value,
}

impl FixedSchema {
    /// Creates a new fixed definition.
    #[must_use]
    pub fn new(name: Name, size: usize, json: Value) -> Self {
        Self {
            name,
            size,
            doc: None,
            json,
        }
    }
}
