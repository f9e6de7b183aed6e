//! Record definitions for Avro schemas.
//!
//! Records and errors share one shape: a name, an ordered field list and
//! optional documentation.

use crate::types::{Name, NodeId};
use serde_json::Value;

/// Record (or error) definition.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Type name.
    pub name: Name,
    /// Fields in declared order.
    pub fields: Vec<FieldSchema>,
    /// Documentation.
    pub doc: Option<String>,
    /// JSON subtree of the definition.
    pub json: Value,
}

impl RecordSchema {
    /// Creates a new record definition without fields.
    #[must_use]
    pub fn new(name: Name, json: Value) -> Self {
        Self {
            name,
            fields: Vec::new(),
            doc: None,
            json,
        }
    }

    /// Adds a field to the record.
    pub fn add_field(&mut self, field: FieldSchema) {
        self.fields.push(field);
    }
}

/// Field within a record.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Field name as written in the schema.
    pub name: String,
    /// Field schema.
    pub schema: NodeId,
    /// Documentation.
    pub doc: Option<String>,
    /// Raw default value. `Some(Value::Null)` is an explicit null default.
    pub default: Option<Value>,
}

impl FieldSchema {
    /// Creates a new field without documentation or default.
    #[must_use]
    pub fn new(name: String, schema: NodeId) -> Self {
        Self {
            name,
            schema,
            doc: None,
            default: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> RecordSchema {
        let mut record = RecordSchema::new(Name::resolve("User", Some("demo"), None), json!({}));
        record.add_field(FieldSchema::new("name".to_string(), NodeId(0)));
        let mut age = FieldSchema::new("age".to_string(), NodeId(1));
        age.default = Some(json!(18));
        record.add_field(age);
        record
    }

    #[test]
    fn test_record_fields_keep_order() {
        let record = sample_record();
        let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age"]);
        assert_eq!(record.fields[1].schema, NodeId(1));
        assert_eq!(record.name.full_name(), "demo.User");
    }

    #[test]
    fn test_field_default_presence() {
        let record = sample_record();
        assert!(record.fields[0].default.is_none());
        assert_eq!(record.fields[1].default, Some(json!(18)));
    }
}
