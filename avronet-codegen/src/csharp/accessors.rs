//! Positional `Get`/`Put` accessors for generated records.
//!
//! The Avro runtime reads and writes record fields by position. `Get`
//! always reads properties directly. How `Put` writes them depends on
//! whether the properties are init-only:
//!
//! - settable properties are assigned directly;
//! - init-only properties on .NET 8 go through `UnsafeAccessor` functions
//!   that call the compiler-generated setter;
//! - elsewhere a nested class caches setters compiled from expression trees.

use super::identifier::{metadata_name, reflection_class_name};
use crate::options::LanguageFeatures;
use crate::writer::SourceWriter;

const RUNTIME_EXCEPTION: &str = "global::Avro.AvroRuntimeException";
const COMPILER_SERVICES: &str = "global::System.Runtime.CompilerServices";
const EXPRESSION: &str = "global::System.Linq.Expressions.Expression";

/// How `Put` assigns property values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStrategy {
    /// `this.Field = (T)value;`
    Direct,
    /// `extern` functions marked `UnsafeAccessor` that call `set_Field`.
    LowLevelAccessor,
    /// Cached delegates compiled from expression trees.
    ReflectiveSetterCache,
}

impl MutationStrategy {
    /// Selects the strategy for the enabled features.
    #[must_use]
    pub const fn select(features: &LanguageFeatures) -> Self {
        if !features.init_only_mutators {
            Self::Direct
        } else if features.low_level_field_accessors {
            Self::LowLevelAccessor
        } else {
            Self::ReflectiveSetterCache
        }
    }
}

#[derive(Debug, Clone)]
struct AccessorField {
    name: String,
    type_expr: String,
}

/// Builds the `Get` and `Put` methods of one record declaration.
#[derive(Debug)]
pub struct FieldAccessBuilder<'a> {
    owner: &'a str,
    is_override: bool,
    nullable_annotations: bool,
    strategy: MutationStrategy,
    fields: Vec<AccessorField>,
}

impl<'a> FieldAccessBuilder<'a> {
    /// Creates a builder for the declaration named `owner`.
    ///
    /// `is_override` marks the methods `override`, as required when the
    /// declaration derives from the runtime's exception base.
    #[must_use]
    pub fn new(owner: &'a str, is_override: bool, features: &LanguageFeatures) -> Self {
        Self {
            owner,
            is_override,
            nullable_annotations: features.nullable_annotations,
            strategy: MutationStrategy::select(features),
            fields: Vec::new(),
        }
    }

    /// Appends a field and returns its position.
    pub fn add_field(&mut self, name: impl Into<String>, type_expr: impl Into<String>) -> usize {
        self.fields.push(AccessorField {
            name: name.into(),
            type_expr: type_expr.into(),
        });
        self.fields.len() - 1
    }

    fn modifier(&self) -> &'static str {
        if self.is_override { "override " } else { "" }
    }

    fn object_type(&self) -> &'static str {
        if self.nullable_annotations { "object?" } else { "object" }
    }

    /// Writes `Get`, `Put` and, for the reflective strategy, the setter cache.
    pub fn write_to(&self, w: &mut SourceWriter) {
        self.write_get(w);
        w.blank_line();
        self.write_put(w);
        if self.strategy == MutationStrategy::ReflectiveSetterCache {
            w.blank_line();
            self.write_setter_cache(w);
        }
    }

    /// Writes the `Get` method.
    pub fn write_get(&self, w: &mut SourceWriter) {
        w.line(format!(
            "public {}{} Get(int fieldPos)",
            self.modifier(),
            self.object_type()
        ));
        w.block(|w| {
            w.line("switch (fieldPos)");
            w.block(|w| {
                for (position, field) in self.fields.iter().enumerate() {
                    w.line(format!("case {}: return this.{};", position, field.name));
                }
                w.line(format!(
                    "default: throw new {}($\"Bad index {{fieldPos}} in Get()\");",
                    RUNTIME_EXCEPTION
                ));
            });
        });
    }

    /// Writes the `Put` method.
    pub fn write_put(&self, w: &mut SourceWriter) {
        let value = if self.nullable_annotations {
            "fieldValue!"
        } else {
            "fieldValue"
        };
        w.line(format!(
            "public {}void Put(int fieldPos, {} fieldValue)",
            self.modifier(),
            self.object_type()
        ));
        w.block(|w| {
            w.line("switch (fieldPos)");
            w.block(|w| {
                for (position, field) in self.fields.iter().enumerate() {
                    let cast = format!("({}){}", field.type_expr, value);
                    let statement = match self.strategy {
                        MutationStrategy::Direct => format!("this.{} = {};", field.name, cast),
                        MutationStrategy::LowLevelAccessor => {
                            format!("{}(this, {});", setter_name(&field.name), cast)
                        }
                        MutationStrategy::ReflectiveSetterCache => format!(
                            "{}.{}(this, {});",
                            reflection_class_name(self.owner),
                            setter_name(&field.name),
                            cast
                        ),
                    };
                    w.line(format!("case {}: {} break;", position, statement));
                }
                w.line(format!(
                    "default: throw new {}($\"Bad index {{fieldPos}} in Put()\");",
                    RUNTIME_EXCEPTION
                ));
            });

            if self.strategy == MutationStrategy::LowLevelAccessor {
                for field in &self.fields {
                    w.blank_line();
                    w.line(format!(
                        "[{cs}.UnsafeAccessor({cs}.UnsafeAccessorKind.Method, Name = \"set_{}\")]",
                        metadata_name(&field.name),
                        cs = COMPILER_SERVICES
                    ));
                    w.line(format!(
                        "extern static void {}({} obj, {} value);",
                        setter_name(&field.name),
                        self.owner,
                        field.type_expr
                    ));
                }
            }
        });
    }

    fn write_setter_cache(&self, w: &mut SourceWriter) {
        w.line(format!(
            "private static class {}",
            reflection_class_name(self.owner)
        ));
        w.block(|w| {
            for field in &self.fields {
                w.line(format!(
                    "public static readonly global::System.Action<{owner}, {ty}> {} = CreateSetter<{ty}>(\"{}\");",
                    setter_name(&field.name),
                    metadata_name(&field.name),
                    owner = self.owner,
                    ty = field.type_expr
                ));
            }
            if !self.fields.is_empty() {
                w.blank_line();
            }
            w.line(format!(
                "private static global::System.Action<{}, TProperty> CreateSetter<TProperty>(string propertyName)",
                self.owner
            ));
            w.block(|w| {
                w.line(format!(
                    "var instance = {}.Parameter(typeof({}), \"instance\");",
                    EXPRESSION, self.owner
                ));
                w.line(format!(
                    "var value = {}.Parameter(typeof(TProperty), \"value\");",
                    EXPRESSION
                ));
                w.line(format!(
                    "var property = {}.Property(instance, propertyName);",
                    EXPRESSION
                ));
                w.line(format!(
                    "var assign = {}.Assign(property, value);",
                    EXPRESSION
                ));
                w.line(format!(
                    "return {}.Lambda<global::System.Action<{}, TProperty>>(assign, instance, value).Compile();",
                    EXPRESSION, self.owner
                ));
            });
        });
    }
}

fn setter_name(field: &str) -> String {
    format!("Set_{}", metadata_name(field))
}
