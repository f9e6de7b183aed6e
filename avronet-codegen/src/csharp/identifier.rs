//! C# identifier sanitization and member name allocation.

use avronet_schema::{EnumSchema, FieldSchema};
use std::collections::HashSet;

/// Reserved C# keywords. Contextual keywords are valid identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Members every generated record or error declares itself.
const RECORD_MEMBERS: &[&str] = &["Schema", "_SCHEMA", "Get", "Put"];

/// Returns true if `s` is a reserved C# keyword.
#[must_use]
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

fn is_start_char(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_part_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_start_char(first) => chars.all(is_part_char),
        _ => false,
    }
}

/// Converts a schema name into a valid C# identifier.
///
/// Invalid characters become `_`, a leading digit gets a `_` prefix and
/// keywords are escaped with `@`. Applying the function to its own output
/// returns it unchanged.
#[must_use]
pub fn to_valid_identifier(name: &str) -> String {
    if let Some(rest) = name.strip_prefix('@') {
        if is_plain_identifier(rest) {
            return name.to_string();
        }
    }
    if name.is_empty() {
        return "_".to_string();
    }

    let mut ident: String = name
        .chars()
        .map(|c| if is_part_char(c) { c } else { '_' })
        .collect();
    if ident.starts_with(|c: char| !is_start_char(c)) {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) {
        ident.insert(0, '@');
    }
    ident
}

/// Returns the identifier as it appears in metadata, without the `@` escape.
#[must_use]
pub fn metadata_name(identifier: &str) -> &str {
    identifier.strip_prefix('@').unwrap_or(identifier)
}

/// Allocates unique member names inside one declaration.
///
/// Names are compared by their metadata form, so `@class` and `class`
/// collide. A taken name gets the first free `_N` suffix.
#[derive(Debug, Default)]
pub struct MemberScope {
    taken: HashSet<String>,
}

impl MemberScope {
    /// Creates a scope with the given names already taken.
    #[must_use]
    pub fn new(reserved: &[&str]) -> Self {
        Self {
            taken: reserved.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Claims a member name derived from `name`.
    pub fn claim(&mut self, name: &str) -> String {
        let candidate = to_valid_identifier(name);
        if self.taken.insert(metadata_name(&candidate).to_string()) {
            return candidate;
        }
        let base = metadata_name(&candidate).to_string();
        let mut n = 1usize;
        loop {
            let suffixed = format!("{}_{}", base, n);
            if self.taken.insert(suffixed.clone()) {
                return suffixed;
            }
            n += 1;
        }
    }
}

/// Returns the name of the nested class that caches reflective setters.
#[must_use]
pub fn reflection_class_name(owner: &str) -> String {
    format!("{}Reflection", metadata_name(owner))
}

/// Assigns property names to record fields, in field order.
#[must_use]
pub fn record_member_names(owner: &str, fields: &[FieldSchema]) -> Vec<String> {
    let reflection = reflection_class_name(owner);
    let mut reserved: Vec<&str> = RECORD_MEMBERS.to_vec();
    reserved.push(metadata_name(owner));
    reserved.push(&reflection);
    let mut scope = MemberScope::new(&reserved);
    fields.iter().map(|f| scope.claim(&f.name)).collect()
}

/// Assigns member names to enumeration symbols, in declared order.
#[must_use]
pub fn enum_member_names(owner: &str, schema: &EnumSchema) -> Vec<String> {
    let mut scope = MemberScope::new(&[metadata_name(owner), "value__"]);
    schema.symbols.iter().map(|s| scope.claim(s)).collect()
}
