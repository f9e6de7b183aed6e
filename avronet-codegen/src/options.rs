//! Generation options and language feature detection.

use serde::{Deserialize, Serialize};

/// Accessibility of generated declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// `public`.
    #[default]
    Public,
    /// `internal`.
    Internal,
}

impl AccessLevel {
    /// Returns the C# modifier keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
        }
    }

    /// Parses an accessibility keyword.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Self::Public),
            "internal" => Some(Self::Internal),
            _ => None,
        }
    }
}

/// Declaration form used for records and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationForm {
    /// `partial class`.
    #[default]
    Class,
    /// `partial record`.
    Record,
}

impl DeclarationForm {
    /// Returns the declaration keywords.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "partial class",
            Self::Record => "partial record",
        }
    }

    /// Parses a declaration form.
    #[must_use]
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "class" | "partial class" => Some(Self::Class),
            "record" | "partial record" => Some(Self::Record),
            _ => None,
        }
    }
}

/// C# language version of the consuming project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LanguageVersion {
    /// C# 7.3.
    #[serde(rename = "7.3")]
    CSharp7_3,
    /// C# 8.
    #[serde(rename = "8")]
    CSharp8,
    /// C# 9.
    #[serde(rename = "9")]
    CSharp9,
    /// C# 10.
    #[serde(rename = "10")]
    CSharp10,
    /// C# 11.
    #[serde(rename = "11")]
    CSharp11,
    /// C# 12 and later.
    #[default]
    #[serde(rename = "12", alias = "latest")]
    CSharp12,
}

impl LanguageVersion {
    /// Parses a version string such as `10` or `7.3`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "7.3" => Some(Self::CSharp7_3),
            "8" | "8.0" => Some(Self::CSharp8),
            "9" | "9.0" => Some(Self::CSharp9),
            "10" | "10.0" => Some(Self::CSharp10),
            "11" | "11.0" => Some(Self::CSharp11),
            "12" | "12.0" | "latest" | "preview" => Some(Self::CSharp12),
            _ => None,
        }
    }
}

/// Optional C# constructs the output may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageFeatures {
    /// Emit `#nullable enable` and `?` on nullable reference types.
    pub nullable_annotations: bool,
    /// Emit `namespace X;` instead of a block namespace.
    pub file_scoped_namespace: bool,
    /// Mark non-nullable properties `required`.
    pub required_modifier: bool,
    /// Use `init` instead of `set` on properties.
    pub init_only_mutators: bool,
    /// Populate init-only properties through `UnsafeAccessor` functions.
    pub low_level_field_accessors: bool,
}

impl LanguageFeatures {
    /// Derives the feature set from a language version and target framework.
    #[must_use]
    pub const fn detect(version: LanguageVersion, net8_or_greater: bool) -> Self {
        let v = version as u8;
        Self {
            nullable_annotations: v >= LanguageVersion::CSharp8 as u8,
            init_only_mutators: v >= LanguageVersion::CSharp9 as u8,
            file_scoped_namespace: v >= LanguageVersion::CSharp10 as u8,
            required_modifier: v >= LanguageVersion::CSharp11 as u8,
            low_level_field_accessors: net8_or_greater,
        }
    }

    /// Returns a feature set with everything enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self::detect(LanguageVersion::CSharp12, true)
    }

    /// Returns a feature set with everything disabled.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            nullable_annotations: false,
            file_scoped_namespace: false,
            required_modifier: false,
            init_only_mutators: false,
            low_level_field_accessors: false,
        }
    }
}

/// Options for one generation request.
///
/// Built with [`GenerationOptions::new`] and the consuming setters:
///
/// ```
/// use avronet_codegen::{AccessLevel, GenerationOptions, LanguageFeatures};
///
/// let options = GenerationOptions::new("User", r#"{"type":"record","name":"User","fields":[]}"#)
///     .namespace("Demo.Models")
///     .access(AccessLevel::Internal)
///     .features(LanguageFeatures::all());
/// assert_eq!(options.namespace, "Demo.Models");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Name of the annotated type; selects the top-level declaration.
    pub type_name: String,
    /// Avro JSON schema text.
    pub schema_text: String,
    /// Target namespace; empty emits no namespace.
    pub namespace: String,
    /// Accessibility of every declaration.
    pub access: AccessLevel,
    /// Form of record and error declarations.
    pub form: DeclarationForm,
    /// Enabled C# constructs.
    pub features: LanguageFeatures,
}

impl GenerationOptions {
    /// Creates options for a type with default settings.
    #[must_use]
    pub fn new(type_name: impl Into<String>, schema_text: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            schema_text: schema_text.into(),
            namespace: String::new(),
            access: AccessLevel::default(),
            form: DeclarationForm::default(),
            features: LanguageFeatures::default(),
        }
    }

    /// Sets the target namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    /// Sets the declaration form.
    #[must_use]
    pub fn form(mut self, form: DeclarationForm) -> Self {
        self.form = form;
        self
    }

    /// Sets the enabled language features.
    #[must_use]
    pub fn features(mut self, features: LanguageFeatures) -> Self {
        self.features = features;
        self
    }

    /// Replaces the schema text.
    #[must_use]
    pub fn schema_text(mut self, schema_text: impl Into<String>) -> Self {
        self.schema_text = schema_text.into();
        self
    }

    /// Returns the file name of the generated source.
    #[must_use]
    pub fn output_file_name(&self) -> String {
        format!("{}.AvroModel.g.cs", self.type_name)
    }
}

/// One requested model: the options carry the type name and schema text.
pub type ModelRequest = GenerationOptions;

/// Settings loaded from a JSON configuration file.
///
/// Every field is optional; absent fields keep the option's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelSettings {
    /// Target namespace.
    pub namespace: Option<String>,
    /// Accessibility.
    pub access: Option<AccessLevel>,
    /// Declaration form.
    pub form: Option<DeclarationForm>,
    /// Language version used for feature detection.
    pub language_version: Option<LanguageVersion>,
    /// Whether the target framework is .NET 8 or later.
    pub net8_or_greater: Option<bool>,
    /// Explicit feature set; overrides detection.
    pub features: Option<LanguageFeatures>,
}

impl ModelSettings {
    /// Parses settings from JSON text.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the text is not valid settings JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Applies these settings on top of `options`.
    #[must_use]
    pub fn apply(&self, mut options: GenerationOptions) -> GenerationOptions {
        if let Some(namespace) = &self.namespace {
            options.namespace = namespace.clone();
        }
        if let Some(access) = self.access {
            options.access = access;
        }
        if let Some(form) = self.form {
            options.form = form;
        }
        if self.language_version.is_some() || self.net8_or_greater.is_some() {
            options.features = LanguageFeatures::detect(
                self.language_version.unwrap_or_default(),
                self.net8_or_greater.unwrap_or(false),
            );
        }
        if let Some(features) = self.features {
            options.features = features;
        }
        options
    }
}
