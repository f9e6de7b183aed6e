//! Batch generation of model sources.
//!
//! A [`Generator`] turns a list of requests into generated sources. Each
//! request is compiled independently: a failure becomes a [`Diagnostic`]
//! for that type and the remaining requests still produce output.

use crate::compiler::SchemaCompiler;
use crate::csharp::{AUTO_GENERATED_BANNER, GENERATED_CODE_ATTRIBUTE};
use crate::error::CodegenError;
use crate::options::{GenerationOptions, ModelRequest};
use crate::writer::SourceWriter;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// File name of the marker attribute source.
pub const ATTRIBUTE_FILE_NAME: &str = "AvroModelAttribute.g.cs";

/// Code of the warning reported when two named types share a C# name.
pub const DUPLICATE_TYPE_NAME: &str = "AVRO004";

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    /// File name, unique per generation run.
    pub file_name: String,
    /// Source text.
    pub text: String,
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Generation failed for the type.
    Error,
    /// Generation succeeded with a caveat.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

/// Problem reported for one requested type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic code, such as `AVRO001`.
    pub code: &'static str,
    /// Severity.
    pub severity: Severity,
    /// Requested type the diagnostic belongs to.
    pub type_name: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Builds an error diagnostic from a generation failure.
    #[must_use]
    pub fn from_error(type_name: &str, error: &CodegenError) -> Self {
        Self {
            code: error.diagnostic_code(),
            severity: Severity::Error,
            type_name: type_name.to_string(),
            message: error.to_string(),
        }
    }

    /// Builds a warning diagnostic.
    #[must_use]
    pub fn warning(code: &'static str, type_name: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}: {}",
            self.severity, self.code, self.type_name, self.message
        )
    }
}

/// Shared flag that stops a running batch between requests.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Output of one batch.
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Generated sources, the attribute source first.
    pub sources: Vec<GeneratedSource>,
    /// Per-type diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether the batch stopped early.
    pub cancelled: bool,
}

impl GenerationOutput {
    /// Returns true if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns the source with the given file name.
    #[must_use]
    pub fn source(&self, file_name: &str) -> Option<&GeneratedSource> {
        self.sources.iter().find(|s| s.file_name == file_name)
    }
}

/// Batch generator.
///
/// Holds no state between runs, so one generator can serve concurrent
/// batches from several threads.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    cancellation: CancellationFlag,
}

impl Generator {
    /// Creates a generator without cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that observes `flag`.
    #[must_use]
    pub fn with_cancellation(flag: CancellationFlag) -> Self {
        Self { cancellation: flag }
    }

    /// Generates sources for every request.
    ///
    /// The marker attribute source is emitted once per batch, even when a
    /// request fails or the batch is cancelled.
    #[must_use]
    pub fn generate(&self, requests: &[ModelRequest]) -> GenerationOutput {
        let mut output = GenerationOutput {
            sources: vec![attribute_source()],
            ..GenerationOutput::default()
        };

        for (index, request) in requests.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                warn!(remaining = requests.len() - index, "generation cancelled");
                output.cancelled = true;
                break;
            }
            match compile_request(request) {
                Ok((source, warnings)) => {
                    output.sources.push(source);
                    output.diagnostics.extend(warnings.into_iter().map(|message| {
                        Diagnostic::warning(DUPLICATE_TYPE_NAME, &request.type_name, message)
                    }));
                }
                Err(err) => {
                    let diagnostic = Diagnostic::from_error(&request.type_name, &err);
                    warn!(
                        code = diagnostic.code,
                        type_name = %request.type_name,
                        error = %err,
                        "model generation failed"
                    );
                    output.diagnostics.push(diagnostic);
                }
            }
        }

        info!(
            sources = output.sources.len(),
            diagnostics = output.diagnostics.len(),
            "generation finished"
        );
        output
    }
}

/// Generates the source for a single request.
///
/// # Errors
/// Returns `CodegenError::MissingSchema` for blank schema text,
/// `CodegenError::Parse` for malformed schemas and other variants for
/// internal failures.
pub fn generate_one(options: &GenerationOptions) -> Result<GeneratedSource, CodegenError> {
    compile_request(options).map(|(source, _)| source)
}

fn compile_request(
    options: &GenerationOptions,
) -> Result<(GeneratedSource, Vec<String>), CodegenError> {
    if options.schema_text.trim().is_empty() {
        return Err(CodegenError::missing_schema(&options.type_name));
    }
    let graph = avronet_schema::parse_schema(&options.schema_text)?;
    let compiled = SchemaCompiler::new(&graph, options).compile()?;
    info!(
        file = %options.output_file_name(),
        declarations = compiled.declarations.len(),
        "model generated"
    );
    let source = GeneratedSource {
        file_name: options.output_file_name(),
        text: compiled.text,
    };
    Ok((source, compiled.warnings))
}

/// Returns the source that declares the `AvroModel` marker attribute.
#[must_use]
pub fn attribute_source() -> GeneratedSource {
    let mut w = SourceWriter::new();
    w.line(AUTO_GENERATED_BANNER.trim_end());
    w.line("namespace AvroNet");
    w.block(|w| {
        w.line(GENERATED_CODE_ATTRIBUTE);
        w.line(
            "[global::System.AttributeUsage(global::System.AttributeTargets.Class, AllowMultiple = false)]",
        );
        w.line("internal sealed class AvroModelAttribute : global::System.Attribute { }");
    });
    GeneratedSource {
        file_name: ATTRIBUTE_FILE_NAME.to_string(),
        text: w.into_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LanguageFeatures;

    const USER: &str = r#"{"type":"record","name":"User","namespace":"demo","fields":[
        {"name":"Name","type":"string"},
        {"name":"Age","type":"int","default":18},
        {"name":"Description","type":["null","string"]}
    ]}"#;

    #[test]
    fn test_attribute_source() {
        let source = attribute_source();
        assert_eq!(source.file_name, "AvroModelAttribute.g.cs");
        assert!(source.text.starts_with(AUTO_GENERATED_BANNER));
        assert!(source.text.ends_with(
            "namespace AvroNet\n{\n\
             \x20   [global::System.CodeDom.Compiler.GeneratedCodeAttribute(\"AvroNet\", \"1.0.0.0\")]\n\
             \x20   [global::System.AttributeUsage(global::System.AttributeTargets.Class, AllowMultiple = false)]\n\
             \x20   internal sealed class AvroModelAttribute : global::System.Attribute { }\n\
             }\n"
        ));
    }

    #[test]
    fn test_generate_one_file_name() {
        let options = GenerationOptions::new("User", USER).namespace("Demo");
        let source = generate_one(&options).expect("Failed to generate");
        assert_eq!(source.file_name, "User.AvroModel.g.cs");
        assert!(source.text.contains("public partial class User"));
    }

    #[test]
    fn test_missing_schema_is_localized() {
        let requests = vec![
            GenerationOptions::new("Empty", "   "),
            GenerationOptions::new("User", USER),
        ];
        let output = Generator::new().generate(&requests);
        assert!(output.has_errors());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].code, "AVRO001");
        assert_eq!(output.diagnostics[0].type_name, "Empty");
        assert_eq!(output.sources.len(), 2);
        assert!(output.source("AvroModelAttribute.g.cs").is_some());
        assert!(output.source("User.AvroModel.g.cs").is_some());
        assert!(output.source("Empty.AvroModel.g.cs").is_none());
    }

    #[test]
    fn test_parse_failure_diagnostic() {
        let requests = vec![GenerationOptions::new("Broken", r#"{"type":"record"}"#)];
        let output = Generator::new().generate(&requests);
        assert_eq!(output.diagnostics[0].code, "AVRO002");
        assert!(output.diagnostics[0].to_string().starts_with("error AVRO002: Broken: "));
        assert_eq!(output.sources.len(), 1);
    }

    #[test]
    fn test_recursive_default_does_not_stop_batch() {
        let requests = vec![
            GenerationOptions::new(
                "R",
                r#"{"type":"record","name":"R","fields":[{"name":"next","type":["R","null"],"default":{}}]}"#,
            ),
            GenerationOptions::new("E", r#"{"type":"enum","name":"E","symbols":["A"]}"#),
        ];
        let output = Generator::new().generate(&requests);
        assert!(!output.has_errors());
        let record = output.source("R.AvroModel.g.cs").expect("R generated");
        assert!(record.text.contains("public R next { get; set; }\n"));
        assert!(output.source("E.AvroModel.g.cs").is_some());
    }

    #[test]
    fn test_duplicate_type_name_is_a_warning() {
        let schema = r#"{"type":"record","name":"Outer","fields":[
            {"name":"first","type":{"type":"fixed","name":"X","namespace":"a","size":1}},
            {"name":"second","type":{"type":"fixed","name":"X","namespace":"b","size":2}}
        ]}"#;
        let output = Generator::new().generate(&[GenerationOptions::new("Outer", schema)]);
        assert!(!output.has_errors());
        assert!(output.source("Outer.AvroModel.g.cs").is_some());
        assert_eq!(output.diagnostics.len(), 1);
        let diagnostic = &output.diagnostics[0];
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(
            diagnostic.to_string(),
            "warning AVRO004: Outer: 'a.X' and 'b.X' are both declared as C# type 'X'"
        );
    }

    #[test]
    fn test_cancellation_stops_batch() {
        let flag = CancellationFlag::new();
        flag.cancel();
        let generator = Generator::with_cancellation(flag.clone());
        let output = generator.generate(&[GenerationOptions::new("User", USER)]);
        assert!(flag.is_cancelled());
        assert!(output.cancelled);
        assert_eq!(output.sources.len(), 1);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_concurrent_batches_match() {
        let generator = Generator::new();
        let requests = vec![
            GenerationOptions::new("User", USER)
                .namespace("Demo")
                .features(LanguageFeatures::all()),
        ];
        let expected = generator.generate(&requests).sources;
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| generator.generate(&requests).sources))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().expect("thread panicked"), expected);
            }
        });
    }
}
