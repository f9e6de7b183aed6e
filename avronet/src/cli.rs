//! Command-line front end.

use anyhow::{Context, Result, bail};
use avronet_codegen::{
    AccessLevel, CodegenError, DeclarationForm, Diagnostic, GeneratedSource, GenerationOptions,
    GenerationOutput, Generator, LanguageVersion, ModelSettings,
};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Generate C# models from Avro JSON schema files.
#[derive(Parser, Debug)]
#[command(name = "avronet", version, about)]
pub struct CommandLineInterface {
    /// Avro schema files; each becomes one generated model.
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,

    /// Requested type name (single schema only; defaults to the file stem).
    #[arg(long)]
    pub type_name: Option<String>,

    /// Target C# namespace.
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Accessibility of generated declarations (`public` or `internal`).
    #[arg(long, value_parser = parse_access)]
    pub access: Option<AccessLevel>,

    /// Declaration form of records and errors (`class` or `record`).
    #[arg(long, value_parser = parse_form)]
    pub form: Option<DeclarationForm>,

    /// C# language version of the consuming project (7.3 to 12, or latest).
    #[arg(long, value_parser = parse_language_version)]
    pub language_version: Option<LanguageVersion>,

    /// The consuming project targets .NET 8 or later.
    #[arg(long)]
    pub net8: bool,

    /// JSON settings file; command-line flags take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for generated files (printed to stdout if omitted).
    #[arg(long, short)]
    pub out_dir: Option<PathBuf>,
}

fn parse_access(s: &str) -> Result<AccessLevel, String> {
    AccessLevel::from_keyword(s).ok_or_else(|| format!("unknown accessibility '{}'", s))
}

fn parse_form(s: &str) -> Result<DeclarationForm, String> {
    DeclarationForm::from_keyword(s).ok_or_else(|| format!("unknown declaration form '{}'", s))
}

fn parse_language_version(s: &str) -> Result<LanguageVersion, String> {
    LanguageVersion::parse(s).ok_or_else(|| format!("unsupported language version '{}'", s))
}

/// Generation requests built from the schema files.
#[derive(Debug, Default)]
pub struct Requests {
    /// One request per readable schema file.
    pub models: Vec<GenerationOptions>,
    /// Error diagnostics for schema files that could not be read.
    pub unreadable: Vec<Diagnostic>,
}

impl CommandLineInterface {
    /// Merges the configuration file with the command-line flags.
    ///
    /// # Errors
    /// Returns an error if the configuration file cannot be read or parsed.
    pub fn settings(&self) -> Result<ModelSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                ModelSettings::from_json(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => ModelSettings::default(),
        };

        if let Some(namespace) = &self.namespace {
            settings.namespace = Some(namespace.clone());
        }
        if self.access.is_some() {
            settings.access = self.access;
        }
        if self.form.is_some() {
            settings.form = self.form;
        }
        if self.language_version.is_some() {
            settings.language_version = self.language_version;
        }
        if self.net8 {
            settings.net8_or_greater = Some(true);
        }
        if settings.features.is_none() && settings.language_version.is_none() {
            settings.language_version = Some(LanguageVersion::default());
        }
        Ok(settings)
    }

    /// Builds one generation request per schema file.
    ///
    /// A file that cannot be read becomes an error diagnostic for its type
    /// and does not stop the other files.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid, or if `--type-name`
    /// is combined with several schema files.
    pub fn requests(&self) -> Result<Requests> {
        if self.type_name.is_some() && self.schemas.len() > 1 {
            bail!("--type-name requires exactly one schema file");
        }
        let settings = self.settings()?;

        let mut requests = Requests::default();
        for path in &self.schemas {
            let type_name = match &self.type_name {
                Some(name) => name.clone(),
                None => file_stem(path)?,
            };
            match fs::read_to_string(path) {
                Ok(text) => {
                    debug!(path = %path.display(), type_name = %type_name, "schema loaded");
                    requests
                        .models
                        .push(settings.apply(GenerationOptions::new(type_name, text)));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to read schema");
                    let err = CodegenError::from(err);
                    requests
                        .unreadable
                        .push(Diagnostic::from_error(&type_name, &err));
                }
            }
        }
        Ok(requests)
    }

    /// Generates every requested model and writes the sources.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or outputs cannot be
    /// written. Unreadable schemas and generation failures are reported as
    /// diagnostics in the output.
    pub fn run(&self, stdout: &mut impl Write) -> Result<GenerationOutput> {
        let requests = self.requests()?;
        let mut output = Generator::new().generate(&requests.models);
        let mut diagnostics = requests.unreadable;
        diagnostics.append(&mut output.diagnostics);
        output.diagnostics = diagnostics;

        match &self.out_dir {
            Some(dir) => write_sources(dir, &output.sources)?,
            None => print_sources(stdout, &output.sources)?,
        }
        Ok(output)
    }
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive a type name from {}", path.display()))
}

/// Writes generated sources into `dir`, creating it if needed.
///
/// # Errors
/// Returns an error if the directory or a file cannot be written.
pub fn write_sources(dir: &Path, sources: &[GeneratedSource]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for source in sources {
        let path = dir.join(&source.file_name);
        fs::write(&path, &source.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote source");
    }
    Ok(())
}

fn print_sources(out: &mut impl Write, sources: &[GeneratedSource]) -> Result<()> {
    for source in sources {
        writeln!(out, "// ==== {} ====", source.file_name)?;
        out.write_all(source.text.as_bytes())?;
        writeln!(out)?;
    }
    Ok(())
}
