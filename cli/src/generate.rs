#![deny(missing_docs)]

//! # Generate Command
//!
//! Produces everything the mock server needs from one OpenAPI spec.
//!
//! This command:
//! 1. Reads the spec (file or URL) once and parses it.
//! 2. Runs the external code generator (unless `--skip-codegen`).
//! 3. Copies the spec verbatim to `openapi.json` / `openapi.yaml`.
//! 4. Writes the mock corpus and `mock-config.json`.

use crate::error::CliResult;
use crate::source::read_spec_source;
use nicemock_core::generator::{DEFAULT_GENERATOR_COMMAND, DEFAULT_GENERATOR_NAME};
use nicemock_core::oas::spec_copy_name;
use nicemock_core::{build_corpus, CodeGenerator, GenerateOptions, SpecDocument};
use std::fs;
use std::path::PathBuf;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// OpenAPI specification file path or URL.
    pub spec: String,

    /// Output directory.
    #[clap(short, long, default_value = "./generated")]
    pub output: PathBuf,

    /// Generator name passed to the external generator.
    #[clap(short = 'g', long, default_value = DEFAULT_GENERATOR_NAME)]
    pub generator_name: String,

    /// Additional properties for the generator.
    #[clap(long)]
    pub additional_properties: Option<String>,

    /// Global properties for the generator.
    #[clap(long)]
    pub global_property: Option<String>,

    /// Configuration file for the generator.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Template directory.
    #[clap(short = 't', long)]
    pub template_dir: Option<PathBuf>,

    /// Authorization header(s) for fetching a remote spec (`Name:value,...`).
    #[clap(long)]
    pub auth: Option<String>,

    /// Skip validation of the input spec.
    #[clap(long)]
    pub skip_validate_spec: bool,

    /// Treat the spec strictly.
    #[clap(long)]
    pub strict_spec: bool,

    /// Command line that launches the external generator.
    #[clap(long, env = "OPENAPI_GENERATOR_COMMAND", default_value = DEFAULT_GENERATOR_COMMAND)]
    pub generator_command: String,

    /// Only copy the spec and build the mocks; do not run the external generator.
    #[clap(long)]
    pub skip_codegen: bool,
}

impl GenerateArgs {
    /// The options handed to the external generator.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            output: self.output.clone(),
            generator_name: self.generator_name.clone(),
            additional_properties: self.additional_properties.clone(),
            global_property: self.global_property.clone(),
            config: self.config.clone(),
            template_dir: self.template_dir.clone(),
            auth: self.auth.clone(),
            skip_validate_spec: self.skip_validate_spec,
            strict_spec: self.strict_spec,
        }
    }
}

/// Executes the generation.
///
/// # Arguments
///
/// * `args` - Command arguments.
/// * `generator` - The external code generator.
pub fn execute(args: &GenerateArgs, generator: &impl CodeGenerator) -> CliResult<()> {
    log::info!("Generating from OpenAPI spec: {}", args.spec);
    log::info!("Output directory: {:?}", args.output);

    fs::create_dir_all(&args.output)?;

    // 1. Read & Parse
    let content = read_spec_source(&args.spec, args.auth.as_deref())?;
    let document = SpecDocument::parse(&content)?;

    // 2. External Code Generation
    if args.skip_codegen {
        log::info!("Skipping code generation (--skip-codegen).");
    } else {
        generator.generate(&args.spec, &args.generate_options())?;
    }

    // 3. Spec Copy (read back by `run`)
    let spec_copy = args.output.join(spec_copy_name(&args.spec, &content));
    fs::write(&spec_copy, &content)?;
    log::info!("✓ OpenAPI spec copied to: {:?}", spec_copy);

    // 4. Mock Corpus
    let report = build_corpus(&document, &args.output)?;
    for skipped in &report.skipped {
        log::warn!(
            "No mock file for {} {}: {}",
            skipped.method,
            skipped.template,
            skipped.error
        );
    }
    log::info!(
        "✓ Mock server files generated ({} mock files)",
        report.written.len()
    );

    let resolved = fs::canonicalize(&args.output).unwrap_or_else(|_| args.output.clone());
    log::info!("✓ Generation completed successfully!");
    log::info!("Generated files are in: {:?}", resolved);
    log::info!("Run \"open-api-nice-mock run\" to start the mock server");

    Ok(())
}
