#![deny(missing_docs)]

//! # External Code Generator
//!
//! Client/model code is produced by an external tool (OpenAPI Generator by
//! default). This module only knows how to call it: the [`CodeGenerator`]
//! trait is the seam, [`OpenApiGeneratorCli`] the process-spawning
//! implementation.

use crate::error::{AppError, AppResult};
use std::path::PathBuf;
use std::process::Command;

/// Command used to launch OpenAPI Generator when none is configured.
pub const DEFAULT_GENERATOR_COMMAND: &str = "npx @openapitools/openapi-generator-cli";

/// Generator used when none is named.
pub const DEFAULT_GENERATOR_NAME: &str = "typescript-node";

/// Options forwarded to the external generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output directory.
    pub output: PathBuf,
    /// Generator name (`-g`), e.g. `typescript-node`.
    pub generator_name: String,
    /// `--additional-properties`.
    pub additional_properties: Option<String>,
    /// `--global-property`.
    pub global_property: Option<String>,
    /// Generator configuration file (`-c`).
    pub config: Option<PathBuf>,
    /// Template directory (`-t`).
    pub template_dir: Option<PathBuf>,
    /// Authorization header used to fetch a remote spec (`--auth`).
    pub auth: Option<String>,
    /// `--skip-validate-spec`.
    pub skip_validate_spec: bool,
    /// `--strict-spec true`.
    pub strict_spec: bool,
}

impl GenerateOptions {
    /// Options with defaults for everything but the output directory.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        GenerateOptions {
            output: output.into(),
            generator_name: DEFAULT_GENERATOR_NAME.to_string(),
            additional_properties: None,
            global_property: None,
            config: None,
            template_dir: None,
            auth: None,
            skip_validate_spec: false,
            strict_spec: false,
        }
    }
}

/// Something that turns a spec into client/model code.
pub trait CodeGenerator {
    /// Generates code for `spec` (a path or URL) into `options.output`.
    fn generate(&self, spec: &str, options: &GenerateOptions) -> AppResult<()>;
}

/// Builds the `generate` sub-command arguments for OpenAPI Generator.
///
/// Each value is its own argument, so no shell quoting is involved.
pub fn generator_args(spec: &str, options: &GenerateOptions) -> Vec<String> {
    let mut args = vec![
        "generate".to_string(),
        "-i".to_string(),
        spec.to_string(),
        "-g".to_string(),
        options.generator_name.clone(),
        "-o".to_string(),
        options.output.to_string_lossy().into_owned(),
    ];

    if let Some(props) = &options.additional_properties {
        args.push("--additional-properties".to_string());
        args.push(props.clone());
    }
    if let Some(props) = &options.global_property {
        args.push("--global-property".to_string());
        args.push(props.clone());
    }
    if let Some(config) = &options.config {
        args.push("-c".to_string());
        args.push(config.to_string_lossy().into_owned());
    }
    if let Some(dir) = &options.template_dir {
        args.push("-t".to_string());
        args.push(dir.to_string_lossy().into_owned());
    }
    if let Some(auth) = &options.auth {
        args.push("--auth".to_string());
        args.push(auth.clone());
    }
    if options.skip_validate_spec {
        args.push("--skip-validate-spec".to_string());
    }
    if options.strict_spec {
        args.push("--strict-spec".to_string());
        args.push("true".to_string());
    }

    args
}

/// Runs OpenAPI Generator as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiGeneratorCli {
    program: String,
    prefix_args: Vec<String>,
}

impl OpenApiGeneratorCli {
    /// Parses a whitespace-separated command line such as
    /// `npx @openapitools/openapi-generator-cli` or `openapi-generator-cli`.
    pub fn from_command_line(command: &str) -> AppResult<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            AppError::GeneratorInvocation("empty generator command".to_string())
        })?;
        Ok(OpenApiGeneratorCli {
            program,
            prefix_args: parts.collect(),
        })
    }

    /// The full argument vector passed to the program.
    pub fn arguments(&self, spec: &str, options: &GenerateOptions) -> Vec<String> {
        let mut args = self.prefix_args.clone();
        args.extend(generator_args(spec, options));
        args
    }

    fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.prefix_args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for OpenApiGeneratorCli {
    fn default() -> Self {
        OpenApiGeneratorCli {
            program: "npx".to_string(),
            prefix_args: vec!["@openapitools/openapi-generator-cli".to_string()],
        }
    }
}

impl CodeGenerator for OpenApiGeneratorCli {
    fn generate(&self, spec: &str, options: &GenerateOptions) -> AppResult<()> {
        let args = self.arguments(spec, options);
        log::info!("Running: {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                AppError::GeneratorInvocation(format!(
                    "could not run `{}`: {}",
                    self.display_command(),
                    e
                ))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let detail = stderr.trim();
            return Err(AppError::GeneratorInvocation(if detail.is_empty() {
                format!("`{}` exited with {}", self.display_command(), output.status)
            } else {
                format!(
                    "`{}` exited with {}: {}",
                    self.display_command(),
                    output.status,
                    detail
                )
            }));
        }

        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            log::info!("{}", line);
        }
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            log::warn!("{}", line);
        }

        Ok(())
    }
}
