#![deny(missing_docs)]

//! # OpenAPI Nice Mock CLI
//!
//! Generates client code plus a file-backed mock corpus from an OpenAPI
//! spec, and serves that corpus over HTTP.
//!
//! Supported Commands:
//! - `generate`: Spec -> external generator output + spec copy + mock files.
//! - `run`: Serves the generated directory as a mock API.

use clap::{Parser, Subcommand};
use env_logger::Env;
use nicemock_core::OpenApiGeneratorCli;
use std::io::Write;
use std::process::ExitCode;

use crate::error::CliResult;

mod error;
mod generate;
#[cfg(feature = "server")]
mod run;
#[cfg(feature = "server")]
mod server;
mod source;

#[derive(Parser, Debug)]
#[clap(
    name = "open-api-nice-mock",
    author,
    version,
    about = "Generate code from OpenAPI and serve editable JSON mocks"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate code, a spec copy and mock files from an OpenAPI spec.
    Generate(generate::GenerateArgs),
    /// Start the mock server over a generated directory.
    #[cfg(feature = "server")]
    Run(run::RunArgs),
}

fn dispatch(command: &Commands) -> CliResult<()> {
    match command {
        Commands::Generate(args) => {
            // Injecting the openapi-generator-cli launcher
            let generator = OpenApiGeneratorCli::from_command_line(&args.generator_command)?;
            generate::execute(args, &generator)
        }
        #[cfg(feature = "server")]
        Commands::Run(args) => run::execute(args),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    finish(dispatch(&cli.command), &mut std::io::stderr())
}

/// Maps the command result to the exit code. Failures are logged and also
/// written to `stderr`, which stays visible when logging is filtered off.
fn finish(result: CliResult<()>, stderr: &mut impl Write) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            let _ = writeln!(stderr, "Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
