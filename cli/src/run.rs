#![deny(missing_docs)]

//! # Run Command
//!
//! Starts the mock server over a directory produced by `generate`.

use crate::error::{CliError, CliResult};
use crate::server::{serve, MockContext};
use nicemock_core::corpus::DEFAULT_PORT;
use std::path::PathBuf;

/// Arguments for the run command.
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Port to listen on.
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory containing the generated files.
    #[clap(short, long, default_value = "./generated")]
    pub dir: PathBuf,

    /// Host to bind to.
    #[clap(short = 'H', long, default_value = "localhost")]
    pub host: String,
}

/// Loads the generated directory and serves it until interrupted.
pub fn execute(args: &RunArgs) -> CliResult<()> {
    let context = load_context(args)?;
    actix_rt::System::new().block_on(serve(context, &args.host, args.port))?;
    Ok(())
}

fn load_context(args: &RunArgs) -> CliResult<MockContext> {
    if !args.dir.is_dir() {
        return Err(CliError::General(format!(
            "Generated directory not found: {:?}. Run \"open-api-nice-mock generate\" first.",
            args.dir
        )));
    }
    Ok(MockContext::load(&args.dir)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nicemock_core::AppError;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[derive(clap::Parser)]
    struct Harness {
        #[clap(flatten)]
        args: RunArgs,
    }

    #[test]
    fn test_defaults() {
        let args = Harness::parse_from(["harness"]).args;
        assert_eq!(args.port, 3000);
        assert_eq!(args.dir, PathBuf::from("./generated"));
        assert_eq!(args.host, "localhost");
    }

    #[test]
    fn test_short_flags() {
        let args = Harness::parse_from(["harness", "-p", "8080", "-d", "out", "-H", "0.0.0.0"]).args;
        assert_eq!(args.port, 8080);
        assert_eq!(args.dir, PathBuf::from("out"));
        assert_eq!(args.host, "0.0.0.0");
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let args = Harness::parse_from(["harness", "-d", dir.path().join("nope").to_str().unwrap()]).args;
        let err = execute(&args).unwrap_err();
        assert!(format!("{}", err).contains("Generated directory not found"));
    }

    #[test]
    fn test_directory_without_spec() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("mocks")).unwrap();
        let args = Harness::parse_from(["harness", "-d", dir.path().to_str().unwrap()]).args;
        let err = load_context(&args).unwrap_err();
        assert!(matches!(err, CliError::App(AppError::SpecNotFound(_))));
    }

    #[test]
    fn test_loads_generated_directory() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("openapi.json"),
            r#"{"openapi": "3.0.0", "paths": {"/pets": {"get": {"responses": {}}}}}"#,
        )
        .unwrap();
        let args = Harness::parse_from(["harness", "-d", dir.path().to_str().unwrap()]).args;
        let context = load_context(&args).unwrap();
        assert_eq!(context.table().len(), 1);
        assert_eq!(context.mocks_dir(), dir.path().join("mocks"));
    }
}
