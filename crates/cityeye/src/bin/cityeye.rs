//! `cityeye` CLI: manage a file-backed civic store and print JSON.
//!
//! Storage location and key namespace come from `CITYEYE_DATA_DIR` and
//! `CITYEYE_NAMESPACE`. Logs go to stderr as JSON, filtered by `RUST_LOG`.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use cityeye::StoreSettings;
use cityeye::cli::{Cli, CliError, run};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    match load_and_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn load_and_run(cli: Cli) -> Result<(), CliError> {
    let settings = StoreSettings::load_from_iter([OsString::from("cityeye")])
        .map_err(|err| CliError::Config(err.to_string()))?;
    let output = run(&settings, cli.command)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}
