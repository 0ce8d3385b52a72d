use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, LevelFilter};
use transport_kwargs::{inspect_kwargs, Kwargs, LogTarget, TransportRegistry};

/// Log target under which dropped transport parameters are reported
const FILTER_LOG_TARGET: LogTarget<'static> = LogTarget(env!("CARGO_CRATE_NAME"));

#[derive(Parser, Debug)]
#[command(
    name = "transport-kwargs",
    version,
    about = "Inspect transport signatures and filter transport parameters per backend"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered URI schemes
    Schemes,

    /// Print the keyword parameters a scheme's backend accepts, with defaults
    Inspect {
        /// URI scheme, e.g. s3 or https
        scheme: String,
    },

    /// Filter transport parameters down to what the URI's backend accepts
    Filter {
        /// Target URI or local path
        uri: String,

        /// Transport parameters as a JSON object
        #[arg(long, env = "TRANSPORT_KWARGS_PARAMS", conflicts_with = "params_file")]
        params: Option<String>,

        /// Read transport parameters from a JSON file
        #[arg(long)]
        params_file: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn parse_params(raw: &str) -> Result<Kwargs> {
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Failed to parse transport parameters as JSON")?;
    match value {
        serde_json::Value::Object(params) => Ok(params),
        other => bail!(
            "Transport parameters must be a JSON object, got: {}",
            other
        ),
    }
}

fn load_params(params: Option<String>, params_file: Option<PathBuf>) -> Result<Kwargs> {
    if let Some(path) = params_file {
        debug!("Reading transport parameters from {}", path.display());
        let content = std::fs::read_to_string(&path).context(format!(
            "Failed to read parameters file: {}",
            path.display()
        ))?;
        return parse_params(&content);
    }
    match params {
        Some(raw) => parse_params(&raw),
        None => Ok(Kwargs::new()),
    }
}

fn write_json(out: &mut impl Write, value: &Kwargs) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    writeln!(out, "{}", rendered).context("Failed to write output")?;
    Ok(())
}

fn run(command: Command) -> Result<()> {
    let registry = TransportRegistry::with_defaults();

    match command {
        Command::Schemes => {
            let mut stdout = std::io::stdout().lock();
            for scheme in registry.schemes() {
                writeln!(stdout, "{}", scheme).context("Failed to write output")?;
            }
        }
        Command::Inspect { scheme } => {
            let backend = registry.get(&scheme).with_context(|| {
                format!(
                    "No transport registered for scheme '{}' (known: {})",
                    scheme,
                    registry.schemes().join(", ")
                )
            })?;
            let defaults = inspect_kwargs(backend.as_ref())
                .context(format!("Failed to inspect transport '{}'", scheme))?;
            write_json(&mut std::io::stdout().lock(), &defaults)?;
        }
        Command::Filter {
            uri,
            params,
            params_file,
        } => {
            let params = load_params(params, params_file)?;
            let filtered = registry
                .transport_params(&uri, &params, &FILTER_LOG_TARGET)
                .context(format!("Failed to filter transport parameters for {}", uri))?;
            write_json(&mut std::io::stdout().lock(), &filtered)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
