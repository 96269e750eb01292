mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use commands::{cmd_check, cmd_kinds, cmd_parse};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Bucket metrics aggregation request checker.
#[derive(Parser)]
#[command(
    name = "bucketagg",
    version,
    about = "Bucket metrics aggregation request checker"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Refuse deprecated field names instead of warning about them
    #[arg(long, global = true)]
    strict: bool,

    /// TOML file with a [parser] table of parser options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "bucketagg_core=trace"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single request body for one metric kind
    Parse {
        /// Path to the JSON request body
        file: PathBuf,
        /// Metric kind, e.g. avg_bucket
        #[arg(long)]
        kind: String,
        /// Aggregation name used in messages and output
        #[arg(long, default_value = "request")]
        name: String,
    },

    /// Parse a definitions document holding several named requests
    Check {
        /// Path to the JSON definitions document
        file: PathBuf,
    },

    /// List the registered metric kinds
    Kinds,
}

fn main() {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    let options = match config::load_parser_options(cli.config.as_deref(), cli.strict) {
        Ok(options) => options,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Parse { file, kind, name } => {
            cmd_parse(&file, &kind, &name, &options, cli.output, cli.quiet);
        }
        Commands::Check { file } => {
            cmd_check(&file, &options, cli.output, cli.quiet);
        }
        Commands::Kinds => {
            cmd_kinds(cli.output, cli.quiet);
        }
    }
}

/// Print an error message to stderr in the requested format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}

/// Print a structured error value; text mode prints only its message.
pub(crate) fn report_error_value(value: &serde_json::Value, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let pretty = serde_json::to_string_pretty(value)
                .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
            eprintln!("{}", pretty);
        }
        OutputFormat::Text => {
            if !quiet {
                let msg = value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown error");
                eprintln!("error: {}", msg);
            }
        }
    }
}
