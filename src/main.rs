use std::path::PathBuf;

use clap::Parser;
use tracing::{error, warn};

use suffixing::logging::{self, DEFAULT_LOG_LEVEL, LogFormat};
use suffixing::{SuffixConfig, SuffixEngine};

/// Copy or move files, inserting a suffix before each file's extension.
#[derive(Debug, Parser)]
#[command(name = "suffixing", version)]
struct Args {
    /// Properties file with `mode`, `suffix` and `files` keys.
    config: PathBuf,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, env = "SUFFIXING_LOG_FORMAT")]
    log_format: LogFormat,

    /// Log filter, used when RUST_LOG is unset.
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    summary_json: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_level, args.log_format) {
        eprintln!("suffixing: {e:#}");
        return;
    }

    let config = match SuffixConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) if e.is_warning() => {
            warn!("{}", e);
            return;
        }
        Err(e) => {
            error!("{}", e);
            if let Some(source) = std::error::Error::source(&e) {
                error!("Caused by: {}", source);
            }
            return;
        }
    };

    let summary = SuffixEngine::new(config).run();

    if args.summary_json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => error!("Failed to serialize summary: {}", e),
        }
    }
}
