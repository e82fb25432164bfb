use std::path::Path;

use clap::Parser;

use mconv::config::{self, Settings};
use mconv::convert;
use mconv::report::{ReportPolicy, Verbosity};

/// Checkpoint for the dashboard's coverage classifier
const INPUT_PATH: &str = "public/ai-model/saved_model/TrainedModelV5.safetensors";
const OUTPUT_DIR: &str = "public/ai-model/web_model";

#[derive(Parser)]
#[command(about = "Convert the coverage classifier checkpoint for the browser runtime")]
struct Args {
    /// Only print the success or error line
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
    /// Print the structural summary and post-conversion details
    #[arg(long)]
    verbose: bool,
    /// Exit non-zero when the conversion fails
    #[arg(long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Invalid settings, using defaults: {}", e);
        Settings::default()
    });
    let _guard = match config::init_tracing(&settings) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    // This tool historically printed the full summary and a trace on
    // failure, so its built-in verbosity is Full.
    let policy = ReportPolicy::new(Verbosity::Full)
        .with_settings(&settings)
        .with_flags(args.quiet, args.verbose, args.strict);

    let code = convert::run(Path::new(INPUT_PATH), Path::new(OUTPUT_DIR), &policy);
    std::process::exit(code);
}
