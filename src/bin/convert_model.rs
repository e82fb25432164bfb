use std::path::Path;

use clap::Parser;

use mconv::config::{self, Settings};
use mconv::convert;
use mconv::report::{ReportPolicy, Verbosity};

/// Checkpoint for the water hyacinth detector used by image analysis
const INPUT_PATH: &str = "public/model/water_hyacinth_modelV2.safetensors";
const OUTPUT_DIR: &str = "public/model";

#[derive(Parser)]
#[command(about = "Convert the water hyacinth detector checkpoint for the browser runtime")]
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

    let policy = ReportPolicy::new(Verbosity::Quiet)
        .with_settings(&settings)
        .with_flags(args.quiet, args.verbose, args.strict);

    let code = convert::run(Path::new(INPUT_PATH), Path::new(OUTPUT_DIR), &policy);
    std::process::exit(code);
}
