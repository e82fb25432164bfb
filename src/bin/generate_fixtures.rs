use anyhow::Result;

use mconv::config::{self, Settings};
use mconv::synth;

/// Root the web app serves fixture arrays from
const OUTPUT_ROOT: &str = "public/ai-model";

fn main() -> Result<()> {
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

    // Generation failures propagate: the process exits non-zero with
    // the error's diagnostic rendering.
    synth::generate(OUTPUT_ROOT)
}
