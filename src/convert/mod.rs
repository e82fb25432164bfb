mod manifest;
mod writer;

// Re-export from manifest
pub use manifest::{ModelManifest, WeightSpec, WeightsGroup, MANIFEST_FILE, SHARD_FILE};
// Re-export from writer
pub use writer::{write_artifact, ConversionReport};

use std::path::Path;

use colored::*;
use tracing::info;

use crate::model::{summary, LoadedModel, ModelError};
use crate::report::{ReportPolicy, Verbosity};

/// Load a checkpoint, convert it, and print status according to the
/// report policy. Returns the process exit code: failures are caught
/// and reported here, and only exit non-zero under a strict policy.
pub fn run(input: &Path, out_dir: &Path, policy: &ReportPolicy) -> i32 {
    match convert(input, out_dir, policy) {
        Ok(report) => {
            println!(
                "{}",
                format!(
                    "Model successfully converted and saved to {}",
                    report.output_dir.display()
                )
                .green()
            );
            if policy.verbosity >= Verbosity::Full {
                println!();
                println!("Model Configuration:");
                println!("Input Shape: {}", describe_shape(report.input_shape.as_deref()));
                println!("Output Shape: {}", describe_shape(report.output_shape.as_deref()));
                println!("Number of Layers: {}", report.layer_count);
            }
            0
        }
        Err(e) => {
            policy.report_failure(&e);
            policy.exit_code()
        }
    }
}

fn convert(
    input: &Path,
    out_dir: &Path,
    policy: &ReportPolicy,
) -> Result<ConversionReport, ModelError> {
    info!("Converting {} -> {}", input.display(), out_dir.display());
    let model = LoadedModel::open(input)?;
    if policy.verbosity >= Verbosity::Summary {
        let layers = summary::group_layers(&model.weights);
        summary::print_summary(&model.name, &layers);
    }
    write_artifact(&model, out_dir)
}

fn describe_shape(shape: Option<&[Option<usize>]>) -> String {
    match shape {
        Some(shape) => summary::format_shape(shape),
        None => "unknown".to_string(),
    }
}
