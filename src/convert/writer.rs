use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::Utc;
use half::{bf16, f16};
use safetensors::Dtype;
use tracing::{debug, info};

use super::manifest::{ModelManifest, WeightSpec, WeightsGroup, MANIFEST_FILE, SHARD_FILE};
use crate::model::{summary, LoadedModel, ModelError, WeightInfo};

/// Outcome of a conversion, used for the post-conversion report.
#[derive(Debug)]
pub struct ConversionReport {
    /// Directory the artifact was written to
    pub output_dir: PathBuf,
    /// Number of layers after grouping tensors by name prefix
    pub layer_count: usize,
    /// Inferred model input shape, if the checkpoint has a 2-D kernel
    pub input_shape: Option<Vec<Option<usize>>>,
    /// Inferred model output shape
    pub output_shape: Option<Vec<Option<usize>>>,
    /// Bytes written to the weight shard
    pub shard_bytes: u64,
}

/// Write the browser artifact for a loaded checkpoint: every tensor as
/// little-endian float32 in one shard, plus the JSON manifest.
///
/// Existing files are overwritten. There is no cleanup on failure, so a
/// failed run may leave a partially populated output directory.
pub fn write_artifact(model: &LoadedModel, out_dir: &Path) -> Result<ConversionReport, ModelError> {
    std::fs::create_dir_all(out_dir)?;

    let shard_path = out_dir.join(SHARD_FILE);
    let mut shard = BufWriter::new(File::create(&shard_path)?);
    let mut specs = Vec::with_capacity(model.weights.len());
    let mut shard_bytes = 0u64;

    for weight in &model.weights {
        shard_bytes += write_as_f32(&mut shard, model.weight_bytes(weight), weight)?;
        specs.push(WeightSpec {
            name: weight.name.clone(),
            shape: weight.shape.clone(),
            dtype: "float32".to_string(),
        });
        debug!("Wrote {} ({} params)", weight.name, weight.param_count());
    }
    shard.flush()?;

    let manifest = ModelManifest {
        format: "weights-manifest".to_string(),
        generated_by: format!("mconv {}", env!("CARGO_PKG_VERSION")),
        converted_at: Utc::now(),
        weights_manifest: vec![WeightsGroup {
            paths: vec![SHARD_FILE.to_string()],
            weights: specs,
        }],
    };
    let manifest_file = File::create(out_dir.join(MANIFEST_FILE))?;
    serde_json::to_writer_pretty(BufWriter::new(manifest_file), &manifest)
        .map_err(|e| ModelError::InvalidFormat(format!("Failed to encode manifest: {}", e)))?;

    let layers = summary::group_layers(&model.weights);
    info!(
        "Converted {} tensors ({} bytes) into {}",
        model.weight_count(),
        shard_bytes,
        out_dir.display()
    );

    Ok(ConversionReport {
        output_dir: out_dir.to_path_buf(),
        layer_count: layers.len(),
        input_shape: summary::input_shape(&layers),
        output_shape: summary::output_shape(&layers),
        shard_bytes,
    })
}

/// Stream one tensor to the shard as little-endian f32. Half floats are
/// widened, doubles narrowed; integer and bool tensors are rejected.
fn write_as_f32<W: Write>(
    out: &mut W,
    mut bytes: &[u8],
    weight: &WeightInfo,
) -> Result<u64, ModelError> {
    let count = weight.param_count();
    match weight.dtype {
        Dtype::F32 => {
            // Already little-endian f32 in the checkpoint
            out.write_all(bytes)?;
            Ok(bytes.len() as u64)
        }
        Dtype::F16 => {
            for chunk in bytes.chunks_exact(2) {
                let v = f16::from_le_bytes([chunk[0], chunk[1]]).to_f32();
                out.write_f32::<LittleEndian>(v)?;
            }
            Ok(count as u64 * 4)
        }
        Dtype::BF16 => {
            for chunk in bytes.chunks_exact(2) {
                let v = bf16::from_le_bytes([chunk[0], chunk[1]]).to_f32();
                out.write_f32::<LittleEndian>(v)?;
            }
            Ok(count as u64 * 4)
        }
        Dtype::F64 => {
            for _ in 0..count {
                let v = bytes.read_f64::<LittleEndian>()?;
                out.write_f32::<LittleEndian>(v as f32)?;
            }
            Ok(count as u64 * 4)
        }
        other => Err(ModelError::UnsupportedDType {
            tensor: weight.name.clone(),
            dtype: format!("{:?}", other),
        }),
    }
}
