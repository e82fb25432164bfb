use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Manifest file name the browser runtime loads first
pub const MANIFEST_FILE: &str = "model.json";
/// Single weight shard holding all tensor data as float32
pub const SHARD_FILE: &str = "group1-shard1of1.bin";

/// Top-level manifest written next to the weight shard.
///
/// Field names are camelCase on disk to match the JavaScript loader.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelManifest {
    /// Artifact format marker
    pub format: String,
    /// Tool name and version that produced the artifact
    pub generated_by: String,
    /// When the conversion ran
    pub converted_at: DateTime<Utc>,
    /// Weight groups, each with its shard paths and tensor specs
    pub weights_manifest: Vec<WeightsGroup>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightsGroup {
    /// Shard file names, relative to the manifest
    pub paths: Vec<String>,
    /// Tensor entries in shard order
    pub weights: Vec<WeightSpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightSpec {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: String,
}
