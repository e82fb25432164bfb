use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use safetensors::SafeTensors;
use tracing::{debug, info};

use super::types::{ModelError, WeightInfo};

/// Length of the little-endian header-size prefix at the start of a
/// safetensors file.
const HEADER_PREFIX_LEN: usize = 8;

/// A checkpoint memory-mapped from disk with its header parsed.
///
/// Only the header is materialized; tensor data stays in the map and is
/// handed out as byte slices during conversion.
#[derive(Debug)]
pub struct LoadedModel {
    /// Path to the checkpoint file
    pub path: PathBuf,
    /// Model name derived from the file name
    pub name: String,
    /// Weight tensors in data-section order
    pub weights: Vec<WeightInfo>,
    /// Memory-mapped checkpoint contents
    data: Mmap,
    /// Offset of the data section within the file
    data_start: usize,
}

impl LoadedModel {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        // Safety: the file is opened read-only and is not resized while mapped.
        let data = unsafe { Mmap::map(&file)? };

        let (header_len, metadata) = SafeTensors::read_metadata(&data)?;
        let data_start = HEADER_PREFIX_LEN + header_len;

        let mut weights: Vec<WeightInfo> = metadata
            .tensors()
            .into_iter()
            .map(|(name, info)| WeightInfo {
                name,
                dtype: info.dtype,
                shape: info.shape.clone(),
                data_offsets: info.data_offsets,
            })
            .collect();
        // Header order is arbitrary; the data section layout is canonical.
        weights.sort_by_key(|w| w.data_offsets.0);

        if let Some(w) = weights
            .iter()
            .find(|w| data_start + w.data_offsets.1 > data.len())
        {
            return Err(ModelError::InvalidFormat(format!(
                "tensor {} extends past the end of the file",
                w.name
            )));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        info!(
            "Loaded checkpoint {} with {} weight tensors",
            path.display(),
            weights.len()
        );
        debug!("Data section starts at byte {}", data_start);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            weights,
            data,
            data_start,
        })
    }

    /// Raw little-endian bytes of one weight tensor.
    pub fn weight_bytes(&self, weight: &WeightInfo) -> &[u8] {
        let (start, end) = weight.data_offsets;
        &self.data[self.data_start + start..self.data_start + end]
    }

    pub fn weight_count(&self) -> usize {
        self.weights.len()
    }
}
