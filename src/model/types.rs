use std::error::Error;
use std::fmt;

use safetensors::Dtype;

/// Custom error types for checkpoint loading and conversion
#[derive(Debug)]
pub enum ModelError {
    /// Wraps std::io::Error for file operations
    IoError(std::io::Error),
    /// Invalid checkpoint format errors with a message
    InvalidFormat(String),
    /// Tensor dtype the browser artifact cannot represent
    UnsupportedDType { tensor: String, dtype: String },
}

/// Implements Display trait for ModelError for error reporting
impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::IoError(e) => write!(f, "I/O error: {}", e),
            ModelError::InvalidFormat(msg) => write!(f, "Invalid checkpoint format: {}", msg),
            ModelError::UnsupportedDType { tensor, dtype } => {
                write!(f, "Unsupported dtype {} for tensor {}", dtype, tensor)
            }
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// Allows automatic conversion from std::io::Error to ModelError
impl From<std::io::Error> for ModelError {
    fn from(err: std::io::Error) -> Self {
        ModelError::IoError(err)
    }
}

impl From<safetensors::SafeTensorError> for ModelError {
    fn from(err: safetensors::SafeTensorError) -> Self {
        ModelError::InvalidFormat(err.to_string())
    }
}

/// Description of one weight tensor in a loaded checkpoint
#[derive(Debug, Clone)]
pub struct WeightInfo {
    /// Tensor name as stored in the checkpoint header
    pub name: String,
    /// Element dtype as stored in the checkpoint
    pub dtype: Dtype,
    /// Tensor dimensions
    pub shape: Vec<usize>,
    /// Byte range within the checkpoint's data section
    pub data_offsets: (usize, usize),
}

impl WeightInfo {
    /// Number of elements in the tensor
    pub fn param_count(&self) -> usize {
        self.shape.iter().product()
    }
}
