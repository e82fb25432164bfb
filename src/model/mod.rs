mod loader;
pub mod summary;
mod types;

// Re-export from loader
pub use loader::LoadedModel;
// Re-export from types
pub use types::{ModelError, WeightInfo};
