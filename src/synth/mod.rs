pub mod npy;

use std::path::Path;

use anyhow::Result;
use ndarray::Array2;
use rand::Rng;
use tracing::info;

/// File names the browser test pipeline expects under the fixture root
pub const INPUT_DATA_FILE: &str = "input_data.npy";
pub const METADATA_FILE: &str = "metadata.npy";

/// Shape of the placeholder feature matrix: 10 samples, 5 features
pub const INPUT_ROWS: usize = 10;
pub const INPUT_COLS: usize = 5;

/// Cyclic label pattern used for the placeholder metadata vector
const LABEL_CLASSES: [&str; 3] = ["class_a", "class_b", "class_c"];
const LABEL_COUNT: usize = 10;

/// Placeholder feature matrix with unseeded uniform values in [0, 1).
/// Every run produces fresh values; reproducibility is not a goal.
pub fn input_matrix() -> Array2<f64> {
    let mut rng = rand::rng();
    Array2::from_shape_fn((INPUT_ROWS, INPUT_COLS), |_| rng.random::<f64>())
}

/// The fixed 10-element label cycle: a, b, c, a, b, c, a, b, c, a.
pub fn label_vector() -> Vec<&'static str> {
    (0..LABEL_COUNT)
        .map(|i| LABEL_CLASSES[i % LABEL_CLASSES.len()])
        .collect()
}

/// Generate both fixture files under `out_root`, overwriting any
/// previous run, and print one confirmation line per file.
///
/// Failures are deliberately not caught here; the caller lets them
/// propagate so the process exits non-zero with a diagnostic.
pub fn generate<P: AsRef<Path>>(out_root: P) -> Result<()> {
    let out_root = out_root.as_ref();
    std::fs::create_dir_all(out_root)?;

    let input_path = out_root.join(INPUT_DATA_FILE);
    npy::write_f64_matrix(&input_path, &input_matrix())?;

    let metadata_path = out_root.join(METADATA_FILE);
    npy::write_str_vector(&metadata_path, &label_vector())?;

    info!("Fixture arrays written under {}", out_root.display());
    println!("NumPy files generated successfully:");
    println!("1. {}", input_path.display());
    println!("2. {}", metadata_path.display());
    Ok(())
}
