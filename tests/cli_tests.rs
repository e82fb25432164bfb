use std::fs;
use std::path::Path;
use std::process::Command;

use safetensors::tensor::TensorView;
use safetensors::Dtype;

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Two dense layers: 5 features in, 8 hidden, 3 classes out.
fn write_checkpoint(path: &Path) {
    let kernel1 = f32_bytes(&[0.1; 5 * 8]);
    let bias1 = f32_bytes(&[0.0; 8]);
    let kernel2 = f32_bytes(&[0.2; 8 * 3]);
    let bias2 = f32_bytes(&[0.0; 3]);
    let tensors = vec![
        ("dense_1/kernel", TensorView::new(Dtype::F32, vec![5, 8], &kernel1).unwrap()),
        ("dense_1/bias", TensorView::new(Dtype::F32, vec![8], &bias1).unwrap()),
        ("dense_2/kernel", TensorView::new(Dtype::F32, vec![8, 3], &kernel2).unwrap()),
        ("dense_2/bias", TensorView::new(Dtype::F32, vec![3], &bias2).unwrap()),
    ];
    let data = safetensors::serialize(tensors, &None).unwrap();
    fs::write(path, data).unwrap();
}

#[test]
fn convert_model_prints_success_line() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("public").join("model");
    fs::create_dir_all(&input_dir).unwrap();
    write_checkpoint(&input_dir.join("water_hyacinth_modelV2.safetensors"));

    let output = Command::new(env!("CARGO_BIN_EXE_convert_model"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("successfully converted"),
        "stdout was: {}",
        stdout
    );
    assert!(input_dir.join("model.json").exists());
    assert!(input_dir.join("group1-shard1of1.bin").exists());
}

#[test]
fn convert_model_prints_error_and_exits_zero_without_input() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_convert_model"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error"), "stdout was: {}", stdout);
    assert!(!stdout.contains("successfully converted"));
}

#[test]
fn convert_model_strict_flag_fails_the_process() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_convert_model"))
        .arg("--strict")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error"), "stdout was: {}", stdout);
}

#[test]
fn convert_ai_model_prints_configuration_block() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("public").join("ai-model").join("saved_model");
    fs::create_dir_all(&input_dir).unwrap();
    write_checkpoint(&input_dir.join("TrainedModelV5.safetensors"));

    let output = Command::new(env!("CARGO_BIN_EXE_convert_ai_model"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("successfully converted"), "stdout was: {}", stdout);
    assert!(stdout.contains("Model Configuration:"));
    assert!(stdout.contains("Input Shape: (None, 5)"));
    assert!(stdout.contains("Output Shape: (None, 3)"));
    assert!(stdout.contains("Number of Layers: 2"));
    assert!(dir
        .path()
        .join("public/ai-model/web_model/model.json")
        .exists());
}

#[test]
fn generate_fixtures_names_the_written_files() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_generate_fixtures"))
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NumPy files generated successfully"));
    assert!(stdout.contains("input_data.npy"));
    assert!(stdout.contains("metadata.npy"));
    assert!(dir.path().join("public/ai-model/input_data.npy").exists());
    assert!(dir.path().join("public/ai-model/metadata.npy").exists());
}
