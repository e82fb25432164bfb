use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use super::types::WeightInfo;

/// A group of weight tensors sharing a name prefix, treated as one
/// layer for reporting purposes.
#[derive(Debug, Clone)]
pub struct LayerInfo {
    /// Layer name (the shared tensor-name prefix)
    pub name: String,
    /// Weight tensors belonging to the layer
    pub weights: Vec<WeightInfo>,
}

impl LayerInfo {
    /// Total number of parameters across the layer's tensors
    pub fn param_count(&self) -> usize {
        self.weights.iter().map(|w| w.param_count()).sum()
    }

    /// The layer's kernel tensor, if it has one (first tensor with
    /// two or more dimensions).
    pub fn kernel(&self) -> Option<&WeightInfo> {
        self.weights.iter().find(|w| w.shape.len() >= 2)
    }
}

/// Strip the final path component from a tensor name to get its layer
/// prefix: "dense_1/kernel" -> "dense_1", "layers.0.weight" -> "layers.0".
fn layer_prefix(name: &str) -> &str {
    match name.rfind(|c| c == '/' || c == '.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

/// Group weight tensors into layers, preserving data-section order.
pub fn group_layers(weights: &[WeightInfo]) -> Vec<LayerInfo> {
    let mut layers: Vec<LayerInfo> = Vec::new();
    for weight in weights {
        let prefix = layer_prefix(&weight.name);
        match layers.iter_mut().find(|l| l.name == prefix) {
            Some(layer) => layer.weights.push(weight.clone()),
            None => layers.push(LayerInfo {
                name: prefix.to_string(),
                weights: vec![weight.clone()],
            }),
        }
    }
    layers
}

/// Input shape in Keras notation: the batch dimension is unknown, the
/// feature dimension comes from the first layer kernel.
pub fn input_shape(layers: &[LayerInfo]) -> Option<Vec<Option<usize>>> {
    layers
        .iter()
        .find_map(|l| l.kernel())
        .map(|k| vec![None, Some(k.shape[0])])
}

/// Output shape from the last layer kernel's trailing dimension.
pub fn output_shape(layers: &[LayerInfo]) -> Option<Vec<Option<usize>>> {
    layers
        .iter()
        .rev()
        .find_map(|l| l.kernel())
        .map(|k| vec![None, Some(k.shape[k.shape.len() - 1])])
}

/// Render a shape as "(None, 5)".
pub fn format_shape(shape: &[Option<usize>]) -> String {
    let dims: Vec<String> = shape
        .iter()
        .map(|d| match d {
            Some(n) => n.to_string(),
            None => "None".to_string(),
        })
        .collect();
    format!("({})", dims.join(", "))
}

/// Print the structural summary table for a checkpoint.
pub fn print_summary(model_name: &str, layers: &[LayerInfo]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Layer")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Weights")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Shapes")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new("Params")
                .fg(comfy_table::Color::Cyan)
                .add_attribute(Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for layer in layers {
        let shapes = layer
            .weights
            .iter()
            .map(|w| format!("{:?}", w.shape))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(&layer.name).fg(comfy_table::Color::Green),
            Cell::new(layer.weights.len().to_string()).set_alignment(CellAlignment::Right),
            Cell::new(shapes),
            Cell::new(layer.param_count().to_string()).set_alignment(CellAlignment::Right),
        ]);
    }

    let total: usize = layers.iter().map(|l| l.param_count()).sum();
    println!("Model: {}", model_name);
    println!("{table}");
    println!("Total params: {}", total);
}

#[cfg(test)]
mod tests {
    use super::*;
    use safetensors::Dtype;

    fn weight(name: &str, shape: Vec<usize>) -> WeightInfo {
        WeightInfo {
            name: name.to_string(),
            dtype: Dtype::F32,
            shape,
            data_offsets: (0, 0),
        }
    }

    #[test]
    fn test_layer_prefix_slash_and_dot() {
        assert_eq!(layer_prefix("dense_1/kernel"), "dense_1");
        assert_eq!(layer_prefix("layers.0.weight"), "layers.0");
        assert_eq!(layer_prefix("embedding"), "embedding");
    }

    #[test]
    fn test_group_layers_preserves_order() {
        let weights = vec![
            weight("dense_1/kernel", vec![5, 8]),
            weight("dense_1/bias", vec![8]),
            weight("dense_2/kernel", vec![8, 3]),
            weight("dense_2/bias", vec![3]),
        ];
        let layers = group_layers(&weights);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].name, "dense_1");
        assert_eq!(layers[0].weights.len(), 2);
        assert_eq!(layers[0].param_count(), 5 * 8 + 8);
        assert_eq!(layers[1].name, "dense_2");
    }

    #[test]
    fn test_shape_inference_from_kernels() {
        let weights = vec![
            weight("dense_1/kernel", vec![5, 8]),
            weight("dense_1/bias", vec![8]),
            weight("dense_2/kernel", vec![8, 3]),
        ];
        let layers = group_layers(&weights);
        assert_eq!(input_shape(&layers), Some(vec![None, Some(5)]));
        assert_eq!(output_shape(&layers), Some(vec![None, Some(3)]));
    }

    #[test]
    fn test_shape_inference_without_kernels() {
        let layers = group_layers(&[weight("norm/scale", vec![16])]);
        assert_eq!(input_shape(&layers), None);
        assert_eq!(output_shape(&layers), None);
    }

    #[test]
    fn test_format_shape() {
        assert_eq!(format_shape(&[None, Some(5)]), "(None, 5)");
        assert_eq!(format_shape(&[Some(10), Some(5)]), "(10, 5)");
    }
}
