use std::fmt;
use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::network::spec::{LayerSpec, SavedNetwork};

/// A finalized feedforward network stored as flat arrays.
///
/// Layers are kept in inference order: index `0` is the output layer and
/// index `layer_count() - 1` is the input layer. Within a layer the feed
/// neurons come first, followed by the bias neuron if the layer has one.
///
/// The weights feeding layer `i` start at `weight_index[i]` and are laid
/// out one destination neuron at a time, each row spanning every neuron
/// (bias included) of layer `i + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SavedNetwork", into = "SavedNetwork")]
pub struct Network {
    input_count: usize,
    output_count: usize,
    neuron_count: usize,
    weight_count: usize,
    /// Total neurons per layer, bias included.
    layer_counts: Vec<usize>,
    /// Neurons per layer produced by a weighted sum.
    layer_feed_counts: Vec<usize>,
    /// Start of each layer within `layer_output` / `layer_sums`.
    layer_index: Vec<usize>,
    /// Start of the weights feeding each layer.
    weight_index: Vec<usize>,
    /// Constant output of each layer's bias neuron (0.0 when absent).
    bias_activation: Vec<f64>,
    activations: Vec<ActivationFunction>,
    layer_output: Vec<f64>,
    layer_sums: Vec<f64>,
    weights: Vec<f64>,
}

impl Network {
    /// Builds a network from layer descriptions given input layer first.
    pub fn from_layers(layers: &[LayerSpec]) -> Result<Network> {
        if layers.len() < 2 {
            return Err(NetError::TooFewLayers(layers.len()));
        }
        if let Some(index) = layers.iter().position(|l| l.count == 0) {
            return Err(NetError::EmptyLayer { index });
        }

        // Output layer first.
        let ordered: Vec<&LayerSpec> = layers.iter().rev().collect();
        let layer_count = ordered.len();

        let layer_counts: Vec<usize> = ordered.iter().map(|l| l.total_count()).collect();
        let layer_feed_counts: Vec<usize> = ordered.iter().map(|l| l.count).collect();
        let bias_activation: Vec<f64> = ordered
            .iter()
            .map(|l| if l.bias { 1.0 } else { 0.0 })
            .collect();
        let activations: Vec<ActivationFunction> = ordered.iter().map(|l| l.activation).collect();

        let mut layer_index = Vec::with_capacity(layer_count);
        let mut neuron_count = 0;
        for &count in &layer_counts {
            layer_index.push(neuron_count);
            neuron_count += count;
        }

        let mut weight_index = vec![0; layer_count];
        for i in 1..layer_count {
            weight_index[i] = weight_index[i - 1] + layer_counts[i] * layer_feed_counts[i - 1];
        }
        let weight_count = weight_index[layer_count - 1];

        let mut network = Network {
            input_count: layer_feed_counts[layer_count - 1],
            output_count: layer_feed_counts[0],
            neuron_count,
            weight_count,
            layer_counts,
            layer_feed_counts,
            layer_index,
            weight_index,
            bias_activation,
            activations,
            layer_output: vec![0.0; neuron_count],
            layer_sums: vec![0.0; neuron_count],
            weights: vec![0.0; weight_count],
        };
        network.clear_context();
        Ok(network)
    }

    /// Runs one forward pass, writing the output layer into `output`.
    pub fn compute(&mut self, input: &[f64], output: &mut [f64]) -> Result<()> {
        if input.len() != self.input_count {
            return Err(NetError::InputSizeMismatch {
                expected: self.input_count,
                actual: input.len(),
            });
        }
        if output.len() != self.output_count {
            return Err(NetError::OutputSizeMismatch {
                expected: self.output_count,
                actual: output.len(),
            });
        }
        self.compute_unchecked(input, output);
        Ok(())
    }

    /// Allocating variant of [`Network::compute`].
    pub fn forward(&mut self, input: &[f64]) -> Result<Vec<f64>> {
        let mut output = vec![0.0; self.output_count];
        self.compute(input, &mut output)?;
        Ok(output)
    }

    /// Forward pass for callers that already validated buffer lengths.
    pub(crate) fn compute_unchecked(&mut self, input: &[f64], output: &mut [f64]) {
        let input_layer = self.layer_count() - 1;
        let source = self.layer_index[input_layer];
        self.layer_output[source..source + self.input_count].copy_from_slice(input);

        for layer in (1..=input_layer).rev() {
            self.compute_layer(layer);
        }

        output.copy_from_slice(&self.layer_output[..self.output_count]);
    }

    /// Computes the layer fed by `source_layer`.
    fn compute_layer(&mut self, source_layer: usize) {
        let target_layer = source_layer - 1;
        let input_index = self.layer_index[source_layer];
        let input_size = self.layer_counts[source_layer];
        let output_index = self.layer_index[target_layer];
        let output_size = self.layer_feed_counts[target_layer];
        let weight_start = self.weight_index[target_layer];

        // Target layers always sit before their source in the flat array.
        let (targets, sources) = self.layer_output.split_at_mut(input_index);
        let sources = &sources[..input_size];
        let targets = &mut targets[output_index..output_index + output_size];
        let sums = &mut self.layer_sums[output_index..output_index + output_size];
        let rows = self.weights[weight_start..weight_start + output_size * input_size]
            .chunks_exact(input_size);

        for ((out, sum_slot), row) in targets.iter_mut().zip(sums.iter_mut()).zip(rows) {
            let mut sum = 0.0;
            for (w, o) in row.iter().zip(sources) {
                sum += w * o;
            }
            *sum_slot = sum;
            *out = sum;
        }

        self.activations[target_layer].apply(targets);
    }

    /// Zeroes every neuron output and sum, then restores bias outputs.
    pub fn clear_context(&mut self) {
        self.layer_output.iter_mut().for_each(|x| *x = 0.0);
        self.layer_sums.iter_mut().for_each(|x| *x = 0.0);
        for layer in 0..self.layer_count() {
            if self.has_bias(layer) {
                let bias = self.layer_index[layer] + self.layer_feed_counts[layer];
                self.layer_output[bias] = self.bias_activation[layer];
            }
        }
    }

    /// Fills every weight uniformly in `[low, high]`.
    pub fn randomize_range<R: Rng + ?Sized>(&mut self, rng: &mut R, low: f64, high: f64) -> Result<()> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(NetError::InvalidRange { low, high });
        }
        for w in self.weights.iter_mut() {
            *w = rng.gen_range(low..=high);
        }
        Ok(())
    }

    /// Replaces all weights with `weights`.
    pub fn import_weights(&mut self, weights: &[f64]) -> Result<()> {
        self.check_weight_len(weights.len())?;
        self.weights.copy_from_slice(weights);
        Ok(())
    }

    /// Copies all weights into `out`.
    pub fn export_weights(&self, out: &mut [f64]) -> Result<()> {
        self.check_weight_len(out.len())?;
        out.copy_from_slice(&self.weights);
        Ok(())
    }

    fn check_weight_len(&self, actual: usize) -> Result<()> {
        if actual != self.weight_count {
            return Err(NetError::WeightCountMismatch {
                expected: self.weight_count,
                actual,
            });
        }
        Ok(())
    }

    pub fn input_count(&self) -> usize {
        self.input_count
    }

    pub fn output_count(&self) -> usize {
        self.output_count
    }

    pub fn neuron_count(&self) -> usize {
        self.neuron_count
    }

    pub fn weight_count(&self) -> usize {
        self.weight_count
    }

    pub fn layer_count(&self) -> usize {
        self.layer_counts.len()
    }

    pub fn layer_counts(&self) -> &[usize] {
        &self.layer_counts
    }

    pub fn layer_feed_counts(&self) -> &[usize] {
        &self.layer_feed_counts
    }

    pub fn layer_index(&self) -> &[usize] {
        &self.layer_index
    }

    pub fn weight_index(&self) -> &[usize] {
        &self.weight_index
    }

    pub fn activations(&self) -> &[ActivationFunction] {
        &self.activations
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn layer_output(&self) -> &[f64] {
        &self.layer_output
    }

    pub fn layer_sums(&self) -> &[f64] {
        &self.layer_sums
    }

    fn has_bias(&self, layer: usize) -> bool {
        self.layer_counts[layer] != self.layer_feed_counts[layer]
    }

    /// The structure as layer descriptions, input layer first.
    pub fn layer_specs(&self) -> Vec<LayerSpec> {
        (0..self.layer_count())
            .rev()
            .map(|i| LayerSpec::new(self.layer_feed_counts[i], self.activations[i], self.has_bias(i)))
            .collect()
    }

    /// Serializes structure and weights to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Multi-line dump: counts, index tables, activations, weights and the
/// neuron outputs of the last `compute`.
impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "* * Network * *")?;
        writeln!(f, "Input Count: {}", self.input_count)?;
        writeln!(f, "Output Count: {}", self.output_count)?;
        writeln!(f, "Layer Count: {}", self.layer_count())?;
        writeln!(f, "Neuron Count: {}", self.neuron_count)?;
        writeln!(f, "Weight Count: {}", self.weight_count)?;
        writeln!(f, "layerCounts: {:?}", self.layer_counts)?;
        writeln!(f, "layerFeedCounts: {:?}", self.layer_feed_counts)?;
        writeln!(f, "layerIndex: {:?}", self.layer_index)?;
        writeln!(f, "weightIndex: {:?}", self.weight_index)?;
        writeln!(f, "biasActivation: {:?}", self.bias_activation)?;
        let names: Vec<&str> = self.activations.iter().map(|a| a.name()).collect();
        writeln!(f, "activations: {:?}", names)?;
        writeln!(f, "weights: {:?}", self.weights)?;
        write!(f, "layerOutput: {:?}", self.layer_output)
    }
}
