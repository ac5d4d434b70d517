use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `count`      — number of neurons fed by the previous layer (or, for the
///                  input layer, the raw input dimension)
/// - `activation` — activation applied to this layer's weighted sums
/// - `bias`       — when set, the layer carries one extra constant-output
///                  neuron that feeds the next layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub count: usize,
    pub activation: ActivationFunction,
    pub bias: bool,
}

impl LayerSpec {
    pub fn new(count: usize, activation: ActivationFunction, bias: bool) -> LayerSpec {
        LayerSpec { count, activation, bias }
    }

    /// Feed neurons plus the bias neuron, if any.
    pub fn total_count(&self) -> usize {
        self.count + usize::from(self.bias)
    }
}

/// An unfinalized network: an ordered list of layer descriptions, input
/// layer first.
///
/// `NetworkSpec` can be saved to / loaded from JSON independently of any
/// weights. `finalize` freezes it into a [`Network`] with all index tables
/// and flat arrays allocated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    pub fn new() -> NetworkSpec {
        NetworkSpec::default()
    }

    /// Appends a layer on the output side of the layers added so far.
    pub fn add_layer(&mut self, count: usize, activation: ActivationFunction, bias: bool) -> &mut Self {
        self.layers.push(LayerSpec::new(count, activation, bias));
        self
    }

    /// Number of weights a network finalized from this spec would carry.
    ///
    /// For every adjacent pair this is the source layer's total count
    /// (bias included) times the destination layer's feed count.
    pub fn weight_count(&self) -> usize {
        self.layers
            .windows(2)
            .map(|pair| pair[0].total_count() * pair[1].count)
            .sum()
    }

    /// Freezes the topology and allocates the flat arrays.
    pub fn finalize(&self) -> Result<Network> {
        Network::from_layers(&self.layers)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// On-disk form of a finalized network: its structure plus the flat
/// weight vector. Index tables are rebuilt on load, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedNetwork {
    pub layers: Vec<LayerSpec>,
    pub weights: Vec<f64>,
}

impl From<Network> for SavedNetwork {
    fn from(network: Network) -> Self {
        SavedNetwork {
            layers: network.layer_specs(),
            weights: network.weights().to_vec(),
        }
    }
}

impl TryFrom<SavedNetwork> for Network {
    type Error = NetError;

    fn try_from(saved: SavedNetwork) -> Result<Self> {
        let mut network = Network::from_layers(&saved.layers)?;
        network.import_weights(&saved.weights)?;
        Ok(network)
    }
}
