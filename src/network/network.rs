use log::debug;
use serde::Serialize;

use crate::error::{Result, SynthError};
use crate::layers::dense::DenseLayer;

/// A pretrained fully-connected sigmoid network.
///
/// Immutable once built: a new network file replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layer_sizes: Vec<usize>,
    weights: Vec<Vec<f64>>,
}

impl Network {
    /// Validates layer sizes against the flat weight tables.
    ///
    /// Table `l` must hold exactly `(layer_sizes[l] + 1) * layer_sizes[l + 1]`
    /// entries, bias row first.
    pub fn new(layer_sizes: Vec<usize>, weights: Vec<Vec<f64>>) -> Result<Network> {
        if layer_sizes.len() < 2 {
            return Err(SynthError::MalformedNetwork(format!(
                "need at least 2 layer sizes, got {}",
                layer_sizes.len()
            )));
        }
        if let Some(l) = layer_sizes.iter().position(|&s| s == 0) {
            return Err(SynthError::MalformedNetwork(format!("layer {l} has size 0")));
        }
        if weights.len() != layer_sizes.len() - 1 {
            return Err(SynthError::MalformedNetwork(format!(
                "{} layer sizes need {} weight tables, got {}",
                layer_sizes.len(),
                layer_sizes.len() - 1,
                weights.len()
            )));
        }
        for (l, table) in weights.iter().enumerate() {
            let expected = DenseLayer::table_len(layer_sizes[l], layer_sizes[l + 1]);
            if table.len() != expected {
                return Err(SynthError::MalformedNetwork(format!(
                    "weight table {l} has {} entries, expected {expected}",
                    table.len()
                )));
            }
        }

        debug!("network validated: layer sizes {:?}", layer_sizes);
        Ok(Network { layer_sizes, weights })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Layer transitions in order, input side first.
    pub fn layers(&self) -> impl Iterator<Item = DenseLayer<'_>> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(|(l, table)| DenseLayer::new(self.layer_sizes[l], self.layer_sizes[l + 1], table))
    }

    /// Runs `input` through every layer and keeps each layer's activations.
    ///
    /// The input layer is copied through unchanged, so the result always has
    /// `layer_sizes().len()` entries.
    pub fn forward(&self, input: &[f64]) -> Result<Activations> {
        if input.len() != self.input_size() {
            return Err(SynthError::InputSizeMismatch {
                got: input.len(),
                expected: self.input_size(),
            });
        }

        let mut layers: Vec<Vec<f64>> = Vec::with_capacity(self.layer_sizes.len());
        layers.push(input.to_vec());
        for layer in self.layers() {
            let next = layer.feed_from(&layers[layers.len() - 1]);
            layers.push(next);
        }
        Ok(Activations { layers })
    }
}

/// Free-function form of [`Network::forward`].
pub fn propagate(network: &Network, input: &[f64]) -> Result<Activations> {
    network.forward(input)
}

/// Per-layer activation vectors from one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activations {
    layers: Vec<Vec<f64>>,
}

impl Activations {
    pub fn layers(&self) -> &[Vec<f64>] {
        &self.layers
    }

    pub fn input(&self) -> &[f64] {
        &self.layers[0]
    }

    /// Activations of layer `l`, counting the input layer as 0.
    pub fn layer(&self, l: usize) -> Option<&[f64]> {
        self.layers.get(l).map(|v| v.as_slice())
    }

    pub fn output(&self) -> &[f64] {
        &self.layers[self.layers.len() - 1]
    }

    /// Index of the strongest output unit; the first one wins a tie.
    pub fn predicted_class(&self) -> usize {
        argmax(self.output())
    }

    pub fn into_layers(self) -> Vec<Vec<f64>> {
        self.layers
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
