use crate::{LayoutError, NetworkLayout, ShapeMismatchError};

/// A fixed-topology feedforward network.
///
/// The network has no learning logic of its own. Its weights are overwritten wholesale from
/// a flat gene vector every generation, and [`NeuralNetwork::evaluate`] is a pure function
/// of the input and those weights. The only mutable state besides the weights are the
/// per-layer activation buffers reused between calls.
#[derive(Debug, Clone)]
pub struct NeuralNetwork {
    layout: NetworkLayout,
    // weight layer L is row-major [neuron in L+1][neuron in L]
    weight_layers: Vec<Vec<f64>>,
    neuron_layers: Vec<Vec<f64>>,
}

impl NeuralNetwork {
    /// Creates a network with every weight set to zero.
    pub fn new(layout: NetworkLayout) -> Result<Self, LayoutError> {
        layout.check_structure()?;
        let weight_layers = layout
            .layer_sizes
            .windows(2)
            .map(|w| vec![0.0; w[0] * w[1]])
            .collect();
        let neuron_layers = layout.layer_sizes.iter().map(|&n| vec![0.0; n]).collect();
        Ok(Self {
            layout,
            weight_layers,
            neuron_layers,
        })
    }

    /// Creates a network and installs the given flat weights.
    pub fn with_weights(layout: NetworkLayout, weights: &[f64]) -> Result<Self, NetworkError> {
        let mut network = Self::new(layout)?;
        network.set_weights(weights)?;
        Ok(network)
    }

    #[must_use]
    pub fn layout(&self) -> &NetworkLayout {
        &self.layout
    }

    #[must_use]
    pub fn number_of_weights(&self) -> usize {
        self.layout.number_of_weights()
    }

    #[must_use]
    pub fn number_of_neurons(&self) -> usize {
        self.layout.number_of_neurons()
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layout.input_len()
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.layout.output_len()
    }

    /// Overwrites every weight in (layer, neuron, incoming connection) order.
    ///
    /// This ordering is the chromosome layout the genetic algorithm evolves. On a length
    /// mismatch nothing is written.
    pub fn set_weights(&mut self, genes: &[f64]) -> Result<(), ShapeMismatchError> {
        let expected = self.number_of_weights();
        if genes.len() != expected {
            return Err(ShapeMismatchError::weights(expected, genes.len()));
        }
        let mut rest = genes;
        for layer in &mut self.weight_layers {
            let (head, tail) = rest.split_at(layer.len());
            layer.copy_from_slice(head);
            rest = tail;
        }
        Ok(())
    }

    /// Returns the weights flattened in the same order [`NeuralNetwork::set_weights`] reads them.
    #[must_use]
    pub fn weights(&self) -> Vec<f64> {
        self.weight_layers.iter().flatten().copied().collect()
    }

    /// Runs a forward pass and returns the output layer.
    ///
    /// Each non-input neuron computes `activation(Σ weight · previous + layer bias)`.
    pub fn evaluate(&mut self, input: &[f64]) -> Result<&[f64], ShapeMismatchError> {
        let expected = self.input_len();
        if input.len() != expected {
            return Err(ShapeMismatchError::input(expected, input.len()));
        }
        self.neuron_layers[0].copy_from_slice(input);

        for (index, weights) in self.weight_layers.iter().enumerate() {
            let (done, pending) = self.neuron_layers.split_at_mut(index + 1);
            let previous = &done[index];
            let current = &mut pending[0];
            let bias = self.layout.biases[index];
            let activation = self.layout.activations[index];
            for (neuron, row) in current.iter_mut().zip(weights.chunks_exact(previous.len())) {
                let sum = row
                    .iter()
                    .zip(previous)
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>();
                *neuron = activation.apply(sum + bias);
            }
        }

        Ok(self.output())
    }

    /// The output layer computed by the most recent [`NeuralNetwork::evaluate`].
    #[must_use]
    pub fn output(&self) -> &[f64] {
        self.neuron_layers
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("invalid network layout: {_0}")]
    Layout(LayoutError),
    #[display("{_0}")]
    Shape(ShapeMismatchError),
}

impl From<LayoutError> for NetworkError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<ShapeMismatchError> for NetworkError {
    fn from(err: ShapeMismatchError) -> Self {
        Self::Shape(err)
    }
}
