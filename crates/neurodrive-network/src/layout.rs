use serde::{Deserialize, Serialize};

use crate::Activation;

/// Topology of a fixed feedforward network plus its per-layer constants.
///
/// `layer_sizes` holds the neuron count of every layer, input first and output last.
/// `activations` and `biases` hold one entry per non-input layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub layer_sizes: Vec<usize>,
    pub activations: Vec<Activation>,
    pub biases: Vec<f64>,
}

impl NetworkLayout {
    /// Creates a layout with the default activation and a zero bias on every non-input layer.
    #[must_use]
    pub fn new(input: usize, hidden: &[usize], output: usize) -> Self {
        let layer_sizes = std::iter::once(input)
            .chain(hidden.iter().copied())
            .chain(std::iter::once(output))
            .collect::<Vec<_>>();
        let non_input = layer_sizes.len() - 1;
        Self {
            layer_sizes,
            activations: vec![Activation::default(); non_input],
            biases: vec![0.0; non_input],
        }
    }

    /// Binds the same activation function to every non-input layer.
    #[must_use]
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activations.fill(activation);
        self
    }

    #[must_use]
    pub fn with_activations(mut self, activations: Vec<Activation>) -> Self {
        self.activations = activations;
        self
    }

    #[must_use]
    pub fn with_biases(mut self, biases: Vec<f64>) -> Self {
        self.biases = biases;
        self
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layer_sizes.first().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.layer_sizes.last().copied().unwrap_or(0)
    }

    /// Saturates at `usize::MAX`; [`NetworkLayout::check_structure`] rejects such layouts.
    #[must_use]
    pub fn number_of_neurons(&self) -> usize {
        self.layer_sizes
            .iter()
            .fold(0, |sum, &size| sum.saturating_add(size))
    }

    /// Sum over weight layers of `neurons in layer × neurons in previous layer`.
    ///
    /// Saturates at `usize::MAX`; [`NetworkLayout::check_structure`] rejects such layouts.
    #[must_use]
    pub fn number_of_weights(&self) -> usize {
        self.checked_number_of_weights().unwrap_or(usize::MAX)
    }

    fn checked_number_of_weights(&self) -> Option<usize> {
        self.layer_sizes
            .windows(2)
            .try_fold(0_usize, |sum, w| sum.checked_add(w[0].checked_mul(w[1])?))
    }

    /// Checks only what the evaluator itself needs: at least an input and an output layer,
    /// no empty layer, per-layer constants matching the layer count, and a weight count
    /// that fits in `usize`.
    pub fn check_structure(&self) -> Result<(), LayoutError> {
        self.check_layer_count(2, usize::MAX)?;
        self.check_neuron_counts(1, usize::MAX)?;
        self.check_constant_counts()?;
        if self.checked_number_of_weights().is_none()
            || self.number_of_neurons() == usize::MAX
        {
            return Err(LayoutError::WeightCountOverflow);
        }
        Ok(())
    }

    /// Checks the layout against editor/persistence limits.
    pub fn validate(&self, limits: &LayoutLimits) -> Result<(), LayoutError> {
        self.check_layer_count(limits.min_layers, limits.max_layers)?;
        self.check_neuron_counts(limits.min_neurons_per_layer, limits.max_neurons_per_layer)?;
        self.check_constant_counts()?;
        for &bias in &self.biases {
            if bias < limits.min_bias {
                return Err(LayoutError::BiasBelowMinimum {
                    bias,
                    min: limits.min_bias,
                });
            }
            if bias > limits.max_bias {
                return Err(LayoutError::BiasAboveMaximum {
                    bias,
                    max: limits.max_bias,
                });
            }
        }
        Ok(())
    }

    fn check_layer_count(&self, min: usize, max: usize) -> Result<(), LayoutError> {
        let layers = self.layer_sizes.len();
        if layers < min {
            return Err(LayoutError::TooFewLayers { layers, min });
        }
        if layers > max {
            return Err(LayoutError::TooManyLayers { layers, max });
        }
        Ok(())
    }

    fn check_neuron_counts(&self, min: usize, max: usize) -> Result<(), LayoutError> {
        for (layer, &neurons) in self.layer_sizes.iter().enumerate() {
            if neurons < min {
                return Err(LayoutError::TooFewNeurons {
                    layer,
                    neurons,
                    min,
                });
            }
            if neurons > max {
                return Err(LayoutError::TooManyNeurons {
                    layer,
                    neurons,
                    max,
                });
            }
        }
        Ok(())
    }

    fn check_constant_counts(&self) -> Result<(), LayoutError> {
        let expected = self.layer_sizes.len().saturating_sub(1);
        if self.activations.len() != expected {
            return Err(LayoutError::ActivationCount {
                expected,
                actual: self.activations.len(),
            });
        }
        if self.biases.len() != expected {
            return Err(LayoutError::BiasCount {
                expected,
                actual: self.biases.len(),
            });
        }
        Ok(())
    }
}

/// Bounds a layout must respect before it is stored or offered for training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutLimits {
    pub min_layers: usize,
    pub max_layers: usize,
    pub min_neurons_per_layer: usize,
    pub max_neurons_per_layer: usize,
    pub min_bias: f64,
    pub max_bias: f64,
}

impl LayoutLimits {
    pub const MAX_HIDDEN_LAYERS: usize = 4;
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            min_layers: 2,
            max_layers: 2 + Self::MAX_HIDDEN_LAYERS,
            min_neurons_per_layer: 1,
            max_neurons_per_layer: 12,
            min_bias: -10.0,
            max_bias: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum LayoutError {
    #[display("too few neuron layers: {layers} (minimum {min})")]
    TooFewLayers { layers: usize, min: usize },
    #[display("too many neuron layers: {layers} (maximum {max})")]
    TooManyLayers { layers: usize, max: usize },
    #[display("too few neurons in layer {layer}: {neurons} (minimum {min})")]
    TooFewNeurons {
        layer: usize,
        neurons: usize,
        min: usize,
    },
    #[display("too many neurons in layer {layer}: {neurons} (maximum {max})")]
    TooManyNeurons {
        layer: usize,
        neurons: usize,
        max: usize,
    },
    #[display("incorrect number of activation functions: expected {expected}, got {actual}")]
    ActivationCount { expected: usize, actual: usize },
    #[display("incorrect length of bias vector: expected {expected}, got {actual}")]
    BiasCount { expected: usize, actual: usize },
    #[display("number of weights overflows")]
    WeightCountOverflow,
    #[display("bias {bias} is less than the minimum allowed {min}")]
    BiasBelowMinimum { bias: f64, min: f64 },
    #[display("bias {bias} is greater than the maximum allowed {max}")]
    BiasAboveMaximum { bias: f64, max: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let layout = NetworkLayout::new(3, &[4, 2], 1);
        assert_eq!(layout.layer_sizes, vec![3, 4, 2, 1]);
        assert_eq!(layout.activations.len(), 3);
        assert_eq!(layout.biases, vec![0.0; 3]);
        assert_eq!(layout.number_of_neurons(), 10);
        assert_eq!(layout.number_of_weights(), 3 * 4 + 4 * 2 + 2);
        assert_eq!(layout.input_len(), 3);
        assert_eq!(layout.output_len(), 1);
    }

    #[test]
    fn test_weight_count_overflow() {
        let layout = NetworkLayout::new(1 << 33, &[], 1 << 33);
        assert_eq!(layout.number_of_weights(), usize::MAX);
        assert_eq!(
            layout.check_structure(),
            Err(LayoutError::WeightCountOverflow)
        );

        let layout = NetworkLayout::new(usize::MAX / 2, &[1, 1], usize::MAX / 2);
        assert_eq!(
            layout.check_structure(),
            Err(LayoutError::WeightCountOverflow)
        );
    }

    #[test]
    fn test_no_hidden_layer() {
        let layout = NetworkLayout::new(2, &[], 3);
        assert_eq!(layout.number_of_weights(), 6);
        assert!(layout.check_structure().is_ok());
    }

    #[test]
    fn test_structure_errors() {
        let mut layout = NetworkLayout::new(2, &[0], 1);
        assert_eq!(
            layout.check_structure(),
            Err(LayoutError::TooFewNeurons {
                layer: 1,
                neurons: 0,
                min: 1
            })
        );

        layout = NetworkLayout::new(2, &[2], 1).with_activations(vec![Activation::Tanh]);
        assert_eq!(
            layout.check_structure(),
            Err(LayoutError::ActivationCount {
                expected: 2,
                actual: 1
            })
        );

        layout = NetworkLayout::new(2, &[2], 1).with_biases(vec![0.0; 3]);
        assert_eq!(
            layout.check_structure(),
            Err(LayoutError::BiasCount {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_limits() {
        let limits = LayoutLimits::default();
        assert!(NetworkLayout::new(5, &[6, 6], 2).validate(&limits).is_ok());

        let too_deep = NetworkLayout::new(1, &[1; 5], 1);
        assert_eq!(
            too_deep.validate(&limits),
            Err(LayoutError::TooManyLayers { layers: 7, max: 6 })
        );

        let too_wide = NetworkLayout::new(13, &[], 1);
        assert!(matches!(
            too_wide.validate(&limits),
            Err(LayoutError::TooManyNeurons { layer: 0, .. })
        ));

        let high_bias = NetworkLayout::new(1, &[], 1).with_biases(vec![10.5]);
        assert!(matches!(
            high_bias.validate(&limits),
            Err(LayoutError::BiasAboveMaximum { .. })
        ));

        let low_bias = NetworkLayout::new(1, &[], 1).with_biases(vec![-11.0]);
        assert!(matches!(
            low_bias.validate(&limits),
            Err(LayoutError::BiasBelowMinimum { .. })
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let layout = NetworkLayout::new(4, &[3], 2)
            .with_activation(Activation::FastSigmoid)
            .with_biases(vec![0.5, -1.0]);
        let json = serde_json::to_string(&layout).unwrap();
        let back: NetworkLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
