//! Fixed-topology feedforward networks driven by evolved weight vectors.
//!
//! A [`NeuralNetwork`] is built from a [`NetworkLayout`] (neuron count per layer plus one
//! [`Activation`] and one bias per non-input layer). Its weights are installed from a flat
//! vector whose order, layer by layer, neuron by neuron, incoming connection by incoming
//! connection, is the chromosome layout used by the genetic algorithm.
//!
//! # Example
//!
//! ```
//! use neurodrive_network::{Activation, NetworkLayout, NeuralNetwork};
//!
//! let layout = NetworkLayout::new(2, &[], 1).with_activation(Activation::Relu);
//! let mut network = NeuralNetwork::with_weights(layout, &[1.0, -1.0]).unwrap();
//! assert_eq!(network.evaluate(&[3.0, 1.0]).unwrap(), &[2.0]);
//! assert_eq!(network.evaluate(&[1.0, 3.0]).unwrap(), &[0.0]);
//! ```
//!
//! Networks are persisted with the little-endian layout implemented in [`codec`].

pub use self::{
    activation::Activation,
    layout::{LayoutError, LayoutLimits, NetworkLayout},
    network::{NetworkError, NeuralNetwork},
};

pub mod codec;

mod activation;
mod layout;
mod network;

/// Which vector disagreed with the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ShapeKind {
    #[display("input")]
    Input,
    #[display("weight")]
    Weights,
}

/// A vector length disagrees with the network topology.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{kind} vector has length {actual}, network expects {expected}")]
pub struct ShapeMismatchError {
    pub kind: ShapeKind,
    pub expected: usize,
    pub actual: usize,
}

impl ShapeMismatchError {
    fn input(expected: usize, actual: usize) -> Self {
        Self {
            kind: ShapeKind::Input,
            expected,
            actual,
        }
    }

    fn weights(expected: usize, actual: usize) -> Self {
        Self {
            kind: ShapeKind::Weights,
            expected,
            actual,
        }
    }
}
