use serde::{Deserialize, Serialize};

/// Activation function bound to one non-input layer.
///
/// The discriminant order is part of the persisted ANN layout: the codec stores
/// [`Activation::index`] and reads it back with [`Activation::from_index`].
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum Activation {
    /// `f(x) = x`
    #[default]
    #[display("identity")]
    Identity,
    /// `f(x) = x / (1 + |x|)`
    #[display("fast sigmoid")]
    FastSigmoid,
    /// `f(x) = max(0, x)`
    #[display("ReLU")]
    Relu,
    /// `f(x) = x` for `x >= 0`, `0.1 x` otherwise
    #[display("leaky ReLU")]
    LeakyRelu,
    /// `f(x) = tanh(x)`
    #[display("tanh")]
    Tanh,
}

impl Activation {
    /// All activation functions in index order.
    pub const ALL: [Self; 5] = [
        Self::Identity,
        Self::FastSigmoid,
        Self::Relu,
        Self::LeakyRelu,
        Self::Tanh,
    ];

    const LEAKY_SLOPE: f64 = 0.1;

    #[must_use]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::FastSigmoid => x / (1.0 + x.abs()),
            Self::Relu => x.max(0.0),
            Self::LeakyRelu => {
                if x >= 0.0 {
                    x
                } else {
                    x * Self::LEAKY_SLOPE
                }
            }
            Self::Tanh => x.tanh(),
        }
    }

    /// Stable numeric identifier used by the binary codec.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Identity => 0,
            Self::FastSigmoid => 1,
            Self::Relu => 2,
            Self::LeakyRelu => 3,
            Self::Tanh => 4,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}
