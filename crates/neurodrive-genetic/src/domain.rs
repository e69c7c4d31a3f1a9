//! Gene domains: what a gene is, how a random one is drawn and how it mutates.
//!
//! The algorithm itself is generic over [`GeneDomain`]; training networks uses
//! [`FloatDomain`], while [`AlphabetDomain`] and [`BinaryDomain`] cover string and bit-string
//! problems with the same selection and crossover machinery.

use std::fmt::Debug;

use rand::Rng;
use rand_distr::{Distribution as _, Uniform};
use serde::{Deserialize, Serialize};

pub trait GeneDomain {
    type Gene: Copy + PartialEq + Debug;

    /// Filler for the degraded result of an out-of-range chromosome lookup.
    fn zero(&self) -> Self::Gene;

    fn random_gene<R>(&self, rng: &mut R) -> Self::Gene
    where
        R: Rng + ?Sized;

    fn mutate_gene<R>(&self, gene: Self::Gene, rng: &mut R) -> Self::Gene
    where
        R: Rng + ?Sized;

    /// Combines the genes of all parents at one position (mean crossover).
    ///
    /// `genes` is never empty.
    fn blend(&self, genes: &[Self::Gene]) -> Self::Gene;
}

/// Real-valued genes inside the closed range `[lower, upper]`.
///
/// Mutation adds an offset drawn from `±width/2` on a grid of `1 / precision`, then wraps
/// the result back into the range by adding or subtracting the range width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatDomain {
    pub lower: f64,
    pub upper: f64,
    /// Number of grid steps per unit of gene value.
    pub precision: u32,
}

impl Default for FloatDomain {
    fn default() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
            precision: 1000,
        }
    }
}

impl FloatDomain {
    /// # Panics
    ///
    /// Panics if `lower >= upper` or `precision == 0`.
    #[must_use]
    pub fn new(lower: f64, upper: f64, precision: u32) -> Self {
        let domain = Self {
            lower,
            upper,
            precision,
        };
        domain.assert_valid();
        domain
    }

    /// Checks a domain built field by field, e.g. deserialized from a config file.
    ///
    /// # Panics
    ///
    /// Panics if `lower >= upper` or `precision == 0`.
    pub fn assert_valid(&self) {
        assert!(
            self.lower < self.upper,
            "gene range lower bound {} must be below upper bound {}",
            self.lower,
            self.upper
        );
        assert!(self.precision > 0, "gene precision must be positive");
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Wraps a value back into `[lower, upper]` by whole range widths.
    #[must_use]
    pub fn wrap(&self, mut value: f64) -> f64 {
        let width = self.width();
        while value > self.upper {
            value -= width;
        }
        while value < self.lower {
            value += width;
        }
        value
    }

    #[expect(clippy::cast_possible_truncation)]
    fn half_span_steps(&self) -> i64 {
        (self.width() * f64::from(self.precision) / 2.0).round() as i64
    }
}

impl GeneDomain for FloatDomain {
    type Gene = f64;

    fn zero(&self) -> f64 {
        0.0
    }

    fn random_gene<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        rng.random_range(self.lower..=self.upper)
    }

    #[expect(clippy::cast_precision_loss)]
    fn mutate_gene<R>(&self, gene: f64, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        let span = self.half_span_steps();
        let steps = Uniform::new_inclusive(-span, span)
            .expect("span is never negative")
            .sample(rng);
        let offset = steps as f64 / f64::from(self.precision);
        self.wrap(gene + offset)
    }

    #[expect(clippy::cast_precision_loss)]
    fn blend(&self, genes: &[f64]) -> f64 {
        genes.iter().sum::<f64>() / genes.len() as f64
    }
}

/// Character genes drawn from a fixed alphabet.
///
/// Mutation moves a gene forward through the alphabet by a random number of positions,
/// wrapping around at the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabetDomain {
    alphabet: Vec<char>,
}

impl AlphabetDomain {
    /// # Panics
    ///
    /// Panics if `alphabet` is empty.
    #[must_use]
    pub fn new(alphabet: &str) -> Self {
        let alphabet = alphabet.chars().collect::<Vec<_>>();
        assert!(!alphabet.is_empty(), "alphabet must not be empty");
        Self { alphabet }
    }

    #[must_use]
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    fn position(&self, gene: char) -> usize {
        self.alphabet.iter().position(|&c| c == gene).unwrap_or(0)
    }
}

impl GeneDomain for AlphabetDomain {
    type Gene = char;

    fn zero(&self) -> char {
        self.alphabet[0]
    }

    fn random_gene<R>(&self, rng: &mut R) -> char
    where
        R: Rng + ?Sized,
    {
        self.alphabet[rng.random_range(0..self.alphabet.len())]
    }

    fn mutate_gene<R>(&self, gene: char, rng: &mut R) -> char
    where
        R: Rng + ?Sized,
    {
        let offset = rng.random_range(0..self.alphabet.len());
        self.alphabet[(self.position(gene) + offset) % self.alphabet.len()]
    }

    fn blend(&self, genes: &[char]) -> char {
        let sum = genes.iter().map(|&g| self.position(g)).sum::<usize>();
        self.alphabet[sum / genes.len()]
    }
}

/// Bit genes; mutation flips the bit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryDomain;

impl GeneDomain for BinaryDomain {
    type Gene = bool;

    fn zero(&self) -> bool {
        false
    }

    fn random_gene<R>(&self, rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        rng.random_bool(0.5)
    }

    fn mutate_gene<R>(&self, gene: bool, _rng: &mut R) -> bool
    where
        R: Rng + ?Sized,
    {
        !gene
    }

    /// Majority vote; a tie keeps the first parent's bit.
    fn blend(&self, genes: &[bool]) -> bool {
        let set = genes.iter().filter(|&&g| g).count();
        let unset = genes.len() - set;
        match set.cmp(&unset) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => genes[0],
        }
    }
}
