use serde::{Deserialize, Serialize};

use crate::CrossoverKind;

/// Parameters fixed for a whole run of [`GeneticAlgorithm`](crate::GeneticAlgorithm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    /// Number of generations before [`iterate`](crate::GeneticAlgorithm::iterate) reports
    /// completion.
    pub max_generations: usize,
    /// Must exceed `parents_count`.
    pub population_size: usize,
    pub crossover: CrossoverKind,
    /// Run crossover once per child instead of duplicating a single child.
    pub repeat_crossover: bool,
    /// Per-gene mutation probability in `[0, 1]`.
    pub mutation_probability: f64,
    /// Scale the mutation probability by `(max − generation) / max`.
    pub decrease_mutation: bool,
    pub parents_count: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            max_generations: 60,
            population_size: 40,
            crossover: CrossoverKind::Uniform,
            repeat_crossover: true,
            mutation_probability: 0.05,
            decrease_mutation: false,
            parents_count: 2,
        }
    }
}

impl GeneticParams {
    pub(crate) fn assert_valid(&self) {
        assert!(
            self.parents_count >= self.crossover.min_parents(),
            "{} crossover needs at least {} parents, got {}",
            self.crossover,
            self.crossover.min_parents(),
            self.parents_count
        );
        assert!(
            self.population_size > self.parents_count,
            "population size {} must exceed parents count {}",
            self.population_size,
            self.parents_count
        );
        assert!(
            (0.0..=1.0).contains(&self.mutation_probability),
            "mutation probability {} is outside [0, 1]",
            self.mutation_probability
        );
    }

    /// Number of children bred each generation.
    #[must_use]
    pub fn children_count(&self) -> usize {
        self.population_size - self.parents_count
    }
}
