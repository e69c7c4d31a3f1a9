use std::{cmp::Ordering, mem};

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::{GeneDomain, GeneticParams};

/// Elitist generational genetic algorithm over fixed-length chromosomes.
///
/// Each call to [`GeneticAlgorithm::iterate`] is one generation: the `parents_count` fittest
/// chromosomes survive unchanged (best first), and the population is refilled with children
/// bred from them by crossover and per-gene mutation.
///
/// The generation counter runs from 1 to `max_generations`. The call that pushes it past
/// the maximum resets it to 0 and returns `false`; that is the only way a run ends.
#[derive(Debug, Clone)]
pub struct GeneticAlgorithm<D, R>
where
    D: GeneDomain,
{
    params: GeneticParams,
    domain: D,
    chromosome_length: usize,
    current_generation: usize,
    population: Vec<Vec<D::Gene>>,
    rng: R,
}

impl<D, R> GeneticAlgorithm<D, R>
where
    D: GeneDomain,
    R: Rng,
{
    /// Creates a population of `params.population_size` random chromosomes.
    ///
    /// # Panics
    ///
    /// Panics if `chromosome_length` is zero, if the population does not exceed the parent
    /// count, if the crossover kind needs more parents than configured, or if the mutation
    /// probability is outside `[0, 1]`.
    pub fn new(params: GeneticParams, chromosome_length: usize, domain: D, mut rng: R) -> Self {
        params.assert_valid();
        assert!(chromosome_length > 0, "chromosome length must be positive");

        let population = (0..params.population_size)
            .map(|_| {
                (0..chromosome_length)
                    .map(|_| domain.random_gene(&mut rng))
                    .collect()
            })
            .collect();
        Self {
            params,
            domain,
            chromosome_length,
            current_generation: 0,
            population,
            rng,
        }
    }

    /// Advances one generation using one fitness value per individual.
    ///
    /// Returns `Ok(false)` once `max_generations` generations have been bred; the counter
    /// is then reset to 0. A fitness vector of the wrong length is rejected before any state
    /// changes.
    #[instrument(level = "debug", skip(self, fitness), fields(generation = self.current_generation + 1))]
    pub fn iterate(&mut self, fitness: &[f64]) -> Result<bool, GeneticError> {
        if fitness.len() != self.population.len() {
            return Err(GeneticError::SizeMismatch {
                expected: self.population.len(),
                actual: fitness.len(),
            });
        }

        self.current_generation += 1;
        if self.current_generation > self.params.max_generations {
            info!(
                generations = self.params.max_generations,
                "evolution complete"
            );
            self.current_generation = 0;
            return Ok(false);
        }

        self.select(fitness);

        let probability = self.mutation_probability_at(self.current_generation);
        let params = &self.params;
        let domain = &self.domain;
        let population = &mut self.population;
        let rng = &mut self.rng;
        let children_count = params.children_count();
        let mut children = Vec::with_capacity(children_count);
        if params.repeat_crossover {
            for _ in 0..children_count {
                let mut child = params.crossover.apply(population.as_slice(), domain, rng);
                mutate(domain, &mut child, probability, rng);
                children.push(child);
            }
        } else {
            let template = params.crossover.apply(population.as_slice(), domain, rng);
            for _ in 0..children_count {
                let mut child = template.clone();
                mutate(domain, &mut child, probability, rng);
                children.push(child);
            }
        }
        population.extend(children);

        debug!(
            mutation_probability = probability,
            children = children_count,
            "bred generation"
        );
        Ok(true)
    }

    /// Keeps the `parents_count` fittest chromosomes, best first.
    ///
    /// Ties go to the lower index and NaN ranks below every number.
    fn select(&mut self, fitness: &[f64]) {
        let key = |i: usize| {
            let f = fitness[i];
            if f.is_nan() { f64::NEG_INFINITY } else { f }
        };
        let mut ranking = (0..fitness.len()).collect::<Vec<_>>();
        ranking.sort_by(|&a, &b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));

        let parents = ranking[..self.params.parents_count]
            .iter()
            .map(|&i| mem::take(&mut self.population[i]))
            .collect();
        self.population = parents;

        debug!(
            best = key(ranking[0]),
            parents = ?&ranking[..self.params.parents_count],
            "selected parents"
        );
    }

    /// Per-gene mutation probability used while breeding `generation`.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn mutation_probability_at(&self, generation: usize) -> f64 {
        let base = self.params.mutation_probability;
        let max = self.params.max_generations;
        if !self.params.decrease_mutation || max == 0 {
            return base;
        }
        base * max.saturating_sub(generation) as f64 / max as f64
    }

    /// Generation bred by the last [`GeneticAlgorithm::iterate`]; 0 before the first call
    /// and after completion.
    #[must_use]
    pub fn current_generation(&self) -> usize {
        self.current_generation
    }

    /// Copy of chromosome `index`, or an all-zero chromosome if `index` is out of range.
    #[must_use]
    pub fn chromosome(&self, index: usize) -> Vec<D::Gene> {
        self.individual_genes(index).map_or_else(
            || vec![self.domain.zero(); self.chromosome_length],
            <[D::Gene]>::to_vec,
        )
    }

    /// Borrows the genes of individual `index`.
    ///
    /// The borrow cannot outlive the next call to [`GeneticAlgorithm::iterate`].
    #[must_use]
    pub fn individual_genes(&self, index: usize) -> Option<&[D::Gene]> {
        self.population.get(index).map(Vec::as_slice)
    }

    /// Overwrites individual `index`, e.g. to seed the population from a saved network.
    pub fn set_individual_genes(
        &mut self,
        index: usize,
        genes: &[D::Gene],
    ) -> Result<(), GeneticError> {
        if genes.len() != self.chromosome_length {
            return Err(GeneticError::ChromosomeLength {
                expected: self.chromosome_length,
                actual: genes.len(),
            });
        }
        let population = self.population.len();
        let chromosome = self
            .population
            .get_mut(index)
            .ok_or(GeneticError::IndexOutOfRange { index, population })?;
        chromosome.copy_from_slice(genes);
        Ok(())
    }

    #[must_use]
    pub fn population(&self) -> &[Vec<D::Gene>] {
        &self.population
    }

    #[must_use]
    pub fn chromosome_length(&self) -> usize {
        self.chromosome_length
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.params.population_size
    }

    #[must_use]
    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    #[must_use]
    pub fn domain(&self) -> &D {
        &self.domain
    }
}

fn mutate<D, R>(domain: &D, chromosome: &mut [D::Gene], probability: f64, rng: &mut R)
where
    D: GeneDomain,
    R: Rng + ?Sized,
{
    if probability <= 0.0 {
        return;
    }
    for gene in chromosome {
        if rng.random_bool(probability) {
            *gene = domain.mutate_gene(*gene, rng);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GeneticError {
    #[display("fitness vector has {actual} entries, population has {expected} individuals")]
    SizeMismatch { expected: usize, actual: usize },
    #[display("chromosome has {actual} genes, expected {expected}")]
    ChromosomeLength { expected: usize, actual: usize },
    #[display("individual {index} is out of range for a population of {population}")]
    IndexOutOfRange { index: usize, population: usize },
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::{AlphabetDomain, CrossoverKind, FloatDomain};

    type FloatGa = GeneticAlgorithm<FloatDomain, Pcg64>;

    fn float_ga(params: GeneticParams, length: usize, seed: u64) -> FloatGa {
        GeneticAlgorithm::new(params, length, FloatDomain::default(), Pcg64::seed_from_u64(seed))
    }

    #[test]
    fn test_initial_population_shape_and_range() {
        let domain = FloatDomain::new(-3.0, 0.5, 100);
        let params = GeneticParams {
            population_size: 17,
            ..GeneticParams::default()
        };
        let ga = GeneticAlgorithm::new(params, 9, domain, Pcg64::seed_from_u64(0));
        assert_eq!(ga.population_size(), 17);
        assert_eq!(ga.population().len(), 17);
        assert_eq!(ga.current_generation(), 0);
        for chromosome in ga.population() {
            assert_eq!(chromosome.len(), 9);
            assert!(chromosome.iter().all(|g| (-3.0..=0.5).contains(g)));
        }
    }

    #[test]
    fn test_single_generation_scenario() {
        let params = GeneticParams {
            max_generations: 1,
            population_size: 4,
            crossover: CrossoverKind::Uniform,
            repeat_crossover: true,
            mutation_probability: 0.0,
            decrease_mutation: false,
            parents_count: 2,
        };
        let mut ga = float_ga(params, 3, 42);
        let first = ga.chromosome(0);
        let third = ga.chromosome(2);

        assert!(ga.iterate(&[10.0, 5.0, 8.0, 1.0]).unwrap());
        assert_eq!(ga.current_generation(), 1);
        assert_eq!(ga.chromosome(0), first);
        assert_eq!(ga.chromosome(1), third);
        for child in &ga.population()[2..] {
            for (i, gene) in child.iter().enumerate() {
                assert!(*gene == first[i] || *gene == third[i]);
            }
        }

        assert!(!ga.iterate(&[0.0; 4]).unwrap());
        assert_eq!(ga.current_generation(), 0);
    }

    #[test]
    fn test_terminates_after_max_generations() {
        let params = GeneticParams {
            max_generations: 5,
            population_size: 6,
            ..GeneticParams::default()
        };
        let mut ga = float_ga(params, 4, 1);
        for generation in 1..=5 {
            assert!(ga.iterate(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap());
            assert_eq!(ga.current_generation(), generation);
            assert_eq!(ga.population().len(), 6);
        }
        assert!(!ga.iterate(&[0.0; 6]).unwrap());
        assert_eq!(ga.current_generation(), 0);
    }

    #[test]
    fn test_selection_orders_parents_by_fitness() {
        let params = GeneticParams {
            population_size: 6,
            parents_count: 3,
            ..GeneticParams::default()
        };
        let mut ga = float_ga(params, 2, 8);
        let before = (0..6).map(|i| ga.chromosome(i)).collect::<Vec<_>>();
        // ties between 1 and 4 go to the lower index, NaN ranks last
        ga.iterate(&[f64::NAN, 7.0, -1.0, 9.0, 7.0, 0.0]).unwrap();
        assert_eq!(ga.chromosome(0), before[3]);
        assert_eq!(ga.chromosome(1), before[1]);
        assert_eq!(ga.chromosome(2), before[4]);
    }

    #[test]
    fn test_negative_fitness_is_not_reselected() {
        let params = GeneticParams {
            population_size: 3,
            parents_count: 2,
            ..GeneticParams::default()
        };
        let mut ga = float_ga(params, 2, 3);
        let before = (0..3).map(|i| ga.chromosome(i)).collect::<Vec<_>>();
        ga.iterate(&[-5.0, -1.0, -3.0]).unwrap();
        assert_eq!(ga.chromosome(0), before[1]);
        assert_eq!(ga.chromosome(1), before[2]);
    }

    #[test]
    fn test_mean_crossover_children() {
        let params = GeneticParams {
            population_size: 5,
            crossover: CrossoverKind::Mean,
            mutation_probability: 0.0,
            ..GeneticParams::default()
        };
        let mut ga = float_ga(params, 6, 5);
        ga.iterate(&[1.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        let (a, b) = (ga.chromosome(0), ga.chromosome(1));
        for child in &ga.population()[2..] {
            for i in 0..6 {
                assert_eq!(child[i], (a[i] + b[i]) / 2.0);
            }
        }
    }

    #[test]
    fn test_single_crossover_is_duplicated() {
        let params = GeneticParams {
            population_size: 6,
            repeat_crossover: false,
            mutation_probability: 0.0,
            ..GeneticParams::default()
        };
        let mut ga = float_ga(params, 10, 12);
        ga.iterate(&[0.0; 6]).unwrap();
        let children = &ga.population()[2..];
        assert!(children.iter().all(|c| *c == children[0]));
    }

    #[test]
    fn test_full_mutation_keeps_genes_in_range() {
        let domain = FloatDomain::new(0.0, 1.0, 50);
        let params = GeneticParams {
            population_size: 8,
            mutation_probability: 1.0,
            ..GeneticParams::default()
        };
        let mut ga = GeneticAlgorithm::new(params, 5, domain, Pcg64::seed_from_u64(21));
        for _ in 0..10 {
            ga.iterate(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]).unwrap();
            for chromosome in ga.population() {
                assert!(chromosome.iter().all(|g| (0.0..=1.0).contains(g)));
            }
        }
    }

    #[test]
    fn test_decreasing_mutation_probability() {
        let params = GeneticParams {
            max_generations: 10,
            mutation_probability: 0.5,
            decrease_mutation: true,
            ..GeneticParams::default()
        };
        let ga = float_ga(params, 1, 0);
        assert_eq!(ga.mutation_probability_at(0), 0.5);
        assert_eq!(ga.mutation_probability_at(5), 0.25);
        assert_eq!(ga.mutation_probability_at(10), 0.0);
    }

    #[test]
    fn test_size_mismatch_leaves_state_untouched() {
        let mut ga = float_ga(GeneticParams::default(), 3, 2);
        let before = ga.population().to_vec();
        let err = ga.iterate(&[1.0; 39]).unwrap_err();
        assert_eq!(
            err,
            GeneticError::SizeMismatch {
                expected: 40,
                actual: 39
            }
        );
        assert_eq!(ga.current_generation(), 0);
        assert_eq!(ga.population(), before.as_slice());
    }

    #[test]
    fn test_out_of_range_chromosome_is_zeroed() {
        let ga = float_ga(GeneticParams::default(), 4, 2);
        assert_eq!(ga.chromosome(40), vec![0.0; 4]);
        assert!(ga.individual_genes(40).is_none());
    }

    #[test]
    fn test_seed_individual() {
        let mut ga = float_ga(GeneticParams::default(), 3, 2);
        ga.set_individual_genes(0, &[0.1, 0.2, 0.3]).unwrap();
        assert_eq!(ga.individual_genes(0), Some(&[0.1, 0.2, 0.3][..]));
        assert!(matches!(
            ga.set_individual_genes(0, &[0.1]),
            Err(GeneticError::ChromosomeLength { .. })
        ));
        assert!(matches!(
            ga.set_individual_genes(40, &[0.1, 0.2, 0.3]),
            Err(GeneticError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_run() {
        let params = GeneticParams {
            population_size: 10,
            crossover: CrossoverKind::TwoPoint,
            mutation_probability: 0.3,
            ..GeneticParams::default()
        };
        let mut a = float_ga(params.clone(), 8, 99);
        let mut b = float_ga(params, 8, 99);
        let fitness = (0..10).map(f64::from).collect::<Vec<_>>();
        for _ in 0..5 {
            a.iterate(&fitness).unwrap();
            b.iterate(&fitness).unwrap();
        }
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn test_alphabet_domain_evolves() {
        let params = GeneticParams {
            population_size: 20,
            max_generations: 200,
            mutation_probability: 0.1,
            ..GeneticParams::default()
        };
        let target = "neuro".chars().collect::<Vec<_>>();
        let domain = AlphabetDomain::new("abcdefghijklmnopqrstuvwxyz");
        let mut ga = GeneticAlgorithm::new(params, target.len(), domain, Pcg64::seed_from_u64(4));
        let score = |c: &[char]| {
            let hits = c.iter().zip(&target).filter(|(a, b)| a == b).count();
            f64::from(u32::try_from(hits).unwrap())
        };
        let initial_best = ga.population().iter().map(|c| score(c)).fold(0.0, f64::max);
        loop {
            let fitness = ga.population().iter().map(|c| score(c)).collect::<Vec<_>>();
            if !ga.iterate(&fitness).unwrap() {
                break;
            }
        }
        // elitism never loses the best chromosome
        let final_best = ga.population().iter().map(|c| score(c)).fold(0.0, f64::max);
        assert!(final_best >= initial_best);
    }

    #[test]
    #[should_panic(expected = "chromosome length must be positive")]
    fn test_empty_chromosome_rejected() {
        let _ = float_ga(GeneticParams::default(), 0, 0);
    }
}
