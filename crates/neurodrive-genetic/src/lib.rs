//! Elitist genetic algorithm used to evolve network weight vectors.
//!
//! # Generation cycle
//!
//! [`GeneticAlgorithm::iterate`] runs one generation from a fitness vector supplied by the
//! caller:
//!
//! 1. **Termination** - the generation counter is incremented; once it passes
//!    `max_generations` it resets to 0 and `iterate` returns `false`
//! 2. **Selection** - the `parents_count` fittest chromosomes replace the population,
//!    ordered best first (ties to the lower index)
//! 3. **Crossover** - children are assembled from the parents by the configured
//!    [`CrossoverKind`], either once per child or once and duplicated
//! 4. **Mutation** - every child gene mutates independently with the (optionally decaying)
//!    mutation probability
//!
//! The gene type is chosen through [`GeneDomain`]. Training networks uses [`FloatDomain`],
//! whose mutation adds a grid-aligned offset and wraps the result back into the gene range
//! instead of clamping.
//!
//! Randomness always comes from the generator passed to [`GeneticAlgorithm::new`], so a
//! seeded generator reproduces a run exactly.
//!
//! # Example
//!
//! ```
//! use neurodrive_genetic::{BinaryDomain, GeneticAlgorithm, GeneticParams};
//! use rand::SeedableRng as _;
//!
//! let params = GeneticParams {
//!     max_generations: 30,
//!     population_size: 12,
//!     ..GeneticParams::default()
//! };
//! let rng = rand_pcg::Pcg64::seed_from_u64(1);
//! let mut ga = GeneticAlgorithm::new(params, 16, BinaryDomain, rng);
//!
//! // maximise the number of set bits
//! loop {
//!     let fitness = ga
//!         .population()
//!         .iter()
//!         .map(|c| c.iter().filter(|&&bit| bit).count() as f64)
//!         .collect::<Vec<_>>();
//!     if !ga.iterate(&fitness).unwrap() {
//!         break;
//!     }
//! }
//! assert_eq!(ga.current_generation(), 0);
//! ```

pub use self::{
    algorithm::{GeneticAlgorithm, GeneticError},
    crossover::CrossoverKind,
    domain::{AlphabetDomain, BinaryDomain, FloatDomain, GeneDomain},
    params::GeneticParams,
};

pub mod crossover;

mod algorithm;
mod domain;
mod params;
