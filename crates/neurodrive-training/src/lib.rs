//! Neuroevolution training loop.
//!
//! [`Trainer`] ties the pieces together: one [`NeuralNetwork`] per individual, the
//! [`GeneticAlgorithm`] evolving their weights, the [`FitnessTracker`] scoring and punishing
//! them, and a [`Simulation`] they drive. [`CorridorTrack`] is a small kinematic course
//! usable as that simulation.
//!
//! ```
//! use neurodrive_training::{CorridorTrack, Trainer, TrainingConfig};
//!
//! let mut config = TrainingConfig::default();
//! config.genetic.max_generations = 2;
//! config.genetic.population_size = 8;
//! config.seed = Some(1);
//!
//! let track = CorridorTrack::new(config.track.clone()).unwrap();
//! let mut trainer = Trainer::new(&config, track, config.rng()).unwrap();
//! let summary = trainer.run(|report| println!("generation {}", report.generation)).unwrap();
//! assert_eq!(summary.generations, 3);
//! assert!(summary.best_network.is_some());
//! ```
//!
//! [`NeuralNetwork`]: neurodrive_network::NeuralNetwork
//! [`GeneticAlgorithm`]: neurodrive_genetic::GeneticAlgorithm
//! [`FitnessTracker`]: neurodrive_fitness::FitnessTracker

pub use self::{
    config::{ConfigError, TrainingConfig},
    simulation::Simulation,
    track::{CorridorTrack, Segment, TrackError, TrackParams},
    trainer::{
        BestIndividual, GenerationReport, TickOutcome, Trainer, TrainingError, TrainingSummary,
    },
};

mod config;
mod simulation;
mod track;
mod trainer;
