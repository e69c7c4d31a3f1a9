use neurodrive_fitness::{FitnessError, FitnessParams, FitnessTracker, GenerationRecord};
use neurodrive_genetic::{FloatDomain, GeneticAlgorithm, GeneticError};
use neurodrive_network::{LayoutError, NetworkLayout, NeuralNetwork, ShapeMismatchError};
use rand::Rng;
use rand_pcg::Pcg64;
use tracing::{debug, info, instrument};

use crate::{Simulation, TrainingConfig};

/// Drives a population of networks through a [`Simulation`] until evolution completes.
///
/// A generation runs tick by tick: every active individual reads its sensors, its network
/// computes the actuator values, and the simulation steps once. Individuals stop when the
/// simulation says so (crash or finish), when their timer runs out, or when a punishment
/// round finds they improved too little. Once nobody is active the generation is scored,
/// the genetic algorithm breeds the next one, and the new weights are copied into the
/// networks.
#[derive(Debug)]
pub struct Trainer<S, R = Pcg64> {
    simulation: S,
    networks: Vec<NeuralNetwork>,
    ga: GeneticAlgorithm<FloatDomain, R>,
    tracker: FitnessTracker,
    tick_length: f64,
    punish_interval: f64,
    since_punish: f64,
    ticks: usize,
    best: Option<BestIndividual>,
    complete: bool,
}

/// What one call to [`Trainer::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The simulation advanced one tick.
    Running {
        active: usize,
        leader: Option<usize>,
    },
    /// A generation was scored and the next one bred.
    GenerationFinished(GenerationReport),
    /// The last generation was scored.
    TrainingFinished(GenerationReport),
    /// Training had already finished; nothing happened.
    Completed,
}

/// Summary of one scored generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// 0 for the initial random population.
    pub generation: usize,
    pub ticks: usize,
    pub record: GenerationRecord,
    /// Comparative fitness of the best individual seen so far.
    pub best_fitness: f64,
}

/// The fittest individual seen during the run.
#[derive(Debug, Clone, PartialEq)]
pub struct BestIndividual {
    pub generation: usize,
    /// Comparative fitness, including the time bonus.
    pub fitness: f64,
    /// Checkpoints passed.
    pub progress: f64,
    pub genes: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub generations: usize,
    pub best: Option<BestIndividual>,
    /// Network carrying the best individual's weights.
    pub best_network: Option<NeuralNetwork>,
}

impl<S, R> Trainer<S, R>
where
    S: Simulation,
    R: Rng,
{
    /// Builds the population and puts it at the start of `simulation`.
    ///
    /// # Panics
    ///
    /// Panics on invalid genetic, gene-range or timing parameters.
    pub fn new(config: &TrainingConfig, mut simulation: S, rng: R) -> Result<Self, TrainingError> {
        config.layout.validate(&config.layout_limits)?;
        check_io(&config.layout, &simulation)?;
        config.genes.assert_valid();
        assert!(config.tick_length > 0.0, "tick length must be positive");
        assert!(
            config.punish_interval > 0.0,
            "punish interval must be positive"
        );

        let template = NeuralNetwork::new(config.layout.clone())?;
        let ga = GeneticAlgorithm::new(
            config.genetic.clone(),
            template.number_of_weights(),
            config.genes.clone(),
            rng,
        );
        let population = ga.population_size();
        let fitness = FitnessParams {
            checkpoint_count: simulation.checkpoint_count(),
            ..config.fitness.clone()
        };
        let tracker = FitnessTracker::new(population, fitness);

        let mut networks = vec![template; population];
        for (network, genes) in networks.iter_mut().zip(ga.population()) {
            network.set_weights(genes)?;
        }
        simulation.reset(population);

        info!(
            population,
            weights = ga.chromosome_length(),
            checkpoints = simulation.checkpoint_count(),
            "trainer ready"
        );
        Ok(Self {
            simulation,
            networks,
            ga,
            tracker,
            tick_length: config.tick_length,
            punish_interval: config.punish_interval,
            since_punish: 0.0,
            ticks: 0,
            best: None,
            complete: false,
        })
    }

    /// Replaces individual 0 with the weights of an existing network.
    pub fn seed_individual(&mut self, network: &NeuralNetwork) -> Result<(), TrainingError> {
        let expected = self.networks[0].layout();
        if network.layout() != expected {
            return Err(TrainingError::SeedLayout);
        }
        let weights = network.weights();
        self.ga.set_individual_genes(0, &weights)?;
        self.networks[0].set_weights(&weights)?;
        debug!("seeded individual 0");
        Ok(())
    }

    /// Advances one simulation tick, or scores the generation once nobody is active.
    pub fn tick(&mut self) -> Result<TickOutcome, TrainingError> {
        if self.complete {
            return Ok(TickOutcome::Completed);
        }
        if self.tracker.active_count() == 0 {
            return self.close_generation();
        }

        for (index, network) in self.networks.iter_mut().enumerate() {
            if !self.tracker.is_active(index) {
                continue;
            }
            let sensors = self.simulation.sensors(index);
            let outputs = network.evaluate(&sensors)?;
            self.simulation.actuate(index, outputs);
        }
        self.simulation.step(self.tick_length);
        self.ticks += 1;

        for index in 0..self.networks.len() {
            if self.tracker.is_active(index) && !self.simulation.is_running(index) {
                self.tracker.deactivate(index);
            }
        }
        self.tracker.tick(self.tick_length);

        let raw = self.progress();
        self.since_punish += self.tick_length;
        if self.since_punish >= self.punish_interval {
            self.since_punish = 0.0;
            self.tracker.punish(&raw)?;
        }
        let leader = self.tracker.mark_leader(&raw)?;

        Ok(TickOutcome::Running {
            active: self.tracker.active_count(),
            leader,
        })
    }

    #[instrument(level = "debug", skip(self), fields(generation = self.ga.current_generation()))]
    fn close_generation(&mut self) -> Result<TickOutcome, TrainingError> {
        let generation = self.ga.current_generation();
        let raw = self.progress();
        let fitness = self.tracker.iterate(&raw)?.to_vec();
        self.record_best(generation, &fitness, &raw);

        let record = self
            .tracker
            .history()
            .last()
            .copied()
            .ok_or(TrainingError::EmptyHistory)?;
        let report = GenerationReport {
            generation,
            ticks: self.ticks,
            record,
            best_fitness: self.best.as_ref().map_or(0.0, |b| b.fitness),
        };
        info!(
            generation,
            highest = record.highest_fitness,
            mean = record.mean_fitness,
            successes = record.success_count,
            best_time = record.best_time,
            "generation finished"
        );

        if !self.ga.iterate(&fitness)? {
            self.complete = true;
            return Ok(TickOutcome::TrainingFinished(report));
        }

        for (network, genes) in self.networks.iter_mut().zip(self.ga.population()) {
            network.set_weights(genes)?;
        }
        self.tracker.reset();
        self.simulation.reset(self.networks.len());
        self.since_punish = 0.0;
        self.ticks = 0;
        Ok(TickOutcome::GenerationFinished(report))
    }

    fn record_best(&mut self, generation: usize, fitness: &[f64], raw: &[f64]) {
        let Some((index, &value)) = fitness
            .iter()
            .enumerate()
            .reduce(|best, item| if item.1 > best.1 { item } else { best })
        else {
            return;
        };
        if self.best.as_ref().is_some_and(|b| b.fitness >= value) {
            return;
        }
        self.best = Some(BestIndividual {
            generation,
            fitness: value,
            progress: raw[index],
            genes: self.ga.chromosome(index),
        });
    }

    /// Ticks until training completes, calling `on_generation` after every generation.
    pub fn run<F>(&mut self, mut on_generation: F) -> Result<TrainingSummary, TrainingError>
    where
        F: FnMut(&GenerationReport),
    {
        let mut generations = 0;
        loop {
            match self.tick()? {
                TickOutcome::Running { .. } => {}
                TickOutcome::GenerationFinished(report) => {
                    generations += 1;
                    on_generation(&report);
                }
                TickOutcome::TrainingFinished(report) => {
                    generations += 1;
                    on_generation(&report);
                    break;
                }
                TickOutcome::Completed => break,
            }
        }
        Ok(TrainingSummary {
            generations,
            best: self.best.clone(),
            best_network: self.best_network()?,
        })
    }

    /// A network carrying the weights of the best individual so far.
    pub fn best_network(&self) -> Result<Option<NeuralNetwork>, TrainingError> {
        let Some(best) = &self.best else {
            return Ok(None);
        };
        let mut network = self.networks[0].clone();
        network.set_weights(&best.genes)?;
        Ok(Some(network))
    }

    fn progress(&self) -> Vec<f64> {
        (0..self.networks.len())
            .map(|i| self.simulation.progress(i))
            .collect()
    }

    #[must_use]
    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    #[must_use]
    pub fn genetic_algorithm(&self) -> &GeneticAlgorithm<FloatDomain, R> {
        &self.ga
    }

    #[must_use]
    pub fn tracker(&self) -> &FitnessTracker {
        &self.tracker
    }

    #[must_use]
    pub fn networks(&self) -> &[NeuralNetwork] {
        &self.networks
    }

    #[must_use]
    pub fn best(&self) -> Option<&BestIndividual> {
        self.best.as_ref()
    }
}

fn check_io<S>(layout: &NetworkLayout, simulation: &S) -> Result<(), TrainingError>
where
    S: Simulation,
{
    if layout.input_len() != simulation.sensor_count() {
        return Err(TrainingError::SensorMismatch {
            sensors: simulation.sensor_count(),
            inputs: layout.input_len(),
        });
    }
    if layout.output_len() != simulation.output_count() {
        return Err(TrainingError::OutputMismatch {
            actuators: simulation.output_count(),
            outputs: layout.output_len(),
        });
    }
    Ok(())
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainingError {
    #[display("invalid network layout: {_0}")]
    Layout(LayoutError),
    #[display("{_0}")]
    Shape(ShapeMismatchError),
    #[display("{_0}")]
    Genetic(GeneticError),
    #[display("{_0}")]
    Fitness(FitnessError),
    #[display("simulation has {sensors} sensors, network has {inputs} inputs")]
    SensorMismatch { sensors: usize, inputs: usize },
    #[display("simulation has {actuators} actuators, network has {outputs} outputs")]
    OutputMismatch { actuators: usize, outputs: usize },
    #[display("seed network layout differs from the training layout")]
    SeedLayout,
    #[display("no generation has been scored")]
    EmptyHistory,
}

impl From<LayoutError> for TrainingError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<ShapeMismatchError> for TrainingError {
    fn from(err: ShapeMismatchError) -> Self {
        Self::Shape(err)
    }
}

impl From<GeneticError> for TrainingError {
    fn from(err: GeneticError) -> Self {
        Self::Genetic(err)
    }
}

impl From<FitnessError> for TrainingError {
    fn from(err: FitnessError) -> Self {
        Self::Fitness(err)
    }
}

#[cfg(test)]
mod tests {
    use neurodrive_genetic::GeneticParams;
    use neurodrive_network::Activation;
    use rand::SeedableRng as _;

    use super::*;
    use crate::{CorridorTrack, Segment, TrackParams};

    fn config() -> TrainingConfig {
        TrainingConfig {
            genetic: GeneticParams {
                max_generations: 3,
                population_size: 6,
                ..GeneticParams::default()
            },
            track: TrackParams {
                segments: vec![Segment::new(5.0, 6.0), Segment::new(5.0, 4.0)],
                ..TrackParams::default()
            },
            fitness: FitnessParams {
                max_time: 20.0,
                ..FitnessParams::default()
            },
            tick_length: 0.25,
            punish_interval: 4.0,
            seed: Some(7),
            ..TrainingConfig::default()
        }
    }

    fn trainer(config: &TrainingConfig) -> Trainer<CorridorTrack> {
        let track = CorridorTrack::new(config.track.clone()).unwrap();
        Trainer::new(config, track, config.rng()).unwrap()
    }

    #[test]
    fn test_networks_carry_population_genes() {
        let config = config();
        let trainer = trainer(&config);
        assert_eq!(trainer.networks().len(), 6);
        for (i, network) in trainer.networks().iter().enumerate() {
            assert_eq!(
                network.weights(),
                trainer.genetic_algorithm().chromosome(i)
            );
        }
        assert_eq!(trainer.tracker().params().checkpoint_count, 2);
    }

    #[test]
    fn test_run_completes_every_generation() {
        let config = config();
        let mut trainer = trainer(&config);
        let mut seen = vec![];
        let summary = trainer.run(|report| seen.push(report.generation)).unwrap();

        // the initial population plus one per bred generation
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(summary.generations, 4);
        assert_eq!(trainer.tracker().history().len(), 4);
        assert_eq!(trainer.genetic_algorithm().current_generation(), 0);

        let best = summary.best.unwrap();
        let network = summary.best_network.unwrap();
        assert_eq!(network.weights(), best.genes);
        assert!(best.fitness >= best.progress);
    }

    #[test]
    fn test_ticks_after_completion_are_idle() {
        let config = config();
        let mut trainer = trainer(&config);
        trainer.run(|_| {}).unwrap();
        assert_eq!(trainer.tick().unwrap(), TickOutcome::Completed);
        assert_eq!(trainer.tracker().history().len(), 4);
        assert_eq!(trainer.run(|_| {}).unwrap().generations, 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let config = config();
        let a = trainer(&config).run(|_| {}).unwrap().best.unwrap();
        let b = trainer(&config).run(|_| {}).unwrap().best.unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_ends_within_max_time() {
        let config = config();
        let mut trainer = trainer(&config);
        // timers start at min_time (1s) and stop at 20s
        let max_ticks = 19 * 4 + 1;
        let mut ticks = 0;
        loop {
            match trainer.tick().unwrap() {
                TickOutcome::Running { .. } => ticks += 1,
                _ => break,
            }
            assert!(ticks <= max_ticks);
        }
    }

    #[test]
    fn test_seed_individual() {
        let config = config();
        let mut trainer = trainer(&config);
        let weights = vec![0.5; config.layout.number_of_weights()];
        let network = NeuralNetwork::with_weights(config.layout.clone(), &weights).unwrap();
        trainer.seed_individual(&network).unwrap();
        assert_eq!(trainer.networks()[0].weights(), weights);
        assert_eq!(trainer.genetic_algorithm().chromosome(0), weights);

        let other = NeuralNetwork::new(NetworkLayout::new(4, &[2], 1)).unwrap();
        assert!(matches!(
            trainer.seed_individual(&other),
            Err(TrainingError::SeedLayout)
        ));
    }

    #[test]
    fn test_layout_must_match_simulation() {
        let config = TrainingConfig {
            layout: NetworkLayout::new(3, &[2], 1).with_activation(Activation::Tanh),
            ..config()
        };
        let track = CorridorTrack::new(config.track.clone()).unwrap();
        assert!(matches!(
            Trainer::new(&config, track, Pcg64::seed_from_u64(0)),
            Err(TrainingError::SensorMismatch {
                sensors: 4,
                inputs: 3
            })
        ));
    }

    #[test]
    fn test_layout_limits_apply() {
        let config = TrainingConfig {
            layout: NetworkLayout::new(4, &[13], 1),
            ..config()
        };
        let track = CorridorTrack::new(config.track.clone()).unwrap();
        assert!(matches!(
            Trainer::new(&config, track, Pcg64::seed_from_u64(0)),
            Err(TrainingError::Layout(LayoutError::TooManyNeurons { .. }))
        ));
    }
}
