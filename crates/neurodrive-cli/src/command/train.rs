use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use neurodrive_fitness::StatisticsReport;
use neurodrive_genetic::CrossoverKind;
use neurodrive_training::{CorridorTrack, GenerationReport, Trainer, TrainingConfig};

use crate::{
    model::training_record::TrainingRecord,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training config file (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
    /// Number of generations
    #[arg(long)]
    generations: Option<usize>,
    /// Population size
    #[arg(long)]
    population: Option<usize>,
    /// Crossover kind (uniform, mean, onepoint, twopoint)
    #[arg(long)]
    crossover: Option<CrossoverKind>,
    /// Mutation probability
    #[arg(long)]
    mutation: Option<f64>,
    /// ANN file whose weights seed the first individual
    #[arg(long)]
    initial: Option<PathBuf>,
    /// Output ANN file for the best network
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output file for the per-generation statistics
    #[arg(long)]
    statistics: Option<PathBuf>,
    /// Output file for the training record (JSON)
    #[arg(long)]
    record: Option<PathBuf>,
}

impl TrainArg {
    pub(crate) fn apply_overrides(&self, config: &mut TrainingConfig) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(generations) = self.generations {
            config.genetic.max_generations = generations;
        }
        if let Some(population) = self.population {
            config.genetic.population_size = population;
        }
        if let Some(crossover) = self.crossover {
            config.genetic.crossover = crossover;
        }
        if let Some(mutation) = self.mutation {
            config.genetic.mutation_probability = mutation;
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = util::read_config_file(arg.config.as_ref())?;
    arg.apply_overrides(&mut config);
    check_config(&config)?;

    let track = CorridorTrack::new(config.track.clone()).context("Invalid track parameters")?;
    let mut trainer =
        Trainer::new(&config, track, config.rng()).context("Failed to set up training")?;

    if let Some(path) = &arg.initial {
        let network = util::read_network_file(path)?;
        trainer
            .seed_individual(&network)
            .with_context(|| format!("Initial ANN does not fit the layout: {}", path.display()))?;
        eprintln!("Seeded individual 0 from {}", path.display());
    }

    eprintln!(
        "Training {} individuals for {} generations ({} weights each)",
        config.genetic.population_size,
        config.genetic.max_generations,
        trainer.genetic_algorithm().chromosome_length(),
    );
    let summary = trainer.run(print_generation)?;

    eprintln!();
    eprintln!("Training completed after {} generations", summary.generations);
    if let Some(best) = &summary.best {
        eprintln!("  Best generation: {}", best.generation);
        eprintln!("  Best fitness:    {:.3}", best.fitness);
        eprintln!("  Best progress:   {:.0}", best.progress);
    }

    if let (Some(path), Some(network)) = (&arg.output, &summary.best_network) {
        util::write_network_file(network, path)?;
        eprintln!("  Network saved: {}", path.display());
    }

    if let Some(path) = &arg.statistics {
        let ga = trainer.genetic_algorithm();
        let tracker = trainer.tracker();
        let mut report = StatisticsReport::new(
            ga.params(),
            ga.chromosome_length(),
            ga.domain(),
            tracker.params(),
        );
        report.add_footer("Date", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        report.extract(summary.generations, tracker.history());
        Output::save_text(&report, Some(path.clone()))?;
        eprintln!("  Statistics saved: {}", path.display());
    }

    if let Some(path) = &arg.record {
        let record = TrainingRecord {
            trained_at: Utc::now(),
            generations: summary.generations,
            best_generation: summary.best.as_ref().map(|b| b.generation),
            best_fitness: summary.best.as_ref().map(|b| b.fitness),
            best_progress: summary.best.as_ref().map(|b| b.progress),
            network: arg.output.as_ref().map(|p| p.display().to_string()),
            config,
        };
        Output::save_json(&record, Some(path.clone()))?;
        eprintln!("  Record saved: {}", path.display());
    }

    Ok(())
}

/// Rejects settings that would trip the construction asserts of the training crates.
pub(crate) fn check_config(config: &TrainingConfig) -> anyhow::Result<()> {
    let genetic = &config.genetic;
    anyhow::ensure!(
        (0.0..=1.0).contains(&genetic.mutation_probability),
        "Mutation probability must be within [0, 1]: {}",
        genetic.mutation_probability
    );
    anyhow::ensure!(
        genetic.parents_count >= genetic.crossover.min_parents(),
        "{} crossover needs at least {} parents, got {}",
        genetic.crossover,
        genetic.crossover.min_parents(),
        genetic.parents_count
    );
    anyhow::ensure!(
        genetic.population_size > genetic.parents_count,
        "Population size {} must exceed the parents count {}",
        genetic.population_size,
        genetic.parents_count
    );
    anyhow::ensure!(
        config.genes.lower < config.genes.upper,
        "Gene range lower bound {} must be below upper bound {}",
        config.genes.lower,
        config.genes.upper
    );
    anyhow::ensure!(config.genes.precision > 0, "Gene precision must be positive");
    anyhow::ensure!(
        config.fitness.min_time > 0.0 && config.fitness.min_time <= config.fitness.max_time,
        "Fitness times must satisfy 0 < min time ({}) <= max time ({})",
        config.fitness.min_time,
        config.fitness.max_time
    );
    anyhow::ensure!(config.tick_length > 0.0, "Tick length must be positive");
    anyhow::ensure!(
        config.punish_interval > 0.0,
        "Punish interval must be positive"
    );
    Ok(())
}

fn print_generation(report: &GenerationReport) {
    let record = &report.record;
    eprintln!(
        "Generation #{:3}: highest {:6.3}, mean {:6.3}, success {:3}, best time {:7.2}s ({} ticks, best so far {:.3})",
        report.generation,
        record.highest_fitness,
        record.mean_fitness,
        record.success_count,
        record.best_time,
        report.ticks,
        report.best_fitness,
    );
}
