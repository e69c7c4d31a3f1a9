use neurodrive_stats::descriptive::{self, DescriptiveStats};
use tracing::debug;

use crate::{FitnessHistory, FitnessParams, GenerationRecord, StoppableTimer};

/// Turns raw per-individual progress into comparative fitness and punishment decisions.
///
/// Raw fitness is the number of checkpoints an individual has passed; it is supplied by the
/// caller on every call. The tracker owns the per-individual state that lives for one
/// generation (elapsed time, the improvement floor used by [`FitnessTracker::punish`], the
/// active flag) plus records that span the whole run.
#[derive(Debug, Clone)]
pub struct FitnessTracker {
    params: FitnessParams,
    fitness: Vec<f64>,
    previous_fitness: Vec<f64>,
    timers: Vec<StoppableTimer>,
    active: Vec<bool>,
    highest_fitness: f64,
    highest_fitness_overall: f64,
    best_time: f64,
    best_time_overall: f64,
    // fitness level best_time_overall was measured at
    best_time_overall_fitness: f64,
    mean_required_improvement: f64,
    punished_count: usize,
    history: FitnessHistory,
}

/// Result of one [`FitnessTracker::punish`] round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PunishReport {
    /// Individuals still active after this round.
    pub active: usize,
    /// Individuals deactivated by this round.
    pub deactivated: usize,
    /// Mean of every individual's improvement floor.
    pub mean_previous_fitness: f64,
}

impl FitnessTracker {
    /// # Panics
    ///
    /// Panics if `population_size` is zero or the time bounds are invalid.
    #[must_use]
    pub fn new(population_size: usize, params: FitnessParams) -> Self {
        assert!(population_size > 0, "population must not be empty");
        let timer = StoppableTimer::new(params.min_time, params.max_time);
        Self {
            fitness: vec![0.0; population_size],
            previous_fitness: vec![0.0; population_size],
            timers: vec![timer; population_size],
            active: vec![true; population_size],
            highest_fitness: 0.0,
            highest_fitness_overall: 0.0,
            best_time: params.max_time,
            best_time_overall: params.max_time,
            best_time_overall_fitness: 0.0,
            mean_required_improvement: 0.0,
            punished_count: 0,
            history: FitnessHistory::new(params.max_fitness(), population_size),
            params,
        }
    }

    /// Restarts the whole run with a new population size and improvement threshold.
    pub fn init(&mut self, population_size: usize, min_fitness_improvement: f64) {
        let params = FitnessParams {
            min_fitness_improvement,
            ..self.params.clone()
        };
        *self = Self::new(population_size, params);
    }

    /// Clears the per-generation state. Run-wide records and the history are kept.
    pub fn reset(&mut self) {
        self.fitness.fill(0.0);
        self.previous_fitness.fill(0.0);
        self.timers.iter_mut().for_each(StoppableTimer::reset);
        self.active.fill(true);
        self.highest_fitness = 0.0;
        self.best_time = self.params.max_time;
        self.mean_required_improvement = 0.0;
        self.punished_count = 0;
    }

    /// Advances the timers of active individuals by `dt`.
    ///
    /// Individuals whose timer reaches the maximum time are deactivated; their count is
    /// returned.
    pub fn tick(&mut self, dt: f64) -> usize {
        let mut timed_out = 0;
        for (timer, active) in self.timers.iter_mut().zip(&mut self.active) {
            if *active && timer.advance(dt) {
                *active = false;
                timed_out += 1;
            }
        }
        timed_out
    }

    pub fn deactivate(&mut self, index: usize) {
        if let Some(active) = self.active.get_mut(index) {
            *active = false;
        }
    }

    #[must_use]
    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    #[must_use]
    pub fn population_size(&self) -> usize {
        self.active.len()
    }

    /// Closes a generation and returns the comparative fitness vector.
    ///
    /// Each individual scores `raw + min_time / elapsed_time`, so of two individuals with
    /// equal progress the faster one wins. Elapsed time never drops below `min_time`, so the
    /// bonus lies in `(0, 1]` and can never lift an individual past one that reached a further
    /// checkpoint. Also records the generation in the history.
    pub fn iterate(&mut self, raw: &[f64]) -> Result<&[f64], FitnessError> {
        self.check_len(raw)?;

        let highest = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        self.highest_fitness = highest;
        if highest > self.highest_fitness_overall {
            self.highest_fitness_overall = highest;
        }

        self.best_time = raw
            .iter()
            .zip(&self.timers)
            .filter(|&(&f, _)| f == highest)
            .map(|(_, timer)| timer.value())
            .fold(self.params.max_time, f64::min);
        if highest > self.best_time_overall_fitness {
            self.best_time_overall_fitness = highest;
            self.best_time_overall = self.best_time;
        } else if highest == self.best_time_overall_fitness {
            self.best_time_overall = self.best_time_overall.min(self.best_time);
        }

        let success = self.params.success_fitness();
        let times = self.timers.iter().map(StoppableTimer::value);
        let record = GenerationRecord {
            highest_fitness: highest,
            mean_fitness: descriptive::mean(raw),
            success_count: raw.iter().filter(|&&f| f >= success).count(),
            best_time: self.best_time,
            mean_time: DescriptiveStats::new(times).map_or(0.0, |s| s.mean),
        };
        debug!(
            highest = record.highest_fitness,
            mean = record.mean_fitness,
            successes = record.success_count,
            best_time = record.best_time,
            "generation scored"
        );
        self.history.push(record);

        let min_time = self.params.min_time;
        for ((fitness, &raw), timer) in self.fitness.iter_mut().zip(raw).zip(&self.timers) {
            *fitness = raw + min_time / timer.value();
        }
        Ok(&self.fitness)
    }

    /// Finds the best active individual.
    ///
    /// Inactive individuals count as zero, the first of equal maxima wins, and `None` is
    /// returned when nobody is active.
    pub fn mark_leader(&mut self, raw: &[f64]) -> Result<Option<usize>, FitnessError> {
        self.check_len(raw)?;

        for ((fitness, &raw), &active) in self.fitness.iter_mut().zip(raw).zip(&self.active) {
            *fitness = if active { raw } else { 0.0 };
        }

        let mut leader = None;
        for (index, &fitness) in self.fitness.iter().enumerate() {
            if !self.active[index] {
                continue;
            }
            if leader.is_none_or(|(_, best)| fitness > best) {
                leader = Some((index, fitness));
            }
        }

        self.highest_fitness = self.fitness.iter().copied().fold(0.0, f64::max);
        if self.highest_fitness > self.highest_fitness_overall {
            self.highest_fitness_overall = self.highest_fitness;
        }
        Ok(leader.map(|(index, _)| index))
    }

    /// Deactivates every active individual that has not improved enough since the last round.
    ///
    /// The required fitness is `previous + max_fitness × min_fitness_improvement`; an
    /// individual below it is deactivated, and its floor becomes the larger of the required
    /// and the current fitness.
    pub fn punish(&mut self, raw: &[f64]) -> Result<PunishReport, FitnessError> {
        self.check_len(raw)?;

        let step = self.params.max_fitness() * self.params.min_fitness_improvement;
        let mut deactivated = 0;
        for (index, &current) in raw.iter().enumerate() {
            if !self.active[index] {
                continue;
            }
            self.fitness[index] = current;
            let required = self.previous_fitness[index] + step;
            if required > current {
                self.active[index] = false;
                deactivated += 1;
            }
            self.previous_fitness[index] = required.max(current);
        }

        let active = self.active_count();
        self.punished_count = self.population_size() - active;
        self.mean_required_improvement = descriptive::mean(&self.previous_fitness);
        debug!(active, deactivated, "punished individuals");
        Ok(PunishReport {
            active,
            deactivated,
            mean_previous_fitness: self.mean_required_improvement,
        })
    }

    fn check_len(&self, raw: &[f64]) -> Result<(), FitnessError> {
        if raw.len() == self.population_size() {
            Ok(())
        } else {
            Err(FitnessError::SizeMismatch {
                expected: self.population_size(),
                actual: raw.len(),
            })
        }
    }

    /// Percentage of the maximum fitness.
    #[must_use]
    pub fn to_ratio(&self, fitness: f64) -> f64 {
        fitness / self.params.max_fitness() * 100.0
    }

    #[must_use]
    pub fn params(&self) -> &FitnessParams {
        &self.params
    }

    #[must_use]
    pub fn max_fitness(&self) -> f64 {
        self.params.max_fitness()
    }

    /// Comparative fitness from the last [`FitnessTracker::iterate`].
    #[must_use]
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    #[must_use]
    pub fn elapsed_time(&self, index: usize) -> Option<f64> {
        self.timers.get(index).map(StoppableTimer::value)
    }

    #[must_use]
    pub fn highest_fitness(&self) -> f64 {
        self.highest_fitness
    }

    #[must_use]
    pub fn highest_fitness_ratio(&self) -> f64 {
        self.to_ratio(self.highest_fitness)
    }

    #[must_use]
    pub fn highest_fitness_overall(&self) -> f64 {
        self.highest_fitness_overall
    }

    #[must_use]
    pub fn highest_fitness_overall_ratio(&self) -> f64 {
        self.to_ratio(self.highest_fitness_overall)
    }

    #[must_use]
    pub fn best_time(&self) -> f64 {
        self.best_time
    }

    /// Best time among individuals that reached the best fitness of the run.
    #[must_use]
    pub fn best_time_overall(&self) -> f64 {
        self.best_time_overall
    }

    /// Mean improvement floor after the last [`FitnessTracker::punish`].
    #[must_use]
    pub fn mean_required_improvement(&self) -> f64 {
        self.mean_required_improvement
    }

    #[must_use]
    pub fn mean_required_improvement_ratio(&self) -> f64 {
        self.to_ratio(self.mean_required_improvement)
    }

    /// Inactive individuals after the last [`FitnessTracker::punish`].
    #[must_use]
    pub fn punished_count(&self) -> usize {
        self.punished_count
    }

    #[must_use]
    pub fn history(&self) -> &FitnessHistory {
        &self.history
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FitnessError {
    #[display("fitness vector has {actual} entries, population has {expected} individuals")]
    SizeMismatch { expected: usize, actual: usize },
}
