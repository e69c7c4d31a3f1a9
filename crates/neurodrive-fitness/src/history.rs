use serde::{Deserialize, Serialize};

/// Summary of one finished generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub highest_fitness: f64,
    pub mean_fitness: f64,
    /// Individuals that passed every checkpoint.
    pub success_count: usize,
    /// Shortest time among the individuals that reached `highest_fitness`.
    pub best_time: f64,
    pub mean_time: f64,
}

/// Per-generation records plus their percentage projections.
///
/// Fitness ratios are relative to the maximum fitness, success ratios to the population
/// size, and time ratios to the worst (largest) time recorded so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessHistory {
    max_fitness: f64,
    population_size: usize,
    records: Vec<GenerationRecord>,
}

impl FitnessHistory {
    #[must_use]
    pub fn new(max_fitness: f64, population_size: usize) -> Self {
        Self {
            max_fitness,
            population_size,
            records: vec![],
        }
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    #[must_use]
    pub fn highest_fitness_ratios(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.highest_fitness / self.max_fitness * 100.0)
            .collect()
    }

    #[must_use]
    pub fn mean_fitness_ratios(&self) -> Vec<f64> {
        self.records
            .iter()
            .map(|r| r.mean_fitness / self.max_fitness * 100.0)
            .collect()
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn success_ratios(&self) -> Vec<f64> {
        let population = self.population_size as f64;
        self.records
            .iter()
            .map(|r| r.success_count as f64 / population * 100.0)
            .collect()
    }

    #[must_use]
    pub fn best_time_ratios(&self) -> Vec<f64> {
        relative_to_worst(self.records.iter().map(|r| r.best_time))
    }

    #[must_use]
    pub fn mean_time_ratios(&self) -> Vec<f64> {
        relative_to_worst(self.records.iter().map(|r| r.mean_time))
    }
}

fn relative_to_worst<I>(times: I) -> Vec<f64>
where
    I: Iterator<Item = f64> + Clone,
{
    let worst = times.clone().fold(0.0, f64::max);
    if worst <= 0.0 {
        return times.map(|_| 0.0).collect();
    }
    times.map(|t| t / worst * 100.0).collect()
}
