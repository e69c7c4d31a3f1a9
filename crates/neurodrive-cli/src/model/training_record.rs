use chrono::{DateTime, Utc};
use neurodrive_training::TrainingConfig;
use serde::{Deserialize, Serialize};

/// Metadata of a finished training run, written next to the saved network.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingRecord {
    pub trained_at: DateTime<Utc>,
    pub generations: usize,
    pub best_generation: Option<usize>,
    pub best_fitness: Option<f64>,
    pub best_progress: Option<f64>,
    pub network: Option<String>,
    pub config: TrainingConfig,
}
