use serde::{Deserialize, Serialize};

/// Scoring constants of a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessParams {
    /// Checkpoints on the track; reaching the last one is a success.
    pub checkpoint_count: usize,
    /// Fraction of the maximum fitness an individual must gain between punishments.
    pub min_fitness_improvement: f64,
    /// Starting value of every timer; an individual stopped this early earns a time bonus
    /// of exactly one.
    pub min_time: f64,
    /// Timers saturate here.
    pub max_time: f64,
}

impl Default for FitnessParams {
    fn default() -> Self {
        Self {
            checkpoint_count: 10,
            min_fitness_improvement: 0.05,
            min_time: 1.0,
            max_time: 120.0,
        }
    }
}

impl FitnessParams {
    /// One unit above the success ceiling: the highest raw fitness plus the largest time
    /// bonus.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn max_fitness(&self) -> f64 {
        self.checkpoint_count as f64 + 1.0
    }

    /// Raw fitness of an individual that passed every checkpoint.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn success_fitness(&self) -> f64 {
        self.checkpoint_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_fitness() {
        let params = FitnessParams {
            checkpoint_count: 4,
            ..FitnessParams::default()
        };
        assert_eq!(params.max_fitness(), 5.0);
        assert_eq!(params.success_fitness(), 4.0);
    }

    #[test]
    fn test_json_defaults() {
        let params: FitnessParams = serde_json::from_str(r#"{"max_time": 30.0}"#).unwrap();
        assert_eq!(params.max_time, 30.0);
        assert_eq!(params.checkpoint_count, 10);
    }
}
