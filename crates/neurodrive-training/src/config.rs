use std::{fs, io, path::Path};

use neurodrive_fitness::FitnessParams;
use neurodrive_genetic::{FloatDomain, GeneticParams};
use neurodrive_network::{Activation, LayoutLimits, NetworkLayout};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TrackParams;

/// Everything a training run is parameterized by.
///
/// Stored as JSON; missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub genetic: GeneticParams,
    /// Range and mutation grid of every network weight.
    pub genes: FloatDomain,
    pub layout: NetworkLayout,
    pub layout_limits: LayoutLimits,
    /// `checkpoint_count` is overwritten with the simulation's own count.
    pub fitness: FitnessParams,
    pub track: TrackParams,
    /// Simulated seconds per tick.
    pub tick_length: f64,
    /// Simulated seconds between punishment rounds.
    pub punish_interval: f64,
    /// Seed for the random generator; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            genetic: GeneticParams::default(),
            genes: FloatDomain::default(),
            layout: NetworkLayout::new(4, &[5, 4], 1)
                .with_activations(vec![Activation::LeakyRelu, Activation::Tanh, Activation::Tanh])
                .with_biases(vec![0.25, 0.1, 0.05]),
            layout_limits: LayoutLimits::default(),
            fitness: FitnessParams::default(),
            track: TrackParams::default(),
            tick_length: 0.1,
            punish_interval: 6.0,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "loaded training config");
        Ok(config)
    }

    pub fn save<P>(&self, path: P) -> Result<(), ConfigError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "saved training config");
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The generator for this run: seeded if `seed` is set, from OS entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> Pcg64 {
        match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_os_rng(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("I/O error: {_0}")]
    Io(io::Error),
    #[display("invalid JSON: {_0}")]
    Json(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}
