//! Fitness scoring and the punishment schedule for a population driving a track.
//!
//! The simulation reports raw progress, the number of checkpoints each individual has
//! passed. [`FitnessTracker`] turns it into:
//!
//! - a comparative fitness at the end of a generation, where a time bonus
//!   `min_time / elapsed_time` breaks ties in favour of faster individuals
//! - periodic punishment, deactivating individuals that gained less than
//!   `max_fitness × min_fitness_improvement` since the previous round
//! - a per-generation [`FitnessHistory`], exported as a [`StatisticsReport`]
//!
//! Punishment is a schedule, not a continuous penalty: the caller decides how often
//! [`FitnessTracker::punish`] runs.

pub use self::{
    history::{FitnessHistory, GenerationRecord},
    params::FitnessParams,
    statistics::{ChartRow, StatisticsReport},
    timer::StoppableTimer,
    tracker::{FitnessError, FitnessTracker, PunishReport},
};

mod history;
mod params;
mod statistics;
mod timer;
mod tracker;
