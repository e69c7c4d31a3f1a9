//! Statistical helpers for the neurodrive training loop.
//!
//! Training produces one fitness value and one lifetime per individual every generation.
//! This crate condenses such samples into summary figures that are logged per generation
//! and written to the statistics export.
//!
//! # Modules
//!
//! - [`descriptive`]: min, max, mean, median, variance and standard deviation of a sample
//!
//! # Examples
//!
//! ```
//! use neurodrive_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [3.0, 1.0, 2.0];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.max, 3.0);
//! assert_eq!(stats.mean, 2.0);
//! ```

pub mod descriptive;
