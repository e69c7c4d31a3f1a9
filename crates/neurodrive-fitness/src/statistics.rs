//! Plain-text training statistics for offline charting.
//!
//! The report is a block of chart rows, one per generation, followed by a blank line and a
//! footer describing the run:
//!
//! ```text
//! 40.000000;22.500000;0.000000;100.000000;100.000000;2.000000;1.125000;0;120.000000;98.250000
//! ...
//!
//! Number of generations: 60;
//! Population size: 40;
//! ...
//! Generation: 12;
//! ```
//!
//! Each chart row holds five percentages (highest fitness, mean fitness, successes, best
//! time, mean time) followed by the same five values in absolute terms.

use std::fmt;

use neurodrive_genetic::{FloatDomain, GeneticParams};

use crate::{FitnessHistory, FitnessParams};

/// One generation of the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRow {
    pub highest_fitness_ratio: f64,
    pub mean_fitness_ratio: f64,
    pub success_ratio: f64,
    pub best_time_ratio: f64,
    pub mean_time_ratio: f64,
    pub highest_fitness: f64,
    pub mean_fitness: f64,
    pub success_count: usize,
    pub best_time: f64,
    pub mean_time: f64,
}

impl fmt::Display for ChartRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6};{:.6};{:.6};{:.6};{:.6};{:.6};{:.6};{};{:.6};{:.6}",
            self.highest_fitness_ratio,
            self.mean_fitness_ratio,
            self.success_ratio,
            self.best_time_ratio,
            self.mean_time_ratio,
            self.highest_fitness,
            self.mean_fitness,
            self.success_count,
            self.best_time,
            self.mean_time,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsReport {
    footer: Vec<(String, String)>,
    generation: Option<usize>,
    rows: Vec<ChartRow>,
}

impl StatisticsReport {
    /// Creates a report whose footer describes the run configuration.
    #[must_use]
    pub fn new(
        genetic: &GeneticParams,
        chromosome_length: usize,
        domain: &FloatDomain,
        fitness: &FitnessParams,
    ) -> Self {
        let mut report = Self::default();
        report.add_footer("Number of generations", genetic.max_generations);
        report.add_footer("Chromosome length", chromosome_length);
        report.add_footer("Population size", genetic.population_size);
        report.add_footer("Crossover type", genetic.crossover);
        report.add_footer(
            "Repeat crossover per individual",
            flag(genetic.repeat_crossover),
        );
        report.add_footer("Mutation probability", genetic.mutation_probability);
        report.add_footer(
            "Decrease mutation probability over generations",
            flag(genetic.decrease_mutation),
        );
        report.add_footer("Number of parents", genetic.parents_count);
        report.add_footer("Precision", domain.precision);
        report.add_footer("Lower bound of range", domain.lower);
        report.add_footer("Upper bound of range", domain.upper);
        report.add_footer("Max fitness", fitness.max_fitness());
        report.add_footer("Min time", fitness.min_time);
        report.add_footer("Max time", fitness.max_time);
        report.add_footer(
            "Min required fitness improvement",
            fitness.min_fitness_improvement,
        );
        report
    }

    pub fn add_footer<V>(&mut self, key: &str, value: V)
    where
        V: fmt::Display,
    {
        self.footer.push((key.to_owned(), value.to_string()));
    }

    /// Replaces the chart with `history` as of `generation`.
    pub fn extract(&mut self, generation: usize, history: &FitnessHistory) {
        let highest = history.highest_fitness_ratios();
        let mean = history.mean_fitness_ratios();
        let success = history.success_ratios();
        let best_time = history.best_time_ratios();
        let mean_time = history.mean_time_ratios();

        self.generation = Some(generation);
        self.rows = history
            .records()
            .iter()
            .enumerate()
            .map(|(i, record)| ChartRow {
                highest_fitness_ratio: highest[i],
                mean_fitness_ratio: mean[i],
                success_ratio: success[i],
                best_time_ratio: best_time[i],
                mean_time_ratio: mean_time[i],
                highest_fitness: record.highest_fitness,
                mean_fitness: record.mean_fitness,
                success_count: record.success_count,
                best_time: record.best_time,
                mean_time: record.mean_time,
            })
            .collect();
    }

    #[must_use]
    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    #[must_use]
    pub fn footer(&self) -> &[(String, String)] {
        &self.footer
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        writeln!(f)?;
        for (key, value) in &self.footer {
            writeln!(f, "{key}: {value};")?;
        }
        if let Some(generation) = self.generation {
            writeln!(f, "Generation: {generation};")?;
        }
        Ok(())
    }
}

fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GenerationRecord;

    fn report() -> StatisticsReport {
        StatisticsReport::new(
            &GeneticParams::default(),
            31,
            &FloatDomain::default(),
            &FitnessParams::default(),
        )
    }

    #[test]
    fn test_footer_only() {
        let text = report().to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Number of generations: 60;"));
        assert_eq!(lines.next(), Some("Chromosome length: 31;"));
        assert!(text.contains("Crossover type: uniform;\n"));
        assert!(text.contains("Repeat crossover per individual: True;\n"));
        assert!(text.contains("Max fitness: 11;\n"));
        assert!(!text.contains("Generation:"));
    }

    #[test]
    fn test_chart_rows() {
        let mut history = FitnessHistory::new(5.0, 4);
        history.push(GenerationRecord {
            highest_fitness: 2.0,
            mean_fitness: 1.0,
            success_count: 0,
            best_time: 50.0,
            mean_time: 40.0,
        });
        history.push(GenerationRecord {
            highest_fitness: 4.0,
            mean_fitness: 2.5,
            success_count: 1,
            best_time: 25.0,
            mean_time: 80.0,
        });

        let mut report = report();
        report.add_footer("Date", "2026-01-01");
        report.extract(2, &history);
        assert_eq!(report.rows().len(), 2);

        let text = report.to_string();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "40.000000;20.000000;0.000000;100.000000;50.000000;2.000000;1.000000;0;50.000000;40.000000"
        );
        assert_eq!(
            lines[1],
            "80.000000;50.000000;25.000000;50.000000;100.000000;4.000000;2.500000;1;25.000000;80.000000"
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[lines.len() - 2], "Date: 2026-01-01;");
        assert_eq!(lines[lines.len() - 1], "Generation: 2;");
        for row in &lines[..2] {
            assert_eq!(row.split(';').count(), 10);
        }
    }
}
