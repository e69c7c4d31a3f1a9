use std::path::PathBuf;

use anyhow::Context;

use crate::util;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// ANN file to evaluate
    ann: PathBuf,
    /// Comma-separated input values
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    input: Vec<f64>,
}

impl EvaluateArg {
    #[cfg(test)]
    pub(crate) fn input(&self) -> &[f64] {
        &self.input
    }
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg { ann, input } = arg;
    let mut network = util::read_network_file(ann)?;
    let output = network
        .evaluate(input)
        .with_context(|| format!("Failed to evaluate network: {}", ann.display()))?;

    let line = output
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    println!("{line}");
    Ok(())
}
