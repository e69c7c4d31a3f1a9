use std::path::PathBuf;

use neurodrive_training::TrainingConfig;

use crate::util::Output;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DefaultConfigArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DefaultConfigArg) -> anyhow::Result<()> {
    let DefaultConfigArg { output } = arg;
    Output::save_json(&TrainingConfig::default(), output.clone())?;
    if let Some(path) = output {
        eprintln!("Default config written to {}", path.display());
    }
    Ok(())
}
