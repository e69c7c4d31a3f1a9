use clap::{Parser, Subcommand};
use tracing::Level;

use self::{
    default_config::DefaultConfigArg, evaluate::EvaluateArg, inspect::InspectArg, train::TrainArg,
};

mod default_config;
mod evaluate;
mod inspect;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Print debug logs
    #[arg(long, short, global = true)]
    verbose: bool,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve network weights on the corridor track
    Train(#[clap(flatten)] TrainArg),
    /// Show the layout and weights of a saved network
    Inspect(#[clap(flatten)] InspectArg),
    /// Run a saved network on one input vector
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Write the default training configuration
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
