use std::path::PathBuf;

use neurodrive_network::{LayoutLimits, NeuralNetwork};
use neurodrive_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct InspectArg {
    /// ANN file to inspect
    ann: PathBuf,
    /// Output format (`text` or `json`)
    #[arg(long, default_value = "text")]
    format: InspectFormat,
}

#[derive(Debug, Serialize)]
struct NetworkDump<'a> {
    layout: &'a neurodrive_network::NetworkLayout,
    number_of_neurons: usize,
    number_of_weights: usize,
    weights: Vec<f64>,
}

pub(crate) fn run(arg: &InspectArg) -> anyhow::Result<()> {
    let InspectArg { ann, format } = arg;
    let network = util::read_network_file(ann)?;
    match format {
        InspectFormat::Text => print_text(ann, &network),
        InspectFormat::Json => {
            let dump = NetworkDump {
                layout: network.layout(),
                number_of_neurons: network.number_of_neurons(),
                number_of_weights: network.number_of_weights(),
                weights: network.weights(),
            };
            Output::save_json(&dump, None)?;
        }
    }
    Ok(())
}

fn print_text(path: &std::path::Path, network: &NeuralNetwork) {
    let layout = network.layout();
    println!("Network: {}", path.display());
    println!("  Inputs:  {}", network.input_len());
    println!("  Outputs: {}", network.output_len());
    println!("  Neurons: {}", network.number_of_neurons());
    println!("  Weights: {}", network.number_of_weights());

    println!("  Layers:");
    println!("    {:2}: {:2} neurons (input)", 0, layout.layer_sizes[0]);
    for (i, ((size, activation), bias)) in layout
        .layer_sizes
        .iter()
        .skip(1)
        .zip(&layout.activations)
        .zip(&layout.biases)
        .enumerate()
    {
        println!(
            "    {:2}: {size:2} neurons, {activation}, bias {bias:.3}",
            i + 1
        );
    }

    match layout.validate(&LayoutLimits::default()) {
        Ok(()) => println!("  Within default layout limits"),
        Err(err) => println!("  Outside default layout limits: {err}"),
    }

    if let Some(stats) = DescriptiveStats::new(network.weights()) {
        println!("  Weight Stats:");
        println!("    Min:    {:.3}", stats.min);
        println!("    Max:    {:.3}", stats.max);
        println!("    Mean:   {:.3}", stats.mean);
        println!("    Median: {:.3}", stats.median);
        println!("    Stddev: {:.3}", stats.std_dev);
    }
}
