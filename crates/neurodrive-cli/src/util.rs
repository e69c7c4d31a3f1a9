use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use neurodrive_network::{NeuralNetwork, codec};
use neurodrive_training::TrainingConfig;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn save_text<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: std::fmt::Display,
    {
        let mut output = Output::from_output_path(output_path)?;
        write!(&mut output, "{value}")
            .with_context(|| format!("Failed to write to {}", output.display_path()))?;
        output
            .flush()
            .with_context(|| format!("Failed to flush output to {}", output.display_path()))?;
        Ok(())
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Reads a training configuration, falling back to the defaults when no path is given.
pub fn read_config_file<P>(path: Option<P>) -> anyhow::Result<TrainingConfig>
where
    P: AsRef<Path>,
{
    let Some(path) = path else {
        return Ok(TrainingConfig::default());
    };
    let path = path.as_ref();
    TrainingConfig::load(path)
        .with_context(|| format!("Failed to read training config file: {}", path.display()))
}

pub fn read_network_file<P>(path: P) -> anyhow::Result<NeuralNetwork>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    codec::load(path).with_context(|| format!("Failed to read ANN file: {}", path.display()))
}

pub fn write_network_file<P>(network: &NeuralNetwork, path: P) -> anyhow::Result<()>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    codec::save(network, path)
        .with_context(|| format!("Failed to write ANN file: {}", path.display()))
}
