//! Binary persistence of a network.
//!
//! Layout, little-endian throughout, counts as `u64` and reals as `f64`:
//!
//! ```text
//! neuron layer count, then each layer's neuron count
//! activation index count, then each activation index
//! bias count, then each bias
//! weight count, then each weight in (layer, neuron, incoming connection) order
//! ```

use std::{fs, io, path::Path};

use tracing::debug;

use crate::{Activation, LayoutError, NetworkLayout, NeuralNetwork};

const WORD: usize = size_of::<u64>();

#[must_use]
pub fn encode(network: &NeuralNetwork) -> Vec<u8> {
    let layout = network.layout();
    let weights = network.weights();
    let words = 4
        + layout.layer_sizes.len()
        + layout.activations.len()
        + layout.biases.len()
        + weights.len();
    let mut out = Vec::with_capacity(words * WORD);

    put_count(&mut out, layout.layer_sizes.len());
    for &size in &layout.layer_sizes {
        put_count(&mut out, size);
    }
    put_count(&mut out, layout.activations.len());
    for activation in &layout.activations {
        put_count(&mut out, activation.index());
    }
    put_count(&mut out, layout.biases.len());
    for &bias in &layout.biases {
        out.extend_from_slice(&bias.to_le_bytes());
    }
    put_count(&mut out, weights.len());
    for weight in weights {
        out.extend_from_slice(&weight.to_le_bytes());
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<NeuralNetwork, CodecError> {
    let mut reader = Reader { bytes, offset: 0 };

    let layer_count = reader.count()?;
    let layer_sizes = reader.repeat(layer_count, Reader::count)?;

    let activation_count = reader.count()?;
    let activations = reader.repeat(activation_count, |r| {
        let index = r.count()?;
        Activation::from_index(index).ok_or(CodecError::UnknownActivation { index })
    })?;

    let bias_count = reader.count()?;
    let biases = reader.repeat(bias_count, Reader::real)?;

    let layout = NetworkLayout {
        layer_sizes,
        activations,
        biases,
    };
    layout.check_structure()?;

    let declared = reader.count()?;
    let expected = layout.number_of_weights();
    if declared != expected {
        return Err(CodecError::WeightCount { declared, expected });
    }
    let weights = reader.repeat(declared, Reader::real)?;

    let trailing = bytes.len() - reader.offset;
    if trailing != 0 {
        return Err(CodecError::TrailingBytes { count: trailing });
    }

    let mut network = NeuralNetwork::new(layout)?;
    network
        .set_weights(&weights)
        .expect("weight count was checked against the layout");
    Ok(network)
}

pub fn save<P>(network: &NeuralNetwork, path: P) -> Result<(), CodecError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = encode(network);
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved network");
    Ok(())
}

pub fn load<P>(path: P) -> Result<NeuralNetwork, CodecError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let network = decode(&bytes)?;
    debug!(
        path = %path.display(),
        weights = network.number_of_weights(),
        "loaded network"
    );
    Ok(network)
}

fn put_count(out: &mut Vec<u8>, value: usize) {
    out.extend_from_slice(&(value as u64).to_le_bytes());
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn word(&mut self) -> Result<[u8; WORD], CodecError> {
        let end = self.offset + WORD;
        let chunk = self
            .bytes
            .get(self.offset..end)
            .ok_or(CodecError::UnexpectedEof {
                offset: self.offset,
            })?;
        self.offset = end;
        Ok(chunk.try_into().expect("chunk is exactly one word"))
    }

    fn count(&mut self) -> Result<usize, CodecError> {
        let value = u64::from_le_bytes(self.word()?);
        usize::try_from(value).map_err(|_| CodecError::CountOverflow { value })
    }

    fn real(&mut self) -> Result<f64, CodecError> {
        Ok(f64::from_le_bytes(self.word()?))
    }

    fn repeat<T, F>(&mut self, count: usize, mut read: F) -> Result<Vec<T>, CodecError>
    where
        F: FnMut(&mut Self) -> Result<T, CodecError>,
    {
        // a corrupt count must not trigger a huge allocation
        let remaining = (self.bytes.len() - self.offset) / WORD;
        if count > remaining {
            return Err(CodecError::UnexpectedEof {
                offset: self.bytes.len(),
            });
        }
        (0..count).map(|_| read(self)).collect()
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CodecError {
    #[display("unexpected end of data at byte {offset}")]
    UnexpectedEof { offset: usize },
    #[display("count {value} does not fit in memory")]
    CountOverflow { value: u64 },
    #[display("unknown activation function index {index}")]
    UnknownActivation { index: usize },
    #[display("declared weight count {declared} does not match topology ({expected})")]
    WeightCount { declared: usize, expected: usize },
    #[display("{count} unexpected trailing bytes")]
    TrailingBytes { count: usize },
    #[display("invalid network layout: {_0}")]
    Layout(LayoutError),
    #[display("I/O error: {_0}")]
    Io(io::Error),
}

impl From<LayoutError> for CodecError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NeuralNetwork {
        let layout = NetworkLayout::new(3, &[2], 2)
            .with_activations(vec![Activation::Tanh, Activation::LeakyRelu])
            .with_biases(vec![0.25, -1.5]);
        let weights = [
            0.1, -0.2, 0.3, 0.4, 0.5, -0.6, 0.7, 0.8, -0.9, 1.0, f64::MIN_POSITIVE, -3.5,
        ];
        NeuralNetwork::with_weights(layout, &weights).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_everything() {
        let original = sample();
        let decoded = decode(&encode(&original)).unwrap();
        assert_eq!(decoded.layout(), original.layout());
        assert_eq!(decoded.weights(), original.weights());
    }

    #[test]
    fn test_known_prefix() {
        let bytes = encode(&sample());
        assert_eq!(&bytes[..8], &3u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &3u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &2u64.to_le_bytes());
        assert_eq!(&bytes[24..32], &2u64.to_le_bytes());
        // activation count, then tanh (4) and leaky ReLU (3)
        assert_eq!(&bytes[32..40], &2u64.to_le_bytes());
        assert_eq!(&bytes[40..48], &4u64.to_le_bytes());
        assert_eq!(&bytes[48..56], &3u64.to_le_bytes());
        // 4 + 3 + 2 + 2 + 12 words
        assert_eq!(bytes.len(), 23 * 8);
    }

    #[test]
    fn test_truncated() {
        let bytes = encode(&sample());
        let err = decode(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode(&sample());
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::TrailingBytes { count: 1 })
        ));
    }

    #[test]
    fn test_unknown_activation() {
        let mut bytes = encode(&sample());
        bytes[40..48].copy_from_slice(&9u64.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::UnknownActivation { index: 9 })
        ));
    }

    #[test]
    fn test_weight_count_mismatch() {
        let mut bytes = encode(&sample());
        // layers(4) + activations(3) + biases(3) words precede the weight count
        let at = 10 * 8;
        bytes[at..at + 8].copy_from_slice(&11u64.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::WeightCount {
                declared: 11,
                expected: 12
            })
        ));
    }

    #[test]
    fn test_huge_count_is_rejected() {
        let bytes = u64::MAX.to_le_bytes();
        assert!(decode(&bytes).is_err());
    }

    fn words(counts: &[u64]) -> Vec<u8> {
        counts.iter().flat_map(|c| c.to_le_bytes()).collect()
    }

    #[test]
    fn test_overflowing_layer_sizes() {
        // two layers of 2^32 neurons, identity, bias 0.0 (all-zero bits), no weights
        let bytes = words(&[2, 1 << 32, 1 << 32, 1, 0, 1, 0, 0]);
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::Layout(LayoutError::WeightCountOverflow))
        ));
    }

    #[test]
    fn test_huge_layer_without_weights() {
        let bytes = words(&[2, 1 << 31, 1, 1, 0, 1, 0, 1 << 31]);
        assert!(matches!(
            decode(&bytes),
            Err(CodecError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("neurodrive-codec-{}.ann", std::process::id()));
        let original = sample();
        save(&original, &path).unwrap();
        let loaded = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.weights(), original.weights());
    }
}
