use std::fs::File;
use std::io::{self, prelude::*, BufReader};
use std::path::PathBuf;

const BYTES_PER_SAMPLE: usize = 2;

/// Replace a leading `~/` with the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Reads interleaved signed 16-bit little-endian PCM and mixes it down to mono
/// samples in `[-1, 1)`.
pub struct SampleReader {
    source: Box<dyn Read + Send>,
    channels: usize,
}

impl SampleReader {
    /// Open a file or named pipe, or stdin for `-`.
    pub fn open(path: &str, channels: u16) -> Result<Self, anyhow::Error> {
        if path == "-" {
            return Self::from_reader(io::stdin(), channels);
        }
        let path_expanded = expand_home(path);
        let file = match File::open(&path_expanded) {
            Ok(file) => file,
            Err(e) => {
                return Err(anyhow::Error::msg(format!(
                    "Couldn't open {}: {}",
                    path_expanded.display(),
                    e
                )));
            }
        };
        Self::from_reader(file, channels)
    }

    pub fn from_reader<R: Read + Send + 'static>(
        reader: R,
        channels: u16,
    ) -> Result<Self, anyhow::Error> {
        if channels == 0 {
            return Err(anyhow::Error::msg("The number of channels must be at least 1"));
        }
        Ok(SampleReader {
            source: Box::new(BufReader::new(reader)),
            channels: usize::from(channels),
        })
    }

    /// Read the next `n_samples` mono samples. A stream that ends before a full
    /// block is available yields `None`; the incomplete tail is dropped.
    pub fn next_block(&mut self, n_samples: usize) -> Result<Option<Vec<f64>>, anyhow::Error> {
        let frame_bytes = self.channels * BYTES_PER_SAMPLE;
        let mut buf = vec![0u8; n_samples * frame_bytes];
        match self.source.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let scale = 1.0 / (f64::from(i16::MAX) + 1.0) / self.channels as f64;
        let samples = buf
            .chunks_exact(frame_bytes)
            .map(|frame| {
                let sum: f64 = frame
                    .chunks_exact(BYTES_PER_SAMPLE)
                    .map(|bytes| f64::from(i16::from_le_bytes([bytes[0], bytes[1]])))
                    .sum();
                sum * scale
            })
            .collect();

        Ok(Some(samples))
    }
}
