use crate::config::AnalyzerConfig;
use crate::fft::{FftError, FftResult};
use crate::real::real_forward_transform;
use crate::spectrum::{band_pass, magnitude_db, rfftfreq, window, MAGNITUDE_FLOOR};
use serde::Serialize;
use std::collections::VecDeque;

/// Bins below this frequency are ignored when looking for the peak.
const MIN_AUDIBLE_HZ: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandLevel {
    pub low_hz: f64,
    pub high_hz: f64,
    pub level_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumReport {
    pub block: u64,
    pub peak_hz: f64,
    pub peak_db: f64,
    pub bands: Vec<BandLevel>,
}

/// Clamp a pass band into `[20 Hz, Nyquist]`, raising `high` to `low` if they
/// cross.
pub fn clamp_pass_band(low: f64, high: f64, sample_rate: f64) -> (f64, f64) {
    let nyquist = sample_rate / 2.0;
    let clamp = |freq: f64| freq.min(nyquist).max(MIN_AUDIBLE_HZ.min(nyquist));
    let low = clamp(low);
    let high = clamp(high).max(low);
    (low, high)
}

/// Block-by-block magnitude spectra of a mono signal, averaged over the last
/// few blocks.
#[derive(Debug, Clone)]
pub struct SpectrumAnalyzer {
    sample_rate: f64,
    window: Vec<f64>,
    freqs: Vec<f64>,
    pass_band: Option<(f64, f64)>,
    bands: Vec<f64>,
    history: VecDeque<Vec<f64>>,
    history_len: usize,
    blocks: u64,
}

impl SpectrumAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> FftResult<Self> {
        let sample_rate = f64::from(config.sample_rate);
        let freqs = rfftfreq(config.block_size, 1.0 / sample_rate)?;
        if config.bands.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(FftError::InvalidBand {
                low: config.bands[0],
                high: config.bands[config.bands.len() - 1],
            });
        }
        let pass_band = config
            .filter_enabled
            .then(|| clamp_pass_band(config.lowcut, config.highcut, sample_rate));

        Ok(SpectrumAnalyzer {
            sample_rate,
            window: window(config.window, config.block_size),
            freqs,
            pass_band,
            bands: config.bands.clone(),
            history: VecDeque::with_capacity(config.history.max(1)),
            history_len: config.history.max(1),
            blocks: 0,
        })
    }

    pub fn block_size(&self) -> usize {
        self.window.len()
    }

    /// Centre frequency of every reported bin.
    pub fn frequencies(&self) -> &[f64] {
        &self.freqs
    }

    pub fn pass_band(&self) -> Option<(f64, f64)> {
        self.pass_band
    }

    pub fn set_pass_band(&mut self, pass_band: Option<(f64, f64)>) {
        self.pass_band =
            pass_band.map(|(low, high)| clamp_pass_band(low, high, self.sample_rate));
    }

    /// Analyze one block of `block_size` samples.
    pub fn push_block(&mut self, samples: &[f64]) -> FftResult<()> {
        if samples.len() != self.block_size() {
            return Err(FftError::LengthMismatch {
                expected: self.block_size(),
                actual: samples.len(),
            });
        }
        let filtered;
        let samples = match self.pass_band {
            Some((low, high)) => {
                filtered = band_pass(samples, &self.window, self.sample_rate, low, high)?;
                &filtered[..]
            }
            None => samples,
        };

        let windowed: Vec<f64> = samples
            .iter()
            .zip(&self.window)
            .map(|(x, w)| x * w)
            .collect();
        let spectrum = magnitude_db(&real_forward_transform(&windowed)?);

        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(spectrum);
        self.blocks += 1;
        Ok(())
    }

    /// Mean dB level per bin over the kept history.
    pub fn averaged(&self) -> Option<Vec<f64>> {
        let first = self.history.front()?;
        let mut sum = vec![0.0; first.len()];
        for spectrum in &self.history {
            for (acc, level) in sum.iter_mut().zip(spectrum) {
                *acc += level;
            }
        }
        let count = self.history.len() as f64;
        Some(sum.into_iter().map(|acc| acc / count).collect())
    }

    pub fn report(&self) -> Option<SpectrumReport> {
        let averaged = self.averaged()?;
        // Very short blocks may have no audible bin at all; fall back to DC.
        let first_audible = self
            .freqs
            .iter()
            .position(|&freq| freq >= MIN_AUDIBLE_HZ)
            .unwrap_or(0);
        let (peak_hz, peak_db) = self.freqs[first_audible..]
            .iter()
            .zip(&averaged[first_audible..])
            .fold((0.0, f64::NEG_INFINITY), |best, (&freq, &level)| {
                if level > best.1 {
                    (freq, level)
                } else {
                    best
                }
            });

        Some(SpectrumReport {
            block: self.blocks,
            peak_hz,
            peak_db,
            bands: self.band_levels(&averaged),
        })
    }

    /// Forget every analyzed block.
    pub fn reset(&mut self) {
        self.history.clear();
        self.blocks = 0;
    }

    fn band_levels(&self, levels: &[f64]) -> Vec<BandLevel> {
        let floor = 20.0 * MAGNITUDE_FLOOR.log10();
        let mut low_hz = 0.0;
        self.bands
            .iter()
            .map(|&high_hz| {
                let (total, count) = self
                    .freqs
                    .iter()
                    .zip(levels)
                    .filter(|(freq, _)| **freq > low_hz && **freq <= high_hz)
                    .fold((0.0, 0usize), |(total, count), (_, level)| {
                        (total + level, count + 1)
                    });
                let level_db = if count == 0 {
                    floor
                } else {
                    total / count as f64
                };
                let band = BandLevel {
                    low_hz,
                    high_hz,
                    level_db,
                };
                low_hz = high_hz;
                band
            })
            .collect()
    }
}
