use crate::spectrum::WindowKind;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::prelude::*;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "spectra";
const CONFIG_FILE: &str = "config.toml";

/// Process-wide transform settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Distinct lengths kept per precision in the twiddle cache, 0 = unbounded.
    pub twiddle_cache_capacity: usize,
    /// Smallest length run on the rayon pool (`parallel` feature only).
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            twiddle_cache_capacity: 0,
            parallel_threshold: 1 << 14,
        }
    }
}

impl EngineConfig {
    /// Push these settings into the global caches.
    pub fn apply(&self) {
        crate::twiddle::twiddle_cache::<f32>().set_capacity(self.twiddle_cache_capacity);
        crate::twiddle::twiddle_cache::<f64>().set_capacity(self.twiddle_cache_capacity);
        crate::butterfly::set_parallel_threshold(self.parallel_threshold);
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Raw s16le PCM source: a file, a named pipe or `-` for stdin.
    pub input: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub block_size: usize,
    pub window: WindowKind,
    /// Number of spectra averaged in a report.
    pub history: usize,
    pub lowcut: f64,
    pub highcut: f64,
    pub filter_enabled: bool,
    /// Upper edges of the reported bands in Hz, ascending.
    pub bands: Vec<f64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            input: String::from("-"),
            sample_rate: 44100,
            channels: 2,
            block_size: 2048,
            window: WindowKind::Blackman,
            history: 10,
            lowcut: 100.0,
            highcut: 1000.0,
            filter_enabled: false,
            bands: vec![60.0, 250.0, 500.0, 2000.0, 4000.0, 6000.0, 22050.0],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub analyzer: AnalyzerConfig,
}

/// `<config dir>/spectra/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

pub fn try_read_from_file(config_file_path: &Path) -> Result<Option<Config>, anyhow::Error> {
    if Path::try_exists(config_file_path)? {
        let mut config_file = File::open(config_file_path)?;
        let mut toml_str = String::new();
        config_file.read_to_string(&mut toml_str)?;

        match toml::from_str(&toml_str) {
            Ok(deserialized_config) => Ok(Some(deserialized_config)),
            Err(e) => Err(anyhow::Error::msg(format!(
                "Parsing the config file {} failed: {}",
                config_file_path.display(),
                e
            ))),
        }
    } else {
        Ok(None)
    }
}

pub fn make_new_config_file(
    config_to_serialize: &Config,
    config_file: &Path,
) -> Result<(), anyhow::Error> {
    let config_dir = match config_file.parent() {
        Some(parent) => parent,
        None => {
            return Err(anyhow::Error::msg(format!(
                "Path '{}' is invalid",
                config_file.to_string_lossy()
            )));
        }
    };

    let config_toml = toml::to_string_pretty(config_to_serialize)?;
    if !config_dir.as_os_str().is_empty() && !Path::try_exists(config_dir)? {
        fs::create_dir_all(config_dir)?;
    }
    let mut config_file = File::create(config_file)?;
    config_file.write_all(config_toml.as_bytes())?;

    Ok(())
}
