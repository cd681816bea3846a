use serde::{Deserialize, Serialize};

use crate::canvas::image_buffer::PIXELS;
use crate::error::{Result, SynthError};

/// Knobs for a synthesis run.
///
/// # Fields
/// - `candidates`:      random values tried per pixel
/// - `pixels_per_tick`: pixels finalized per `tick`; the default finishes a
///                       whole scan in one tick
/// - `seed`:            fixed RNG seed for reproducible runs; `None` draws
///                       one from entropy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub candidates: usize,
    pub pixels_per_tick: usize,
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig { candidates: 20, pixels_per_tick: PIXELS, seed: None }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.candidates == 0 {
            return Err(SynthError::Config("candidates must be at least 1".into()));
        }
        if self.pixels_per_tick == 0 {
            return Err(SynthError::Config("pixels_per_tick must be at least 1".into()));
        }
        Ok(())
    }

    /// Deserializes a `SynthConfig` from a JSON file; missing keys take defaults.
    pub fn load_json(path: &str) -> Result<SynthConfig> {
        let file = std::fs::File::open(path)
            .map_err(|e| SynthError::Config(format!("cannot open {path}: {e}")))?;
        let reader = std::io::BufReader::new(file);
        let config: SynthConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
