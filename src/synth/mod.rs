pub mod synth_config;
pub mod synthesizer;

pub use synth_config::SynthConfig;
pub use synthesizer::{synthesize, PixelDecision, SynthProgress, SynthStatus, Synthesizer};
