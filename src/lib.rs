pub mod error;
pub mod activation;
pub mod layers;
pub mod network;
pub mod influence;
pub mod loss;
pub mod canvas;
pub mod data;
pub mod synth;
pub mod session;

// Convenience re-exports
pub use error::{Result, SynthError};
pub use activation::sigmoid::sigmoid;
pub use layers::dense::DenseLayer;
pub use network::network::{propagate, Activations, Network};
pub use network::loader::{load_network_csv, read_network};
pub use influence::influence::{compute_influence, unit_influence, InfluenceVector};
pub use loss::sse::SseLoss;
pub use canvas::image_buffer::ImageBuffer;
pub use data::dataset::{Dataset, Sample};
pub use synth::synth_config::SynthConfig;
pub use synth::synthesizer::{synthesize, PixelDecision, SynthProgress, SynthStatus, Synthesizer};
pub use session::session::{Prediction, Session, Tick};

/// Builds a network from already-decoded layer sizes and weight tables.
pub fn load_network(layer_sizes: Vec<usize>, weights: Vec<Vec<f64>>) -> Result<Network> {
    Network::new(layer_sizes, weights)
}
