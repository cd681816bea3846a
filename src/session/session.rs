use log::{info, warn};
use rand::Rng;
use serde::Serialize;

use crate::canvas::image_buffer::ImageBuffer;
use crate::data::dataset::Dataset;
use crate::error::{Result, SynthError};
use crate::influence::influence::{compute_influence, InfluenceVector};
use crate::network::network::{Activations, Network};
use crate::synth::synth_config::SynthConfig;
use crate::synth::synthesizer::{SynthProgress, SynthStatus, Synthesizer};

/// What a synthesis call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tick {
    /// No network is loaded, or no run is in flight.
    NotReady,
    Progress(SynthProgress),
}

/// The network's verdict on the current canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class: usize,
    pub confidence: f64,
    pub outputs: Vec<f64>,
    /// Label of the dataset sample on the canvas, if one was loaded.
    pub expected: Option<u8>,
}

impl Prediction {
    pub fn from_activations(activations: &Activations, expected: Option<u8>) -> Prediction {
        let class = activations.predicted_class();
        Prediction {
            class,
            confidence: activations.output()[class],
            outputs: activations.output().to_vec(),
            expected,
        }
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.expected.map(|label| label as usize == self.class)
    }
}

/// Everything one interactive session works on.
///
/// The network, its cached influence ordering, the canvas and the optional
/// dataset all live here and are handed to the core operations explicitly.
#[derive(Debug, Default)]
pub struct Session {
    network: Option<Network>,
    influence: Option<InfluenceVector>,
    order: Vec<usize>,
    buffer: ImageBuffer,
    dataset: Option<Dataset>,
    sample_label: Option<u8>,
    synthesis: Option<Synthesizer>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn influence(&self) -> Option<&InfluenceVector> {
        self.influence.as_ref()
    }

    /// Pixel visiting order cached for the loaded network.
    pub fn visiting_order(&self) -> &[usize] {
        &self.order
    }

    pub fn buffer(&self) -> &ImageBuffer {
        &self.buffer
    }

    /// Direct canvas access for painting. Ends any in-flight synthesis, since
    /// the two writers must not interleave.
    pub fn buffer_mut(&mut self) -> &mut ImageBuffer {
        self.abort_synthesis();
        self.sample_label = None;
        &mut self.buffer
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn synthesis(&self) -> Option<&Synthesizer> {
        self.synthesis.as_ref()
    }

    pub fn sample_label(&self) -> Option<u8> {
        self.sample_label
    }

    pub fn is_ready(&self) -> bool {
        self.network.is_some()
    }

    /// Swaps in a new network, recomputing influence and the pixel order.
    ///
    /// A network whose first-layer weights are all zero still loads; its
    /// influence is all zero and pixels are visited in index order.
    pub fn load_network(&mut self, network: Network) {
        self.abort_synthesis();

        let influence = match compute_influence(&network) {
            Ok(influence) => influence,
            Err(SynthError::DegenerateNetwork) => {
                warn!("first-layer weights are all zero; using uniform zero influence");
                InfluenceVector::zeros(network.input_size())
            }
            Err(e) => {
                warn!("influence unavailable: {e}; using uniform zero influence");
                InfluenceVector::zeros(network.input_size())
            }
        };
        self.order = influence.visiting_order();
        info!("network loaded: layer sizes {:?}", network.layer_sizes());
        self.influence = Some(influence);
        self.network = Some(network);
    }

    pub fn load_dataset(&mut self, dataset: Dataset) {
        info!("dataset loaded: {} images", dataset.len());
        self.dataset = Some(dataset);
    }

    /// Copies dataset sample `index` onto the canvas.
    pub fn load_sample(&mut self, index: usize) -> Result<bool> {
        let sample = match self.dataset.as_ref().and_then(|d| d.sample(index)) {
            Some(sample) => sample,
            None => return Ok(false),
        };
        let buffer = ImageBuffer::from_sample(sample)?;
        let label = sample.label;
        self.abort_synthesis();
        self.buffer = buffer;
        self.sample_label = Some(label);
        Ok(true)
    }

    /// Copies a random dataset sample onto the canvas, returning its index.
    pub fn load_random_sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<usize>> {
        let index = match self.dataset.as_ref().and_then(|d| d.random_index(rng)) {
            Some(index) => index,
            None => return Ok(None),
        };
        self.load_sample(index)?;
        Ok(Some(index))
    }

    pub fn reset_canvas(&mut self) {
        self.abort_synthesis();
        self.buffer.reset();
        self.sample_label = None;
    }

    /// Forward pass over the canvas; `None` until a network is loaded.
    pub fn activations(&self) -> Result<Option<Activations>> {
        match &self.network {
            Some(network) => network.forward(self.buffer.as_slice()).map(Some),
            None => Ok(None),
        }
    }

    pub fn classify(&self) -> Result<Option<Prediction>> {
        Ok(self
            .activations()?
            .map(|acts| Prediction::from_activations(&acts, self.sample_label)))
    }

    /// Clears the canvas and starts a run toward (or away from) `target`, then
    /// performs the first tick.
    pub fn start_synthesis<R: Rng + ?Sized>(
        &mut self,
        target: usize,
        invert: bool,
        config: &SynthConfig,
        rng: &mut R,
    ) -> Result<Tick> {
        if self.network.is_none() {
            return Ok(Tick::NotReady);
        }
        self.abort_synthesis();
        self.sample_label = None;

        let network = match &self.network {
            Some(network) => network,
            None => return Ok(Tick::NotReady),
        };
        let synth = Synthesizer::begin(
            network,
            self.order.clone(),
            target,
            invert,
            config,
            &mut self.buffer,
            rng,
        )?;
        self.synthesis = Some(synth);
        self.tick(rng)
    }

    /// Continues the in-flight run by one batch of pixels. An aborted run
    /// reports `NotReady`; a finished one keeps reporting its final progress.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Tick> {
        let (network, synth) = match (&self.network, &mut self.synthesis) {
            (Some(network), Some(synth)) => (network, synth),
            _ => return Ok(Tick::NotReady),
        };
        if synth.status() == SynthStatus::Aborted {
            return Ok(Tick::NotReady);
        }
        let progress = synth.tick(network, &mut self.buffer, rng)?;
        Ok(Tick::Progress(progress))
    }

    /// A whole run in one call.
    pub fn synthesize<R: Rng + ?Sized>(
        &mut self,
        target: usize,
        invert: bool,
        config: &SynthConfig,
        rng: &mut R,
    ) -> Result<Tick> {
        let mut tick = self.start_synthesis(target, invert, config, rng)?;
        while let Tick::Progress(progress) = tick {
            if progress.finished {
                break;
            }
            tick = self.tick(rng)?;
        }
        Ok(tick)
    }

    pub fn abort_synthesis(&mut self) {
        if let Some(synth) = self.synthesis.as_mut() {
            synth.abort();
        }
    }
}
