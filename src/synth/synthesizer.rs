use log::{debug, info, trace};
use rand::Rng;
use serde::Serialize;

use crate::canvas::image_buffer::ImageBuffer;
use crate::error::{Result, SynthError};
use crate::influence::influence::InfluenceVector;
use crate::loss::sse::{target_vector, SseLoss};
use crate::network::network::Network;
use crate::synth::synth_config::SynthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SynthStatus {
    /// Pixels remain to be finalized.
    Running,
    /// Every pixel has been visited once.
    Finished,
    /// Stopped early; the buffer keeps whatever was finalized so far.
    Aborted,
}

/// The outcome of finalizing one pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelDecision {
    /// Step number within the run, 0-based.
    pub position: usize,
    /// Buffer index that was written.
    pub pixel: usize,
    /// Value left in the buffer.
    pub chosen: f64,
    /// Objective reached with `chosen`.
    pub objective: f64,
    /// Every sampled `(value, objective)` pair, in sampling order.
    pub candidates: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SynthProgress {
    pub visited: usize,
    pub total: usize,
    pub finished: bool,
}

/// Greedy per-pixel hill climber.
///
/// A run visits every buffer index exactly once, following a fixed
/// influence-sorted order rotated by a random offset. At each pixel it tries
/// `candidates` uniform values, keeps the one whose network output is closest
/// (sum of squared error) to the target vector, and moves on. Nothing is
/// revisited, so a run always costs `pixels * candidates` forward passes.
///
/// Progress lives in the synthesizer and the buffer, so a run can be spread
/// across as many [`tick`](Synthesizer::tick) calls as the caller likes.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    order: Vec<usize>,
    offset: usize,
    position: usize,
    target: usize,
    invert: bool,
    target_vector: Vec<f64>,
    candidates: usize,
    pixels_per_tick: usize,
    status: SynthStatus,
}

impl Synthesizer {
    /// Starts a run: validates the setup, clears the buffer and draws the
    /// starting offset.
    ///
    /// `order` must list every buffer index exactly once; it is normally
    /// [`InfluenceVector::visiting_order`] cached at network load.
    pub fn begin<R: Rng + ?Sized>(
        network: &Network,
        order: Vec<usize>,
        target: usize,
        invert: bool,
        config: &SynthConfig,
        buffer: &mut ImageBuffer,
        rng: &mut R,
    ) -> Result<Synthesizer> {
        config.validate()?;
        if network.input_size() != buffer.len() {
            return Err(SynthError::InputSizeMismatch {
                got: buffer.len(),
                expected: network.input_size(),
            });
        }
        if order.len() != buffer.len() {
            return Err(SynthError::InputSizeMismatch {
                got: order.len(),
                expected: buffer.len(),
            });
        }
        let mut seen = vec![false; order.len()];
        for &pixel in &order {
            if pixel >= seen.len() || seen[pixel] {
                return Err(SynthError::Config(format!(
                    "visiting order must list every pixel once; {pixel} is out of range or repeated"
                )));
            }
            seen[pixel] = true;
        }
        if target >= network.output_size() {
            return Err(SynthError::InvalidTarget { target, classes: network.output_size() });
        }

        buffer.reset();
        let offset = rng.gen_range(0..order.len());
        debug!(
            "synthesis started: target {target}, invert {invert}, offset {offset}, {} candidates",
            config.candidates
        );

        Ok(Synthesizer {
            order,
            offset,
            position: 0,
            target,
            invert,
            target_vector: target_vector(target, network.output_size(), invert),
            candidates: config.candidates,
            pixels_per_tick: config.pixels_per_tick,
            status: SynthStatus::Running,
        })
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn status(&self) -> SynthStatus {
        self.status
    }

    pub fn progress(&self) -> SynthProgress {
        SynthProgress {
            visited: self.position,
            total: self.order.len(),
            finished: self.status == SynthStatus::Finished,
        }
    }

    /// Buffer index the next step will write, if the run is still going.
    pub fn next_pixel(&self) -> Option<usize> {
        if self.status != SynthStatus::Running {
            return None;
        }
        Some(self.order[(self.position + self.offset) % self.order.len()])
    }

    /// Drops the rest of the run. Pixels already finalized stay in the buffer.
    pub fn abort(&mut self) {
        if self.status == SynthStatus::Running {
            info!(
                "synthesis aborted after {}/{} pixels",
                self.position,
                self.order.len()
            );
            self.status = SynthStatus::Aborted;
        }
    }

    /// Finalizes one pixel. Returns `None` once the run is over.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        network: &Network,
        buffer: &mut ImageBuffer,
        rng: &mut R,
    ) -> Result<Option<PixelDecision>> {
        let pixel = match self.next_pixel() {
            Some(pixel) => pixel,
            None => return Ok(None),
        };
        if network.input_size() != buffer.len() {
            return Err(SynthError::InputSizeMismatch {
                got: buffer.len(),
                expected: network.input_size(),
            });
        }
        if network.output_size() != self.target_vector.len() {
            return Err(SynthError::InputSizeMismatch {
                got: network.output_size(),
                expected: self.target_vector.len(),
            });
        }

        let mut candidates = Vec::with_capacity(self.candidates);
        let mut best_value = 0.0;
        let mut best_objective = f64::INFINITY;
        for _ in 0..self.candidates {
            let value: f64 = rng.gen();
            buffer.set(pixel, value);
            let activations = network.forward(buffer.as_slice())?;
            let objective = SseLoss::loss(activations.output(), &self.target_vector);
            if objective < best_objective {
                best_objective = objective;
                best_value = value;
            }
            candidates.push((value, objective));
        }
        buffer.set(pixel, best_value);

        let decision = PixelDecision {
            position: self.position,
            pixel,
            chosen: best_value,
            objective: best_objective,
            candidates,
        };
        trace!(
            "pixel {} ({}/{}) <- {:.4}, objective {:.6}",
            pixel,
            self.position + 1,
            self.order.len(),
            best_value,
            best_objective
        );

        self.position += 1;
        if self.position == self.order.len() {
            self.status = SynthStatus::Finished;
            info!(
                "synthesis finished: target {}, invert {}, final objective {:.6}",
                self.target, self.invert, best_objective
            );
        }
        Ok(Some(decision))
    }

    /// Finalizes up to `pixels_per_tick` pixels.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        network: &Network,
        buffer: &mut ImageBuffer,
        rng: &mut R,
    ) -> Result<SynthProgress> {
        for _ in 0..self.pixels_per_tick {
            if self.step(network, buffer, rng)?.is_none() {
                break;
            }
        }
        Ok(self.progress())
    }

    /// Drives the run to the end regardless of the tick size.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        network: &Network,
        buffer: &mut ImageBuffer,
        rng: &mut R,
    ) -> Result<SynthProgress> {
        while self.step(network, buffer, rng)?.is_some() {}
        Ok(self.progress())
    }
}

/// One complete synthesis run with the default configuration.
pub fn synthesize<R: Rng + ?Sized>(
    network: &Network,
    influence: &InfluenceVector,
    target: usize,
    invert: bool,
    buffer: &mut ImageBuffer,
    rng: &mut R,
) -> Result<SynthProgress> {
    let mut synth = Synthesizer::begin(
        network,
        influence.visiting_order(),
        target,
        invert,
        &SynthConfig::default(),
        buffer,
        rng,
    )?;
    synth.run(network, buffer, rng)
}
