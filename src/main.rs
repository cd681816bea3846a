/// ferrite-synth
///
/// Loads a pretrained digit classifier from CSV, classifies a canvas, and
/// hill-climbs a blank canvas toward (or away from) a chosen digit.
///
/// Run with:
///   cargo run --release -- --network numbers.csv synthesize --digit 3
///   cargo run --release -- --network numbers.csv --dataset mnist_test.csv --random-sample classify
///
/// Results are printed to stdout as JSON. Set RUST_LOG=info (or debug) for
/// progress messages.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueHint};
use log::info;
use rand::{rngs::StdRng, RngCore, SeedableRng};
use serde::Serialize;

use ferrite_synth::{
    load_network_csv, unit_influence, Dataset, ImageBuffer, Prediction, Session, SynthConfig, Tick,
};

#[derive(Parser)]
#[command(author, version, about = "Classify and synthesize 28x28 digits with a pretrained network")]
struct Cli {
    /// Network CSV: layer sizes on the first row, one weight table per row after it
    #[arg(long, value_hint = ValueHint::FilePath)]
    network: PathBuf,

    /// MNIST-style dataset CSV (header row, then label + 784 pixels per row)
    #[arg(long, value_hint = ValueHint::FilePath)]
    dataset: Option<PathBuf>,

    /// Start from an image file (PNG/JPEG/BMP/GIF) instead of a blank canvas
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with_all = ["sample", "random_sample"])]
    image: Option<PathBuf>,

    /// Start from dataset sample N
    #[arg(long, requires = "dataset", conflicts_with = "random_sample")]
    sample: Option<usize>,

    /// Start from a random dataset sample
    #[arg(long, requires = "dataset")]
    random_sample: bool,

    /// Synthesis config JSON (candidates, pixels_per_tick, seed)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// RNG seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the network's prediction for the canvas
    Classify,

    /// Generate an image of a digit, starting from a blank canvas
    Synthesize {
        /// Target class
        #[arg(long)]
        digit: usize,

        /// Push the image away from the digit instead of toward it
        #[arg(long)]
        invert: bool,

        /// Candidate values tried per pixel; overrides the config file
        #[arg(long)]
        candidates: Option<usize>,
    },

    /// Print per-pixel influence, or one hidden unit's incoming weights
    Influence {
        #[arg(long)]
        unit: Option<usize>,
    },
}

#[derive(Serialize)]
struct SynthReport<'a> {
    target: usize,
    invert: bool,
    seed: u64,
    candidates: usize,
    prediction: Option<Prediction>,
    pixels: &'a [f64],
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let path = path.to_string_lossy();
            SynthConfig::load_json(&path).with_context(|| format!("loading config {path}"))?
        }
        None => SynthConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    let mut rng = StdRng::seed_from_u64(seed);

    let mut session = Session::new();
    let network = load_network_csv(&cli.network)
        .with_context(|| format!("loading network {}", cli.network.display()))?;
    session.load_network(network);

    if let Some(path) = &cli.dataset {
        let dataset =
            Dataset::load_csv(path).with_context(|| format!("loading dataset {}", path.display()))?;
        session.load_dataset(dataset);
    }

    if let Some(path) = &cli.image {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let image = ImageBuffer::from_image_bytes(&bytes)?;
        session.buffer_mut().load_pixels(image.as_slice())?;
    } else if let Some(index) = cli.sample {
        if !session.load_sample(index)? {
            bail!("dataset has no sample {index}");
        }
    } else if cli.random_sample {
        match session.load_random_sample(&mut rng)? {
            Some(index) => info!("loaded random sample {index}"),
            None => bail!("dataset is empty"),
        }
    }

    match cli.command {
        Command::Classify => {
            let prediction = session.classify()?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Command::Synthesize { digit, invert, candidates } => {
            if let Some(candidates) = candidates {
                config.candidates = candidates;
            }
            match session.synthesize(digit, invert, &config, &mut rng)? {
                Tick::Progress(progress) => info!(
                    "synthesized {}/{} pixels toward {}{}",
                    progress.visited,
                    progress.total,
                    if invert { "not " } else { "" },
                    digit
                ),
                Tick::NotReady => bail!("no network loaded"),
            }
            let report = SynthReport {
                target: digit,
                invert,
                seed,
                candidates: config.candidates,
                prediction: session.classify()?,
                pixels: session.buffer().as_slice(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Influence { unit } => {
            let network = match session.network() {
                Some(network) => network,
                None => bail!("no network loaded"),
            };
            match unit {
                Some(unit) => {
                    let weights = unit_influence(network, unit)?;
                    println!("{}", serde_json::to_string_pretty(&weights)?);
                }
                None => {
                    println!("{}", serde_json::to_string_pretty(&session.influence())?);
                }
            }
        }
    }

    Ok(())
}
