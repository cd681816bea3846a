#![allow(dead_code)]

use ferrite_synth::canvas::PIXELS;
use ferrite_synth::{Dataset, Network, Sample};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// 784 -> 10 with no hidden layer: pixel i only feeds class i % 10.
pub fn striped_network() -> Network {
    let outputs = 10;
    let mut table = vec![0.0; (PIXELS + 1) * outputs];
    for i in 0..PIXELS {
        table[(i + 1) * outputs + i % outputs] = 0.05;
    }
    Network::new(vec![PIXELS, outputs], vec![table]).unwrap()
}

/// 784 -> 4 -> 10 with seeded uniform weights in [-0.5, 0.5).
pub fn random_network(seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    let sizes = vec![PIXELS, 4, 10];
    let weights = sizes
        .windows(2)
        .map(|w| (0..(w[0] + 1) * w[1]).map(|_| rng.gen::<f64>() - 0.5).collect::<Vec<f64>>())
        .collect();
    Network::new(sizes, weights).unwrap()
}

/// 784 -> 2 with bias weights only.
pub fn bias_only_network() -> Network {
    let mut table = vec![0.0; (PIXELS + 1) * 2];
    table[0] = 1.0;
    table[1] = -1.0;
    Network::new(vec![PIXELS, 2], vec![table]).unwrap()
}

/// The 4 -> 3 -> 2 golden network.
pub fn golden_network() -> Network {
    let first = vec![
        0.1, -0.2, 0.3, // bias
        0.5, -0.5, 1.0, // input 0
        0.2, 0.2, 0.2, // input 1
        -0.3, 0.1, 0.0, // input 2
        0.9, -0.9, 0.4, // input 3
    ];
    let second = vec![
        0.0, 0.5, // bias
        1.0, -1.0, // hidden 0
        2.0, 0.0, // hidden 1
        -1.0, 1.0, // hidden 2
    ];
    Network::new(vec![4, 3, 2], vec![first, second]).unwrap()
}

pub fn dataset_with_labels(labels: &[u8]) -> Dataset {
    let samples = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| Sample {
            label,
            image: vec![(i as f64 + 1.0) / 16.0; PIXELS],
        })
        .collect();
    Dataset::new(samples)
}

pub fn golden_network_csv() -> String {
    "4,3,2\n\
     0.1,-0.2,0.3,0.5,-0.5,1.0,0.2,0.2,0.2,-0.3,0.1,0.0,0.9,-0.9,0.4\n\
     0.0,0.5,1.0,-1.0,2.0,0.0,-1.0,1.0\n"
        .to_string()
}
