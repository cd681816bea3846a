use serde::Serialize;

use crate::error::{Result, SynthError};
use crate::network::network::Network;

/// Per-input-pixel sensitivity derived from first-layer weight magnitudes.
///
/// Each entry is the sum of `|w|` over every weight leaving that input unit,
/// divided by the largest such sum, so the strongest pixel scores exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluenceVector {
    values: Vec<f64>,
}

impl InfluenceVector {
    /// All-zero influence, used when a network has no first-layer weight mass.
    pub fn zeros(len: usize) -> InfluenceVector {
        InfluenceVector { values: vec![0.0; len] }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Input indices sorted by influence, strongest first. Equal scores keep
    /// ascending index order.
    pub fn visiting_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[b].total_cmp(&self.values[a]));
        order
    }
}

/// Sums absolute first-layer weights per input unit and normalizes by the max.
///
/// Fails with [`SynthError::DegenerateNetwork`] when every first-layer weight
/// is zero; callers fall back to [`InfluenceVector::zeros`].
pub fn compute_influence(network: &Network) -> Result<InfluenceVector> {
    let first = match network.layers().next() {
        Some(layer) => layer,
        None => return Err(SynthError::MalformedNetwork("network has no layers".into())),
    };

    let mut sums: Vec<f64> = (0..first.size)
        .map(|i| (0..first.output_size).map(|j| first.weight(i, j).abs()).sum())
        .collect();

    let highest = sums.iter().cloned().fold(0.0_f64, f64::max);
    if highest == 0.0 {
        return Err(SynthError::DegenerateNetwork);
    }

    for sum in &mut sums {
        *sum /= highest;
    }
    Ok(InfluenceVector { values: sums })
}

/// Raw weights from every input unit into one first-hidden-layer unit.
pub fn unit_influence(network: &Network, hidden_unit: usize) -> Result<Vec<f64>> {
    let first = match network.layers().next() {
        Some(layer) => layer,
        None => return Err(SynthError::MalformedNetwork("network has no layers".into())),
    };
    if hidden_unit >= first.output_size {
        return Err(SynthError::InvalidTarget {
            target: hidden_unit,
            classes: first.output_size,
        });
    }
    Ok((0..first.size).map(|i| first.weight(i, hidden_unit)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(sizes: Vec<usize>, first: Vec<f64>) -> Network {
        Network::new(sizes, vec![first]).unwrap()
    }

    #[test]
    fn normalizes_so_strongest_input_is_one() {
        // 3 inputs -> 2 hidden; bias row is ignored
        let n = net(vec![3, 2], vec![9.0, 9.0, 1.0, -1.0, 0.5, 0.0, -4.0, 0.0]);
        let inf = compute_influence(&n).unwrap();
        assert_eq!(inf.values(), &[0.5, 0.125, 1.0]);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        let n = net(vec![4, 3], (0..15).map(|x| (x as f64 - 7.0) * 0.3).collect());
        let inf = compute_influence(&n).unwrap();
        let max = inf.values().iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(max, 1.0);
        assert!(inf.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn bias_only_weights_are_degenerate() {
        let n = net(vec![2, 2], vec![3.0, -3.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(compute_influence(&n), Err(SynthError::DegenerateNetwork)));
    }

    #[test]
    fn order_is_descending_and_stable_on_ties() {
        let inf = InfluenceVector { values: vec![0.2, 1.0, 0.2, 0.7, 1.0] };
        assert_eq!(inf.visiting_order(), vec![1, 4, 3, 0, 2]);
    }

    #[test]
    fn zero_influence_orders_by_index() {
        assert_eq!(InfluenceVector::zeros(4).visiting_order(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn unit_influence_reads_one_column() {
        let n = net(vec![2, 2], vec![0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(unit_influence(&n, 1).unwrap(), vec![2.0, 4.0]);
        assert!(matches!(
            unit_influence(&n, 2),
            Err(SynthError::InvalidTarget { target: 2, classes: 2 })
        ));
    }
}
