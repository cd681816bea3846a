/// Sum of squared error; the synthesis objective.
pub struct SseLoss;

impl SseLoss {
    /// Scalar SSE: sum((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }
}

/// Builds the output the synthesizer steers toward.
///
/// Normal mode is one-hot on `target`; invert mode is the complement, 0 at
/// `target` and 1 everywhere else.
pub fn target_vector(target: usize, classes: usize, invert: bool) -> Vec<f64> {
    let (hit, miss) = if invert { (0.0, 1.0) } else { (1.0, 0.0) };
    (0..classes)
        .map(|k| if k == target { hit } else { miss })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_is_not_averaged() {
        assert_eq!(SseLoss::loss(&[1.0, 0.5, 0.0], &[0.0, 0.5, 1.0]), 2.0);
    }

    #[test]
    fn perfect_prediction_has_zero_loss() {
        assert_eq!(SseLoss::loss(&[0.2, 0.8], &[0.2, 0.8]), 0.0);
    }

    #[test]
    fn one_hot_target() {
        assert_eq!(target_vector(2, 4, false), vec![0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn inverted_target() {
        assert_eq!(target_vector(0, 3, true), vec![0.0, 1.0, 1.0]);
    }
}
