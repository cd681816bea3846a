use crate::activation::sigmoid;

/// A borrowed view of one fully-connected layer transition.
///
/// The weight table is flat: the first `output_size` entries are the bias
/// weights, followed by one row of `output_size` weights per input unit, so
/// the weight from input `i` to output `o` lives at `(i + 1) * output_size + o`.
#[derive(Debug, Clone, Copy)]
pub struct DenseLayer<'a> {
    pub size: usize,
    pub output_size: usize,
    pub weights: &'a [f64],
}

impl<'a> DenseLayer<'a> {
    pub fn new(size: usize, output_size: usize, weights: &'a [f64]) -> DenseLayer<'a> {
        DenseLayer { size, output_size, weights }
    }

    /// Number of entries a table for this transition must have.
    pub fn table_len(size: usize, output_size: usize) -> usize {
        (size + 1) * output_size
    }

    pub fn bias(&self, output: usize) -> f64 {
        self.weights[output]
    }

    pub fn weight(&self, input: usize, output: usize) -> f64 {
        self.weights[(input + 1) * self.output_size + output]
    }

    /// Weighted sum plus bias for every output unit, passed through the sigmoid.
    /// `input.len()` must equal `self.size`; the caller checks it.
    pub fn feed_from(&self, input: &[f64]) -> Vec<f64> {
        (0..self.output_size)
            .map(|o| {
                let z = input
                    .iter()
                    .enumerate()
                    .fold(self.bias(o), |acc, (i, &x)| acc + x * self.weight(i, o));
                sigmoid(z)
            })
            .collect()
    }
}
