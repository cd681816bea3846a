//! MNIST-style dataset decoding.
//!
//! Expected CSV layout:
//! - one header row, discarded
//! - one image per row: the class label 0-9, then 28×28 pixel values
//! - pixel values are integers 0-255 and are divided by 256, landing in [0, 1)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use rand::Rng;
use serde::Serialize;

use crate::canvas::image_buffer::PIXELS;
use crate::error::{Result, SynthError};

/// One labeled image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub label: u8,
    pub image: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn new(samples: Vec<Sample>) -> Dataset {
        Dataset { samples }
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut samples = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            // Header is row 1.
            let row = idx + 2;
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            if record.len() != PIXELS + 1 {
                return Err(SynthError::Parse {
                    row,
                    message: format!(
                        "expected a label and {PIXELS} pixels, got {} cells",
                        record.len()
                    ),
                });
            }

            let label = parse_label(&record[0], row)?;
            let image = record
                .iter()
                .skip(1)
                .map(|cell| parse_pixel(cell, row))
                .collect::<Result<Vec<f64>>>()?;
            samples.push(Sample { label, image });
        }

        Ok(Dataset { samples })
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        let file = File::open(path.as_ref())?;
        let dataset = Dataset::read_csv(file)?;
        info!("loaded {} samples from {}", dataset.len(), path.as_ref().display());
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Uniformly random sample index, `None` for an empty dataset.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.samples.is_empty() {
            None
        } else {
            Some(rng.gen_range(0..self.samples.len()))
        }
    }
}

fn parse_label(cell: &str, row: usize) -> Result<u8> {
    match cell.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && (0.0..=9.0).contains(&v) => Ok(v as u8),
        _ => Err(SynthError::Parse {
            row,
            message: format!("label '{cell}' is not a digit 0-9"),
        }),
    }
}

fn parse_pixel(cell: &str, row: usize) -> Result<f64> {
    match cell.parse::<f64>() {
        Ok(v) if (0.0..=255.0).contains(&v) => Ok(v / 256.0),
        _ => Err(SynthError::Parse {
            row,
            message: format!("pixel '{cell}' is not a value in 0-255"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Cursor;

    fn row(label: &str, fill: &str) -> String {
        let mut cells = vec![label.to_string()];
        cells.extend(std::iter::repeat(fill.to_string()).take(PIXELS));
        cells.join(",")
    }

    #[test]
    fn skips_header_and_scales_pixels() {
        let csv = format!("label,pixels\n{}\n{}\n", row("3", "128"), row("7", "0"));
        let ds = Dataset::read_csv(Cursor::new(csv)).unwrap();
        assert_eq!(ds.len(), 2);
        let first = ds.sample(0).unwrap();
        assert_eq!(first.label, 3);
        assert_eq!(first.image.len(), PIXELS);
        assert_eq!(first.image[0], 0.5);
        assert_eq!(ds.sample(1).unwrap().image[10], 0.0);
    }

    #[test]
    fn max_pixel_stays_below_one() {
        let csv = format!("h\n{}\n", row("1", "255"));
        let ds = Dataset::read_csv(Cursor::new(csv)).unwrap();
        assert!(ds.sample(0).unwrap().image.iter().all(|&p| p < 1.0));
    }

    #[test]
    fn short_row_is_reported() {
        let csv = "h\n4,1,2,3\n";
        match Dataset::read_csv(Cursor::new(csv)) {
            Err(SynthError::Parse { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn label_out_of_range_is_rejected() {
        let csv = format!("h\n{}\n", row("12", "0"));
        assert!(matches!(
            Dataset::read_csv(Cursor::new(csv)),
            Err(SynthError::Parse { .. })
        ));
    }

    #[test]
    fn random_index_on_empty_dataset_is_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Dataset::default().random_index(&mut rng), None);
    }
}
