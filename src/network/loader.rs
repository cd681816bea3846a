//! Network CSV decoding.
//!
//! Format:
//! - row 1: layer sizes, input layer first (e.g. `784,200,10`)
//! - row 2..: one flattened weight table per layer transition, bias row
//!   first, `(layer_sizes[l] + 1) * layer_sizes[l + 1]` cells each
//!
//! Rows have different lengths, so the reader runs in flexible mode.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use crate::error::{Result, SynthError};
use crate::network::network::Network;

/// Reads and validates a network from any CSV source.
pub fn read_network<R: Read>(reader: R) -> Result<Network> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = reader.records();

    let header = match rows.next() {
        Some(record) => record?,
        None => return Err(SynthError::MalformedNetwork("network file is empty".into())),
    };
    let layer_sizes = cells(&header)
        .into_iter()
        .map(parse_layer_size)
        .collect::<Result<Vec<usize>>>()?;

    let mut weights: Vec<Vec<f64>> = Vec::with_capacity(layer_sizes.len().saturating_sub(1));
    for (idx, record) in rows.enumerate() {
        let record = record?;
        let row = idx + 2;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let table = cells(&record)
            .into_iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| SynthError::Parse {
                    row,
                    message: format!("'{cell}' is not a valid weight"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        weights.push(table);
    }

    Network::new(layer_sizes, weights)
}

/// Opens `path` and decodes it with [`read_network`].
pub fn load_network_csv<P: AsRef<Path>>(path: P) -> Result<Network> {
    let file = File::open(path.as_ref())?;
    let network = read_network(file)?;
    info!(
        "loaded network {} with layer sizes {:?}",
        path.as_ref().display(),
        network.layer_sizes()
    );
    Ok(network)
}

/// Cells of a row with trailing empty cells dropped. Empty cells before the
/// last non-empty one are kept so they fail to parse.
fn cells(record: &csv::StringRecord) -> Vec<&str> {
    let mut cells: Vec<&str> = record.iter().collect();
    while cells.last().map_or(false, |cell| cell.is_empty()) {
        cells.pop();
    }
    cells
}

/// Layer sizes may be written as `784` or `784.0`; anything else is rejected.
fn parse_layer_size(cell: &str) -> Result<usize> {
    let value = cell.parse::<f64>().map_err(|_| SynthError::Parse {
        row: 1,
        message: format!("'{cell}' is not a valid layer size"),
    })?;
    if !value.is_finite() || value < 1.0 || value.fract() != 0.0 {
        return Err(SynthError::MalformedNetwork(format!(
            "layer size '{cell}' must be a positive integer"
        )));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_sizes_and_tables() {
        let csv = "2,1\n0.5,1.0,-1.0\n";
        let net = read_network(Cursor::new(csv)).unwrap();
        assert_eq!(net.layer_sizes(), &[2, 1]);
        assert_eq!(net.weights()[0], vec![0.5, 1.0, -1.0]);
    }

    #[test]
    fn accepts_float_formatted_sizes() {
        let csv = "1.0,1\n0,0\n";
        let net = read_network(Cursor::new(csv)).unwrap();
        assert_eq!(net.layer_sizes(), &[1, 1]);
    }

    #[test]
    fn table_length_mismatch_is_malformed() {
        let csv = "2,1\n0.5,1.0\n";
        let err = read_network(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, SynthError::MalformedNetwork(_)));
    }

    #[test]
    fn bad_weight_reports_row() {
        let csv = "1,1\n0.5,abc\n";
        match read_network(Cursor::new(csv)) {
            Err(SynthError::Parse { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn trailing_empty_cells_are_ignored() {
        let csv = "1,1,\n0.5,1.0,,\n";
        let net = read_network(Cursor::new(csv)).unwrap();
        assert_eq!(net.layer_sizes(), &[1, 1]);
        assert_eq!(net.weights()[0], vec![0.5, 1.0]);
    }

    #[test]
    fn interior_empty_weight_is_a_parse_error() {
        match read_network(Cursor::new("1,1\n0.5,,1.0\n")) {
            Err(SynthError::Parse { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn interior_empty_layer_size_is_a_parse_error() {
        match read_network(Cursor::new("2,,1\n0,0,0\n")) {
            Err(SynthError::Parse { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn negative_layer_size_is_malformed() {
        let err = read_network(Cursor::new("-3,1\n")).unwrap_err();
        assert!(matches!(err, SynthError::MalformedNetwork(_)));
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = read_network(Cursor::new("")).unwrap_err();
        assert!(matches!(err, SynthError::MalformedNetwork(_)));
    }
}
