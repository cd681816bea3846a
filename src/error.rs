use std::fmt;

/// Errors produced while loading networks and datasets or running them.
#[derive(Debug)]
pub enum SynthError {
    /// Layer sizes or weight tables do not describe a usable network.
    MalformedNetwork(String),

    /// An input vector does not match the width it is fed into.
    InputSizeMismatch {
        /// Observed length.
        got: usize,
        /// Expected length.
        expected: usize,
    },

    /// Every first-layer weight is zero, so influence cannot be normalized.
    DegenerateNetwork,

    /// A class (or hidden unit) index outside the layer it refers to.
    InvalidTarget { target: usize, classes: usize },

    /// A CSV cell or row could not be decoded. `row` is 1-based.
    Parse { row: usize, message: String },

    /// Image bytes could not be decoded.
    Image(String),

    /// A configuration value is out of range or the file is unreadable.
    Config(String),

    Io(std::io::Error),
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::MalformedNetwork(msg) => write!(f, "malformed network: {msg}"),
            SynthError::InputSizeMismatch { got, expected } => {
                write!(f, "input size mismatch: got {got}, expected {expected}")
            }
            SynthError::DegenerateNetwork => {
                write!(f, "degenerate network: all first-layer weights are zero")
            }
            SynthError::InvalidTarget { target, classes } => {
                write!(f, "target {target} is out of range for {classes} units")
            }
            SynthError::Parse { row, message } => write!(f, "row {row}: {message}"),
            SynthError::Image(msg) => write!(f, "image decode failed: {msg}"),
            SynthError::Config(msg) => write!(f, "invalid config: {msg}"),
            SynthError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SynthError {
    fn from(e: std::io::Error) -> Self {
        SynthError::Io(e)
    }
}

impl From<csv::Error> for SynthError {
    fn from(e: csv::Error) -> Self {
        let row = e
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(0);
        match e.into_kind() {
            csv::ErrorKind::Io(io) => SynthError::Io(io),
            kind => SynthError::Parse { row, message: format!("{kind:?}") },
        }
    }
}

impl From<serde_json::Error> for SynthError {
    fn from(e: serde_json::Error) -> Self {
        SynthError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SynthError>;
