pub mod loader;
pub mod network;

pub use loader::{load_network_csv, read_network};
pub use network::{propagate, Activations, Network};
