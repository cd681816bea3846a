pub mod influence;

pub use influence::{compute_influence, unit_influence, InfluenceVector};
