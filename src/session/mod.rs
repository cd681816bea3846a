pub mod session;

pub use session::{Prediction, Session, Tick};
