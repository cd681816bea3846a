pub mod sse;

pub use sse::{target_vector, SseLoss};
