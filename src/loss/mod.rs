pub mod sse;

pub use sse::{network_sse, SseLoss};
