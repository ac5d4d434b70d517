use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use crate::train::iteration_stats::IterationStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `max_iterations` — generation cap
/// - `target_error`   — stop as soon as the global-best SSE is at or below
///                      this value
/// - `progress_tx`    — optional channel sender; one `IterationStats` is sent
///                      per completed generation.  If the receiver is dropped
///                      the loop terminates early (clean shutdown).
/// - `stop_flag`      — optional atomic flag; when set to `true` from another
///                      thread the loop terminates after the current generation.
pub struct TrainConfig {
    pub max_iterations: usize,
    pub target_error: f64,
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel and no stop flag.
    pub fn new(max_iterations: usize, target_error: f64) -> Self {
        TrainConfig {
            max_iterations,
            target_error,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
