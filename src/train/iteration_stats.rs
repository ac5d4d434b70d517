use serde::{Serialize, Deserialize};

/// Per-generation statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `IterationStats` value after every completed generation.
/// Receivers (e.g. the CLI progress reporter) use this to log convergence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based generation number.
    pub iteration: usize,
    /// Generation cap for this run.
    pub max_iterations: usize,
    /// Global-best SSE after this generation (`f64::INFINITY` if none yet).
    pub best_error: f64,
    /// Wall-clock duration of this single generation in milliseconds.
    pub elapsed_ms: u64,
}
