use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::Rng;
use tracing::info;

use crate::train::iteration_stats::IterationStats;
use crate::train::pso::PsoTrainer;
use crate::train::train_config::TrainConfig;

/// Why `train_loop` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The global-best error reached `target_error`.
    TargetReached,
    /// `max_iterations` generations ran.
    IterationLimit,
    /// The stop flag was raised or the progress receiver went away.
    Interrupted,
}

/// Outcome of a `train_loop` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainSummary {
    pub iterations: usize,
    pub best_error: f64,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Iterates `trainer` until the global-best error is at or below
/// `config.target_error` or `config.max_iterations` generations have run.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// A trainer whose initial swarm already meets the target runs zero
/// generations.
pub fn train_loop<R: Rng>(trainer: &mut PsoTrainer<R>, config: &TrainConfig) -> TrainSummary {
    let run_start = Instant::now();
    let mut iterations = 0;
    let mut stop_reason = StopReason::IterationLimit;

    if trainer.best_error() <= config.target_error {
        stop_reason = StopReason::TargetReached;
    } else {
        for iteration in 1..=config.max_iterations {
            if stop_requested(config) {
                stop_reason = StopReason::Interrupted;
                break;
            }

            let t_start = Instant::now();
            let best_error = trainer.iterate();
            iterations = iteration;

            let stats = IterationStats {
                iteration,
                max_iterations: config.max_iterations,
                best_error,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };

            if let Some(ref tx) = config.progress_tx {
                // If the receiver has been dropped, stop training.
                if tx.send(stats).is_err() {
                    stop_reason = StopReason::Interrupted;
                    break;
                }
            }

            if best_error <= config.target_error {
                stop_reason = StopReason::TargetReached;
                break;
            }
        }
    }

    let summary = TrainSummary {
        iterations,
        best_error: trainer.best_error(),
        stop_reason,
        elapsed_ms: run_start.elapsed().as_millis() as u64,
    };
    info!(
        iterations = summary.iterations,
        best_error = summary.best_error,
        reason = ?summary.stop_reason,
        "training finished"
    );
    summary
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::activation::ActivationFunction::*;
    use crate::data::dataset::Dataset;
    use crate::network::spec::NetworkSpec;
    use crate::train::pso_config::PsoConfig;

    fn xor_trainer(seed: u64) -> PsoTrainer {
        let data = Dataset::from_text_rows(2, 1, &["0,0,0", "1,0,1", "0,1,1", "1,1,0"]).unwrap();
        let mut spec = NetworkSpec::new();
        spec.add_layer(2, Identity, true)
            .add_layer(2, Sigmoid, true)
            .add_layer(1, Sigmoid, false);
        let net = spec.finalize().unwrap();
        PsoTrainer::new(&net, data, PsoConfig::default(), ChaCha8Rng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn stops_at_the_iteration_cap() {
        let mut trainer = xor_trainer(1);
        let summary = train_loop(&mut trainer, &TrainConfig::new(7, 0.0));
        assert_eq!(summary.iterations, 7);
        assert_eq!(summary.stop_reason, StopReason::IterationLimit);
        assert_eq!(trainer.iteration(), 7);
    }

    #[test]
    fn stops_at_the_target_error() {
        let mut trainer = xor_trainer(2);
        // Anything at or below the initial best is reached immediately.
        let target = trainer.best_error() * 2.0;
        let summary = train_loop(&mut trainer, &TrainConfig::new(100, target));
        assert_eq!(summary.stop_reason, StopReason::TargetReached);
        assert_eq!(summary.iterations, 0);
    }

    #[test]
    fn reports_every_generation_on_the_channel() {
        let mut trainer = xor_trainer(3);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(5, 0.0);
        config.progress_tx = Some(tx);
        train_loop(&mut trainer, &config);
        drop(config);

        let stats: Vec<IterationStats> = rx.iter().collect();
        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].iteration, 1);
        assert!(stats.windows(2).all(|w| w[1].best_error <= w[0].best_error));
    }

    #[test]
    fn stop_flag_interrupts_before_the_first_generation() {
        let mut trainer = xor_trainer(4);
        let mut config = TrainConfig::new(50, 0.0);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));
        let summary = train_loop(&mut trainer, &config);
        assert_eq!(summary.stop_reason, StopReason::Interrupted);
        assert_eq!(summary.iterations, 0);
    }
}
