pub mod iteration_stats;
pub mod loop_fn;
pub mod particle;
pub mod pso;
pub mod pso_config;
pub mod train_config;

pub use iteration_stats::IterationStats;
pub use loop_fn::{train_loop, StopReason, TrainSummary};
pub use particle::Particle;
pub use pso::PsoTrainer;
pub use pso_config::PsoConfig;
pub use train_config::TrainConfig;
