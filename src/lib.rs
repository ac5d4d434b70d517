pub mod activation;
pub mod data;
pub mod error;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::activation::ActivationFunction;
pub use data::dataset::Dataset;
pub use error::{NetError, Result};
pub use loss::sse::{network_sse, SseLoss};
pub use network::architecture::parse_architecture;
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use train::pso::PsoTrainer;
pub use train::pso_config::PsoConfig;
pub use train::loop_fn::train_loop;
