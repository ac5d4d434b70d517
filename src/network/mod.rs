pub mod architecture;
pub mod network;
pub mod spec;

pub use architecture::{parse_architecture, parse_spec};
pub use network::Network;
pub use spec::{LayerSpec, NetworkSpec, SavedNetwork};
