//! Error type shared by every fallible operation in the crate.

/// Result type alias using `NetError`.
pub type Result<T> = std::result::Result<T, NetError>;

/// Failures reported by network construction, inference, data handling
/// and training.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// A network needs at least an input and an output layer.
    #[error("a network needs at least 2 layers, got {0}")]
    TooFewLayers(usize),

    /// A layer was declared with zero neurons.
    #[error("layer {index} has no neurons")]
    EmptyLayer { index: usize },

    /// A weight vector does not match the network's weight count.
    #[error("expected {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    /// The input buffer handed to `compute` has the wrong length.
    #[error("expected {expected} input values, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },

    /// The output buffer handed to `compute` has the wrong length.
    #[error("expected an output buffer of {expected} values, got {actual}")]
    OutputSizeMismatch { expected: usize, actual: usize },

    /// The network and the dataset disagree on the number of inputs.
    #[error("the network has {network} inputs but the dataset has {dataset}")]
    InputCountMismatch { network: usize, dataset: usize },

    /// The network's outputs and the dataset's ideals disagree.
    #[error("the network has {network} outputs but the dataset has {dataset} ideals")]
    IdealCountMismatch { network: usize, dataset: usize },

    /// A randomization range is empty or not finite.
    #[error("invalid range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    /// Malformed dataset content or shape.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Malformed architecture text.
    #[error("architecture error: {0}")]
    Architecture(String),

    /// Trainer parameters outside their valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// `import_best` was called before any particle produced a finite error.
    #[error("no particle has produced a finite error yet")]
    NoFiniteBest,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
