pub mod csv;
pub mod dataset;
pub mod egb;

pub use dataset::Dataset;
