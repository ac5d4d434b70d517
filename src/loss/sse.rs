use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::network::network::Network;

pub struct SseLoss;

impl SseLoss {
    /// Scalar SSE for one record: sum((predicted - ideal)²)
    pub fn loss(predicted: &[f64], ideal: &[f64]) -> f64 {
        predicted.iter().zip(ideal.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    }
}

/// Checks that `network` can be evaluated against `data`.
pub fn check_compatible(network: &Network, data: &Dataset) -> Result<()> {
    if network.input_count() != data.input_count() {
        return Err(NetError::InputCountMismatch {
            network: network.input_count(),
            dataset: data.input_count(),
        });
    }
    if network.output_count() != data.ideal_count() {
        return Err(NetError::IdealCountMismatch {
            network: network.output_count(),
            dataset: data.ideal_count(),
        });
    }
    Ok(())
}

/// Total (not averaged) squared error of `network` over every record.
pub fn network_sse(network: &mut Network, data: &Dataset) -> Result<f64> {
    check_compatible(network, data)?;
    Ok(sse_unchecked(network, data))
}

/// `network_sse` for a pair already known to be compatible.
pub(crate) fn sse_unchecked(network: &mut Network, data: &Dataset) -> f64 {
    let mut output = vec![0.0; network.output_count()];
    let mut total = 0.0;
    for (input, ideal) in data.iter() {
        network.compute_unchecked(input, &mut output);
        total += SseLoss::loss(&output, ideal);
    }
    total
}
