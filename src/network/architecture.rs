//! Parser for the compact architecture language.
//!
//! ```text
//! 2:B->SIGMOID->2:B->SIGMOID->1
//! ?:B->TANH->50:B->TANH->?
//! ```
//!
//! Segments are separated by `->`. A layer segment is a neuron count (or
//! `?`, filled from the caller's input/ideal count) optionally followed by
//! `:B` for a bias neuron. An activation segment names the activation of
//! the layer that follows it; layers without one are linear.

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::network::network::Network;
use crate::network::spec::NetworkSpec;

/// Parses `text` into an unfinalized spec.
///
/// `input_count` / `ideal_count` replace a `?` in the first / last layer.
pub fn parse_spec(text: &str, input_count: Option<usize>, ideal_count: Option<usize>) -> Result<NetworkSpec> {
    let segments: Vec<&str> = text.split("->").map(str::trim).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(NetError::Architecture(format!("empty segment in '{}'", text)));
    }

    let layer_positions: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, s)| is_layer_segment(s))
        .map(|(i, _)| i)
        .collect();
    let (first, last) = match (layer_positions.first(), layer_positions.last()) {
        (Some(&f), Some(&l)) if f != l => (f, l),
        _ => {
            return Err(NetError::Architecture(format!(
                "'{}' must describe at least an input and an output layer",
                text
            )))
        }
    };

    let mut spec = NetworkSpec::new();
    let mut pending: Option<ActivationFunction> = None;

    for (i, segment) in segments.iter().enumerate() {
        if !is_layer_segment(segment) {
            if pending.is_some() {
                return Err(NetError::Architecture(format!(
                    "two activations in a row near '{}'",
                    segment
                )));
            }
            pending = Some(segment.parse()?);
            continue;
        }

        let (count_text, bias) = split_bias(segment)?;
        let count = if count_text == "?" {
            let filled = if i == first {
                input_count
            } else if i == last {
                ideal_count
            } else {
                return Err(NetError::Architecture(
                    "'?' is only allowed in the input or output layer".into(),
                ));
            };
            filled.ok_or_else(|| {
                NetError::Architecture(format!("no count available to fill '?' in '{}'", segment))
            })?
        } else {
            count_text.parse::<usize>().map_err(|_| {
                NetError::Architecture(format!("'{}' is not a neuron count", count_text))
            })?
        };

        // The input layer never transforms its values.
        let activation = if i == first {
            if pending.is_some() {
                return Err(NetError::Architecture(
                    "the input layer cannot have an activation".into(),
                ));
            }
            ActivationFunction::Identity
        } else {
            pending.take().unwrap_or(ActivationFunction::Identity)
        };
        spec.add_layer(count, activation, bias);
    }

    if pending.is_some() {
        return Err(NetError::Architecture(format!(
            "'{}' ends with an activation instead of a layer",
            text
        )));
    }
    Ok(spec)
}

/// Parses and finalizes in one step.
pub fn parse_architecture(text: &str, input_count: Option<usize>, ideal_count: Option<usize>) -> Result<Network> {
    parse_spec(text, input_count, ideal_count)?.finalize()
}

fn is_layer_segment(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .map(|c| c.is_ascii_digit() || c == '?')
        .unwrap_or(false)
}

fn split_bias(segment: &str) -> Result<(&str, bool)> {
    match segment.split_once(':') {
        None => Ok((segment, false)),
        Some((count, flag)) if flag.trim().eq_ignore_ascii_case("b") => Ok((count.trim(), true)),
        Some((_, flag)) => Err(NetError::Architecture(format!(
            "unknown layer flag '{}'",
            flag
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::spec::LayerSpec;
    use ActivationFunction::*;

    #[test]
    fn parses_the_xor_architecture() {
        let spec = parse_spec("2:B->SIGMOID->2:B->SIGMOID->1", None, None).unwrap();
        assert_eq!(
            spec.layers,
            vec![
                LayerSpec::new(2, Identity, true),
                LayerSpec::new(2, Sigmoid, true),
                LayerSpec::new(1, Sigmoid, false),
            ]
        );
        let net = spec.finalize().unwrap();
        assert_eq!(net.weight_count(), 9);
    }

    #[test]
    fn question_marks_take_input_and_ideal_counts() {
        let net = parse_architecture("?:B -> tanh -> 50:B -> tanh -> ?", Some(10), Some(3)).unwrap();
        assert_eq!(net.input_count(), 10);
        assert_eq!(net.output_count(), 3);
        assert!(parse_architecture("?->SIGMOID->?", None, Some(1)).is_err());
    }

    #[test]
    fn layers_without_activation_are_linear() {
        let spec = parse_spec("3->4:B->2", None, None).unwrap();
        assert!(spec.layers.iter().all(|l| l.activation == Identity));
        assert!(spec.layers[1].bias);
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in [
            "",
            "2",
            "2->SIGMOID",
            "SIGMOID->2->1",
            "2->SIGMOID->SIGMOID->1",
            "2->RELU->1",
            "2:X->1",
            "2->->1",
            "2->?->1",
            "two->1",
        ] {
            assert!(
                matches!(parse_spec(bad, Some(2), Some(1)), Err(NetError::Architecture(_))),
                "accepted '{}'",
                bad
            );
        }
    }
}
