use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use crate::error::NetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    /// Element-wise activation.
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Applies the activation in place over a whole layer segment.
    pub fn apply(&self, values: &mut [f64]) {
        match self {
            // Nothing to do; skip the pass entirely.
            ActivationFunction::Identity => {}
            _ => values.iter_mut().for_each(|v| *v = self.function(*v)),
        }
    }

    /// Name used by the architecture language and by the `Network` dump.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Identity => "LINEAR",
            ActivationFunction::Sigmoid => "SIGMOID",
            ActivationFunction::Tanh => "TANH",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINEAR" | "IDENTITY" => Ok(ActivationFunction::Identity),
            "SIGMOID" => Ok(ActivationFunction::Sigmoid),
            "TANH" => Ok(ActivationFunction::Tanh),
            other => Err(NetError::Architecture(format!(
                "unknown activation function '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_is_centered_at_half() {
        assert_relative_eq!(ActivationFunction::Sigmoid.function(0.0), 0.5);
        assert!(ActivationFunction::Sigmoid.function(40.0) <= 1.0);
        assert!(ActivationFunction::Sigmoid.function(-40.0) >= 0.0);
    }

    #[test]
    fn apply_transforms_every_element() {
        let mut values = vec![-1.0, 0.0, 2.0];
        ActivationFunction::Tanh.apply(&mut values);
        assert_relative_eq!(values[0], (-1.0f64).tanh());
        assert_relative_eq!(values[1], 0.0);
        assert_relative_eq!(values[2], 2.0f64.tanh());

        let mut same = vec![3.5, -7.25];
        ActivationFunction::Identity.apply(&mut same);
        assert_eq!(same, vec![3.5, -7.25]);
    }

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("sigmoid".parse::<ActivationFunction>().unwrap(), ActivationFunction::Sigmoid);
        assert_eq!("TANH".parse::<ActivationFunction>().unwrap(), ActivationFunction::Tanh);
        assert_eq!("Linear".parse::<ActivationFunction>().unwrap(), ActivationFunction::Identity);
        assert!("relu".parse::<ActivationFunction>().is_err());
    }
}
