use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Particle swarm hyperparameters.
///
/// # Fields
/// - `population_size`  — particles in the swarm; 20–40 suits most problems
/// - `max_position`     — bound on every position component, `None` for an
///                        unbounded search space
/// - `max_velocity`     — bound on every velocity component, `None` for
///                        unbounded velocities
/// - `c1`               — cognitive rate, pull toward the particle's own best
/// - `c2`               — social rate, pull toward the swarm's best
/// - `inertia_weight`   — share of the previous velocity kept each step
/// - `pseudo_asynchronous_update` — when `true`, a new global best is visible
///                        to the particles processed after it in the same
///                        generation
/// - `threads`          — `0` uses the global rayon pool, `1` evaluates on the
///                        calling thread, `n` builds a pool of `n` workers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoConfig {
    pub population_size: usize,
    pub max_position: Option<f64>,
    pub max_velocity: Option<f64>,
    pub c1: f64,
    pub c2: f64,
    pub inertia_weight: f64,
    pub pseudo_asynchronous_update: bool,
    pub threads: usize,
}

impl Default for PsoConfig {
    fn default() -> Self {
        PsoConfig {
            population_size: 30,
            max_position: None,
            max_velocity: Some(2.0),
            c1: 2.0,
            c2: 2.0,
            inertia_weight: 0.4,
            pseudo_asynchronous_update: false,
            threads: 0,
        }
    }
}

impl PsoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(NetError::InvalidConfig("population_size must be at least 1".into()));
        }
        for (name, value) in [
            ("c1", self.c1),
            ("c2", self.c2),
            ("inertia_weight", self.inertia_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(NetError::InvalidConfig(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        for (name, bound) in [
            ("max_position", self.max_position),
            ("max_velocity", self.max_velocity),
        ] {
            if let Some(value) = bound {
                if !value.is_finite() || value <= 0.0 {
                    return Err(NetError::InvalidConfig(format!(
                        "{} must be finite and > 0, got {}",
                        name, value
                    )));
                }
            }
        }
        Ok(())
    }

    /// Serializes the configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Loads a configuration; missing fields take their default values.
    pub fn load_json(path: &str) -> Result<PsoConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: PsoConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
