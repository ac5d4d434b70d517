use rand::Rng;

use crate::math::vector;
use crate::train::pso_config::PsoConfig;

/// Half-width of the initial position range when positions are unbounded.
pub const DEFAULT_POSITION_RANGE: f64 = 1.0;

/// One candidate weight vector in the swarm.
#[derive(Debug, Clone)]
pub struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    best_position: Vec<f64>,
    /// `f64::INFINITY` until a finite error has been recorded.
    best_error: f64,
    /// Error of the current position, possibly non-finite.
    error: f64,
    scratch: Vec<f64>,
}

impl Particle {
    pub(crate) fn new<R: Rng + ?Sized>(dimensions: usize, config: &PsoConfig, rng: &mut R) -> Particle {
        let mut position = vec![0.0; dimensions];
        vector::randomise(&mut position, config.max_position.unwrap_or(DEFAULT_POSITION_RANGE), rng);

        let mut velocity = vec![0.0; dimensions];
        match config.max_velocity {
            Some(max) => vector::randomise(&mut velocity, max, rng),
            None => vector::randomise_default(&mut velocity, rng),
        }

        Particle {
            best_position: position.clone(),
            position,
            velocity,
            best_error: f64::INFINITY,
            error: f64::INFINITY,
            scratch: vec![0.0; dimensions],
        }
    }

    /// `v = w*v + c1*r1*(pbest - x) + c2*r2*(gbest - x)`, then clamps.
    ///
    /// Without a global best the particle's own best stands in for it.
    /// Components that overflowed to a non-finite value restart at zero.
    pub(crate) fn update_velocity<R: Rng + ?Sized>(
        &mut self,
        global_best: Option<&[f64]>,
        config: &PsoConfig,
        rng: &mut R,
    ) {
        vector::mul(&mut self.velocity, config.inertia_weight);

        // cognitive term
        vector::copy(&mut self.scratch, &self.best_position);
        vector::sub(&mut self.scratch, &self.position);
        vector::mul_rand(&mut self.scratch, config.c1, rng);
        vector::add(&mut self.velocity, &self.scratch);

        // social term
        let social = global_best.unwrap_or(self.best_position.as_slice());
        vector::copy(&mut self.scratch, social);
        vector::sub(&mut self.scratch, &self.position);
        vector::mul_rand(&mut self.scratch, config.c2, rng);
        vector::add(&mut self.velocity, &self.scratch);

        vector::zero_non_finite(&mut self.velocity);
        if let Some(max) = config.max_velocity {
            vector::clamp_components(&mut self.velocity, max);
        }
    }

    /// `x += v`, then clamps to the position bound.
    pub(crate) fn update_position(&mut self, max_position: Option<f64>) {
        vector::add(&mut self.position, &self.velocity);
        if let Some(max) = max_position {
            vector::clamp_components(&mut self.position, max);
        }
    }

    /// Stores the error of the current position. Returns `true` when it
    /// became the new personal best.
    pub(crate) fn record(&mut self, error: f64) -> bool {
        self.error = error;
        if is_improvement(error, self.best_error) {
            self.best_error = error;
            vector::copy(&mut self.best_position, &self.position);
            true
        } else {
            false
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    pub fn best_error(&self) -> f64 {
        self.best_error
    }

    pub fn error(&self) -> f64 {
        self.error
    }
}

/// Non-finite errors never count as an improvement.
pub(crate) fn is_improvement(candidate: f64, current: f64) -> bool {
    candidate.is_finite() && candidate < current
}
