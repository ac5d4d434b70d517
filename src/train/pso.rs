use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::loss::sse::{check_compatible, sse_unchecked};
use crate::math::vector;
use crate::network::network::Network;
use crate::train::particle::{is_improvement, Particle};
use crate::train::pso_config::PsoConfig;

/// Particle swarm trainer over a network's flat weight vector.
///
/// Every particle's position is a full weight vector for the model
/// network; its fitness is the network's SSE over the dataset. The trainer
/// never stops on its own: call [`PsoTrainer::iterate`] until the returned
/// error is low enough, then [`PsoTrainer::import_best`].
pub struct PsoTrainer<R: Rng = ChaCha8Rng> {
    config: PsoConfig,
    /// Structural template; only cloned, never written.
    model: Network,
    /// Evaluation network for the sequential paths.
    network: Network,
    data: Dataset,
    particles: Vec<Particle>,
    dimensions: usize,
    best_vector: Vec<f64>,
    /// `f64::INFINITY` until some particle produced a finite error.
    best_error: f64,
    iteration: usize,
    pool: Option<rayon::ThreadPool>,
    rng: R,
}

impl<R: Rng> PsoTrainer<R> {
    /// Builds the swarm and evaluates every particle once.
    pub fn new(model: &Network, data: Dataset, config: PsoConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let dimensions = model.weight_count();
        if dimensions == 0 {
            return Err(NetError::InvalidConfig("the model network has no weights".into()));
        }
        check_compatible(model, &data)?;

        let pool = match config.threads {
            0 | 1 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| NetError::InvalidConfig(format!("cannot start {} threads: {}", n, e)))?,
            ),
        };

        let particles = (0..config.population_size)
            .map(|_| Particle::new(dimensions, &config, &mut rng))
            .collect();

        let mut trainer = PsoTrainer {
            model: model.clone(),
            network: model.clone(),
            data,
            particles,
            dimensions,
            best_vector: vec![0.0; dimensions],
            best_error: f64::INFINITY,
            iteration: 0,
            pool,
            rng,
            config,
        };

        let errors = trainer.evaluate_positions();
        for (particle, error) in trainer.particles.iter_mut().zip(errors) {
            particle.record(error);
        }
        trainer.advance_global_best();

        info!(
            population = trainer.config.population_size,
            dimensions,
            records = trainer.data.record_count(),
            best_error = trainer.best_error,
            "particle swarm initialized"
        );
        Ok(trainer)
    }

    /// Runs one generation and returns the global-best error afterwards
    /// (`f64::INFINITY` while no finite error has been seen).
    pub fn iterate(&mut self) -> f64 {
        let non_finite = if self.config.pseudo_asynchronous_update {
            self.iterate_pseudo_asynchronous()
        } else {
            self.iterate_synchronous()
        };
        self.iteration += 1;

        if non_finite > 0 {
            warn!(
                iteration = self.iteration,
                count = non_finite,
                "non-finite fitness excluded from best tracking"
            );
        }
        debug!(iteration = self.iteration, best_error = self.best_error, "pso iteration");
        self.best_error
    }

    /// Every particle steers by the global best as it stood when the
    /// generation began. Moves use the trainer's generator in index order
    /// and fitness is folded in index order, so the thread count does not
    /// change the result.
    fn iterate_synchronous(&mut self) -> usize {
        let global_best = self.best_error.is_finite().then_some(self.best_vector.as_slice());
        for particle in self.particles.iter_mut() {
            particle.update_velocity(global_best, &self.config, &mut self.rng);
            particle.update_position(self.config.max_position);
        }

        let errors = self.evaluate_positions();
        let non_finite = errors.iter().filter(|e| !e.is_finite()).count();
        for (particle, error) in self.particles.iter_mut().zip(errors) {
            particle.record(error);
        }
        self.advance_global_best();
        non_finite
    }

    /// A particle that improves the global best steers every particle
    /// after it in the same generation.
    fn iterate_pseudo_asynchronous(&mut self) -> usize {
        let mut non_finite = 0;
        for particle in self.particles.iter_mut() {
            let global_best = self.best_error.is_finite().then_some(self.best_vector.as_slice());
            particle.update_velocity(global_best, &self.config, &mut self.rng);
            particle.update_position(self.config.max_position);

            let error = fitness(&mut self.network, &self.data, particle.position());
            if !error.is_finite() {
                non_finite += 1;
            }
            if particle.record(error) && is_improvement(particle.best_error(), self.best_error) {
                self.best_error = particle.best_error();
                vector::copy(&mut self.best_vector, particle.best_position());
            }
        }
        non_finite
    }

    /// Fitness of every particle's current position, in particle order.
    fn evaluate_positions(&mut self) -> Vec<f64> {
        let model = &self.model;
        let data = &self.data;
        let particles = &self.particles;
        match (&self.pool, self.config.threads) {
            (Some(pool), _) => pool.install(|| evaluate_parallel(model, data, particles)),
            (None, 1) => particles
                .iter()
                .map(|p| fitness(&mut self.network, data, p.position()))
                .collect(),
            (None, _) => evaluate_parallel(model, data, particles),
        }
    }

    /// Moves the global best to the best personal best if that improves it.
    fn advance_global_best(&mut self) {
        let candidate = self
            .particles
            .iter()
            .filter(|p| p.best_error().is_finite())
            .min_by(|a, b| a.best_error().total_cmp(&b.best_error()));
        if let Some(best) = candidate {
            if is_improvement(best.best_error(), self.best_error) {
                self.best_error = best.best_error();
                vector::copy(&mut self.best_vector, best.best_position());
            }
        }
    }

    /// Copies the global-best weights into `network`. The swarm is left
    /// untouched.
    pub fn import_best(&self, network: &mut Network) -> Result<()> {
        if !self.has_best() {
            return Err(NetError::NoFiniteBest);
        }
        network.import_weights(&self.best_vector)
    }

    /// Global-best error, `f64::INFINITY` while none is known.
    pub fn best_error(&self) -> f64 {
        self.best_error
    }

    /// Whether any particle has produced a finite error.
    pub fn has_best(&self) -> bool {
        self.best_error.is_finite()
    }

    pub fn best_vector(&self) -> &[f64] {
        &self.best_vector
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn config(&self) -> &PsoConfig {
        &self.config
    }

    /// Generations run so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }
}

/// Each rayon job gets its own clone of the model, so no network is
/// shared between threads.
fn evaluate_parallel(model: &Network, data: &Dataset, particles: &[Particle]) -> Vec<f64> {
    particles
        .par_iter()
        .map_init(|| model.clone(), |network, particle| fitness(network, data, particle.position()))
        .collect()
}

fn fitness(network: &mut Network, data: &Dataset, position: &[f64]) -> f64 {
    match network.import_weights(position) {
        Ok(()) => sse_unchecked(network, data),
        // Unreachable for positions built by the trainer; a NaN keeps the
        // particle out of best tracking.
        Err(_) => f64::NAN,
    }
}
