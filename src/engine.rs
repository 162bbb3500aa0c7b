//! The generational loop: rank, report, terminate or reproduce.

use crate::{ConfigError, GenerationReport, Genotype, SearchConfig};
use log::{debug, info};
use rand::prelude::SeedableRng;
use rand::Rng;
use rand_pcg::Pcg64; // Specific, serializable generator
use serde::{Deserialize, Serialize};

/// A progress report is emitted every this many generations, plus
/// unconditionally on the terminating generation.
pub const REPORT_INTERVAL: u64 = 10;

/// A genotype paired with its score against the run's target. The score is
/// fixed at construction; genotypes are immutable once in the population.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Individual {
    pub genotype: Genotype,
    pub score: f32,
}

impl Individual {
    fn new(genotype: Genotype, target: &[u8]) -> Self {
        let score = genotype.score(target);
        Self { genotype, score }
    }
}

/// Outcome of a single [`Engine::step`].
#[derive(Debug)]
pub enum Step {
    /// No exact match yet; the population has been replaced and the
    /// generation counter advanced. Carries a report when one was due.
    Continue(Option<GenerationReport>),
    /// The best genotype equals the target. The final population and
    /// generation counter are retained unchanged.
    Converged(GenerationReport),
}

/// Outcome of [`Engine::run`].
#[derive(Debug)]
pub enum RunOutcome {
    Converged { generation: u64, best: Genotype },
    GenerationCapReached { generation: u64, best: Genotype },
}

/// Drives the search: owns the generation counter, the current population
/// and the seeded RNG. Fully serializable so a run can be snapshotted and
/// resumed.
///
/// The population is kept ranked ascending by score between steps, so the
/// best individual is always the last element. The sort is unstable; the
/// order among equal scores is not defined.
#[derive(Debug, Serialize, Deserialize)]
pub struct Engine {
    config: SearchConfig,
    population: Vec<Individual>,
    generation: u64,
    rng: Pcg64,
}

impl Engine {
    /// An engine with a randomly initialized population. The population size
    /// equals the target length.
    pub fn new(config: SearchConfig, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let len = config.target().len();
        let initial = (0..config.population_size())
            .map(|_| Genotype::random(len, &mut rng))
            .collect();
        Self::build(config, initial, rng)
    }

    /// An engine seeded with an explicit initial population. The population
    /// size is taken from `initial`, which must be non-empty; every genotype
    /// must have the target's length.
    pub fn from_population(
        config: SearchConfig,
        initial: Vec<Genotype>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if initial.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        Ok(Self::build(config, initial, Pcg64::seed_from_u64(seed)))
    }

    fn build(config: SearchConfig, initial: Vec<Genotype>, rng: Pcg64) -> Self {
        let population = initial
            .into_iter()
            .map(|g| Individual::new(g, config.target()))
            .collect();
        let mut engine = Self {
            config,
            population,
            generation: 1,
            rng,
        };
        engine.rank();
        engine
    }

    /// Sort ascending by score. Unstable: ties land in no particular order.
    fn rank(&mut self) {
        self.population
            .sort_unstable_by(|a, b| a.score.total_cmp(&b.score));
    }

    /// The top-ranked individual of the current generation.
    pub fn best(&self) -> &Individual {
        self.population.last().expect("population is never empty")
    }

    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn report(&self, best: &Individual) -> GenerationReport {
        let target = self.config.target();
        GenerationReport {
            generation: self.generation,
            target: String::from_utf8_lossy(target).into_owned(),
            diff: best.genotype.matches(target),
            best: best.genotype.to_string(),
            score: best.score,
        }
    }

    /// One generation: inspect the ranked population, and unless the best
    /// individual matches the target exactly, breed a full replacement
    /// population and advance the counter.
    ///
    /// Every child takes the current best as its favored parent and a
    /// uniformly random member of the current population as the other, then
    /// mutates gene-by-gene at the configured rate.
    pub fn step(&mut self) -> Step {
        let best = self.best().clone();

        if best.genotype.as_bytes() == self.config.target() {
            info!("exact match at generation {}", self.generation);
            return Step::Converged(self.report(&best));
        }

        let report = (self.generation % REPORT_INTERVAL == 0).then(|| self.report(&best));
        if let Some(r) = &report {
            debug!("generation {}: best score {:.3}", r.generation, r.score);
        }

        let size = self.population.len();
        let mut children = Vec::with_capacity(size);
        for _ in 0..size {
            let mate = &self.population[self.rng.random_range(0..size)];
            let mut child = best.genotype.crossover(&mate.genotype, &mut self.rng);
            child.mutate(&mut self.rng, self.config.mutation_rate());
            children.push(Individual::new(child, self.config.target()));
        }
        self.population = children;
        self.generation += 1;
        self.rank();

        Step::Continue(report)
    }

    /// Step until the target is matched, forwarding due reports to `sink`.
    /// If the config carries a generation cap, give up once that many
    /// generations have completed without a match.
    pub fn run<F>(&mut self, mut sink: F) -> RunOutcome
    where
        F: FnMut(&GenerationReport),
    {
        loop {
            match self.step() {
                Step::Converged(report) => {
                    sink(&report);
                    return RunOutcome::Converged {
                        generation: self.generation,
                        best: self.best().genotype.clone(),
                    };
                }
                Step::Continue(report) => {
                    if let Some(r) = &report {
                        sink(r);
                    }
                    if let Some(cap) = self.config.max_generations() {
                        if self.generation > cap {
                            info!("generation cap {} reached without a match", cap);
                            return RunOutcome::GenerationCapReached {
                                generation: self.generation,
                                best: self.best().genotype.clone(),
                            };
                        }
                    }
                }
            }
        }
    }
}
