//! Genetic string search: evolve a population of random byte strings toward a
//! target phrase using best-parent crossover and per-gene mutation.
//!
//! The core types live here; the generational loop lives in [`engine`].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod engine;

/// Lowest legal gene value: ASCII space.
pub const GENE_MIN: u8 = b' ';
/// Highest legal gene value: lowercase 'z'. Excludes `{`, `|` and `}`.
pub const GENE_MAX: u8 = b'z';

/// Probability that crossover takes a gene from the favored parent.
pub const CROSSOVER_BIAS: f32 = 0.8;

/// Draw one gene uniformly from the legal range.
fn random_gene<R: Rng>(rng: &mut R) -> u8 {
    rng.random_range(GENE_MIN..=GENE_MAX)
}

/// One candidate solution: a fixed-length byte string.
///
/// Every genotype in a run has the same length as the run's target. Members of
/// a population are never edited in place; children are built fresh each
/// generation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genotype(Vec<u8>);

impl Genotype {
    /// A genotype of `len` uniformly random genes.
    pub fn random<R: Rng>(len: usize, rng: &mut R) -> Self {
        Genotype((0..len).map(|_| random_gene(rng)).collect())
    }

    pub fn from_bytes(genes: impl Into<Vec<u8>>) -> Self {
        Genotype(genes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fraction of positions matching `target`, in `[0, 1]`.
    ///
    /// Requires `self.len() == target.len()`; the engine maintains that
    /// invariant for every genotype it creates.
    pub fn score(&self, target: &[u8]) -> f32 {
        let hits = self.0.iter().zip(target).filter(|(g, t)| g == t).count();
        hits as f32 / target.len() as f32
    }

    /// Human-readable diff against `target`: `'|'` where a position matches,
    /// `' '` where it does not.
    pub fn matches(&self, target: &[u8]) -> String {
        self.0
            .iter()
            .zip(target)
            .map(|(g, t)| if g == t { '|' } else { ' ' })
            .collect()
    }

    /// Biased uniform crossover: per position, take `self`'s gene with
    /// probability [`CROSSOVER_BIAS`], else `other`'s. `self` is the favored
    /// parent.
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let genes = self
            .0
            .iter()
            .zip(&other.0)
            .map(|(&a, &b)| {
                if rng.random::<f32>() < CROSSOVER_BIAS {
                    a
                } else {
                    b
                }
            })
            .collect();
        Genotype(genes)
    }

    /// Per position, overwrite the gene with a fresh random one with
    /// probability `rate`. Applied to newly built children after crossover,
    /// so a mutation can override either parent's contribution.
    pub fn mutate<R: Rng>(&mut self, rng: &mut R, rate: f32) {
        for gene in &mut self.0 {
            if rng.random::<f32>() < rate {
                *gene = random_gene(rng);
            }
        }
    }
}

impl From<&str> for Genotype {
    fn from(s: &str) -> Self {
        Genotype(s.as_bytes().to_vec())
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Genotype({:?})", String::from_utf8_lossy(&self.0))
    }
}

/// Rejected run parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("target string must not be empty")]
    EmptyTarget,
    #[error("mutation rate {0} is outside [0, 1]")]
    MutationRateOutOfRange(f32),
    #[error("seed population must not be empty")]
    EmptyPopulation,
}

/// Immutable parameters of one run: the target, the mutation rate, and an
/// optional generation cap for callers that need bounded runtime.
///
/// The population size is always the target length, not an independent knob.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    target: Vec<u8>,
    mutation_rate: f32,
    max_generations: Option<u64>,
}

impl SearchConfig {
    pub fn new(target: impl AsRef<[u8]>, mutation_rate: f32) -> Result<Self, ConfigError> {
        let target = target.as_ref().to_vec();
        if target.is_empty() {
            return Err(ConfigError::EmptyTarget);
        }
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(ConfigError::MutationRateOutOfRange(mutation_rate));
        }
        Ok(Self {
            target,
            mutation_rate,
            max_generations: None,
        })
    }

    /// Stop `run` after this many generations even without a match. The loop
    /// itself is unbounded; this is a harness-level control.
    pub fn with_max_generations(mut self, cap: u64) -> Self {
        self.max_generations = Some(cap);
        self
    }

    pub fn target(&self) -> &[u8] {
        &self.target
    }

    pub fn mutation_rate(&self) -> f32 {
        self.mutation_rate
    }

    pub fn max_generations(&self) -> Option<u64> {
        self.max_generations
    }

    /// Population size, derived from the target length.
    pub fn population_size(&self) -> usize {
        self.target.len()
    }
}

/// What the presentation layer gets for a reported generation. Formatting
/// (padding, decimal places, screen clearing) is the caller's business.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u64,
    pub target: String,
    pub diff: String,
    pub best: String,
    pub score: f32,
}
