//! Model construction parameters and their validation.
//!
//! Callers describe a model with [`HcrpParams`]: hierarchy depth, strength
//! and decay parameters in scalar-or-per-level form, a sample count and an
//! optional seed. [`HcrpParams::resolve`] broadcasts scalars, checks every
//! rule from the method definition and produces a fully resolved
//! [`HcrpConfig`] — or fails before any model state is built.
//!
//! # Validation rules
//! - `n_levels ≥ 1`, `n_samples ≥ 1`.
//! - A per-level list must have exactly `n_levels` entries; lists are never
//!   truncated or padded.
//! - Every strength must be strictly positive.
//! - Decay: `None`, a non-positive scalar, or an all-non-positive list all
//!   select plain (non-decayed) mode. A list mixing positive and non-positive
//!   entries is rejected.

use crate::error::{Error, Result};

// ─── LevelParam ─────────────────────────────────────────────────────────────

/// A per-level hyperparameter in caller-facing form.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelParam {
    /// One value broadcast to every hierarchy level.
    Scalar(f64),
    /// An explicit value per level; length must equal `n_levels`.
    PerLevel(Vec<f64>),
}

impl LevelParam {
    /// Broadcast or length-check into a list of exactly `n_levels` values.
    fn resolve(&self, n_levels: usize, name: &'static str) -> Result<Vec<f64>> {
        match self {
            LevelParam::Scalar(value) => Ok(vec![*value; n_levels]),
            LevelParam::PerLevel(values) => {
                if values.len() != n_levels {
                    return Err(Error::LevelCountMismatch {
                        name,
                        expected: n_levels,
                        actual: values.len(),
                    });
                }
                Ok(values.clone())
            }
        }
    }
}

impl From<f64> for LevelParam {
    fn from(value: f64) -> Self {
        LevelParam::Scalar(value)
    }
}

impl From<Vec<f64>> for LevelParam {
    fn from(values: Vec<f64>) -> Self {
        LevelParam::PerLevel(values)
    }
}

// ─── HcrpParams ─────────────────────────────────────────────────────────────

/// Caller-facing model parameters, prior to validation.
#[derive(Clone, Debug, PartialEq)]
pub struct HcrpParams {
    /// Hierarchy depth; the maximum context length is `n_levels − 1`.
    pub n_levels: usize,
    /// CRP strength `α`, scalar or per level.
    pub strength: LevelParam,
    /// Forgetting rate `λ`, scalar or per level. `None` → plain CRP.
    pub decay_constant: Option<LevelParam>,
    /// Independent seating-arrangement samples for Monte Carlo averaging.
    pub n_samples: usize,
    /// Seed for the model's random generator. `None` → seeded from entropy.
    pub seed: Option<u64>,
}

impl Default for HcrpParams {
    /// The reference method's defaults: 3 levels, `α = 0.5`, `λ = 50`,
    /// 5 samples, unseeded.
    fn default() -> Self {
        Self {
            n_levels: 3,
            strength: LevelParam::Scalar(0.5),
            decay_constant: Some(LevelParam::Scalar(50.0)),
            n_samples: 5,
            seed: None,
        }
    }
}

impl HcrpParams {
    /// Validate and broadcast into a fully resolved [`HcrpConfig`].
    pub fn resolve(&self) -> Result<HcrpConfig> {
        if self.n_levels < 1 {
            return Err(Error::InvalidLevels(self.n_levels));
        }
        if self.n_samples < 1 {
            return Err(Error::InvalidSamples(self.n_samples));
        }

        let strength = self.strength.resolve(self.n_levels, "strength")?;
        for (level, &value) in strength.iter().enumerate() {
            if value <= 0.0 {
                return Err(Error::NonPositiveStrength { level, value });
            }
        }

        let decay_constant = match &self.decay_constant {
            None => None,
            Some(param) => {
                let values = param.resolve(self.n_levels, "decay_constant")?;
                if values.iter().all(|&v| v <= 0.0) {
                    // Zero/negative decay is the conventional way to request
                    // plain CRP without changing the parameter shape.
                    None
                } else {
                    for (level, &value) in values.iter().enumerate() {
                        if value <= 0.0 {
                            return Err(Error::NonPositiveDecay { level, value });
                        }
                    }
                    Some(values)
                }
            }
        };

        Ok(HcrpConfig {
            n_levels: self.n_levels,
            strength,
            decay_constant,
            n_samples: self.n_samples,
            seed: self.seed,
        })
    }
}

// ─── HcrpConfig ─────────────────────────────────────────────────────────────

/// A validated, fully broadcast model configuration.
///
/// Produced by [`HcrpParams::resolve`]; both per-level lists have exactly
/// `n_levels` entries.
#[derive(Clone, Debug, PartialEq)]
pub struct HcrpConfig {
    /// Hierarchy depth.
    pub n_levels: usize,
    /// Strength `α` per level.
    pub strength: Vec<f64>,
    /// Decay constant `λ` per level; `None` → plain CRP.
    pub decay_constant: Option<Vec<f64>>,
    /// Independent seating-arrangement samples.
    pub n_samples: usize,
    /// Seed for the model's random generator.
    pub seed: Option<u64>,
}

// ─── Tests ──────────────────────────────────────────────────────────────────
