//! The hierarchical (distance-dependent) CRP language model.
//!
//! [`HcrpLm`] owns the shared [`DishVocabulary`], `n_samples` independent
//! collections of [`Restaurant`]s keyed by context, and the random generator
//! driving the stochastic seating updates.
//!
//! # Probability query (read path)
//!
//! Per sample, `P(w | u)` backs off over context length:
//!
//! ```text
//! P(w | u) = d(u,w) / (d(u) + α_L)  +  α_L / (d(u) + α_L) · P(w | u[1:])
//! ```
//!
//! with `L = len(u)` selecting the level strength `α_L`. The chain runs down
//! to the empty context — itself a restaurant, holding the unigram statistics
//! under `α_0` — and bottoms out below it at the uniform distribution over
//! currently known dishes. The recursion is evaluated as a bottom-up loop
//! over suffixes — same arithmetic, no call stack. An unseen context has
//! `d(u) = d(u,w) = 0` and therefore defers entirely to its shorter back-off
//! context; this falls out of the formula rather than being special-cased.
//!
//! # Seating update (write path)
//!
//! [`HcrpLm::observe`] walks the same suffix chain top-down, ending at the
//! empty context. At each level it records the observation *unconditionally*,
//! then draws one uniform value: with probability `d(u,w) / (d(u) + α_L)` the
//! customer is seated and the walk stops, otherwise it backs off one level.
//! Recording at every visited level — rather than only where the customer
//! seats — is a quirk of the reference method, reproduced faithfully; see
//! DESIGN.md.
//!
//! # Randomness
//!
//! All randomness consumption is confined to `observe`. The generator is
//! owned by the model and seeded once at construction from the configured
//! seed, so runs with identical seed, input and configuration are exactly
//! reproducible — no global random state is involved.

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::HcrpConfig;
use crate::restaurant::Restaurant;
use crate::vocabulary::{DishId, DishVocabulary};

/// Substituted for an exactly-zero denominator in the back-off formula.
const DENOM_FLOOR: f64 = 1e-12;

/// Lookup key for a restaurant: the context's dish indices, oldest first.
type ContextKey = Box<[DishId]>;

/// Hierarchical CRP language model with optional exponential forgetting.
#[derive(Clone)]
pub struct HcrpLm {
    config: HcrpConfig,
    vocabulary: DishVocabulary,
    /// One restaurant collection per independent seating-arrangement sample.
    samples: Vec<HashMap<ContextKey, Restaurant>>,
    rng: StdRng,
}

impl HcrpLm {
    /// Build a model from a resolved configuration.
    ///
    /// The random generator is seeded from `config.seed`, or from entropy
    /// when no seed was supplied.
    pub fn new(config: HcrpConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build a model with an explicitly injected random generator.
    pub fn with_rng(config: HcrpConfig, rng: StdRng) -> Self {
        let samples = (0..config.n_samples).map(|_| HashMap::new()).collect();
        Self {
            config,
            vocabulary: DishVocabulary::new(),
            samples,
            rng,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// The resolved configuration this model was built from.
    pub fn config(&self) -> &HcrpConfig {
        &self.config
    }

    /// Hierarchy depth.
    pub fn n_levels(&self) -> usize {
        self.config.n_levels
    }

    /// Longest context a query or update will consider.
    pub fn max_context_len(&self) -> usize {
        self.config.n_levels - 1
    }

    /// Number of independent seating-arrangement samples.
    pub fn n_samples(&self) -> usize {
        self.config.n_samples
    }

    /// Number of distinct dishes seen so far.
    pub fn number_of_dishes(&self) -> usize {
        self.vocabulary.len()
    }

    /// The shared dish vocabulary.
    pub fn vocabulary(&self) -> &DishVocabulary {
        &self.vocabulary
    }

    /// Number of restaurants instantiated in one sample.
    pub fn context_count(&self, sample: usize) -> usize {
        self.samples[sample].len()
    }

    // ── Read path ──────────────────────────────────────────────────────────

    /// `P(dish | context)` at trial `t`, averaged over all samples.
    ///
    /// `context` is given as raw stimulus tokens, most recent last; it is
    /// truncated to the most recent `n_levels − 1` tokens. The query dish is
    /// registered in the vocabulary if unseen (so the very first query of a
    /// run returns `1/1 = 1.0`), but no restaurant state is touched —
    /// repeated queries without an intervening update return identical
    /// probabilities.
    pub fn predict(&mut self, t: u64, context: &[i64], dish: i64) -> f64 {
        let dish_id = self.vocabulary.intern(dish);
        let ids = self.context_ids(context);
        let total: f64 = (0..self.config.n_samples)
            .map(|sample| self.sample_probability(t, &ids, dish_id, sample))
            .sum();
        total / self.config.n_samples as f64
    }

    /// `P(dish | context)` at trial `t` for one sample only.
    pub fn predict_sample(&mut self, t: u64, context: &[i64], dish: i64, sample: usize) -> f64 {
        let dish_id = self.vocabulary.intern(dish);
        let ids = self.context_ids(context);
        self.sample_probability(t, &ids, dish_id, sample)
    }

    /// The sample-averaged predictive distribution over every known dish.
    ///
    /// Diagnostic helper; not used on the online parsing hot path.
    pub fn predictive_distribution(&mut self, t: u64, context: &[i64]) -> Vec<(i64, f64)> {
        let tokens: Vec<i64> = self.vocabulary.tokens().to_vec();
        tokens
            .into_iter()
            .map(|token| (token, self.predict(t, context, token)))
            .collect()
    }

    /// Truncate to the maximum context length and map tokens to dish ids.
    ///
    /// Context tokens are looked up, not interned: a token never observed
    /// cannot have restaurant state, so its level contributes `d = 0` and the
    /// query falls through to the back-off context.
    fn context_ids(&self, context: &[i64]) -> Vec<Option<DishId>> {
        let start = context.len().saturating_sub(self.max_context_len());
        context[start..]
            .iter()
            .map(|&token| self.vocabulary.get(token))
            .collect()
    }

    /// Back-off recursion for one sample, evaluated bottom-up over suffixes.
    ///
    /// Level 0 is the empty context — the unigram restaurant.
    fn sample_probability(&self, t: u64, ids: &[Option<DishId>], dish: DishId, sample: usize) -> f64 {
        // Base case: uniform over known dishes. The query dish is interned
        // before we get here, so the vocabulary is never empty.
        let mut p = 1.0 / self.vocabulary.len().max(1) as f64;

        for level in 0..=ids.len() {
            let alpha = self.config.strength[level];
            let lambda = self.lambda(level);
            let suffix = &ids[ids.len() - level..];
            let key: Option<Vec<DishId>> = suffix.iter().copied().collect();
            let (d_u, d_u_w) = match key.and_then(|k| self.samples[sample].get(k.as_slice())) {
                Some(restaurant) => (
                    restaurant.total_affinity(t, lambda),
                    restaurant.dish_affinity(dish, t, lambda),
                ),
                None => (0.0, 0.0),
            };
            let mut denom = d_u + alpha;
            if denom == 0.0 {
                denom = DENOM_FLOOR;
            }
            p = d_u_w / denom + (alpha / denom) * p;
        }
        p
    }

    /// Level-specific decay constant; unused by the counted variant.
    fn lambda(&self, level: usize) -> f64 {
        self.config
            .decay_constant
            .as_ref()
            .map_or(0.0, |decay| decay[level])
    }

    // ── Write path ─────────────────────────────────────────────────────────

    /// Record one observation of `dish` after `context` in one sample.
    ///
    /// Queries for trial `t` must happen before the update recording trial
    /// `t`. Both the dish and the context tokens are registered in the
    /// vocabulary if unseen. This is the only method that consumes
    /// randomness.
    pub fn observe(&mut self, t: u64, context: &[i64], dish: i64, sample: usize) {
        let dish_id = self.vocabulary.intern(dish);
        let start = context.len().saturating_sub(self.max_context_len());
        let ids: Vec<DishId> = context[start..]
            .iter()
            .map(|&token| self.vocabulary.intern(token))
            .collect();
        let n_dishes = self.vocabulary.len();
        let decayed = self.config.decay_constant.is_some();

        // Walk every suffix of the context, ending at the empty context.
        let mut from = 0;
        while from <= ids.len() {
            let ctx = &ids[from..];
            let level = ctx.len();
            let alpha = self.config.strength[level];
            let lambda = self.lambda(level);

            let table = &mut self.samples[sample];
            let created = !table.contains_key(ctx);
            if created {
                table.insert(ctx.into(), Restaurant::new(decayed));
            }

            let (d_u, d_u_w) = {
                let restaurant = table.get_mut(ctx).unwrap();
                restaurant.grow_to(n_dishes);
                if created {
                    // Fresh restaurant: record and keep backing off without
                    // consuming a draw (matches the reference control flow).
                    restaurant.record(dish_id, t);
                    from += 1;
                    continue;
                }
                (
                    restaurant.total_affinity(t, lambda),
                    restaurant.dish_affinity(dish_id, t, lambda),
                )
            };

            let mut denom = d_u + alpha;
            if denom == 0.0 {
                denom = DENOM_FLOOR;
            }
            let p_seat = d_u_w / denom;
            let seated = self.rng.gen::<f64>() < p_seat;

            // Recorded at every visited level regardless of the draw; the
            // draw only decides where the back-off walk stops.
            table.get_mut(ctx).unwrap().record(dish_id, t);
            if seated {
                break;
            }
            from += 1;
        }
    }
}

impl core::fmt::Debug for HcrpLm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HcrpLm")
            .field("n_levels", &self.config.n_levels)
            .field("n_samples", &self.config.n_samples)
            .field("decayed", &self.config.decay_constant.is_some())
            .field("number_of_dishes", &self.vocabulary.len())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
