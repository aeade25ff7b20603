//! Per-context occupancy tables — the "restaurants" of the CRP hierarchy.
//!
//! Every `(sample, context)` pair owns one [`Restaurant`] holding a column of
//! statistics per known dish. Two variants exist:
//!
//! - [`Restaurant::Counted`] — plain CRP: a raw occupancy count per dish.
//! - [`Restaurant::Decayed`] — distance-dependent CRP: a fixed-capacity ring
//!   of observation timestamps per dish, from which an exponentially decayed
//!   affinity `Σ exp(−(t − tᵢ)/λ)` is computed at query time.
//!
//! Restaurants are created lazily on first reference to a context and grown
//! (new zero/empty dish columns appended) whenever a previously unseen dish
//! must be recorded.
//!
//! # Ring-buffer overflow policy
//!
//! Each dish keeps at most [`MAX_TIMESTAMPS`] timestamps. Once full, a new
//! timestamp overwrites **slot 0** — oldest-by-slot, which after the first
//! wrap is not oldest-by-time. This is a known modeling limitation of the
//! reference method, preserved for compatibility; see the crate-level notes.

use crate::vocabulary::DishId;

/// Ring-buffer capacity: timestamps retained per dish per restaurant.
pub const MAX_TIMESTAMPS: usize = 1000;

// ─── TimestampRing ──────────────────────────────────────────────────────────

/// Fixed-capacity buffer of observation timestamps for one dish.
#[derive(Clone, Debug, Default)]
pub struct TimestampRing {
    slots: heapless::Vec<u64, MAX_TIMESTAMPS>,
}

impl TimestampRing {
    /// Create an empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a timestamp, overwriting slot 0 when the ring is full.
    pub fn record(&mut self, t: u64) {
        if let Err(t) = self.slots.push(t) {
            self.slots[0] = t;
        }
    }

    /// Number of timestamps currently held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if no timestamp has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Exponentially decayed mass at trial `t`: `Σ exp(−(t − tᵢ)/λ)`.
    ///
    /// Timestamps are never newer than `t` (queries for trial `t` precede the
    /// update recording trial `t`), but the elapsed time saturates at zero
    /// rather than underflowing if that invariant is ever violated.
    pub fn decayed_mass(&self, t: u64, lambda: f64) -> f64 {
        self.slots
            .iter()
            .map(|&ti| (-(t.saturating_sub(ti) as f64) / lambda).exp())
            .sum()
    }

    /// The raw timestamps currently held, in slot order.
    pub fn timestamps(&self) -> &[u64] {
        &self.slots
    }
}

// ─── Restaurant ─────────────────────────────────────────────────────────────

/// Occupancy statistics for one context in one sample.
///
/// The variant is fixed at model construction: plain counts for the
/// non-decayed CRP, timestamp rings for the distance-dependent CRP.
#[derive(Clone, Debug)]
pub enum Restaurant {
    /// Plain occupancy count per dish.
    Counted(Vec<f64>),
    /// Timestamp ring per dish, decayed at query time.
    Decayed(Vec<TimestampRing>),
}

impl Restaurant {
    /// Create an empty restaurant of the requested variant.
    pub fn new(decayed: bool) -> Self {
        if decayed {
            Restaurant::Decayed(Vec::new())
        } else {
            Restaurant::Counted(Vec::new())
        }
    }

    /// Append zero/empty dish columns until at least `n_dishes` exist.
    ///
    /// Called whenever the shared vocabulary has grown past this restaurant's
    /// column count; never shrinks.
    pub fn grow_to(&mut self, n_dishes: usize) {
        match self {
            Restaurant::Counted(counts) => {
                if counts.len() < n_dishes {
                    counts.resize(n_dishes, 0.0);
                }
            }
            Restaurant::Decayed(rings) => {
                if rings.len() < n_dishes {
                    rings.resize_with(n_dishes, TimestampRing::new);
                }
            }
        }
    }

    /// Number of dish columns currently allocated.
    pub fn n_dish_columns(&self) -> usize {
        match self {
            Restaurant::Counted(counts) => counts.len(),
            Restaurant::Decayed(rings) => rings.len(),
        }
    }

    /// Record one occupancy for `dish` at trial `t`.
    ///
    /// The column must already exist (see [`Restaurant::grow_to`]); a record
    /// against a missing column is silently dropped rather than panicking.
    pub fn record(&mut self, dish: DishId, t: u64) {
        match self {
            Restaurant::Counted(counts) => {
                if let Some(count) = counts.get_mut(dish) {
                    *count += 1.0;
                }
            }
            Restaurant::Decayed(rings) => {
                if let Some(ring) = rings.get_mut(dish) {
                    ring.record(t);
                }
            }
        }
    }

    /// Affinity `d(u, w)` of one dish at trial `t`.
    ///
    /// `lambda` is the level-specific decay constant; ignored by the counted
    /// variant. A missing column contributes zero.
    pub fn dish_affinity(&self, dish: DishId, t: u64, lambda: f64) -> f64 {
        match self {
            Restaurant::Counted(counts) => counts.get(dish).copied().unwrap_or(0.0),
            Restaurant::Decayed(rings) => rings
                .get(dish)
                .map_or(0.0, |ring| ring.decayed_mass(t, lambda)),
        }
    }

    /// Total affinity `d(u)` across all dishes at trial `t`.
    pub fn total_affinity(&self, t: u64, lambda: f64) -> f64 {
        match self {
            Restaurant::Counted(counts) => counts.iter().sum(),
            Restaurant::Decayed(rings) => {
                rings.iter().map(|ring| ring.decayed_mass(t, lambda)).sum()
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
