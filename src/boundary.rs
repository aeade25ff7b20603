//! Chunk boundary detection by z-score thresholding of a surprisal profile.
//!
//! A surprisal spike relative to the rest of the block marks a position where
//! the learner's predictive model was poor — the hypothesized start of a new
//! chunk. Positions are 1-indexed in `[1, L−1]`: boundary `i` denotes the
//! break between stimulus `i` and stimulus `i+1`, the convention shared by
//! every chunking method in the surrounding benchmark so that outputs are
//! directly comparable.

/// Standard deviations below this are treated as a flat profile.
const SIGMA_FLOOR: f64 = 1e-10;

/// Flag chunk boundaries in a block's surprisal profile.
///
/// Computes the within-block mean `μ` and (population) standard deviation
/// `σ`, and flags position `i` (1-indexed) wherever `(s_i − μ)/σ` exceeds
/// `threshold_z`. A flat profile — `σ` below the numerical floor — carries no
/// signal and yields no boundaries. The result is sorted and duplicate-free
/// by construction.
pub fn detect_boundaries(profile: &[f64], threshold_z: f64) -> Vec<usize> {
    if profile.is_empty() {
        return Vec::new();
    }
    let n = profile.len() as f64;
    let mu = profile.iter().sum::<f64>() / n;
    let variance = profile.iter().map(|s| (s - mu) * (s - mu)).sum::<f64>() / n;
    let sigma = variance.sqrt();
    if sigma < SIGMA_FLOOR {
        return Vec::new();
    }
    profile
        .iter()
        .enumerate()
        .filter(|&(_, &s)| (s - mu) / sigma > threshold_z)
        .map(|(i, _)| i + 1)
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────────────
