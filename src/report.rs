//! Result assembly — the shared output schema of the chunking benchmark.
//!
//! [`run_analysis`] is the crate's front door: it validates parameters,
//! builds the model, drives the online parse, detects boundaries per block
//! and packages everything into a [`ChunkingReport`] — per-block rows, a
//! run-level summary and the resolved configuration echoed back verbatim.
//!
//! With the `serde` feature enabled all report types serialize, so the
//! surrounding pipeline can persist or transport them as JSON.

use crate::boundary::detect_boundaries;
use crate::config::HcrpParams;
use crate::error::Result;
use crate::model::HcrpLm;
use crate::surprisal::{parse_and_score, Blocks};

/// Per-block chunking result.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct BlockReport {
    /// Block number, as keyed in the input.
    pub block: u32,
    /// `chunk_boundaries.len() + 1`.
    pub n_chunks: usize,
    /// Sorted, distinct boundary positions in `[1, L−1]`.
    pub chunk_boundaries: Vec<usize>,
    /// Surprisal (bits) at positions `1..L−1`.
    pub surprisal_profile: Vec<f64>,
}

/// Run-level summary statistics.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Number of blocks analyzed.
    pub n_blocks: usize,
    /// Mean of `n_chunks` over blocks.
    pub mean_n_chunks: f64,
    /// Mean surprisal over all positions of all blocks.
    pub mean_surprisal: f64,
    /// Mean surprisal restricted to flagged boundary positions; `None` when
    /// no position was flagged anywhere in the run.
    pub mean_boundary_surprisal: Option<f64>,
}

/// The configuration a report was produced with, echoed back verbatim in
/// resolved (broadcast) form.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct EchoedParameters {
    /// Hierarchy depth.
    pub n_levels: usize,
    /// Strength `α` per level.
    pub strength: Vec<f64>,
    /// Decay constant `λ` per level; `None` for the plain CRP.
    pub decay_constant: Option<Vec<f64>>,
    /// Independent seating-arrangement samples.
    pub n_samples: usize,
    /// Z-score threshold used for boundary detection.
    pub threshold_z: f64,
    /// Seed of the model's random generator, when one was supplied.
    pub random_state: Option<u64>,
}

/// Complete output of one analysis run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkingReport {
    /// One row per block, in block-number order.
    pub blocks: Vec<BlockReport>,
    /// Run-level summary statistics.
    pub summary: RunSummary,
    /// The configuration echoed back.
    pub parameters: EchoedParameters,
}

/// Mean of a slice, or `None` when it is empty.
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Run the full HCRP-LM chunking pipeline over per-block stimulus sequences.
///
/// Validates `params`, builds a fresh model, parses every block online,
/// thresholds each surprisal profile at `threshold_z` and assembles the
/// report. Fails fast on configuration errors, empty input and non-uniform
/// block lengths; numerical degeneracies inside the pipeline are handled
/// locally and never surface as errors.
pub fn run_analysis(blocks: &Blocks, params: &HcrpParams, threshold_z: f64) -> Result<ChunkingReport> {
    let config = params.resolve()?;
    tracing::debug!(
        n_blocks = blocks.len(),
        n_levels = config.n_levels,
        n_samples = config.n_samples,
        decayed = config.decay_constant.is_some(),
        "starting HCRP-LM chunking run"
    );

    let mut model = HcrpLm::new(config.clone());
    let profiles = parse_and_score(&mut model, blocks)?;

    let mut rows = Vec::with_capacity(profiles.len());
    let mut all_surprisals = Vec::new();
    let mut boundary_surprisals = Vec::new();

    for (block, profile) in profiles {
        let chunk_boundaries = detect_boundaries(&profile, threshold_z);
        all_surprisals.extend_from_slice(&profile);
        for &b in &chunk_boundaries {
            // Boundary positions are 1-indexed into the profile.
            boundary_surprisals.push(profile[b - 1]);
        }
        tracing::trace!(block, n_boundaries = chunk_boundaries.len(), "block boundaries");
        rows.push(BlockReport {
            block,
            n_chunks: chunk_boundaries.len() + 1,
            chunk_boundaries,
            surprisal_profile: profile,
        });
    }

    let summary = RunSummary {
        n_blocks: rows.len(),
        mean_n_chunks: rows.iter().map(|r| r.n_chunks as f64).sum::<f64>() / rows.len() as f64,
        // parse_and_score guarantees at least one block of length ≥ 2.
        mean_surprisal: mean(&all_surprisals).unwrap_or_default(),
        mean_boundary_surprisal: mean(&boundary_surprisals),
    };

    Ok(ChunkingReport {
        blocks: rows,
        summary,
        parameters: EchoedParameters {
            n_levels: config.n_levels,
            strength: config.strength,
            decay_constant: config.decay_constant,
            n_samples: config.n_samples,
            threshold_z,
            random_state: config.seed,
        },
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelParam;
    use crate::error::Error;

    fn params() -> HcrpParams {
        HcrpParams {
            n_levels: 2,
            strength: LevelParam::Scalar(0.5),
            decay_constant: None,
            n_samples: 1,
            seed: Some(0),
        }
    }

    fn eight_blocks() -> Blocks {
        let pattern: [i64; 8] = [3, 1, 2, 4, 3, 1, 2, 4];
        (1..=10u32).map(|b| (b, pattern.to_vec())).collect()
    }

    #[test]
    fn test_report_shape() {
        let report = run_analysis(&eight_blocks(), &params(), 1.0).unwrap();
        assert_eq!(report.blocks.len(), 10);
        assert_eq!(report.summary.n_blocks, 10);
        for row in &report.blocks {
            assert_eq!(row.surprisal_profile.len(), 7);
            assert_eq!(row.n_chunks, row.chunk_boundaries.len() + 1);
            for &b in &row.chunk_boundaries {
                assert!(b >= 1 && b <= 7, "boundary {} out of range", b);
            }
        }
    }

    #[test]
    fn test_blocks_are_sorted_by_block_number() {
        let report = run_analysis(&eight_blocks(), &params(), 1.0).unwrap();
        let numbers: Vec<u32> = report.blocks.iter().map(|r| r.block).collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(numbers, sorted);
    }

    #[test]
    fn test_parameters_echoed_in_resolved_form() {
        let report = run_analysis(&eight_blocks(), &params(), 1.5).unwrap();
        assert_eq!(report.parameters.n_levels, 2);
        assert_eq!(report.parameters.strength, vec![0.5, 0.5]);
        assert_eq!(report.parameters.decay_constant, None);
        assert_eq!(report.parameters.n_samples, 1);
        assert_eq!(report.parameters.threshold_z, 1.5);
        assert_eq!(report.parameters.random_state, Some(0));
    }

    #[test]
    fn test_boundary_surprisal_mean_is_none_without_boundaries() {
        // An absurd threshold flags nothing anywhere.
        let report = run_analysis(&eight_blocks(), &params(), 1e12).unwrap();
        assert_eq!(report.summary.mean_boundary_surprisal, None);
        assert!(report.summary.mean_n_chunks == 1.0);
    }

    #[test]
    fn test_boundary_surprisal_mean_exceeds_overall_mean() {
        // Flagged positions are by construction high-surprisal positions.
        let report = run_analysis(&eight_blocks(), &params(), 0.5).unwrap();
        if let Some(boundary_mean) = report.summary.mean_boundary_surprisal {
            assert!(
                boundary_mean > report.summary.mean_surprisal,
                "boundary mean {} should exceed overall mean {}",
                boundary_mean,
                report.summary.mean_surprisal
            );
        }
    }

    #[test]
    fn test_config_error_precedes_parsing() {
        let mut bad = params();
        bad.strength = LevelParam::PerLevel(vec![0.5]);
        let err = run_analysis(&Blocks::new(), &bad, 1.0).unwrap_err();
        // The length mismatch is reported even though the input is also empty.
        assert_eq!(
            err,
            Error::LevelCountMismatch {
                name: "strength",
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_identical_runs_produce_identical_reports() {
        let p = HcrpParams {
            n_levels: 3,
            strength: LevelParam::Scalar(0.5),
            decay_constant: Some(LevelParam::Scalar(50.0)),
            n_samples: 5,
            seed: Some(1234),
        };
        let a = run_analysis(&eight_blocks(), &p, 1.0).unwrap();
        let b = run_analysis(&eight_blocks(), &p, 1.0).unwrap();
        assert_eq!(a, b);
    }
}
