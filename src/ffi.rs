//! Python FFI bindings via PyO3.
//!
//! Exposes the analysis entry point to Python so the surrounding (Python)
//! benchmark pipeline can call this core directly.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! from hcrp_chunking import run_analysis
//!
//! blocks = {1: [3, 1, 2, 4, 3, 1, 2, 4], 2: [3, 1, 2, 4, 3, 1, 2, 4]}
//! report = run_analysis(blocks, n_levels=3, strength=0.5,
//!                       decay_constant=50.0, n_samples=5,
//!                       threshold_z=1.0, random_state=42)
//! for row in report.blocks:
//!     print(row.block, row.chunk_boundaries)
//! print(report.mean_n_chunks, report.mean_surprisal)
//! ```

use std::collections::BTreeMap;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{HcrpParams, LevelParam};
use crate::report;

/// Scalar-or-list hyperparameter as accepted from Python.
#[derive(FromPyObject)]
pub enum PyLevelParam {
    /// One value broadcast to every level.
    Scalar(f64),
    /// Explicit per-level values.
    List(Vec<f64>),
}

impl From<PyLevelParam> for LevelParam {
    fn from(value: PyLevelParam) -> Self {
        match value {
            PyLevelParam::Scalar(v) => LevelParam::Scalar(v),
            PyLevelParam::List(v) => LevelParam::PerLevel(v),
        }
    }
}

// ── BlockReport ──────────────────────────────────────────────────────────────

/// Per-block chunking result.
#[pyclass(name = "BlockReport")]
#[derive(Clone)]
pub struct PyBlockReport {
    inner: report::BlockReport,
}

#[pymethods]
impl PyBlockReport {
    /// Block number, as keyed in the input mapping.
    #[getter]
    pub fn block(&self) -> u32 {
        self.inner.block
    }

    /// Number of chunks: `len(chunk_boundaries) + 1`.
    #[getter]
    pub fn n_chunks(&self) -> usize {
        self.inner.n_chunks
    }

    /// Sorted boundary positions, 1-indexed in `[1, L-1]`.
    #[getter]
    pub fn chunk_boundaries(&self) -> Vec<usize> {
        self.inner.chunk_boundaries.clone()
    }

    /// Surprisal (bits) at positions `1..L-1`.
    #[getter]
    pub fn surprisal_profile(&self) -> Vec<f64> {
        self.inner.surprisal_profile.clone()
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "BlockReport(block={}, n_chunks={}, chunk_boundaries={:?})",
            self.inner.block, self.inner.n_chunks, self.inner.chunk_boundaries
        )
    }
}

// ── ChunkingReport ───────────────────────────────────────────────────────────

/// Complete output of one analysis run.
#[pyclass(name = "ChunkingReport")]
pub struct PyChunkingReport {
    inner: report::ChunkingReport,
}

#[pymethods]
impl PyChunkingReport {
    /// Per-block rows in block-number order.
    #[getter]
    pub fn blocks(&self) -> Vec<PyBlockReport> {
        self.inner
            .blocks
            .iter()
            .map(|row| PyBlockReport { inner: row.clone() })
            .collect()
    }

    /// Number of blocks analyzed.
    #[getter]
    pub fn n_blocks(&self) -> usize {
        self.inner.summary.n_blocks
    }

    /// Mean number of chunks over blocks.
    #[getter]
    pub fn mean_n_chunks(&self) -> f64 {
        self.inner.summary.mean_n_chunks
    }

    /// Mean surprisal over all positions of all blocks.
    #[getter]
    pub fn mean_surprisal(&self) -> f64 {
        self.inner.summary.mean_surprisal
    }

    /// Mean surprisal at flagged boundary positions, or `None` when the run
    /// flagged no boundary at all.
    #[getter]
    pub fn mean_boundary_surprisal(&self) -> Option<f64> {
        self.inner.summary.mean_boundary_surprisal
    }

    /// Hierarchy depth the run used.
    #[getter]
    pub fn n_levels(&self) -> usize {
        self.inner.parameters.n_levels
    }

    /// Resolved per-level strength parameters.
    #[getter]
    pub fn strength(&self) -> Vec<f64> {
        self.inner.parameters.strength.clone()
    }

    /// Resolved per-level decay constants, or `None` for the plain CRP.
    #[getter]
    pub fn decay_constant(&self) -> Option<Vec<f64>> {
        self.inner.parameters.decay_constant.clone()
    }

    /// Number of seating-arrangement samples.
    #[getter]
    pub fn n_samples(&self) -> usize {
        self.inner.parameters.n_samples
    }

    /// Z-score threshold used for boundary detection.
    #[getter]
    pub fn threshold_z(&self) -> f64 {
        self.inner.parameters.threshold_z
    }

    /// Random seed, when one was supplied.
    #[getter]
    pub fn random_state(&self) -> Option<u64> {
        self.inner.parameters.random_state
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "ChunkingReport(n_blocks={}, mean_n_chunks={:.3})",
            self.inner.summary.n_blocks, self.inner.summary.mean_n_chunks
        )
    }
}

// ── run_analysis ─────────────────────────────────────────────────────────────

/// Run HCRP-LM surprisal chunking over per-block stimulus sequences.
///
/// Args:
///     blocks: mapping of block number to a fixed-length list of stimulus ids
///     n_levels: hierarchy depth; max context = n_levels - 1 (default 3)
///     strength: CRP strength, scalar or per-level list (default 0.5)
///     decay_constant: forgetting rate, scalar or per-level list; None or 0
///         selects the plain (non-forgetful) CRP (default 50.0)
///     n_samples: independent seating samples to average (default 5)
///     threshold_z: z-score threshold for boundary detection (default 1.0)
///     random_state: seed for the model's random generator (default None)
#[pyfunction]
#[pyo3(name = "run_analysis")]
#[pyo3(signature = (
    blocks,
    *,
    n_levels = 3,
    strength = PyLevelParam::Scalar(0.5),
    decay_constant = Some(PyLevelParam::Scalar(50.0)),
    n_samples = 5,
    threshold_z = 1.0,
    random_state = None,
))]
#[allow(clippy::too_many_arguments)]
pub fn py_run_analysis(
    blocks: BTreeMap<u32, Vec<i64>>,
    n_levels: usize,
    strength: PyLevelParam,
    decay_constant: Option<PyLevelParam>,
    n_samples: usize,
    threshold_z: f64,
    random_state: Option<u64>,
) -> PyResult<PyChunkingReport> {
    let params = HcrpParams {
        n_levels,
        strength: strength.into(),
        decay_constant: decay_constant.map(LevelParam::from),
        n_samples,
        seed: random_state,
    };
    let inner = report::run_analysis(&blocks, &params, threshold_z)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyChunkingReport { inner })
}

// ── Module entry point ───────────────────────────────────────────────────────

/// HCRP-LM chunking Python bindings.
#[pymodule]
pub fn hcrp_chunking(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyBlockReport>()?;
    m.add_class::<PyChunkingReport>()?;
    m.add_function(wrap_pyfunction!(py_run_analysis, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
