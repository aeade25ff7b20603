//! # hcrp-chunking
//!
//! Chunk boundary detection for serial-reaction-time (SRT) sequence-learning
//! data, via a Hierarchical — optionally distance-dependent — Chinese
//! Restaurant Process language model (HCRP-LM).
//!
//! As a learner practices a fixed stimulus sequence, their internal
//! representation groups it into *chunks*. This crate infers those chunk
//! boundaries from stimulus identity alone: it parses each block's sequence
//! online through a nonparametric Bayesian sequence model, scores every
//! stimulus by its *surprisal* (negative log₂ probability, evaluated strictly
//! before the model is updated with it), and flags within-block surprisal
//! spikes as chunk boundaries.
//!
//! ## The pipeline
//!
//! ```text
//! per-block sequences → HcrpLm (predict ∥ observe, in lockstep)
//!                            ↓
//!                  per-block surprisal profiles
//!                            ↓
//!                  detect_boundaries (z-score threshold)
//!                            ↓
//!            ChunkingReport (boundaries + summary + parameters)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`vocabulary`] | [`DishVocabulary`], [`DishId`] | Stable indices for observed stimulus tokens |
//! | [`restaurant`] | [`restaurant::Restaurant`], [`restaurant::TimestampRing`] | Per-context occupancy — plain counts or decayed timestamps |
//! | [`model`] | [`HcrpLm`] | Back-off probability queries and stochastic seating updates |
//! | [`config`] | [`HcrpParams`], [`HcrpConfig`] | Parameter broadcasting and validation |
//! | [`surprisal`] | [`parse_and_score`], [`Blocks`] | Online prequential scoring, block by block |
//! | [`boundary`] | [`detect_boundaries`] | Z-score thresholding of a surprisal profile |
//! | [`report`] | [`run_analysis`], [`ChunkingReport`] | The full pipeline and the shared output schema |
//!
//! ## Quick start
//!
//! ```rust
//! use hcrp_chunking::{run_analysis, Blocks, HcrpParams};
//!
//! let mut blocks = Blocks::new();
//! blocks.insert(1, vec![3, 1, 2, 4, 3, 1, 2, 4]);
//! blocks.insert(2, vec![3, 1, 2, 4, 3, 1, 2, 4]);
//!
//! let params = HcrpParams { seed: Some(42), ..HcrpParams::default() };
//! let report = run_analysis(&blocks, &params, 1.0).unwrap();
//! for row in &report.blocks {
//!     println!("block {}: boundaries {:?}", row.block, row.chunk_boundaries);
//! }
//! ```
//!
//! ## Reproducibility
//!
//! The model owns its random generator, seeded once at construction from the
//! caller-supplied seed; only [`HcrpLm::observe`] consumes randomness. Two
//! runs with identical seed, input and configuration produce identical
//! reports. Probability queries have no stochastic side effects.
//!
//! ## Features
//!
//! - `serde` — `Serialize`/`Deserialize` on the report types.
//! - `python-ffi` — PyO3 bindings exposing [`run_analysis`] to Python.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod boundary;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod restaurant;
pub mod surprisal;
pub mod vocabulary;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use boundary::detect_boundaries;
pub use config::{HcrpConfig, HcrpParams, LevelParam};
pub use error::{Error, Result};
pub use model::HcrpLm;
pub use report::{run_analysis, BlockReport, ChunkingReport, EchoedParameters, RunSummary};
pub use surprisal::{parse_and_score, Blocks};
pub use vocabulary::{DishId, DishVocabulary};
