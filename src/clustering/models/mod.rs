//! clustering::models — model-level orchestration over the numeric core.
//!
//! Purpose
//! -------
//! House the model types that drive the clustering pipeline end to end.
//! The single member today is [`mc2pca`], which pairs a validated
//! configuration with the fit loop and exposes the frozen result for
//! inference.
//!
//! Conventions
//! -----------
//! - Models consume the `core` subtree through its public surface only;
//!   sequencing decisions, convergence tests, and logging live here, not
//!   in the numeric layers.
//! - Fit results are immutable values, separate from the model that
//!   produced them, so a model can be reused across datasets and a fit
//!   can be shipped around (or serialized, with the `serde` feature)
//!   without dragging mutable state along.

pub mod mc2pca;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mc2pca::{Mc2PCAFit, Mc2PCAModel, Termination};
