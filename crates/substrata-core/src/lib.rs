//! # Substrata Core
//!
//! A model of a stack of planar dielectric layers (optionally terminated by a
//! perfectly conducting ground plane), supplying the geometry, per-frequency
//! material response, and numerical-evaluation tunables that a dyadic
//! Green's-function evaluator needs. The library is independent of any
//! particular surface-integral-equation solver.
//!
//! ## Modules
//!
//! - [`stack`] — Validated layer-stack data model and depth queries.
//! - [`parser`] — Substrate-description parser (standalone files and embedded
//!   `SUBSTRATE ... ENDSUBSTRATE` blocks).
//! - [`cache`] — Single-entry per-frequency (ε, μ) cache.
//! - [`config`] — Quadrature/interpolation tunables with environment and TOML
//!   sources.
//! - [`interp`] — Lazily built scalar-Green's-function interpolant slot.
//! - [`model`] — The [`SubstrateModel`] composition root and its construction
//!   entry points.
//!
//! ## Example
//!
//! ```
//! use substrata_core::SubstrateModel;
//! use substrata_materials::MaterialRegistry;
//!
//! let registry = MaterialRegistry::new();
//! let model = SubstrateModel::from_text(
//!     "MEDIUM VACUUM\n-1.0 SiO2\n-2.0 Silicon\n",
//!     &registry,
//! ).unwrap();
//! assert_eq!(model.num_layers(), 3);
//! assert_eq!(model.layer_index(-1.5), 1);
//! ```

pub mod cache;
pub mod config;
pub mod interp;
pub mod model;
pub mod parser;
pub mod stack;

pub use cache::MaterialResponseCache;
pub use config::{ConfigError, EvalMethod, EvaluationConfig, Verbosity};
pub use interp::InterpolantSlot;
pub use model::{SubstrateError, SubstrateModel};
pub use parser::{Location, ParseError, ParseErrorKind};
pub use stack::{Layer, LayerStack};
