//! Numerical-evaluation configuration.
//!
//! [`EvaluationConfig`] collects the quadrature and interpolation tunables the
//! Green's-function evaluator consumes. It is a plain value: build it from
//! [`Default`], from `SUBSTRATA_*` environment variables, from a TOML
//! snippet, or field by field, and hand it to the model. Nothing mutates it
//! afterwards.
//!
//! ## Recognized environment variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `SUBSTRATA_QMAXEVAL` | `max_eval` | 2000 |
//! | `SUBSTRATA_QMAXEVALA` | `max_eval_a` | 0 → `max_eval` |
//! | `SUBSTRATA_QMAXEVALB` | `max_eval_b` | 0 → `max_eval` |
//! | `SUBSTRATA_QABSTOL` | `abs_tol` | 1e-8 |
//! | `SUBSTRATA_QRELTOL` | `rel_tol` | 1e-4 |
//! | `SUBSTRATA_PPIORDER` | `panel_int_order` | 9 |
//! | `SUBSTRATA_PHIEORDER` | `field_interp_order` | 9 |
//! | `SUBSTRATA_LOGLEVEL` | `verbosity` | 1 (terse) |
//! | `SUBSTRATA_BYQFILES` | `write_intermediate_files` | unset (`"1"` enables) |
//!
//! Malformed override text is a hard [`ConfigError`], not silently ignored: a
//! mistyped tolerance that quietly reverts to its default corrupts
//! convergence studies undetectably.
//!
//! `SUBSTRATA_PATH` (see [`PATH_VAR`]) is the search list for substrate files
//! and is read by the construction entry points, not here.

use serde::Deserialize;
use thiserror::Error;

/// Environment variable listing directories searched for substrate files.
pub const PATH_VAR: &str = "SUBSTRATA_PATH";

const ENV_PREFIX: &str = "SUBSTRATA_";

/// Configuration-source failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: String, value: String },

    #[error("invalid evaluation config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How the evaluator selects its computation path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvalMethod {
    /// Choose per evaluation point.
    #[default]
    Auto,
    /// Force the homogeneous free-space kernel.
    FreeSpace,
    /// Force the electrostatic-limit kernel.
    StaticLimit,
}

/// Diagnostic output volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verbosity {
    Silent,
    #[default]
    Terse,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Map the numeric `SUBSTRATA_LOGLEVEL` convention onto the enum.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Self::Silent,
            1 => Self::Terse,
            2 => Self::Verbose,
            _ => Self::Debug,
        }
    }
}

/// Quadrature and interpolation tunables for substrate Green's-function
/// evaluation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Global cap on quadrature integrand evaluations.
    pub max_eval: usize,
    /// Cap for the first quadrature axis; 0 falls back to `max_eval`.
    pub max_eval_a: usize,
    /// Cap for the second quadrature axis; 0 falls back to `max_eval`.
    pub max_eval_b: usize,
    /// Absolute quadrature tolerance.
    pub abs_tol: f64,
    /// Relative quadrature tolerance.
    pub rel_tol: f64,
    /// Panel-panel integration order.
    pub panel_int_order: usize,
    /// Potential/field interpolation order.
    pub field_interp_order: usize,
    pub verbosity: Verbosity,
    /// Dump per-evaluation intermediate files (slow; debugging only).
    pub write_intermediate_files: bool,
    pub method: EvalMethod,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            max_eval: 2000,
            max_eval_a: 0,
            max_eval_b: 0,
            abs_tol: 1.0e-8,
            rel_tol: 1.0e-4,
            panel_int_order: 9,
            field_interp_order: 9,
            verbosity: Verbosity::Terse,
            write_intermediate_files: false,
            method: EvalMethod::Auto,
        }
    }
}

impl EvaluationConfig {
    /// Defaults overridden by any recognized `SUBSTRATA_*` environment
    /// variables, with the per-axis fallback applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        read_var("QMAXEVAL", &mut cfg.max_eval)?;
        read_var("QMAXEVALA", &mut cfg.max_eval_a)?;
        read_var("QMAXEVALB", &mut cfg.max_eval_b)?;
        read_var("QABSTOL", &mut cfg.abs_tol)?;
        read_var("QRELTOL", &mut cfg.rel_tol)?;
        read_var("PPIORDER", &mut cfg.panel_int_order)?;
        read_var("PHIEORDER", &mut cfg.field_interp_order)?;

        let mut level = 1_i64;
        read_var("LOGLEVEL", &mut level)?;
        cfg.verbosity = Verbosity::from_level(level);

        // Historical convention: the flag is on iff the value starts with '1'.
        if let Ok(text) = std::env::var(format!("{ENV_PREFIX}BYQFILES")) {
            cfg.write_intermediate_files = text.trim().starts_with('1');
        }

        Ok(cfg.resolved())
    }

    /// Parse from a TOML snippet; absent fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(text)?;
        Ok(cfg.resolved())
    }

    /// Apply the zero → global fallback for the per-axis caps.
    pub fn resolved(mut self) -> Self {
        if self.max_eval_a == 0 {
            self.max_eval_a = self.max_eval;
        }
        if self.max_eval_b == 0 {
            self.max_eval_b = self.max_eval;
        }
        self
    }
}

fn read_var<T: std::str::FromStr>(name: &str, slot: &mut T) -> Result<(), ConfigError> {
    let var = format!("{ENV_PREFIX}{name}");
    match std::env::var(&var) {
        Ok(text) => {
            *slot = text
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { var, value: text })?;
            Ok(())
        }
        Err(_) => Ok(()),
    }
}
