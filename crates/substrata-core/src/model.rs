//! The substrate composition root.
//!
//! A [`SubstrateModel`] owns one parsed [`LayerStack`], one
//! [`MaterialResponseCache`], one [`EvaluationConfig`] snapshot, and a lazily
//! built scalar-Green's-function interpolant. It is the object a
//! boundary-element solver holds for the lifetime of a computation.
//!
//! ## Concurrency
//!
//! The model is a single-owner object with no internal locking.
//! [`ensure_frequency`](SubstrateModel::ensure_frequency) and the interpolant
//! accessors take `&mut self`, so the borrow checker enforces the intended
//! usage: update the frequency once, then let parallel assembly workers read
//! the (then effectively immutable) cached values through `&self`.

use std::any::Any;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use num_complex::Complex64;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use substrata_materials::MaterialRegistry;

use crate::cache::MaterialResponseCache;
use crate::config::{ConfigError, EvaluationConfig, PATH_VAR};
use crate::interp::InterpolantSlot;
use crate::parser::{self, ParseError};
use crate::stack::LayerStack;

/// Failures constructing a [`SubstrateModel`]. Construction is all-or-nothing:
/// there is no partially usable model to interrogate on error.
#[derive(Debug, Error)]
pub enum SubstrateError {
    #[error("could not open substrate file {0}")]
    FileNotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A layered substrate ready for Green's-function evaluation.
pub struct SubstrateModel {
    stack: LayerStack,
    cache: MaterialResponseCache,
    config: EvaluationConfig,
    interpolant: InterpolantSlot<Box<dyn Any + Send>>,
}

impl SubstrateModel {
    /// Build from a named substrate-description file, resolved through the
    /// `SUBSTRATA_PATH` search list (the bare name is tried first).
    pub fn from_file(name: &str, registry: &MaterialRegistry) -> Result<Self, SubstrateError> {
        let path = resolve_path(name).ok_or_else(|| SubstrateError::FileNotFound(name.into()))?;
        info!(path = %path.display(), "reading substrate definition");
        let reader = BufReader::new(File::open(&path)?);
        let stack = parser::parse_standalone(reader, name, registry)?;
        Self::assemble(stack)
    }

    /// Build from a reader positioned just past the `SUBSTRATE` keyword of a
    /// host document, consuming input through the matching `ENDSUBSTRATE` and
    /// advancing the shared line counter.
    pub fn from_reader(
        reader: impl BufRead,
        line: &mut usize,
        registry: &MaterialRegistry,
    ) -> Result<Self, SubstrateError> {
        let stack = parser::parse_embedded(reader, line, registry)?;
        Self::assemble(stack)
    }

    /// Build from an in-memory description.
    ///
    /// The text is materialized as a temporary file and parsed through the
    /// standalone path; the file is removed on every exit path, success or
    /// failure.
    pub fn from_text(text: &str, registry: &MaterialRegistry) -> Result<Self, SubstrateError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        let path = file.path().to_string_lossy().into_owned();
        // `file` drops (and unlinks) after this call returns, whatever happens
        Self::from_file(&path, registry)
    }

    fn assemble(stack: LayerStack) -> Result<Self, SubstrateError> {
        let config = EvaluationConfig::from_env()?;
        let cache = MaterialResponseCache::new(stack.num_layers());
        Ok(Self {
            stack,
            cache,
            config,
            interpolant: InterpolantSlot::new(),
        })
    }

    /// The parsed layer stack.
    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    /// Number of layers, including both semi-infinite half-spaces.
    pub fn num_layers(&self) -> usize {
        self.stack.num_layers()
    }

    /// Number of dielectric interfaces.
    pub fn num_interfaces(&self) -> usize {
        self.stack.num_interfaces()
    }

    /// Ground-plane depth, if one was declared.
    pub fn ground_plane(&self) -> Option<f64> {
        self.stack.ground_plane()
    }

    /// Index of the layer containing depth `z`.
    pub fn layer_index(&self, z: f64) -> usize {
        self.stack.layer_index(z)
    }

    /// Make the per-layer (ε, μ) cache current for `omega`.
    ///
    /// Call once per frequency before reading [`eps`](Self::eps)/
    /// [`mu`](Self::mu); when assembly is parallelized, call this before the
    /// parallel phase begins.
    pub fn ensure_frequency(&mut self, omega: Complex64) {
        self.cache.ensure(omega, &self.stack);
    }

    /// Cached relative permittivity of `layer` at the last ensured frequency.
    pub fn eps(&self, layer: usize) -> Complex64 {
        self.cache.eps(layer)
    }

    /// Cached relative permeability of `layer` at the last ensured frequency.
    pub fn mu(&self, layer: usize) -> Complex64 {
        self.cache.mu(layer)
    }

    pub fn eps_mu(&self, layer: usize) -> (Complex64, Complex64) {
        self.cache.eps_mu(layer)
    }

    /// The frequency the cache currently holds, in canonical sign.
    pub fn cached_frequency(&self) -> Option<Complex64> {
        self.cache.omega()
    }

    /// The evaluation-configuration snapshot taken at construction.
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Write a human-readable summary of the layer stack to `sink`.
    pub fn describe(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        self.stack.describe(sink)
    }

    /// The scalar-Green's-function table for `(z, omega)`, built on first
    /// need and rebuilt when either key moves. The concrete table type `T`
    /// belongs to the evaluator; a type change also forces a rebuild.
    pub fn interpolant<T: Send + 'static>(
        &mut self,
        z: f64,
        omega: Complex64,
        build: impl FnOnce() -> T,
    ) -> &T {
        if matches!(self.interpolant.get(), Some(table) if !table.is::<T>()) {
            self.interpolant.clear();
        }
        let boxed = self
            .interpolant
            .ensure(z, omega, || Box::new(build()) as Box<dyn Any + Send>);
        boxed
            .downcast_ref::<T>()
            .expect("stored interpolant type checked above")
    }

    /// Keys of the current interpolation table, if one exists.
    pub fn interpolant_keys(&self) -> Option<(f64, Complex64)> {
        self.interpolant.keys()
    }

    /// Drop the interpolation table, if any.
    pub fn clear_interpolant(&mut self) {
        self.interpolant.clear();
    }
}

// Manual impl: the boxed interpolant table is opaque, so only its keys are
// printed.
impl fmt::Debug for SubstrateModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstrateModel")
            .field("stack", &self.stack)
            .field("config", &self.config)
            .field("cached_frequency", &self.cache.omega())
            .field("interpolant_keys", &self.interpolant.keys())
            .finish()
    }
}

/// Try `name` as a path, then each directory in `SUBSTRATA_PATH`.
fn resolve_path(name: &str) -> Option<PathBuf> {
    let direct = PathBuf::from(name);
    if direct.is_file() {
        return Some(direct);
    }
    let dirs = std::env::var(PATH_VAR).ok()?;
    std::env::split_paths(&dirs)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
