//! # Substrata Materials
//!
//! Material property providers for the substrata layered-substrate library.
//! All materials implement the [`MaterialProvider`](provider::MaterialProvider)
//! trait, which returns the complex relative permittivity and permeability at
//! a complex angular frequency.
//!
//! ## Available material models
//!
//! | Model | Module | Notes |
//! |-------|--------|-------|
//! | Dispersionless (ε, μ) | [`constant`] | includes the `CONST_EPS_…` inline grammar |
//! | Drude conductors | [`drude`] | Au, Ag plus custom parameters |
//!
//! ## Lookup
//!
//! Substrate descriptions refer to materials by name. The
//! [`MaterialRegistry`](registry::MaterialRegistry) resolves those names
//! against the built-in models above and any caller-registered providers.

pub mod constant;
pub mod drude;
pub mod provider;
pub mod registry;

pub use constant::ConstantMaterial;
pub use drude::DrudeMaterial;
pub use provider::{MaterialError, MaterialProvider};
pub use registry::MaterialRegistry;
