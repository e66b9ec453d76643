//! Material property provider trait.
//!
//! All material models implement [`MaterialProvider`], which returns
//! frequency-dependent complex permittivities and permeabilities. Lookup by
//! name (the fallible step) lives in [`registry`](crate::registry);
//! evaluation at a frequency is infallible by design, so the hot path of a
//! frequency sweep never touches a `Result`.

use std::fmt;

use num_complex::Complex64;
use thiserror::Error;

/// Errors from material lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MaterialError {
    #[error("unknown material {0}")]
    Unknown(String),

    #[error("bad constant-material specification {spec}: {message}")]
    BadConstantSpec { spec: String, message: String },
}

/// Provides frequency-dependent material properties.
///
/// Frequencies are complex angular frequencies in rad/s; a nonzero imaginary
/// part supports evaluation off the real axis (e.g. on the positive imaginary
/// axis for Matsubara sums).
pub trait MaterialProvider: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str;

    /// Relative permittivity and permeability (ε, μ) at angular frequency ω.
    fn eps_mu(&self, omega: Complex64) -> (Complex64, Complex64);

    /// Relative permittivity alone.
    fn eps(&self, omega: Complex64) -> Complex64 {
        self.eps_mu(omega).0
    }

    /// Complex refractive index $\tilde{n} = \sqrt{\epsilon \mu}$.
    fn refractive_index(&self, omega: Complex64) -> Complex64 {
        let (eps, mu) = self.eps_mu(omega);
        (eps * mu).sqrt()
    }
}

impl fmt::Debug for dyn MaterialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialProvider({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant::ConstantMaterial;
    use std::sync::Arc;

    #[test]
    fn trait_objects_are_debuggable() {
        let silicon: Arc<dyn MaterialProvider> =
            Arc::new(ConstantMaterial::dielectric("SILICON", 11.7));
        assert_eq!(format!("{silicon:?}"), "MaterialProvider(SILICON)");
    }
}
