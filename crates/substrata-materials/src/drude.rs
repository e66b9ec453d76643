//! Drude-model conductors.
//!
//! $\epsilon(\omega) = \epsilon_\infty - \dfrac{\omega_p^2}{\omega^2 + i\gamma\omega}$
//!
//! with plasma frequency $\omega_p$ and collision rate $\gamma$ in rad/s.
//! Adequate for noble metals in the infrared and below; interband transitions
//! are not modelled.

use num_complex::Complex64;

use crate::provider::MaterialProvider;

/// Drude-model metal with frequency-dependent permittivity and μ = 1.
#[derive(Debug, Clone, PartialEq)]
pub struct DrudeMaterial {
    name: String,
    eps_inf: f64,
    omega_p: f64,
    gamma: f64,
}

impl DrudeMaterial {
    /// Construct from explicit Drude parameters (rad/s).
    pub fn new(name: impl Into<String>, eps_inf: f64, omega_p: f64, gamma: f64) -> Self {
        Self {
            name: name.into(),
            eps_inf,
            omega_p,
            gamma,
        }
    }

    /// Gold: $\omega_p = 1.37 \times 10^{16}$ rad/s, $\gamma = 5.32 \times 10^{13}$ rad/s.
    pub fn gold() -> Self {
        Self::new("GOLD", 1.0, 1.37e16, 5.32e13)
    }

    /// Silver: $\omega_p = 1.37 \times 10^{16}$ rad/s, $\gamma = 2.73 \times 10^{13}$ rad/s.
    pub fn silver() -> Self {
        Self::new("SILVER", 1.0, 1.37e16, 2.73e13)
    }
}

impl MaterialProvider for DrudeMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn eps_mu(&self, omega: Complex64) -> (Complex64, Complex64) {
        let wp2 = Complex64::new(self.omega_p * self.omega_p, 0.0);
        let denom = omega * omega + Complex64::new(0.0, self.gamma) * omega;
        let eps = Complex64::new(self.eps_inf, 0.0) - wp2 / denom;
        (eps, Complex64::new(1.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_is_metallic_in_the_visible() {
        // At λ = 800 nm (ω ≈ 2.36e15 rad/s) gold has Re ε < 0 and Im ε > 0.
        let omega = Complex64::new(2.36e15, 0.0);
        let eps = DrudeMaterial::gold().eps(omega);
        assert!(eps.re < 0.0, "Re ε = {}", eps.re);
        assert!(eps.im > 0.0, "Im ε = {}", eps.im);
    }

    #[test]
    fn imaginary_axis_evaluation_is_real() {
        // On the positive imaginary frequency axis ε is real and > 1.
        let xi = Complex64::new(0.0, 1.0e15);
        let eps = DrudeMaterial::gold().eps(xi);
        assert!(eps.im.abs() < 1e-9 * eps.re.abs());
        assert!(eps.re > 1.0);
    }
}
