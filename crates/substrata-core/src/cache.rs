//! Per-frequency material-response cache.
//!
//! Downstream Green's-function evaluation asks for every layer's (ε, μ) many
//! times per frequency. The cache holds the response for the single most
//! recent frequency and recomputes only when the frequency actually moves,
//! so material providers are queried once per frequency rather than once per
//! panel pair.

use num_complex::Complex64;

use crate::stack::LayerStack;

/// Relative tolerance under which two frequencies count as the same sample.
/// Wide enough to absorb floating-point noise, far below any physical
/// frequency step.
const KEY_RTOL: f64 = 1.0e-12;

/// Single-entry cache of per-layer (ε, μ) at the most recent frequency.
///
/// The key is stored in canonical sign: ω and −ω index the same entry, since
/// the material response at −ω is the conjugate-symmetric partner of the one
/// at +ω and the evaluator folds the sign elsewhere.
#[derive(Debug, Clone)]
pub struct MaterialResponseCache {
    omega: Option<Complex64>,
    eps: Vec<Complex64>,
    mu: Vec<Complex64>,
}

impl MaterialResponseCache {
    pub(crate) fn new(num_layers: usize) -> Self {
        let zero = Complex64::new(0.0, 0.0);
        Self {
            omega: None,
            eps: vec![zero; num_layers],
            mu: vec![zero; num_layers],
        }
    }

    /// Make the cache current for `omega`, recomputing per-layer (ε, μ) only
    /// if the (sign-normalized) frequency differs from the cached key.
    ///
    /// Must run before [`eps`](Self::eps)/[`mu`](Self::mu) are read for a new
    /// frequency. Mutates the cache; concurrent callers must serialize (see
    /// the crate-level concurrency notes on
    /// [`SubstrateModel`](crate::SubstrateModel)).
    pub fn ensure(&mut self, omega: Complex64, stack: &LayerStack) {
        let omega = canonical_sign(omega);
        if let Some(key) = self.omega {
            if nearly_equal(key, omega) {
                return;
            }
        }
        for (n, layer) in stack.layers().iter().enumerate() {
            let (eps, mu) = layer.material.eps_mu(omega);
            self.eps[n] = eps;
            self.mu[n] = mu;
        }
        self.omega = Some(omega);
    }

    /// The cached (sign-normalized) frequency, if any frequency was set.
    pub fn omega(&self) -> Option<Complex64> {
        self.omega
    }

    /// Cached relative permittivity of `layer`.
    pub fn eps(&self, layer: usize) -> Complex64 {
        self.eps[layer]
    }

    /// Cached relative permeability of `layer`.
    pub fn mu(&self, layer: usize) -> Complex64 {
        self.mu[layer]
    }

    pub fn eps_mu(&self, layer: usize) -> (Complex64, Complex64) {
        (self.eps[layer], self.mu[layer])
    }
}

fn canonical_sign(omega: Complex64) -> Complex64 {
    if omega.re < 0.0 {
        -omega
    } else {
        omega
    }
}

fn nearly_equal(a: Complex64, b: Complex64) -> bool {
    let scale = a.norm().max(b.norm());
    (a - b).norm() <= KEY_RTOL * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Layer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use substrata_materials::MaterialProvider;

    /// Counts how many times the providers are actually queried.
    struct CountingMaterial {
        calls: Arc<AtomicUsize>,
    }

    impl MaterialProvider for CountingMaterial {
        fn name(&self) -> &str {
            "counting"
        }

        fn eps_mu(&self, _omega: Complex64) -> (Complex64, Complex64) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (Complex64::new(2.0, 0.0), Complex64::new(1.0, 0.0))
        }
    }

    fn counting_stack(calls: &Arc<AtomicUsize>) -> LayerStack {
        let material = Arc::new(CountingMaterial {
            calls: Arc::clone(calls),
        });
        let mut stack = LayerStack::new(Layer::new("counting", material.clone()));
        stack
            .push_layer(-1.0, Layer::new("counting", material))
            .unwrap();
        stack
    }

    #[test]
    fn repeated_frequency_hits_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stack = counting_stack(&calls);
        let mut cache = MaterialResponseCache::new(stack.num_layers());

        let omega = Complex64::new(3.0e15, 0.0);
        cache.ensure(omega, &stack);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        cache.ensure(omega, &stack);
        assert_eq!(calls.load(Ordering::SeqCst), 2, "second call must not recompute");
    }

    #[test]
    fn sign_flipped_frequency_hits_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stack = counting_stack(&calls);
        let mut cache = MaterialResponseCache::new(stack.num_layers());

        let omega = Complex64::new(3.0e15, 1.0e13);
        cache.ensure(omega, &stack);
        cache.ensure(-omega, &stack);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.omega(), Some(omega));
    }

    #[test]
    fn float_noise_does_not_invalidate() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stack = counting_stack(&calls);
        let mut cache = MaterialResponseCache::new(stack.num_layers());

        let omega = Complex64::new(3.0e15, 0.0);
        cache.ensure(omega, &stack);
        cache.ensure(omega * (1.0 + 1.0e-15), &stack);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn new_frequency_recomputes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stack = counting_stack(&calls);
        let mut cache = MaterialResponseCache::new(stack.num_layers());

        cache.ensure(Complex64::new(3.0e15, 0.0), &stack);
        cache.ensure(Complex64::new(4.0e15, 0.0), &stack);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(cache.eps(0), Complex64::new(2.0, 0.0));
        assert_eq!(cache.mu(1), Complex64::new(1.0, 0.0));
    }
}
