//! Lazily built scalar-Green's-function interpolant slot.
//!
//! Evaluators tabulate the scalar Green's function over transverse distance
//! for a fixed source depth and frequency; the table is expensive to build
//! and valid only for the (z, ω) pair it was built at. The slot owns at most
//! one such table, rebuilds it when either key moves, and drops it with the
//! owning model. The table type itself is opaque to this crate.

use num_complex::Complex64;

/// Relative tolerance under which a key is considered unchanged.
const KEY_RTOL: f64 = 1.0e-12;

/// Holds at most one interpolation table keyed by the (z, ω) it was built for.
#[derive(Debug, Default)]
pub struct InterpolantSlot<T> {
    entry: Option<Entry<T>>,
}

#[derive(Debug)]
struct Entry<T> {
    z: f64,
    omega: Complex64,
    table: T,
}

impl<T> InterpolantSlot<T> {
    pub fn new() -> Self {
        Self { entry: None }
    }

    /// Keys of the current table, if one exists.
    pub fn keys(&self) -> Option<(f64, Complex64)> {
        self.entry.as_ref().map(|e| (e.z, e.omega))
    }

    /// Return the table for `(z, omega)`, invoking `build` only when the slot
    /// is empty or keyed to a different point. Key drift within
    /// floating-point noise reuses the existing table.
    pub fn ensure(&mut self, z: f64, omega: Complex64, build: impl FnOnce() -> T) -> &T {
        let stale = match &self.entry {
            Some(e) => !same_real(e.z, z) || !same_complex(e.omega, omega),
            None => true,
        };
        if stale {
            self.entry = Some(Entry {
                z,
                omega,
                table: build(),
            });
        }
        // entry was just populated if it was stale
        &self
            .entry
            .as_ref()
            .expect("interpolant slot populated above")
            .table
    }

    /// The current table regardless of its keys, if one exists.
    pub fn get(&self) -> Option<&T> {
        self.entry.as_ref().map(|e| &e.table)
    }

    /// Drop the current table, if any.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

fn same_real(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= KEY_RTOL * scale
}

fn same_complex(a: Complex64, b: Complex64) -> bool {
    let scale = a.norm().max(b.norm());
    (a - b).norm() <= KEY_RTOL * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn builds_once_per_key() {
        let builds = Cell::new(0);
        let mut slot = InterpolantSlot::new();
        let omega = Complex64::new(3.0e15, 0.0);

        let make = || {
            builds.set(builds.get() + 1);
            vec![1.0, 2.0, 3.0]
        };
        slot.ensure(-0.5, omega, make);
        slot.ensure(-0.5, omega, make);
        assert_eq!(builds.get(), 1);
        assert_eq!(slot.keys(), Some((-0.5, omega)));
    }

    #[test]
    fn key_change_rebuilds() {
        let builds = Cell::new(0);
        let mut slot = InterpolantSlot::new();
        let omega = Complex64::new(3.0e15, 0.0);
        let make = || builds.set(builds.get() + 1);

        slot.ensure(-0.5, omega, make);
        slot.ensure(-0.7, omega, make); // depth moved
        slot.ensure(-0.7, omega * 1.5, make); // frequency moved
        assert_eq!(builds.get(), 3);
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut slot = InterpolantSlot::new();
        slot.ensure(0.0, Complex64::new(1.0, 0.0), || 7_u32);
        slot.clear();
        assert_eq!(slot.keys(), None);
    }
}
