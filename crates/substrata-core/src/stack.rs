//! Validated layer-stack data model.
//!
//! A stack is an ordered sequence of material layers separated by planar
//! interfaces at strictly decreasing depths, optionally terminated from below
//! by a perfectly conducting ground plane. Layer 0 is the semi-infinite upper
//! half-space; layer `i` spans `z_interface[i-1] >= z > z_interface[i]`, and
//! the deepest layer extends down to the ground plane or to z = −∞.
//!
//! Construction goes through the parser; once built, no topology mutation is
//! exposed.

use std::fmt;
use std::io;
use std::sync::Arc;

use substrata_materials::MaterialProvider;

/// One material layer.
#[derive(Clone)]
pub struct Layer {
    /// Material name as written in the substrate description.
    pub name: String,
    /// Property provider for this layer's material.
    pub material: Arc<dyn MaterialProvider>,
}

impl Layer {
    pub fn new(name: impl Into<String>, material: Arc<dyn MaterialProvider>) -> Self {
        Self {
            name: name.into(),
            material,
        }
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer").field("name", &self.name).finish()
    }
}

/// Rejected insertion: the new interface lies above the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DepthOrderError {
    pub(crate) z: f64,
    pub(crate) previous: f64,
}

/// An ordered stack of planar material layers.
pub struct LayerStack {
    layers: Vec<Layer>,
    z_interface: Vec<f64>,
    ground_plane: Option<f64>,
}

impl LayerStack {
    /// Start a stack consisting only of the upper half-space.
    pub(crate) fn new(upper_half_space: Layer) -> Self {
        Self {
            layers: vec![upper_half_space],
            z_interface: Vec::new(),
            ground_plane: None,
        }
    }

    /// Replace the upper half-space material (the `MEDIUM` statement).
    pub(crate) fn set_medium(&mut self, layer: Layer) {
        self.layers[0] = layer;
    }

    /// Append an interface at depth `z` with a new layer below it.
    ///
    /// Fails when `z` lies above the most recently added interface; layers
    /// must be supplied top to bottom.
    pub(crate) fn push_layer(&mut self, z: f64, layer: Layer) -> Result<(), DepthOrderError> {
        if let Some(&last) = self.z_interface.last() {
            if z > last {
                return Err(DepthOrderError { z, previous: last });
            }
        }
        self.z_interface.push(z);
        self.layers.push(layer);
        Ok(())
    }

    /// Set the ground-plane depth. A later call overwrites the earlier one.
    pub(crate) fn set_ground_plane(&mut self, z: f64) {
        self.ground_plane = Some(z);
    }

    /// True unless a ground plane exists strictly above the deepest interface.
    pub(crate) fn ground_plane_below_layers(&self) -> bool {
        match (self.ground_plane, self.z_interface.last()) {
            (Some(gp), Some(&deepest)) => gp <= deepest,
            _ => true,
        }
    }

    /// Number of layers, including both semi-infinite half-spaces.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of dielectric interfaces (excludes the ground plane).
    pub fn num_interfaces(&self) -> usize {
        self.z_interface.len()
    }

    /// Interface depths, strictly decreasing.
    pub fn interfaces(&self) -> &[f64] {
        &self.z_interface
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    /// Ground-plane depth, if one was declared.
    pub fn ground_plane(&self) -> Option<f64> {
        self.ground_plane
    }

    /// Index of the layer containing depth `z`.
    ///
    /// A depth exactly on an interface belongs to the layer *below* it: the
    /// result is the smallest `i` with `z > z_interface[i]`, or the deepest
    /// layer index when no interface is exceeded. Interface counts are small
    /// (rarely above a dozen), so a linear scan suffices.
    pub fn layer_index(&self, z: f64) -> usize {
        for (i, &zi) in self.z_interface.iter().enumerate() {
            if z > zi {
                return i;
            }
        }
        self.z_interface.len()
    }

    /// Write a human-readable summary of the stack to `sink`.
    ///
    /// Diagnostic only; nothing downstream consumes the output.
    pub fn describe(&self, sink: &mut dyn io::Write) -> io::Result<()> {
        let width = self
            .layers
            .iter()
            .map(|layer| layer.name.len())
            .max()
            .unwrap_or(0);

        writeln!(sink, "Multilayered dielectric substrate:")?;
        for (i, layer) in self.layers.iter().enumerate() {
            let upper = i.checked_sub(1).map(|j| self.z_interface[j]);
            let lower = self
                .z_interface
                .get(i)
                .copied()
                .or_else(|| {
                    if i + 1 == self.layers.len() {
                        self.ground_plane
                    } else {
                        None
                    }
                });
            let range = match (lower, upper) {
                (Some(lo), Some(up)) => format!("{:<10} < z < {:<10}", lo, up),
                (Some(lo), None) => format!("             z > {:<10}", lo),
                (None, Some(up)) => format!("             z < {:<10}", up),
                (None, None) => "all z".to_string(),
            };
            writeln!(sink, "  Layer {:2} ({:<width$}): {}", i, layer.name, range)?;
        }
        if let Some(gp) = self.ground_plane {
            writeln!(sink, "  Ground plane at z={}.", gp)?;
        }
        Ok(())
    }
}

impl fmt::Debug for LayerStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStack")
            .field("layers", &self.layers)
            .field("z_interface", &self.z_interface)
            .field("ground_plane", &self.ground_plane)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use substrata_materials::ConstantMaterial;

    fn test_stack(interfaces: &[f64]) -> LayerStack {
        let mut stack = LayerStack::new(Layer::new(
            "VACUUM",
            Arc::new(ConstantMaterial::vacuum()),
        ));
        for (i, &z) in interfaces.iter().enumerate() {
            stack
                .push_layer(
                    z,
                    Layer::new(
                        format!("L{}", i + 1),
                        Arc::new(ConstantMaterial::dielectric("x", 2.0)),
                    ),
                )
                .unwrap();
        }
        stack
    }

    #[test]
    fn push_rejects_ascending_depths() {
        let mut stack = test_stack(&[-1.0]);
        let layer = Layer::new("bad", Arc::new(ConstantMaterial::vacuum()));
        let err = stack.push_layer(-0.5, layer).unwrap_err();
        assert_eq!(
            err,
            DepthOrderError {
                z: -0.5,
                previous: -1.0
            }
        );
    }

    #[test]
    fn push_accepts_equal_depth() {
        // A zero-thickness layer is legal; only strictly ascending fails.
        let mut stack = test_stack(&[-1.0]);
        let layer = Layer::new("thin", Arc::new(ConstantMaterial::vacuum()));
        assert!(stack.push_layer(-1.0, layer).is_ok());
    }

    #[test]
    fn layer_index_boundary_is_strict() {
        let stack = test_stack(&[-1.0, -2.0]);
        // A depth exactly on an interface belongs to the layer below.
        assert_eq!(stack.layer_index(-1.0), 1);
        assert_eq!(stack.layer_index(-2.0), 2);
    }

    #[test]
    fn layer_index_is_monotonic() {
        let stack = test_stack(&[0.5, -1.0, -2.5]);
        let samples = [3.0, 0.5, 0.0, -0.99, -1.0, -2.0, -2.5, -7.0];
        for pair in samples.windows(2) {
            assert!(
                stack.layer_index(pair[0]) <= stack.layer_index(pair[1]),
                "layer_index not monotonic between z={} and z={}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn layer_index_with_no_interfaces() {
        let stack = test_stack(&[]);
        assert_eq!(stack.layer_index(5.0), 0);
        assert_eq!(stack.layer_index(-5.0), 0);
    }

    #[test]
    fn describe_reports_every_interface() {
        let stack = test_stack(&[-1.0, -2.5]);
        let mut out = Vec::new();
        stack.describe(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for &z in stack.interfaces() {
            assert!(
                text.contains(&z.to_string()),
                "describe output missing interface {}: {}",
                z,
                text
            );
        }
        assert_eq!(text.matches("Layer").count(), stack.num_layers());
    }

    #[test]
    fn describe_with_ground_plane_only() {
        let mut stack = test_stack(&[]);
        stack.set_ground_plane(0.0);
        let mut out = Vec::new();
        stack.describe(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("z > 0"));
        assert!(text.contains("Ground plane at z=0."));
    }
}
