//! Name-to-provider lookup.
//!
//! Resolution order: caller-registered providers, the `CONST_EPS_…` inline
//! grammar, then the built-in table. All matching is case-insensitive.

use std::collections::HashMap;
use std::sync::Arc;

use crate::constant::ConstantMaterial;
use crate::drude::DrudeMaterial;
use crate::provider::{MaterialError, MaterialProvider};

/// Resolves material names to property providers.
///
/// Built-in materials:
///
/// | Name | Model |
/// |------|-------|
/// | `VACUUM` | ε = μ = 1 |
/// | `SILICON` | ε = 11.7 |
/// | `SIO2` | ε = 3.9 |
/// | `SAPPHIRE` | ε = 9.4 |
/// | `GAAS` | ε = 12.9 |
/// | `GOLD`, `SILVER` | Drude model |
///
/// The dielectric constants are static (low-frequency) values, the usual
/// convention for substrate work below the optical range.
#[derive(Default)]
pub struct MaterialRegistry {
    custom: HashMap<String, Arc<dyn MaterialProvider>>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a caller-supplied provider under its own name, shadowing any
    /// built-in with the same name.
    pub fn register(&mut self, provider: Arc<dyn MaterialProvider>) {
        self.custom
            .insert(provider.name().to_ascii_uppercase(), provider);
    }

    /// Resolve `name` to a provider.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn MaterialProvider>, MaterialError> {
        let key = name.to_ascii_uppercase();
        if let Some(provider) = self.custom.get(&key) {
            return Ok(Arc::clone(provider));
        }
        if let Some(parsed) = ConstantMaterial::parse_spec(name) {
            return parsed.map(|mat| Arc::new(mat) as Arc<dyn MaterialProvider>);
        }
        let builtin: Arc<dyn MaterialProvider> = match key.as_str() {
            "VACUUM" => Arc::new(ConstantMaterial::vacuum()),
            "SILICON" => Arc::new(ConstantMaterial::dielectric("SILICON", 11.7)),
            "SIO2" => Arc::new(ConstantMaterial::dielectric("SIO2", 3.9)),
            "SAPPHIRE" => Arc::new(ConstantMaterial::dielectric("SAPPHIRE", 9.4)),
            "GAAS" => Arc::new(ConstantMaterial::dielectric("GAAS", 12.9)),
            "GOLD" => Arc::new(DrudeMaterial::gold()),
            "SILVER" => Arc::new(DrudeMaterial::silver()),
            _ => return Err(MaterialError::Unknown(name.to_string())),
        };
        Ok(builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn builtins_resolve_case_insensitively() {
        let registry = MaterialRegistry::new();
        let si = registry.lookup("silicon").unwrap();
        assert_eq!(si.eps(Complex64::new(1.0, 0.0)).re, 11.7);
        assert!(registry.lookup("SiO2").is_ok());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let registry = MaterialRegistry::new();
        let err = registry.lookup("unobtainium").unwrap_err();
        assert_eq!(err, MaterialError::Unknown("unobtainium".into()));
    }

    #[test]
    fn const_eps_grammar_resolves() {
        let registry = MaterialRegistry::new();
        let mat = registry.lookup("CONST_EPS_4.0").unwrap();
        assert_eq!(mat.eps(Complex64::new(1.0, 0.0)).re, 4.0);
    }

    #[test]
    fn multibyte_material_name_is_merely_unknown() {
        let registry = MaterialRegistry::new();
        let err = registry.lookup("CONST_EPS\u{e9}").unwrap_err();
        assert_eq!(err, MaterialError::Unknown("CONST_EPS\u{e9}".into()));
    }

    #[test]
    fn malformed_const_eps_surfaces_the_spec_error() {
        let registry = MaterialRegistry::new();
        assert!(matches!(
            registry.lookup("CONST_EPS_"),
            Err(MaterialError::BadConstantSpec { .. })
        ));
    }

    #[test]
    fn registered_provider_shadows_builtin() {
        let mut registry = MaterialRegistry::new();
        registry.register(Arc::new(ConstantMaterial::dielectric("Silicon", 12.1)));
        let si = registry.lookup("SILICON").unwrap();
        assert_eq!(si.eps(Complex64::new(1.0, 0.0)).re, 12.1);
    }
}
