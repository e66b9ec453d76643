//! Dispersionless materials with fixed (ε, μ).
//!
//! Besides named constants registered in the
//! [`MaterialRegistry`](crate::registry::MaterialRegistry), substrate
//! descriptions may spell a constant material inline:
//!
//! ```text
//! CONST_EPS_11.7              ε = 11.7,        μ = 1
//! CONST_EPS_2.1+0.05I         ε = 2.1 + 0.05i, μ = 1
//! CONST_EPS_11.7_MU_0.99      ε = 11.7,        μ = 0.99
//! ```
//!
//! The keyword and the trailing `I` are case-insensitive.

use num_complex::Complex64;

use crate::provider::{MaterialError, MaterialProvider};

const CONST_EPS_PREFIX: &str = "CONST_EPS_";
const MU_SEPARATOR: &str = "_MU_";

/// A material whose (ε, μ) do not depend on frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantMaterial {
    name: String,
    eps: Complex64,
    mu: Complex64,
}

impl ConstantMaterial {
    /// Construct from explicit permittivity and permeability.
    pub fn new(name: impl Into<String>, eps: Complex64, mu: Complex64) -> Self {
        Self {
            name: name.into(),
            eps,
            mu,
        }
    }

    /// Vacuum: ε = μ = 1.
    pub fn vacuum() -> Self {
        Self::new("VACUUM", Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0))
    }

    /// A lossless non-magnetic dielectric with real permittivity `eps`.
    pub fn dielectric(name: impl Into<String>, eps: f64) -> Self {
        Self::new(name, Complex64::new(eps, 0.0), Complex64::new(1.0, 0.0))
    }

    /// Parse a `CONST_EPS_…` inline specification.
    ///
    /// Returns `None` if `spec` does not carry the `CONST_EPS_` prefix (it is
    /// then an ordinary material name), `Some(Err(..))` if the prefix is
    /// present but the remainder is malformed.
    pub fn parse_spec(spec: &str) -> Option<Result<Self, MaterialError>> {
        // Compare raw bytes: slicing the str would panic if a multibyte
        // character straddles the prefix boundary.
        let prefix = CONST_EPS_PREFIX.as_bytes();
        if spec.len() < prefix.len() || !spec.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return None;
        }
        // The first prefix.len() bytes are ASCII, so this is a char boundary.
        let body = &spec[prefix.len()..];

        let bad = |message: &str| MaterialError::BadConstantSpec {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let (eps_text, mu_text) = match split_once_ignore_case(body, MU_SEPARATOR) {
            Some((eps_text, mu_text)) => (eps_text, Some(mu_text)),
            None => (body, None),
        };

        let eps = match parse_complex(eps_text) {
            Some(eps) => eps,
            None => return Some(Err(bad("unparseable permittivity"))),
        };
        let mu = match mu_text {
            Some(text) => match parse_complex(text) {
                Some(mu) => mu,
                None => return Some(Err(bad("unparseable permeability"))),
            },
            None => Complex64::new(1.0, 0.0),
        };

        Some(Ok(Self::new(spec, eps, mu)))
    }
}

impl MaterialProvider for ConstantMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn eps_mu(&self, _omega: Complex64) -> (Complex64, Complex64) {
        (self.eps, self.mu)
    }
}

/// Split `text` around the first case-insensitive occurrence of `sep`.
fn split_once_ignore_case<'a>(text: &'a str, sep: &str) -> Option<(&'a str, &'a str)> {
    let upper = text.to_ascii_uppercase();
    let at = upper.find(sep)?;
    Some((&text[..at], &text[at + sep.len()..]))
}

/// Parse `re`, `re+imI`, or `re-imI` (trailing `I` case-insensitive).
fn parse_complex(text: &str) -> Option<Complex64> {
    if let Ok(re) = text.parse::<f64>() {
        return Some(Complex64::new(re, 0.0));
    }
    let body = text.strip_suffix(['i', 'I'])?;
    // Scan for the sign separating the two parts, skipping a leading sign and
    // signs that belong to an exponent.
    let bytes = body.as_bytes();
    for at in (1..body.len()).rev() {
        if (bytes[at] == b'+' || bytes[at] == b'-')
            && bytes[at - 1] != b'e'
            && bytes[at - 1] != b'E'
        {
            let re = body[..at].parse::<f64>().ok()?;
            let im = body[at..].parse::<f64>().ok()?;
            return Some(Complex64::new(re, im));
        }
    }
    // Pure imaginary, e.g. "0.5I"
    let im = body.parse::<f64>().ok()?;
    Some(Complex64::new(0.0, im))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vacuum_is_unity() {
        let vac = ConstantMaterial::vacuum();
        let (eps, mu) = vac.eps_mu(Complex64::new(3.0e15, 0.0));
        assert_eq!(eps, Complex64::new(1.0, 0.0));
        assert_eq!(mu, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn parse_real_eps() {
        let mat = ConstantMaterial::parse_spec("CONST_EPS_11.7").unwrap().unwrap();
        assert_relative_eq!(mat.eps(Complex64::new(1.0, 0.0)).re, 11.7);
        assert_eq!(mat.eps_mu(Complex64::new(1.0, 0.0)).1, Complex64::new(1.0, 0.0));
    }

    #[test]
    fn parse_complex_eps_and_mu() {
        let mat = ConstantMaterial::parse_spec("const_eps_2.1+0.05i_mu_0.99")
            .unwrap()
            .unwrap();
        let (eps, mu) = mat.eps_mu(Complex64::new(1.0, 0.0));
        assert_relative_eq!(eps.re, 2.1);
        assert_relative_eq!(eps.im, 0.05);
        assert_relative_eq!(mu.re, 0.99);
    }

    #[test]
    fn parse_negative_imaginary_part() {
        let mat = ConstantMaterial::parse_spec("CONST_EPS_1.5e1-2.0e-1I")
            .unwrap()
            .unwrap();
        let eps = mat.eps(Complex64::new(1.0, 0.0));
        assert_relative_eq!(eps.re, 15.0);
        assert_relative_eq!(eps.im, -0.2);
    }

    #[test]
    fn non_const_name_passes_through() {
        assert!(ConstantMaterial::parse_spec("SILICON").is_none());
    }

    #[test]
    fn multibyte_name_at_the_prefix_boundary_passes_through() {
        // 'é' occupies bytes 9..11, straddling the 10-byte prefix length;
        // this must be an ordinary non-match, not a panic.
        assert!(ConstantMaterial::parse_spec("CONST_EPS\u{e9}").is_none());
        assert!(ConstantMaterial::parse_spec("ε-glass").is_none());
    }

    #[test]
    fn malformed_spec_is_an_error() {
        let err = ConstantMaterial::parse_spec("CONST_EPS_abc").unwrap();
        assert!(matches!(err, Err(MaterialError::BadConstantSpec { .. })));
    }
}
