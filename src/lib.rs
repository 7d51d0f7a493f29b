// [src/lib.rs]

//! Constant-time arithmetic for the Helios/Selene 2-cycle of prime-order
//! elliptic curves, targeting FCMP++-style proof systems.
//!
//! Helios is defined over `F_p` (`p = 2^255 - 19`) with `|Helios| = q`;
//! Selene is defined over `F_q` (`q = 2^255 - gamma`, `gamma` a 127-bit
//! Crandall prime) with `|Selene| = p`. Both are short-Weierstrass curves
//! `y^2 = x^3 - 3x + B` sharing one generic Jacobian-point implementation
//! ([`curve`]) parameterised by [`curve::CurveField`] / [`curve::CurveParams`].
//!
//! Scalar-dependent operations ([`scalar_mult`]) run in constant time;
//! operations on public data (deserialisation, [`hash_to_curve`], [`msm`],
//! [`divisor`]) do not, and are named `_vartime` where that distinction
//! matters.

/// Point and field deserialisation failures, the `sqrt` non-residue case,
/// and the divisor engine's size rejection.
pub mod errors;

/// `F_p` arithmetic for `p = 2^255 - 19`, radix-2^51 five-limb backend.
pub mod fp;

/// `F_q` arithmetic for `q = 2^255 - gamma`, with two-pass Crandall folding.
pub mod fq;

/// Per-curve constants: the Weierstrass `B` coefficient and the
/// Simplified-SWU hash-to-curve parameters for each curve.
pub mod constants;

/// Generic Jacobian/affine point arithmetic shared by both curves.
pub mod curve;

/// The `HeliosCurve`/`SeleneCurve` marker types and their point aliases.
pub mod point;

/// Runtime CPU-feature detection and backend selection.
pub mod platform;

/// Constant-time signed-window scalar multiplication (single and fixed-base).
pub mod scalar_mult;

/// Variable-time scalar multiplication and multi-scalar multiplication
/// (wNAF, Straus, Pippenger).
pub mod msm;

/// Curve-to-curve bridging: reinterpreting one curve's x-coordinate as the
/// other curve's scalar.
pub mod bridge;

/// Simplified SWU hash-to-curve (RFC 9380 section 6.6.2).
pub mod hash_to_curve;

/// Nothing-up-my-sleeve generator derivation via hash-to-curve.
pub mod generators;

/// Pedersen vector commitments built from a single MSM call.
pub mod pedersen;

/// Dense univariate polynomial arithmetic over a curve's base field.
pub mod poly;

/// Divisor construction and evaluation for `n`-point input sets.
pub mod divisor;

/// Commonly imported types and functions, re-exported under one path.
pub mod prelude {
    pub use crate::bridge::{helios_x_as_selene_scalar, selene_x_as_helios_scalar};
    pub use crate::curve::{Affine, CurveField, CurveParams, Jacobian};
    pub use crate::divisor::{self, Divisor};
    pub use crate::errors::{Error, Result};
    pub use crate::fp::Fp;
    pub use crate::fq::Fq;
    pub use crate::generators;
    pub use crate::hash_to_curve::{helios_map_to_curve, selene_map_to_curve};
    pub use crate::msm::{msm_vartime, scalar_mult_vartime};
    pub use crate::pedersen::PedersenGenerators;
    pub use crate::platform::{backend, Backend};
    pub use crate::point::{
        HeliosAffine, HeliosCurve, HeliosPoint, SeleneAffine, SeleneCurve, SelenePoint,
    };
    pub use crate::poly::Poly;
    pub use crate::scalar_mult::{scalar_mult_ct, FixedBaseTable};
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn backend_detection_runs_at_first_use() {
        let _ = backend();
    }

    #[test]
    fn a_full_pipeline_smoke_test() {
        // scalar mult -> affine -> divisor -> evaluate, exercising most of
        // the public surface in one pass.
        let base = generators::helios_base_point();
        let mut scalar = [0u8; 32];
        scalar[0] = 7;
        let p = scalar_mult_ct::<HeliosCurve>(&base, &scalar).to_affine();

        let divisor = divisor::compute::<HeliosCurve>(&[p]).unwrap();
        assert_eq!(divisor.evaluate(p.x, p.y), Fp::ZERO);
    }
}
