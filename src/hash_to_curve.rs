//! Simplified SWU map-to-curve (RFC 9380 §6.6.2).
//!
//! Ported bit-exact for Helios from
//! `original_source/helios/src/portable/helios_map_to_curve.cpp`, and
//! generalised here over [`CurveParams`] so Selene reuses the same
//! algorithm against its own (lazily-derived) constants. This module takes
//! field elements directly, not arbitrary-length messages: expanding a
//! message to a field element (`hash_to_field`) is this crate's caller's
//! responsibility, per this crate's Non-goals.

use crate::curve::{Affine, CurveField, CurveParams, Jacobian};
use crate::fp::Fp;
use crate::fq::Fq;
use crate::{constants, point};

/// The four Simplified-SWU parameters `(Z, A, -B/A, B/(Z*A))` for a curve.
pub trait SswuParams: CurveParams {
    fn sswu_constants() -> (Self::Field, Self::Field, Self::Field, Self::Field);
}

impl SswuParams for point::HeliosCurve {
    fn sswu_constants() -> (Fp, Fp, Fp, Fp) {
        constants::helios_sswu_constants()
    }
}

impl SswuParams for point::SeleneCurve {
    fn sswu_constants() -> (Fq, Fq, Fq, Fq) {
        constants::selene_sswu_constants()
    }
}

/// Maps one field element to a curve point via Simplified SWU.
pub fn map_to_curve<C: SswuParams>(u: C::Field) -> Jacobian<C> {
    let (z, a, neg_b_over_a, b_over_za) = C::sswu_constants();
    let b = C::b();

    let u2 = u.square();
    let zu2 = z.mul(&u2);
    let u4 = u2.square();
    let z2 = z.square();
    let z2u4 = z2.mul(&u4);
    let denom = z2u4.add(&zu2);

    let x1 = if bool::from(denom.is_nonzero()) {
        let tv1 = denom.invert();
        let one_plus_tv1 = C::Field::ONE.add(&tv1);
        neg_b_over_a.mul(&one_plus_tv1)
    } else {
        b_over_za
    };

    let gx1 = {
        let x1_sq = x1.square();
        let x1_cu = x1_sq.mul(&x1);
        let ax1 = a.mul(&x1);
        x1_cu.add(&ax1).add(&b)
    };

    let x2 = zu2.mul(&x1);
    let gx2 = {
        let x2_sq = x2.square();
        let x2_cu = x2_sq.mul(&x2);
        let ax2 = a.mul(&x2);
        x2_cu.add(&ax2).add(&b)
    };

    let (sqrt_gx1, gx1_is_square) = gx1.sqrt();
    let (x, y) = if bool::from(gx1_is_square) {
        (x1, sqrt_gx1)
    } else {
        let (y2, _) = gx2.sqrt();
        (x2, y2)
    };

    let u_sign = u.is_negative();
    let y_sign = y.is_negative();
    let y = if bool::from(u_sign) != bool::from(y_sign) {
        y.neg()
    } else {
        y
    };

    Jacobian::from_affine(&Affine::new(x, y, subtle::Choice::from(0)))
}

/// Maps two field elements to curve points and sums them (`encode_to_curve`
/// style double mapping, matching `helios_map_to_curve2_portable`).
pub fn map_to_curve2<C: SswuParams>(u0: C::Field, u1: C::Field) -> Jacobian<C> {
    map_to_curve::<C>(u0).add(&map_to_curve::<C>(u1))
}

/// Maps 32 raw bytes (interpreted directly as a field element, no hashing)
/// to a Helios point.
pub fn helios_map_to_curve(u: &[u8; 32]) -> point::HeliosPoint {
    map_to_curve::<point::HeliosCurve>(Fp::from_bytes(u))
}

/// Maps 32 raw bytes to a Selene point.
pub fn selene_map_to_curve(u: &[u8; 32]) -> point::SelenePoint {
    map_to_curve::<point::SeleneCurve>(Fq::from_bytes(u))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helios_map_to_curve_produces_a_point_on_curve() {
        let mut bytes = [0u8; 32];
        bytes[0] = 17;
        let p = helios_map_to_curve(&bytes);
        assert!(bool::from(p.is_on_curve()));
    }

    #[test]
    fn selene_map_to_curve_produces_a_point_on_curve() {
        let mut bytes = [0u8; 32];
        bytes[0] = 23;
        let p = selene_map_to_curve(&bytes);
        assert!(bool::from(p.is_on_curve()));
    }

    #[test]
    fn map_to_curve_is_deterministic() {
        let mut bytes = [0u8; 32];
        bytes[0] = 5;
        let a = helios_map_to_curve(&bytes);
        let b = helios_map_to_curve(&bytes);
        assert_eq!(a.to_affine().x, b.to_affine().x);
    }
}
