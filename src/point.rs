//! Concrete curve instantiations: Helios over `F_p`, Selene over `F_q`.

use crate::constants;
use crate::curve::{Affine, CurveParams, Jacobian};
use crate::fp::Fp;
use crate::fq::Fq;

/// Marker type selecting Helios's curve parameters (`A = -3`, `B` from
/// `constants::helios_b`) for [`Jacobian`]/[`Affine`].
#[derive(Clone, Copy, Debug)]
pub struct HeliosCurve;

impl CurveParams for HeliosCurve {
    type Field = Fp;
    fn b() -> Fp {
        constants::helios_b()
    }
}

/// Marker type selecting Selene's curve parameters.
#[derive(Clone, Copy, Debug)]
pub struct SeleneCurve;

impl CurveParams for SeleneCurve {
    type Field = Fq;
    fn b() -> Fq {
        constants::selene_b_constant()
    }
}

/// A point on Helios, `y^2 = x^3 - 3x + B_HELIOS` over `F_p`.
pub type HeliosPoint = Jacobian<HeliosCurve>;
/// An affine point on Helios.
pub type HeliosAffine = Affine<HeliosCurve>;
/// A point on Selene, `y^2 = x^3 - 3x + B_SELENE` over `F_q`.
pub type SelenePoint = Jacobian<SeleneCurve>;
/// An affine point on Selene.
pub type SeleneAffine = Affine<SeleneCurve>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_round_trips_through_affine() {
        let id = HeliosPoint::identity();
        let affine = id.to_affine();
        assert!(bool::from(affine.infinity));
        let back = HeliosPoint::from_affine(&affine);
        assert!(bool::from(back.is_identity()));
    }

    #[test]
    fn doubling_identity_is_identity() {
        let id = HeliosPoint::identity();
        let doubled = id.double();
        assert!(bool::from(doubled.is_identity()));
    }

    #[test]
    fn add_identity_is_noop() {
        let id = HeliosPoint::identity();
        let g = HeliosPoint::new(
            Fp::from_bytes(&{
                let mut b = [0u8; 32];
                b[0] = 9;
                b
            }),
            Fp::ONE,
            Fp::ONE,
        );
        let sum = g.add(&id);
        assert_eq!(sum.to_affine().x, g.to_affine().x);
    }
}
