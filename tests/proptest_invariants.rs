//! Property-based checks of universal arithmetic invariants, run against
//! random field elements, scalars, and points.

use helioselene::prelude::*;
use proptest::prelude::*;

fn arb_fp_bytes() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>().prop_map(|mut b| {
        b[31] &= 0x7f;
        b
    })
}

fn arb_scalar() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>()
}

proptest! {
    #[test]
    fn fp_mul_is_commutative(a in arb_fp_bytes(), b in arb_fp_bytes()) {
        let x = Fp::from_bytes(&a);
        let y = Fp::from_bytes(&b);
        prop_assert_eq!(x.mul(&y), y.mul(&x));
    }

    #[test]
    fn fp_mul_respects_identities(a in arb_fp_bytes()) {
        let x = Fp::from_bytes(&a);
        prop_assert_eq!(x.mul(&Fp::ONE), x);
        prop_assert_eq!(x.mul(&Fp::ZERO), Fp::ZERO);
        prop_assert_eq!(x.add(&Fp::ZERO), x);
        prop_assert_eq!(x.add(&x.neg()), Fp::ZERO);
    }

    #[test]
    fn fp_nonzero_elements_invert_to_one(a in arb_fp_bytes()) {
        let x = Fp::from_bytes(&a);
        prop_assume!(bool::from(x.is_nonzero()));
        prop_assert_eq!(x.mul(&x.invert()), Fp::ONE);
    }

    #[test]
    fn fp_square_matches_self_mul(a in arb_fp_bytes()) {
        let x = Fp::from_bytes(&a);
        prop_assert_eq!(x.square(), x.mul(&x));
        prop_assert_eq!(x.square2(), x.square().add(&x.square()));
    }

    #[test]
    fn fp_bytes_round_trip(a in arb_fp_bytes()) {
        let x = Fp::from_bytes(&a);
        prop_assert_eq!(x.to_bytes(), a);
    }

    #[test]
    fn fq_mul_is_commutative(a in arb_fp_bytes(), b in arb_fp_bytes()) {
        let x = Fq::from_bytes(&a);
        let y = Fq::from_bytes(&b);
        prop_assert_eq!(x.mul(&y), y.mul(&x));
    }

    #[test]
    fn fq_nonzero_elements_invert_to_one(a in arb_fp_bytes()) {
        let x = Fq::from_bytes(&a);
        prop_assume!(bool::from(x.is_nonzero()));
        prop_assert_eq!(x.mul(&x.invert()), Fq::ONE);
    }

    #[test]
    fn point_identity_and_negation_laws_hold(s in arb_scalar()) {
        let g = generators::helios_base_point();
        let p = scalar_mult_ct::<HeliosCurve>(&g, &s);

        let with_identity = p.add(&HeliosPoint::identity());
        prop_assert_eq!(with_identity.to_affine().x, p.to_affine().x);

        let with_negation = p.add(&p.neg());
        prop_assert!(bool::from(with_negation.is_identity()));

        let doubled = p.double();
        let added_to_self = p.add(&p);
        prop_assert_eq!(doubled.to_affine().x, added_to_self.to_affine().x);
    }

    #[test]
    fn decoded_points_always_lie_on_the_curve(s in arb_scalar()) {
        let g = generators::helios_base_point();
        let p = scalar_mult_ct::<HeliosCurve>(&g, &s).to_affine();
        let decoded = HeliosAffine::from_bytes(&p.to_bytes()).unwrap();
        prop_assert!(bool::from(Jacobian::<HeliosCurve>::from_affine(&decoded).is_on_curve()));
    }
}
