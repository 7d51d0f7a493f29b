//! Concrete seed scenarios exercised against the public crate surface (as
//! opposed to the internal unit tests living alongside each module).

use helioselene::prelude::*;

fn scalar_from_u64(v: u64) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes[0..8].copy_from_slice(&v.to_le_bytes());
    bytes
}

#[test]
fn scalarmult_by_zero_is_identity_and_by_one_is_the_base() {
    let g = generators::helios_base_point();
    let zero = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(0));
    assert!(bool::from(zero.is_identity()));

    let one = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(1));
    let one_affine = one.to_affine();
    assert_eq!(one_affine.x, g.x);
    assert_eq!(one_affine.y, g.y);
}

#[test]
fn addition_and_doubling_agree_with_scalar_multiples() {
    let g = generators::helios_base_point();
    let p = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(7));
    let q = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(11));
    let sum = p.add(&q);
    let expected_sum = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(18));
    assert_eq!(sum.to_affine().x, expected_sum.to_affine().x);

    let doubled = p.double();
    let expected_double = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(14));
    assert_eq!(doubled.to_affine().x, expected_double.to_affine().x);
}

#[test]
fn hash_to_curve_of_the_zero_element_lands_on_curve() {
    let p = helios_map_to_curve(&[0u8; 32]);
    assert!(bool::from(p.is_on_curve()));
}

#[test]
fn divisor_over_four_multiples_vanishes_at_each_and_not_at_a_fifth() {
    let g = generators::helios_base_point();
    let points: Vec<_> = (1..=4u64)
        .map(|i| scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(i)).to_affine())
        .collect();
    let divisor = divisor::compute::<HeliosCurve>(&points).unwrap();
    for p in &points {
        assert_eq!(divisor.evaluate(p.x, p.y), Fp::ZERO);
    }

    let fifth = scalar_mult_ct::<HeliosCurve>(&g, &scalar_from_u64(5)).to_affine();
    assert_ne!(divisor.evaluate(fifth.x, fifth.y), Fp::ZERO);
}

#[test]
fn point_bytes_round_trip_for_identity_generator_and_negation() {
    let identity = HeliosPoint::identity().to_affine();
    let decoded = HeliosAffine::from_bytes(&identity.to_bytes()).unwrap();
    assert!(bool::from(decoded.infinity));

    let g = generators::helios_base_point();
    let decoded_g = HeliosAffine::from_bytes(&g.to_bytes()).unwrap();
    assert_eq!(decoded_g.x, g.x);
    assert_eq!(decoded_g.y, g.y);

    let neg_g = g.cneg(subtle::Choice::from(1));
    let decoded_neg = HeliosAffine::from_bytes(&neg_g.to_bytes()).unwrap();
    assert_eq!(decoded_neg.y, neg_g.y);
}

#[test]
fn msm_vartime_agrees_with_an_explicit_scalar_mult_chain() {
    let points: Vec<_> = (0..5u64)
        .map(|i| generators::helios_generator("test/msm-agreement", i))
        .collect();
    let scalars: Vec<[u8; 32]> = (1..=5u64).map(scalar_from_u64).collect();

    let via_msm = msm_vartime::<HeliosCurve>(&points, &scalars);

    let mut via_chain = HeliosPoint::identity();
    for (p, s) in points.iter().zip(scalars.iter()) {
        via_chain = via_chain.add(&scalar_mult_ct::<HeliosCurve>(p, s));
    }

    assert_eq!(via_msm.to_affine().x, via_chain.to_affine().x);
    assert_eq!(via_msm.to_affine().y, via_chain.to_affine().y);
}

#[test]
fn two_cycle_bridging_is_a_pure_byte_reinterpretation() {
    let g = generators::helios_base_point();
    let scalar = helios_x_as_selene_scalar(g.x);
    assert_eq!(scalar, g.x.to_bytes());
}
