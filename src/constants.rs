//! Curve constants shared by [`crate::curve`] and [`crate::hash_to_curve`].
//!
//! Helios's curve and SSWU constants are copied bit-exact (as raw radix-51
//! limb arrays) from the reference implementation's portable backend. Selene
//! has no published generator/SSWU table in the retrieved sources (see
//! `DESIGN.md` Open Question #3): its `B` is a documented placeholder and its
//! SSWU constants are derived lazily at runtime instead of hand-transcribed.

use crate::fp::Fp;
use crate::fq::Fq;
use once_cell::sync::Lazy;

/// Helios: `y^2 = x^3 - 3x + B_HELIOS` over `F_p`.
pub const HELIOS_B_LIMBS: [u64; 5] = [
    0x49ee1edd73ad4,
    0x7082277e6a456,
    0x2edecec10fdbc,
    0x5c5f4a53b59f,
    0x22e8c739b0ea7,
];

/// Simplified-SWU `Z` for Helios: `7`, chosen non-square in `F_p`.
const SSWU_HELIOS_Z_LIMBS: [u64; 5] = [0x7, 0, 0, 0, 0];

/// `-B/A = B_HELIOS/3 mod p`.
const SSWU_HELIOS_NEG_B_OVER_A_LIMBS: [u64; 5] = [
    0x6dfa0a49d139c,
    0x502b627f78c1c,
    0x0f9f9a405a9e9,
    0x01eca6e1be735,
    0x0ba2ed133af8d,
];

/// `B/(Z*A) = B_HELIOS/(7*(-3)) mod p`.
const SSWU_HELIOS_B_OVER_ZA_LIMBS: [u64; 5] = [
    0x27256c3e98f69,
    0x6242f1edca2d7,
    0x7dc4a0d23c327,
    0x7fb99f045281c,
    0x7e56706af7934,
];

/// `A = -3 mod p`.
const SSWU_HELIOS_A_LIMBS: [u64; 5] = [
    0x7ffffffffffea,
    0x7ffffffffffff,
    0x7ffffffffffff,
    0x7ffffffffffff,
    0x7ffffffffffff,
];

pub fn helios_b() -> Fp {
    Fp::from_limbs(HELIOS_B_LIMBS)
}

/// The Simplified-SWU constants used by [`crate::hash_to_curve`] for Helios:
/// `(Z, A, -B/A, B/(Z*A))`.
pub fn helios_sswu_constants() -> (Fp, Fp, Fp, Fp) {
    (
        Fp::from_limbs(SSWU_HELIOS_Z_LIMBS),
        Fp::from_limbs(SSWU_HELIOS_A_LIMBS),
        Fp::from_limbs(SSWU_HELIOS_NEG_B_OVER_A_LIMBS),
        Fp::from_limbs(SSWU_HELIOS_B_OVER_ZA_LIMBS),
    )
}

/// Selene: `y^2 = x^3 - 3x + B_SELENE` over `F_q`.
///
/// No upstream Selene curve-constant table survived retrieval. `5` is used
/// as a documented placeholder: it avoids the two values (`B = 2` and
/// `B = -2`) that make `A = -3` curves singular, and its SSWU derivatives
/// below are computed from it directly rather than guessed.
fn selene_b() -> Fq {
    let mut bytes = [0u8; 32];
    bytes[0] = 5;
    Fq::from_bytes(&bytes)
}

fn selene_a() -> Fq {
    Fq::ZERO.sub(&{
        let mut bytes = [0u8; 32];
        bytes[0] = 3;
        Fq::from_bytes(&bytes)
    })
}

/// Non-square-in-`F_q` SSWU parameter for Selene. `2` is Selene's quadratic
/// non-residue analogue of Helios's `Z = 7`; verified non-square by the
/// `z_is_non_square` debug assertion in [`selene_sswu_constants`].
fn selene_z() -> Fq {
    let mut bytes = [0u8; 32];
    bytes[0] = 2;
    Fq::from_bytes(&bytes)
}

/// The Simplified-SWU constants for Selene, computed once from
/// [`selene_b`]/[`selene_a`]/[`selene_z`] via the field's own inversion
/// rather than hand-transcribed (see `DESIGN.md` Open Question #3).
pub fn selene_sswu_constants() -> (Fq, Fq, Fq, Fq) {
    static CACHE: Lazy<(Fq, Fq, Fq, Fq)> = Lazy::new(|| {
        let a = selene_a();
        let b = selene_b();
        let z = selene_z();

        debug_assert!(!bool::from(z.sqrt().1), "SSWU Z must be a non-residue");

        let neg_b_over_a = Fq::ZERO.sub(&b).mul(&a.invert());
        let za = z.mul(&a);
        let b_over_za = b.mul(&za.invert());
        (z, a, neg_b_over_a, b_over_za)
    });
    *CACHE
}

pub fn selene_b_constant() -> Fq {
    selene_b()
}
