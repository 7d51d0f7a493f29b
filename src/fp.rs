//! Field arithmetic over `p = 2^255 - 19`.
//!
//! Limb layout: five `u64` limbs in radix `2^51`, the native 64-bit backend.
//! This is the same prime as Curve25519/Ed25519, so the schoolbook
//! multiply/reduce below follows the well-known radix-51 algorithm for that
//! field, adapted to this crate's naming and to the `subtle`/`zeroize`
//! constant-time idioms used throughout this crate.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

const MASK51: u64 = (1u64 << 51) - 1;

/// `p` in radix-51 limbs: `2^255 - 19`.
const P_LIMBS: [u64; 5] = [MASK51 - 18, MASK51, MASK51, MASK51, MASK51];

/// `sqrt(-1) mod p`, in radix-2^25.5 signed limbs as published by the
/// reference implementation. Converted once, lazily, into this backend's
/// radix-51 representation by [`sqrt_m1`].
const SQRT_M1_RADIX_25_5: [i64; 10] = [
    -32595792, -7943725, 9377950, 3500415, 12389472, -272473, -25146209, -2005654, 326686,
    11406482,
];

/// An element of `F_p`, `p = 2^255 - 19`.
///
/// Limbs are not required to be fully reduced between operations; only
/// [`Fp::to_bytes`] and the comparison/parity helpers force a canonical
/// representative.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Fp(pub(crate) [u64; 5]);

impl Fp {
    /// The additive identity.
    pub const ZERO: Fp = Fp([0, 0, 0, 0, 0]);
    /// The multiplicative identity.
    pub const ONE: Fp = Fp([1, 0, 0, 0, 0]);

    /// Builds a field element directly from radix-51 limbs, without
    /// reducing. Used for embedding known-canonical constants.
    pub(crate) const fn from_limbs(limbs: [u64; 5]) -> Fp {
        Fp(limbs)
    }

    /// Decodes 32 little-endian bytes into a field element. The top bit is
    /// masked away; canonicity is not checked — raw field-element decode
    /// does not require canonical input.
    pub fn from_bytes(bytes: &[u8; 32]) -> Fp {
        let load8 = |i: usize| -> u64 {
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[i..i + 8]);
            u64::from_le_bytes(word)
        };
        let low_0 = load8(0);
        let low_1 = load8(6) >> 3;
        let low_2 = load8(12) >> 6;
        let low_3 = load8(19) >> 1;
        let low_4 = (load8(24) >> 12) & 0x0007_ffff_ffff_ffff;
        Fp([
            low_0 & MASK51,
            low_1 & MASK51,
            low_2 & MASK51,
            low_3 & MASK51,
            low_4 & 0x0007_ffff_ffff_ffff,
        ])
    }

    /// Serialises the fully-reduced canonical representative as 32
    /// little-endian bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut limbs = self.0;
        carry_chain(&mut limbs);

        // Conditionally subtract p once: q = 1 iff limbs >= p. The classic
        // trick exploits p's shape (all limbs except the low one are
        // 2^51-1): adding 19 and rippling the carry through every limb
        // yields a top carry out of limb 4 exactly when limbs >= p.
        let mut q = (limbs[0] + 19) >> 51;
        q = (limbs[1] + q) >> 51;
        q = (limbs[2] + q) >> 51;
        q = (limbs[3] + q) >> 51;
        q = (limbs[4] + q) >> 51;
        limbs[0] += 19 * q;

        limbs[1] += limbs[0] >> 51;
        limbs[0] &= MASK51;
        limbs[2] += limbs[1] >> 51;
        limbs[1] &= MASK51;
        limbs[3] += limbs[2] >> 51;
        limbs[2] &= MASK51;
        limbs[4] += limbs[3] >> 51;
        limbs[3] &= MASK51;
        limbs[4] &= MASK51;

        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&(limbs[0] | (limbs[1] << 51)).to_le_bytes());
        out[8..16].copy_from_slice(&((limbs[1] >> 13) | (limbs[2] << 38)).to_le_bytes());
        out[16..24].copy_from_slice(&((limbs[2] >> 26) | (limbs[3] << 25)).to_le_bytes());
        out[24..32].copy_from_slice(&((limbs[3] >> 39) | (limbs[4] << 12)).to_le_bytes());
        out
    }

    /// `a + b`. Limbs may grow by up to one bit; the next multiplicative
    /// operation absorbs the growth.
    pub fn add(&self, other: &Fp) -> Fp {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = self.0[i] + other.0[i];
        }
        Fp(out)
    }

    /// `a - b`, implemented by adding a bias of `4p` before subtracting
    /// limb-wise, so every limb stays non-negative without borrow
    /// propagation.
    pub fn sub(&self, other: &Fp) -> Fp {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = (self.0[i] + 4 * P_LIMBS[i]) - other.0[i];
        }
        Fp(out)
    }

    /// `-a`.
    pub fn neg(&self) -> Fp {
        Fp::ZERO.sub(self)
    }

    /// `a * b`.
    pub fn mul(&self, other: &Fp) -> Fp {
        let a = &self.0;
        let b = &other.0;
        let b1_19 = b[1] * 19;
        let b2_19 = b[2] * 19;
        let b3_19 = b[3] * 19;
        let b4_19 = b[4] * 19;

        let m = |x: u64, y: u64| (x as u128) * (y as u128);

        let c0 = m(a[0], b[0]) + m(a[1], b4_19) + m(a[2], b3_19) + m(a[3], b2_19) + m(a[4], b1_19);
        let c1 = m(a[0], b[1]) + m(a[1], b[0]) + m(a[2], b4_19) + m(a[3], b3_19) + m(a[4], b2_19);
        let c2 = m(a[0], b[2]) + m(a[1], b[1]) + m(a[2], b[0]) + m(a[3], b4_19) + m(a[4], b3_19);
        let c3 = m(a[0], b[3]) + m(a[1], b[2]) + m(a[2], b[1]) + m(a[3], b[0]) + m(a[4], b4_19);
        let c4 = m(a[0], b[4]) + m(a[1], b[3]) + m(a[2], b[2]) + m(a[3], b[1]) + m(a[4], b[0]);

        Fp(carry_reduce_wide([c0, c1, c2, c3, c4]))
    }

    /// `a^2`. Implemented as `mul(a, a)`: a dedicated squaring formula
    /// (cross-term doubling) is a performance optimisation left out here,
    /// since it cannot be checked by a compiler in this environment.
    pub fn square(&self) -> Fp {
        self.mul(self)
    }

    /// `2 * a^2`.
    pub fn square2(&self) -> Fp {
        let s = self.square();
        s.add(&s)
    }

    /// `a^(p-2)`, i.e. the multiplicative inverse of a non-zero element.
    /// Fixed addition chain: 254 squarings, 11 multiplications.
    pub fn invert(&self) -> Fp {
        let (t19, t3) = self.pow22501();
        let t20 = pow2k(&t19, 5);
        t20.mul(&t3)
    }

    /// `a^((p-5)/8)`, the exponent used by [`Fp::sqrt`].
    pub fn pow_p58(&self) -> Fp {
        let (t19, _) = self.pow22501();
        let t20 = pow2k(&t19, 2);
        self.mul(&t20)
    }

    /// Computes `(self^(2^250-1), self^11)`, the shared sub-chain used by
    /// both [`Fp::invert`] and [`Fp::pow_p58`].
    fn pow22501(&self) -> (Fp, Fp) {
        let t0 = self.square();
        let t1 = pow2k(&t0, 2);
        let t2 = self.mul(&t1);
        let t3 = t0.mul(&t2);
        let t4 = t3.square();
        let t5 = t2.mul(&t4);
        let t6 = pow2k(&t5, 5);
        let t7 = t6.mul(&t5);
        let t8 = pow2k(&t7, 10);
        let t9 = t8.mul(&t7);
        let t10 = pow2k(&t9, 20);
        let t11 = t10.mul(&t9);
        let t12 = pow2k(&t11, 10);
        let t13 = t12.mul(&t7);
        let t14 = pow2k(&t13, 50);
        let t15 = t14.mul(&t13);
        let t16 = pow2k(&t15, 100);
        let t17 = t16.mul(&t15);
        let t18 = pow2k(&t17, 50);
        let t19 = t18.mul(&t13);
        (t19, t3)
    }

    /// Atkin's square-root algorithm (`p ≡ 5 mod 8`). Always evaluates both
    /// candidate branches and selects via conditional move, so the path
    /// taken for a quadratic residue and a non-residue is the same shape;
    /// see `DESIGN.md` Open Question #1.
    ///
    /// Returns `(root, Choice::from(1))` if `self` is a quadratic residue,
    /// otherwise `(Fp::ZERO, Choice::from(0))`.
    pub fn sqrt(&self) -> (Fp, Choice) {
        let beta = self.pow_p58().mul(self);
        let beta_sq = beta.square();

        let is_root = beta_sq.ct_eq(self);
        let is_neg_root = beta_sq.ct_eq(&self.neg());

        let candidate_a = beta;
        let candidate_b = beta.mul(&sqrt_m1());
        let mut root = Fp::conditional_select(&Fp::ZERO, &candidate_b, is_neg_root);
        root = Fp::conditional_select(&root, &candidate_a, is_root);

        let is_square = is_root | is_neg_root;
        if !bool::from(is_square) {
            tracing::debug!("fp_sqrt: input is not a quadratic residue");
        }
        (root, is_square)
    }

    /// [`Fp::sqrt`], surfaced as a typed error instead of a `Choice` for
    /// callers that want a square root or nothing.
    pub fn try_sqrt(&self) -> crate::errors::Result<Fp> {
        let (root, is_square) = self.sqrt();
        if bool::from(is_square) {
            Ok(root)
        } else {
            Err(crate::errors::Error::NotQuadraticResidue)
        }
    }

    /// `1` if the canonical representative is non-zero, else `0`.
    pub fn is_nonzero(&self) -> Choice {
        !self.ct_eq(&Fp::ZERO)
    }

    /// The low bit of the canonical representative (its parity / sign).
    pub fn is_negative(&self) -> Choice {
        let bytes = self.to_bytes();
        Choice::from(bytes[0] & 1)
    }

    /// Batch inversion via Montgomery's trick: one inversion amortised
    /// over `values.len()` elements, `O(3n)` multiplications.
    pub fn batch_invert(values: &[Fp]) -> Vec<Fp> {
        let n = values.len();
        let mut prefix = Vec::with_capacity(n);
        let mut acc = Fp::ONE;
        for v in values {
            prefix.push(acc);
            acc = acc.mul(v);
        }
        let mut acc_inv = acc.invert();
        let mut out = vec![Fp::ZERO; n];
        for i in (0..n).rev() {
            out[i] = prefix[i].mul(&acc_inv);
            acc_inv = acc_inv.mul(&values[i]);
        }
        out
    }
}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Fp, b: &Fp, choice: Choice) -> Fp {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Fp(out)
    }
}

impl ConstantTimeEq for Fp {
    fn ct_eq(&self, other: &Fp) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Fp) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl Eq for Fp {}

fn pow2k(base: &Fp, k: u32) -> Fp {
    let mut out = *base;
    for _ in 0..k {
        out = out.square();
    }
    out
}

/// Propagates carries through a limb array already in the canonical-ish
/// `[0, 2^52)`-per-limb range, folding the overflow out of limb 4 back into
/// limb 0 via `x19` (since `2^255 ≡ 19 (mod p)`).
fn carry_chain(limbs: &mut [u64; 5]) {
    let c0 = limbs[0] >> 51;
    limbs[0] &= MASK51;
    limbs[1] += c0;
    let c1 = limbs[1] >> 51;
    limbs[1] &= MASK51;
    limbs[2] += c1;
    let c2 = limbs[2] >> 51;
    limbs[2] &= MASK51;
    limbs[3] += c2;
    let c3 = limbs[3] >> 51;
    limbs[3] &= MASK51;
    limbs[4] += c3;
    let c4 = limbs[4] >> 51;
    limbs[4] &= MASK51;
    limbs[0] += c4 * 19;
    let c0b = limbs[0] >> 51;
    limbs[0] &= MASK51;
    limbs[1] += c0b;
}

/// Reduces five wide (`u128`) convolution accumulators into canonical-width
/// radix-51 limbs.
fn carry_reduce_wide(mut z: [u128; 5]) -> [u64; 5] {
    let mask = MASK51 as u128;
    let c0 = z[0] >> 51;
    z[0] &= mask;
    z[1] += c0;
    let c1 = z[1] >> 51;
    z[1] &= mask;
    z[2] += c1;
    let c2 = z[2] >> 51;
    z[2] &= mask;
    z[3] += c2;
    let c3 = z[3] >> 51;
    z[3] &= mask;
    z[4] += c3;
    let c4 = z[4] >> 51;
    z[4] &= mask;
    z[0] += c4 * 19;
    let c0b = z[0] >> 51;
    z[0] &= mask;
    z[1] += c0b;
    [
        z[0] as u64,
        z[1] as u64,
        z[2] as u64,
        z[3] as u64,
        z[4] as u64,
    ]
}

/// Converts a value given as ten signed radix-`2^25.5` limbs (the layout
/// used by the reference implementation's portable backend) into this
/// backend's radix-51 representation, by evaluating the weighted sum in
/// `i128` and packing the (known non-negative, known `< p`) result through
/// [`Fp::from_bytes`]. Used once, lazily, for [`sqrt_m1`].
fn from_signed_radix_25_5(limbs: [i64; 10]) -> Fp {
    const SHIFTS: [u32; 10] = [0, 26, 51, 77, 102, 128, 153, 179, 204, 230];
    let mut acc = [0i128; 5];
    for (limb, shift) in limbs.iter().zip(SHIFTS.iter()) {
        let word = (*shift / 64) as usize;
        let bit = *shift % 64;
        acc[word] += (*limb as i128) << bit;
    }
    let mut carry: i128 = 0;
    let mut words = [0u64; 5];
    for i in 0..5 {
        let v = acc[i] + carry;
        words[i] = v.rem_euclid(1i128 << 64) as u64;
        carry = v.div_euclid(1i128 << 64);
    }
    debug_assert_eq!(carry, 0);
    debug_assert_eq!(words[4], 0);
    let mut bytes = [0u8; 32];
    bytes[0..8].copy_from_slice(&words[0].to_le_bytes());
    bytes[8..16].copy_from_slice(&words[1].to_le_bytes());
    bytes[16..24].copy_from_slice(&words[2].to_le_bytes());
    bytes[24..32].copy_from_slice(&words[3].to_le_bytes());
    Fp::from_bytes(&bytes)
}

/// The canonical `sqrt(-1) mod p`, computed once from the reference
/// implementation's published radix-2^25.5 limbs.
pub fn sqrt_m1() -> Fp {
    static CACHE: once_cell::sync::OnceCell<[u64; 5]> = once_cell::sync::OnceCell::new();
    let limbs = *CACHE.get_or_init(|| from_signed_radix_25_5(SQRT_M1_RADIX_25_5).0);
    Fp(limbs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp_from_u64(v: u64) -> Fp {
        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&v.to_le_bytes());
        Fp::from_bytes(&bytes)
    }

    #[test]
    fn mul_is_commutative_and_respects_identities() {
        let a = fp_from_u64(123456789);
        let b = fp_from_u64(987654321);
        assert_eq!(a.mul(&b), b.mul(&a));
        assert_eq!(a.mul(&Fp::ONE), a);
        assert_eq!(a.mul(&Fp::ZERO), Fp::ZERO);
        assert_eq!(a.add(&Fp::ZERO), a);
        assert_eq!(a.add(&a.neg()), Fp::ZERO);
    }

    #[test]
    fn invert_is_a_true_inverse() {
        let a = fp_from_u64(42);
        let inv = a.invert();
        assert_eq!(a.mul(&inv), Fp::ONE);
    }

    #[test]
    fn square_matches_self_mul() {
        let a = fp_from_u64(999);
        assert_eq!(a.square(), a.mul(&a));
        assert_eq!(a.square2(), a.square().add(&a.square()));
    }

    #[test]
    fn seed_scenario_mul_2_3() {
        let two = fp_from_u64(2);
        let three = fp_from_u64(3);
        let six = fp_from_u64(6);
        assert_eq!(two.mul(&three), six);
        let inv2 = two.invert();
        assert_eq!(two.mul(&inv2), Fp::ONE);
    }

    #[test]
    fn sqrt_of_four_is_plus_or_minus_two() {
        let four = fp_from_u64(4);
        let (root, is_qr) = four.sqrt();
        assert!(bool::from(is_qr));
        let two = fp_from_u64(2);
        assert!(root == two || root == two.neg());
    }

    #[test]
    fn try_sqrt_reports_non_residues_as_an_error() {
        let four = fp_from_u64(4);
        assert!(four.try_sqrt().is_ok());

        // 2 is a quadratic non-residue mod p for any p ≡ 5 (mod 8), which
        // this field's p is.
        let non_residue = fp_from_u64(2);
        assert_eq!(
            non_residue.try_sqrt(),
            Err(crate::errors::Error::NotQuadraticResidue)
        );
    }

    #[test]
    fn bytes_roundtrip() {
        let a = fp_from_u64(0xdead_beef_1234);
        let bytes = a.to_bytes();
        let b = Fp::from_bytes(&bytes);
        assert_eq!(a, b);
        assert_eq!(b.to_bytes(), bytes);
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        let s = sqrt_m1();
        let neg_one = Fp::ONE.neg();
        assert_eq!(s.square(), neg_one);
    }
}
