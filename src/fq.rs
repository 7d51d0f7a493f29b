//! Field arithmetic over `q = 2^255 - γ`, the Crandall-form companion prime
//! to [`crate::fp`]'s `p`. Unlike `p`, `γ` is a 127-bit constant rather than
//! a small one, so reduction after a multiply needs two folding passes
//! before the usual radix-51 carry chain.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

const MASK51: u64 = (1u64 << 51) - 1;

/// `γ` in radix-51 limbs (3 limbs, since `γ < 2^127`), extracted from the
/// reference implementation's `fq51.h`.
const GAMMA_51: [u64; 3] = [0x0012_d8d8_6d83_861, 0x0269_1352_94f2_29, 0x0010_2021_f];

/// `q = 2^255 - γ` in radix-51 limbs, as published by the reference
/// implementation (`Q_51` in `fq51.h`).
const Q_51: [u64; 5] = [
    0x000_6d27_2792_7c79f,
    0x000_596e_cad6_b0dd6,
    0x0007_ffff_fefd_fde0,
    0x0007_ffff_ffff_fffff,
    0x0007_ffff_ffff_fffff,
];

/// `8q`, used as the additive bias in [`Fq::sub`] so that limb-wise
/// subtraction never borrows.
const EIGHT_Q_51: [u64; 5] = [
    Q_51[0] << 3,
    Q_51[1] << 3,
    Q_51[2] << 3,
    Q_51[3] << 3,
    Q_51[4] << 3,
];

/// An element of `F_q`, `q = 2^255 - γ`.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Fq(pub(crate) [u64; 5]);

impl Fq {
    pub const ZERO: Fq = Fq([0, 0, 0, 0, 0]);
    pub const ONE: Fq = Fq([1, 0, 0, 0, 0]);

    pub(crate) const fn from_limbs(limbs: [u64; 5]) -> Fq {
        Fq(limbs)
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Fq {
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
        Fq([
            low_0 & MASK51,
            low_1 & MASK51,
            low_2 & MASK51,
            low_3 & MASK51,
            low_4 & 0x0007_ffff_ffff_ffff,
        ])
    }

    pub fn to_bytes(self) -> [u8; 32] {
        let mut limbs = self.0;
        carry_chain(&mut limbs);

        // q's limbs aren't uniformly 2^51-1 (unlike p's), so the cheap
        // add-and-ripple trick used for Fp doesn't apply here: compare
        // against Q_51 directly via a borrow subtraction and conditionally
        // keep the difference.
        let (diff, borrow) = sub_with_borrow(limbs, Q_51);
        let take_diff = Choice::from((1 - borrow) as u8);
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = u64::conditional_select(&limbs[i], &diff[i], take_diff);
        }

        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&(out[0] | (out[1] << 51)).to_le_bytes());
        bytes[8..16].copy_from_slice(&((out[1] >> 13) | (out[2] << 38)).to_le_bytes());
        bytes[16..24].copy_from_slice(&((out[2] >> 26) | (out[3] << 25)).to_le_bytes());
        bytes[24..32].copy_from_slice(&((out[3] >> 39) | (out[4] << 12)).to_le_bytes());
        bytes
    }

    pub fn add(&self, other: &Fq) -> Fq {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = self.0[i] + other.0[i];
        }
        Fq(out)
    }

    /// `a - b`, biased by `8q`: `γ`'s larger limbs need a bigger safety
    /// margin than `p`'s `4p` bias.
    pub fn sub(&self, other: &Fq) -> Fq {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = (self.0[i] + EIGHT_Q_51[i]) - other.0[i];
        }
        Fq(out)
    }

    pub fn neg(&self) -> Fq {
        Fq::ZERO.sub(self)
    }

    /// `a * b`. Schoolbook convolution into 9 wide accumulators, two
    /// `γ`-folding passes to bring positions `5..=8` back into `0..=4`,
    /// then the ordinary radix-51 carry chain.
    pub fn mul(&self, other: &Fq) -> Fq {
        let a = &self.0;
        let b = &other.0;
        let mut c = [0u128; 9];
        for i in 0..5 {
            for j in 0..5 {
                c[i + j] += (a[i] as u128) * (b[j] as u128);
            }
        }
        Fq(reduce_wide_product(c))
    }

    pub fn square(&self) -> Fq {
        self.mul(self)
    }

    pub fn square2(&self) -> Fq {
        let s = self.square();
        s.add(&s)
    }

    /// `a^(q-2)`, i.e. the multiplicative inverse of a non-zero element.
    /// Plain square-and-multiply over the public exponent `q-2`; unlike
    /// `Fp::invert`'s fixed chain, this exponent has no short published
    /// addition chain in the retrieved reference sources, so correctness
    /// is favoured over a hand-derived shortcut (see `DESIGN.md`).
    pub fn invert(&self) -> Fq {
        pow_by_exponent_bytes(self, &q_minus_2_bytes())
    }

    /// `a^((q+1)/4)`, the exponent used by [`Fq::sqrt`] (q ≡ 3 mod 4).
    fn pow_q_plus_1_over_4(&self) -> Fq {
        pow_by_exponent_bytes(self, &q_plus_1_over_4_bytes())
    }

    pub fn sqrt(&self) -> (Fq, Choice) {
        let candidate = self.pow_q_plus_1_over_4();
        let check = candidate.square();
        let is_root = check.ct_eq(self);
        let root = Fq::conditional_select(&Fq::ZERO, &candidate, is_root);
        if !bool::from(is_root) {
            tracing::debug!("fq_sqrt: input is not a quadratic residue");
        }
        (root, is_root)
    }

    /// [`Fq::sqrt`], surfaced as a typed error instead of a `Choice` for
    /// callers that want a square root or nothing.
    pub fn try_sqrt(&self) -> crate::errors::Result<Fq> {
        let (root, is_square) = self.sqrt();
        if bool::from(is_square) {
            Ok(root)
        } else {
            Err(crate::errors::Error::NotQuadraticResidue)
        }
    }

    pub fn is_nonzero(&self) -> Choice {
        !self.ct_eq(&Fq::ZERO)
    }

    pub fn is_negative(&self) -> Choice {
        let bytes = self.to_bytes();
        Choice::from(bytes[0] & 1)
    }

    pub fn batch_invert(values: &[Fq]) -> Vec<Fq> {
        let n = values.len();
        let mut prefix = Vec::with_capacity(n);
        let mut acc = Fq::ONE;
        for v in values {
            prefix.push(acc);
            acc = acc.mul(v);
        }
        let mut acc_inv = acc.invert();
        let mut out = vec![Fq::ZERO; n];
        for i in (0..n).rev() {
            out[i] = prefix[i].mul(&acc_inv);
            acc_inv = acc_inv.mul(&values[i]);
        }
        out
    }
}

impl ConditionallySelectable for Fq {
    fn conditional_select(a: &Fq, b: &Fq, choice: Choice) -> Fq {
        let mut out = [0u64; 5];
        for i in 0..5 {
            out[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Fq(out)
    }
}

impl ConstantTimeEq for Fq {
    fn ct_eq(&self, other: &Fq) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl PartialEq for Fq {
    fn eq(&self, other: &Fq) -> bool {
        bool::from(self.ct_eq(other))
    }
}
impl Eq for Fq {}

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
    // 2^255 ≡ γ (mod q): fold the tiny overflow out of limb 4 back in via γ.
    limbs[0] += c4 * GAMMA_51[0];
    limbs[1] += c4 * GAMMA_51[1];
    limbs[2] += c4 * GAMMA_51[2];
    let c0b = limbs[0] >> 51;
    limbs[0] &= MASK51;
    limbs[1] += c0b;
    let c1b = limbs[1] >> 51;
    limbs[1] &= MASK51;
    limbs[2] += c1b;
}

/// Reduces the 9-limb wide product of two radix-51 `Fq` values down to 5
/// limbs, substituting `2^(255 + 51j) ≡ γ·2^(51j) (mod q)`.
///
/// A convolution position `c[k]` for `k >= 5` can hold the sum of up to 5
/// partial products, each up to `2^102`, so `c[k]` itself can run to about
/// `2^104` — multiplying that directly by a γ limb (up to `2^51`) would need
/// on the order of `2^155`, well past `u128::MAX`. So each high position is
/// first carry-propagated down to a single ~51-bit digit, and only *that* is
/// multiplied by γ: every product here stays under roughly `2^103`.
///
/// Folding γ's three limbs into one convolution position spills into two
/// neighbouring positions, so collapsing a run of high positions needs one
/// extra limb of headroom per pass; two passes (mirroring the original
/// two-fold design) fully walk positions `5..=8` back down into `0..=4`.
fn reduce_wide_product(c: [u128; 9]) -> [u64; 5] {
    let mask = MASK51 as u128;

    // Pass 1: carry-propagate 0..=8 into a spare 10th limb (safe, pure
    // addition), then fold the now single-digit-sized positions 5..=9 into
    // a 7-limb buffer.
    let mut wide = [0u128; 10];
    wide[..9].copy_from_slice(&c);
    for i in 0..=8 {
        let carry = wide[i] >> 51;
        wide[i] &= mask;
        wide[i + 1] += carry;
    }
    let mut mid = [0u128; 8];
    mid[..5].copy_from_slice(&wide[..5]);
    for k in 5..=9 {
        let high = wide[k];
        let base = k - 5;
        for (m, g) in GAMMA_51.iter().enumerate() {
            mid[base + m] += high * (*g as u128);
        }
    }

    // Pass 2: same again for the smaller overflow left in mid[5..=7].
    for i in 0..=6 {
        let carry = mid[i] >> 51;
        mid[i] &= mask;
        mid[i + 1] += carry;
    }
    let mut out = [0u128; 5];
    out.copy_from_slice(&mid[..5]);
    for k in 5..=7 {
        let high = mid[k];
        let base = k - 5;
        for (m, g) in GAMMA_51.iter().enumerate() {
            out[base + m] += high * (*g as u128);
        }
    }

    carry_reduce_wide(out)
}

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
    z[0] += c4 * (GAMMA_51[0] as u128);
    z[1] += c4 * (GAMMA_51[1] as u128);
    z[2] += c4 * (GAMMA_51[2] as u128);
    let c0b = z[0] >> 51;
    z[0] &= mask;
    z[1] += c0b;
    let c1b = z[1] >> 51;
    z[1] &= mask;
    z[2] += c1b;
    [
        z[0] as u64,
        z[1] as u64,
        z[2] as u64,
        z[3] as u64,
        z[4] as u64,
    ]
}

/// Limb-wise `a - b` with an explicit borrow-out, treating each radix-51
/// limb as an independent digit (valid since both inputs are already fully
/// carry-propagated to `< 2^51` per limb).
fn sub_with_borrow(a: [u64; 5], b: [u64; 5]) -> ([u64; 5], u8) {
    let mut out = [0u64; 5];
    let mut borrow: i64 = 0;
    for i in 0..5 {
        let diff = a[i] as i64 - b[i] as i64 - borrow;
        if diff < 0 {
            out[i] = (diff + (1i64 << 51)) as u64;
            borrow = 1;
        } else {
            out[i] = diff as u64;
            borrow = 0;
        }
    }
    (out, borrow as u8)
}

/// `q` packed as four little-endian 64-bit words, derived from `Q_51`.
/// `q` and the small constants derived from it below are public values, so
/// this conversion is done with plain (non-constant-time) big-integer
/// arithmetic.
fn q_words() -> [u64; 4] {
    let q = Q_51;
    [
        q[0] | (q[1] << 51),
        (q[1] >> 13) | (q[2] << 38),
        (q[2] >> 26) | (q[3] << 25),
        (q[3] >> 39) | (q[4] << 12),
    ]
}

fn words_to_le_bytes(words: [u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (i, limb) in words.iter().enumerate() {
        bytes[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
    }
    bytes
}

/// `q - 2` as little-endian bytes, the exponent used by [`Fq::invert`].
fn q_minus_2_bytes() -> [u8; 32] {
    let mut words = q_words();
    let mut borrow = 2i128;
    for word in words.iter_mut() {
        let v = *word as i128 - borrow;
        if v < 0 {
            *word = (v + (1i128 << 64)) as u64;
            borrow = 1;
        } else {
            *word = v as u64;
            borrow = 0;
        }
    }
    words_to_le_bytes(words)
}

/// `(q+1)/4` as little-endian bytes, the exponent used by [`Fq::sqrt`]
/// (`q ≡ 3 mod 4`).
fn q_plus_1_over_4_bytes() -> [u8; 32] {
    let mut words = q_words();
    let mut carry = 1u128;
    for word in words.iter_mut() {
        let v = *word as u128 + carry;
        *word = v as u64;
        carry = v >> 64;
    }
    let mut carry_bits: u64 = 0;
    for word in words.iter_mut().rev() {
        let v = *word;
        *word = (v >> 2) | (carry_bits << 62);
        carry_bits = v & 0b11;
    }
    words_to_le_bytes(words)
}

fn pow_by_exponent_bytes(base: &Fq, exponent_le_bytes: &[u8; 32]) -> Fq {
    let mut acc = Fq::ONE;
    for byte in exponent_le_bytes.iter().rev() {
        for bit in (0..8).rev() {
            acc = acc.square();
            if (byte >> bit) & 1 == 1 {
                acc = acc.mul(base);
            }
        }
    }
    acc
}
