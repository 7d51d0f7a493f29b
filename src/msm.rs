//! Variable-time scalar multiplication and multi-scalar multiplication.
//!
//! Grounded directly in the standard wNAF/Straus/Pippenger algorithm
//! descriptions and EFD formulas. `rayon` parallelises Pippenger's bucket
//! accumulation.

use rayon::prelude::*;

use crate::curve::{Affine, CurveParams, Jacobian};

const WNAF_WIDTH: u32 = 5;
const STRAUS_THRESHOLD: usize = 32;

/// Width-`w` windowed non-adjacent form of a scalar, least significant
/// digit first. Digits are odd and in `[-(2^(w-1)-1), 2^(w-1)-1]`, or `0`.
/// Operates on a 33-byte little-endian buffer (one byte wider than the
/// scalar) so the top window has room to carry.
fn wnaf(scalar: &[u8; 32], width: u32) -> Vec<i32> {
    let mut k = [0u8; 33];
    k[0..32].copy_from_slice(scalar);

    let mut digits = Vec::with_capacity(257);
    let window_mask = (1i32 << width) - 1;
    let half = 1i32 << (width - 1);

    while k.iter().any(|&b| b != 0) {
        let digit = if k[0] & 1 == 1 {
            let low = (k[0] as i32) | ((k[1] as i32) << 8);
            let mut digit = low & window_mask;
            if digit >= half {
                digit -= 1i32 << width;
            }
            add_small_signed(&mut k, -digit);
            digit
        } else {
            0
        };
        digits.push(digit);
        shr1(&mut k);
    }
    digits
}

/// Adds a small signed value (well within `i32` range) to a little-endian
/// unsigned big-integer buffer, propagating carry/borrow arithmetically.
fn add_small_signed(k: &mut [u8], value: i32) {
    let mut carry = value as i64;
    for byte in k.iter_mut() {
        let v = *byte as i64 + carry;
        *byte = (v & 0xff) as u8;
        carry = v >> 8;
    }
}

fn shr1(k: &mut [u8]) {
    let mut carry = 0u8;
    for byte in k.iter_mut().rev() {
        let new_carry = *byte & 1;
        *byte = (*byte >> 1) | (carry << 7);
        carry = new_carry;
    }
}

/// Precomputed odd multiples `[1]P, [3]P, .., [2^(w-1)-1]P` for wNAF
/// scanning, in affine form.
fn odd_multiples_affine<C: CurveParams>(base: &Affine<C>, width: u32) -> Vec<Affine<C>> {
    let count = 1usize << (width - 2);
    let base_j = Jacobian::from_affine(base);
    let double = base_j.double();
    let mut jacobian = Vec::with_capacity(count);
    jacobian.push(base_j);
    for i in 1..count {
        jacobian.push(jacobian[i - 1].add(&double));
    }
    Jacobian::batch_to_affine(&jacobian)
}

fn lookup_odd<C: CurveParams>(table: &[Affine<C>], digit: i32) -> Affine<C> {
    let idx = (digit.unsigned_abs() as usize - 1) / 2;
    let entry = table[idx];
    entry.cneg(subtle::Choice::from((digit < 0) as u8))
}

/// Variable-time single-scalar multiplication via width-5 wNAF. Not
/// constant-time: intended for verification-path / public-data use only.
pub fn scalar_mult_vartime<C: CurveParams>(base: &Affine<C>, scalar: &[u8; 32]) -> Jacobian<C> {
    let digits = wnaf(scalar, WNAF_WIDTH);
    let table = odd_multiples_affine(base, WNAF_WIDTH);
    let mut acc = Jacobian::<C>::identity();
    for &digit in digits.iter().rev() {
        acc = acc.double();
        if digit != 0 {
            acc = acc.add_mixed(&lookup_odd(&table, digit));
        }
    }
    acc
}

/// Multi-scalar multiplication: `sum_i scalar_i * point_i`.
///
/// Dispatches to Straus's method (shared doubling, per-term wNAF digit) for
/// small inputs, and to Pippenger's bucket method (parallelised over
/// buckets with `rayon`) for large ones.
pub fn msm_vartime<C: CurveParams>(points: &[Affine<C>], scalars: &[[u8; 32]]) -> Jacobian<C> {
    assert_eq!(points.len(), scalars.len());
    if points.is_empty() {
        return Jacobian::identity();
    }
    if points.len() <= STRAUS_THRESHOLD {
        straus(points, scalars)
    } else {
        pippenger(points, scalars)
    }
}

fn straus<C: CurveParams>(points: &[Affine<C>], scalars: &[[u8; 32]]) -> Jacobian<C> {
    let tables: Vec<Vec<Affine<C>>> = points
        .iter()
        .map(|p| odd_multiples_affine(p, WNAF_WIDTH))
        .collect();
    let digit_rows: Vec<Vec<i32>> = scalars.iter().map(|s| wnaf(s, WNAF_WIDTH)).collect();
    let max_len = digit_rows.iter().map(|d| d.len()).max().unwrap_or(0);

    let mut acc = Jacobian::<C>::identity();
    for i in (0..max_len).rev() {
        acc = acc.double();
        for (row, table) in digit_rows.iter().zip(tables.iter()) {
            if let Some(&digit) = row.get(i) {
                if digit != 0 {
                    acc = acc.add_mixed(&lookup_odd(table, digit));
                }
            }
        }
    }
    acc
}

const PIPPENGER_WINDOW_BITS: u32 = 8;

fn pippenger<C: CurveParams>(points: &[Affine<C>], scalars: &[[u8; 32]]) -> Jacobian<C> {
    let num_windows = (256 + PIPPENGER_WINDOW_BITS - 1) / PIPPENGER_WINDOW_BITS;
    let bucket_count = 1usize << PIPPENGER_WINDOW_BITS;

    let window_sums: Vec<Jacobian<C>> = (0..num_windows)
        .into_par_iter()
        .map(|w| {
            let mut buckets = vec![Jacobian::<C>::identity(); bucket_count];
            for (point, scalar) in points.iter().zip(scalars.iter()) {
                let digit = window_digit(scalar, w, PIPPENGER_WINDOW_BITS);
                if digit != 0 {
                    buckets[digit as usize] = buckets[digit as usize].add_mixed(point);
                }
            }
            // Running-sum trick: sum_{d=1}^{B-1} d*bucket[d] in one pass.
            let mut running = Jacobian::<C>::identity();
            let mut total = Jacobian::<C>::identity();
            for bucket in buckets.into_iter().skip(1).rev() {
                running = running.add(&bucket);
                total = total.add(&running);
            }
            total
        })
        .collect();

    // Combine per-window sums: total = sum_w window_sums[w] * 2^(w*bits)
    let mut acc = Jacobian::<C>::identity();
    for sum in window_sums.into_iter().rev() {
        for _ in 0..PIPPENGER_WINDOW_BITS {
            acc = acc.double();
        }
        acc = acc.add(&sum);
    }
    acc
}

/// Extracts the `window`-th base-`2^bits` digit of `scalar` (little-endian
/// bytes), as an unsigned value in `[0, 2^bits)`.
fn window_digit(scalar: &[u8; 32], window: u32, bits: u32) -> u32 {
    let bit_offset = window * bits;
    let byte_offset = (bit_offset / 8) as usize;
    if byte_offset >= 32 {
        return 0;
    }
    let mut word = 0u64;
    for (i, b) in scalar[byte_offset..].iter().take(8).enumerate() {
        word |= (*b as u64) << (8 * i);
    }
    let shift = bit_offset % 8;
    ((word >> shift) as u32) & ((1u32 << bits) - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::Fp;
    use crate::point::HeliosCurve;
    use subtle::Choice;

    fn helios_b() -> Fp {
        crate::constants::helios_b()
    }

    fn small_point() -> Affine<HeliosCurve> {
        for x_val in 1u64..64 {
            let mut x_bytes = [0u8; 32];
            x_bytes[0..8].copy_from_slice(&x_val.to_le_bytes());
            let x = Fp::from_bytes(&x_bytes);
            let x2 = x.square();
            let x3 = x2.mul(&x);
            let three_x = x.add(&x).add(&x);
            let rhs = x3.sub(&three_x).add(&helios_b());
            let (y, is_sq) = rhs.sqrt();
            if bool::from(is_sq) {
                return Affine::new(x, y, Choice::from(0));
            }
        }
        panic!("no small point found");
    }

    #[test]
    fn vartime_mult_by_zero_is_identity() {
        let p = small_point();
        let result = scalar_mult_vartime(&p, &[0u8; 32]);
        assert!(bool::from(result.is_identity()));
    }

    #[test]
    fn vartime_mult_by_one_is_identity_op() {
        let p = small_point();
        let mut scalar = [0u8; 32];
        scalar[0] = 1;
        let result = scalar_mult_vartime(&p, &scalar).to_affine();
        assert_eq!(result.x, p.x);
    }

    #[test]
    fn msm_of_one_term_matches_single_scalar_mult() {
        let p = small_point();
        let mut scalar = [0u8; 32];
        scalar[0] = 7;
        let single = scalar_mult_vartime(&p, &scalar);
        let msm = msm_vartime(&[p], &[scalar]);
        assert_eq!(single.to_affine().x, msm.to_affine().x);
    }
}
