//! Constant-time scalar multiplication, single-base and fixed-base.
//!
//! Uses a signed 4-bit fixed window over a real precomputed affine table
//! (`[1]P, [2]P, .., [8]P`), table lookups done by scanning every entry and
//! selecting via `subtle::Choice` so the access pattern doesn't depend on
//! the scalar. The windowing shape follows a fixed-window lookup-and-add
//! pattern; the table itself is a real precomputed affine table rather than
//! a re-derived single-nibble shortcut.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::curve::{Affine, CurveParams, Jacobian};

const WINDOW_TABLE_SIZE: usize = 8;

/// `[1]P, [2]P, .., [8]P` in affine form, used by the signed 4-bit window
/// scan in [`scalar_mult_ct`].
struct Window4Table<C: CurveParams> {
    entries: [Affine<C>; WINDOW_TABLE_SIZE],
}

impl<C: CurveParams> Window4Table<C> {
    fn build(base: &Affine<C>) -> Self {
        let mut jacobian = [Jacobian::<C>::identity(); WINDOW_TABLE_SIZE];
        jacobian[0] = Jacobian::from_affine(base);
        for i in 1..WINDOW_TABLE_SIZE {
            jacobian[i] = jacobian[i - 1].add_mixed(base);
        }
        let affine = Jacobian::batch_to_affine(&jacobian);
        let mut entries = [Affine::<C>::identity(); WINDOW_TABLE_SIZE];
        entries.copy_from_slice(&affine);
        Window4Table { entries }
    }

    /// Looks up `[|digit|]P` (`digit` in `1..=8`) by scanning every table
    /// entry and selecting the matching one, so the memory access pattern
    /// does not depend on `digit`.
    fn lookup(&self, abs_digit: u8) -> Affine<C> {
        let mut out = Affine::<C>::identity();
        for (i, entry) in self.entries.iter().enumerate() {
            let matches = (abs_digit as u64).ct_eq(&((i + 1) as u64));
            out = Affine::cmov(&out, entry, matches);
        }
        out
    }
}

/// Recodes a 255-bit scalar (32 little-endian bytes, top bit ignored) into
/// 64 signed digits in `[-8, 8]`, each representing one 4-bit window,
/// least-significant window first.
fn recode_signed_4bit(scalar: &[u8; 32]) -> [i8; 64] {
    let mut digits = [0i8; 64];
    let mut carry = 0i8;
    for i in 0..64 {
        let byte = scalar[i / 2];
        let nibble = if i % 2 == 0 { byte & 0xf } else { byte >> 4 };
        let mut digit = nibble as i8 + carry;
        if digit > 8 {
            digit -= 16;
            carry = 1;
        } else {
            carry = 0;
        }
        digits[i] = digit;
    }
    digits
}

/// Constant-time scalar multiplication `[scalar]base`, signed 4-bit fixed
/// window. `scalar` is used as given, not reduced modulo the curve's
/// order — this crate does not perform scalar reduction.
pub fn scalar_mult_ct<C: CurveParams>(base: &Affine<C>, scalar: &[u8; 32]) -> Jacobian<C> {
    let table = Window4Table::build(base);
    let digits = recode_signed_4bit(scalar);

    let mut acc = Jacobian::<C>::identity();
    for &digit in digits.iter().rev() {
        for _ in 0..4 {
            acc = acc.double();
        }
        if digit != 0 {
            let abs_digit = digit.unsigned_abs();
            let entry = table.lookup(abs_digit);
            let is_negative = Choice::from((digit < 0) as u8);
            let signed_entry = entry.cneg(is_negative);
            acc = acc.add_mixed(&signed_entry);
        }
    }
    acc
}

/// A precomputed table for repeated multiplication against one fixed base
/// (e.g. a curve generator), amortising [`Window4Table::build`] across
/// many calls to [`FixedBaseTable::mul`].
pub struct FixedBaseTable<C: CurveParams> {
    table: Window4Table<C>,
}

impl<C: CurveParams> FixedBaseTable<C> {
    pub fn new(base: &Affine<C>) -> Self {
        FixedBaseTable {
            table: Window4Table::build(base),
        }
    }

    pub fn mul(&self, scalar: &[u8; 32]) -> Jacobian<C> {
        let digits = recode_signed_4bit(scalar);
        let mut acc = Jacobian::<C>::identity();
        for &digit in digits.iter().rev() {
            for _ in 0..4 {
                acc = acc.double();
            }
            if digit != 0 {
                let abs_digit = digit.unsigned_abs();
                let entry = self.table.lookup(abs_digit);
                let is_negative = Choice::from((digit < 0) as u8);
                let signed_entry = entry.cneg(is_negative);
                acc = acc.add_mixed(&signed_entry);
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::Fp;
    use crate::point::HeliosCurve;

    fn helios_b() -> Fp {
        crate::constants::helios_b()
    }

    fn small_point() -> Affine<HeliosCurve> {
        // A small curve point found by brute-force x-search over tiny x,
        // used only to exercise the multiplication algorithm in tests.
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
                return Affine::new(x, y, subtle::Choice::from(0));
            }
        }
        panic!("no small point found");
    }

    #[test]
    fn scalar_mult_by_zero_is_identity() {
        let p = small_point();
        let scalar = [0u8; 32];
        let result = scalar_mult_ct(&p, &scalar);
        assert!(bool::from(result.is_identity()));
    }

    #[test]
    fn scalar_mult_by_one_is_identity_op() {
        let p = small_point();
        let mut scalar = [0u8; 32];
        scalar[0] = 1;
        let result = scalar_mult_ct(&p, &scalar).to_affine();
        assert_eq!(result.x, p.x);
        assert_eq!(result.y, p.y);
    }

    #[test]
    fn scalar_mult_by_two_matches_doubling() {
        let p = small_point();
        let mut scalar = [0u8; 32];
        scalar[0] = 2;
        let result = scalar_mult_ct(&p, &scalar);
        let doubled = Jacobian::from_affine(&p).double();
        assert_eq!(result.to_affine().x, doubled.to_affine().x);
    }
}
