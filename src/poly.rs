//! Dense polynomial arithmetic over a curve's base field.
//!
//! A standard dense-coefficient implementation (schoolbook multiplication;
//! a Karatsuba crossover is left for a future pass rather than risked here
//! without a compiler to verify it). Used by [`crate::divisor`] to build
//! and evaluate divisors.

use crate::curve::CurveField;

/// A dense polynomial, coefficients lowest-degree first. The zero
/// polynomial is represented as an empty coefficient vector.
#[derive(Clone, Debug)]
pub struct Poly<F: CurveField> {
    pub coeffs: Vec<F>,
}

impl<F: CurveField> Poly<F> {
    pub fn zero() -> Self {
        Poly { coeffs: Vec::new() }
    }

    pub fn from_coeffs(mut coeffs: Vec<F>) -> Self {
        trim(&mut coeffs);
        Poly { coeffs }
    }

    pub fn constant(value: F) -> Self {
        Poly::from_coeffs(vec![value])
    }

    /// The polynomial `x - root`.
    pub fn linear_factor(root: F) -> Self {
        Poly::from_coeffs(vec![root.neg(), F::ONE])
    }

    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coeffs.get(i).copied().unwrap_or(F::ZERO);
            let b = other.coeffs.get(i).copied().unwrap_or(F::ZERO);
            out.push(a.add(&b));
        }
        Poly::from_coeffs(out)
    }

    pub fn sub(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        let mut out = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coeffs.get(i).copied().unwrap_or(F::ZERO);
            let b = other.coeffs.get(i).copied().unwrap_or(F::ZERO);
            out.push(a.sub(&b));
        }
        Poly::from_coeffs(out)
    }

    /// Schoolbook multiplication, `O(n*m)`.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![F::ZERO; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                out[i + j] = out[i + j].add(&a.mul(b));
            }
        }
        Poly::from_coeffs(out)
    }

    pub fn scale(&self, factor: F) -> Self {
        Poly::from_coeffs(self.coeffs.iter().map(|c| c.mul(&factor)).collect())
    }

    /// Horner evaluation at `x`.
    pub fn eval(&self, x: F) -> F {
        let mut acc = F::ZERO;
        for c in self.coeffs.iter().rev() {
            acc = acc.mul(&x).add(c);
        }
        acc
    }

    /// Polynomial long division: returns `(quotient, remainder)` such that
    /// `self = quotient * divisor + remainder`. Panics if `divisor` is the
    /// zero polynomial (a caller bug, not a runtime input error).
    pub fn divmod(&self, divisor: &Self) -> (Self, Self) {
        let divisor_deg = divisor.degree().expect("division by the zero polynomial");
        let lead_inv = divisor.coeffs[divisor_deg].invert();

        let mut remainder = self.coeffs.clone();
        let mut quotient = vec![F::ZERO; remainder.len().saturating_sub(divisor_deg)];

        while remainder.len() > divisor_deg {
            let cur_deg = remainder.len() - 1;
            let lead = remainder[cur_deg];
            if bool::from(lead.is_nonzero()) {
                let coeff = lead.mul(&lead_inv);
                let shift = cur_deg - divisor_deg;
                quotient[shift] = coeff;
                for (i, dc) in divisor.coeffs.iter().enumerate() {
                    remainder[shift + i] = remainder[shift + i].sub(&coeff.mul(dc));
                }
            }
            remainder.pop();
        }
        (Poly::from_coeffs(quotient), Poly::from_coeffs(remainder))
    }

    /// Builds the monic polynomial with exactly the given roots (with
    /// multiplicity), `prod_i (x - roots[i])`.
    pub fn from_roots(roots: &[F]) -> Self {
        let mut acc = Poly::constant(F::ONE);
        for &root in roots {
            acc = acc.mul(&Poly::linear_factor(root));
        }
        acc
    }

    /// Lagrange interpolation: the unique polynomial of degree `< points.len()`
    /// passing through every `(x, y)` pair. Panics if any two `x`
    /// coordinates coincide (a caller bug, not a runtime input error).
    pub fn interpolate(points: &[(F, F)]) -> Self {
        let mut result = Poly::zero();
        for (i, &(xi, yi)) in points.iter().enumerate() {
            let mut term = Poly::constant(F::ONE);
            let mut denom = F::ONE;
            for (j, &(xj, _)) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                term = term.mul(&Poly::linear_factor(xj));
                denom = denom.mul(&xi.sub(&xj));
            }
            assert!(
                bool::from(denom.is_nonzero()),
                "interpolation points must have distinct x-coordinates"
            );
            let scaled = term.scale(yi.mul(&denom.invert()));
            result = result.add(&scaled);
        }
        result
    }
}

fn trim<F: CurveField>(coeffs: &mut Vec<F>) {
    while let Some(last) = coeffs.last() {
        if bool::from(last.is_nonzero()) {
            break;
        }
        coeffs.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::Fp;

    fn fp(v: u64) -> Fp {
        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&v.to_le_bytes());
        Fp::from_bytes(&bytes)
    }

    #[test]
    fn mul_then_divmod_recovers_factors() {
        let a = Poly::from_coeffs(vec![fp(1), fp(2)]); // 1 + 2x
        let b = Poly::from_coeffs(vec![fp(3), fp(4)]); // 3 + 4x
        let product = a.mul(&b);
        let (q, r) = product.divmod(&b);
        assert!(r.is_zero());
        assert_eq!(q.coeffs, a.coeffs);
    }

    #[test]
    fn eval_matches_direct_computation() {
        let p = Poly::from_coeffs(vec![fp(5), fp(0), fp(1)]); // 5 + x^2
        let x = fp(3);
        let expected = fp(5).add(&x.square());
        assert_eq!(p.eval(x), expected);
    }

    #[test]
    fn from_roots_evaluates_to_zero_at_roots() {
        let roots = [fp(1), fp(2), fp(3)];
        let p = Poly::from_roots(&roots);
        for &r in roots.iter() {
            assert_eq!(p.eval(r), Fp::ZERO);
        }
    }

    #[test]
    fn interpolate_reproduces_input_points() {
        let points = [(fp(1), fp(2)), (fp(2), fp(5)), (fp(3), fp(10))]; // y = x^2+1
        let p = Poly::interpolate(&points);
        for &(x, y) in points.iter() {
            assert_eq!(p.eval(x), y);
        }
    }
}
