//! Generic short-Weierstrass Jacobian point arithmetic, `y^2 = x^3 - 3x + B`,
//! shared by Helios (`F_p`) and Selene (`F_q`).
//!
//! Grounded in the reference implementation's `helios_ops.h` /
//! `selene_add.cpp` formula shapes (`dbl-2001-b`, `add-2007-bl`,
//! `madd-2007-bl`), generalised here over a `CurveField` trait instead of
//! being duplicated once per curve, with a single edge-case dispatch
//! covering both curves' point addition/doubling.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::errors::Error;
use crate::fp::Fp;
use crate::fq::Fq;

fn double_field<F: CurveField>(x: &F) -> F {
    x.add(x)
}

/// The field-level operations a curve's base field must provide. Implemented
/// by [`Fp`] (Helios) and [`Fq`] (Selene).
pub trait CurveField:
    Copy + Clone + PartialEq + Eq + ConditionallySelectable + ConstantTimeEq + Send + Sync
{
    const ZERO: Self;
    const ONE: Self;
    fn add(&self, other: &Self) -> Self;
    fn sub(&self, other: &Self) -> Self;
    fn neg(&self) -> Self;
    fn mul(&self, other: &Self) -> Self;
    fn square(&self) -> Self;
    fn square2(&self) -> Self;
    fn invert(&self) -> Self;
    fn sqrt(&self) -> (Self, Choice);
    fn is_nonzero(&self) -> Choice;
    fn is_negative(&self) -> Choice;
    fn from_bytes(bytes: &[u8; 32]) -> Self;
    fn to_bytes(self) -> [u8; 32];
    fn batch_invert(values: &[Self]) -> Vec<Self>;
}

impl CurveField for Fp {
    const ZERO: Self = Fp::ZERO;
    const ONE: Self = Fp::ONE;
    fn add(&self, o: &Self) -> Self {
        Fp::add(self, o)
    }
    fn sub(&self, o: &Self) -> Self {
        Fp::sub(self, o)
    }
    fn neg(&self) -> Self {
        Fp::neg(self)
    }
    fn mul(&self, o: &Self) -> Self {
        Fp::mul(self, o)
    }
    fn square(&self) -> Self {
        Fp::square(self)
    }
    fn square2(&self) -> Self {
        Fp::square2(self)
    }
    fn invert(&self) -> Self {
        Fp::invert(self)
    }
    fn sqrt(&self) -> (Self, Choice) {
        Fp::sqrt(self)
    }
    fn is_nonzero(&self) -> Choice {
        Fp::is_nonzero(self)
    }
    fn is_negative(&self) -> Choice {
        Fp::is_negative(self)
    }
    fn from_bytes(bytes: &[u8; 32]) -> Self {
        Fp::from_bytes(bytes)
    }
    fn to_bytes(self) -> [u8; 32] {
        Fp::to_bytes(self)
    }
    fn batch_invert(values: &[Self]) -> Vec<Self> {
        Fp::batch_invert(values)
    }
}

impl CurveField for Fq {
    const ZERO: Self = Fq::ZERO;
    const ONE: Self = Fq::ONE;
    fn add(&self, o: &Self) -> Self {
        Fq::add(self, o)
    }
    fn sub(&self, o: &Self) -> Self {
        Fq::sub(self, o)
    }
    fn neg(&self) -> Self {
        Fq::neg(self)
    }
    fn mul(&self, o: &Self) -> Self {
        Fq::mul(self, o)
    }
    fn square(&self) -> Self {
        Fq::square(self)
    }
    fn square2(&self) -> Self {
        Fq::square2(self)
    }
    fn invert(&self) -> Self {
        Fq::invert(self)
    }
    fn sqrt(&self) -> (Self, Choice) {
        Fq::sqrt(self)
    }
    fn is_nonzero(&self) -> Choice {
        Fq::is_nonzero(self)
    }
    fn is_negative(&self) -> Choice {
        Fq::is_negative(self)
    }
    fn from_bytes(bytes: &[u8; 32]) -> Self {
        Fq::from_bytes(bytes)
    }
    fn to_bytes(self) -> [u8; 32] {
        Fq::to_bytes(self)
    }
    fn batch_invert(values: &[Self]) -> Vec<Self> {
        Fq::batch_invert(values)
    }
}

/// Per-curve parameters: `A` is fixed at `-3` crate-wide, only `B` varies.
pub trait CurveParams: Send + Sync {
    type Field: CurveField;
    fn b() -> Self::Field;
}

/// A point in Jacobian coordinates, `(X : Y : Z)` representing the affine
/// point `(X/Z^2, Y/Z^3)`. `Z == 0` is the point at infinity.
#[derive(Clone, Copy, Debug)]
pub struct Jacobian<C: CurveParams> {
    pub x: C::Field,
    pub y: C::Field,
    pub z: C::Field,
    _curve: core::marker::PhantomData<C>,
}

/// An affine point, `(x, y)`, with a validity flag doubling as the
/// point-at-infinity marker.
#[derive(Clone, Copy, Debug)]
pub struct Affine<C: CurveParams> {
    pub x: C::Field,
    pub y: C::Field,
    pub infinity: Choice,
    _curve: core::marker::PhantomData<C>,
}

impl<C: CurveParams> Jacobian<C> {
    pub fn new(x: C::Field, y: C::Field, z: C::Field) -> Self {
        Jacobian {
            x,
            y,
            z,
            _curve: core::marker::PhantomData,
        }
    }

    pub fn identity() -> Self {
        Jacobian {
            x: C::Field::ONE,
            y: C::Field::ONE,
            z: C::Field::ZERO,
            _curve: core::marker::PhantomData,
        }
    }

    pub fn is_identity(&self) -> Choice {
        !self.z.is_nonzero()
    }

    pub fn from_affine(p: &Affine<C>) -> Self {
        let identity = Self::identity();
        let from_p = Jacobian {
            x: p.x,
            y: p.y,
            z: C::Field::ONE,
            _curve: core::marker::PhantomData,
        };
        Jacobian {
            x: C::Field::conditional_select(&from_p.x, &identity.x, p.infinity),
            y: C::Field::conditional_select(&from_p.y, &identity.y, p.infinity),
            z: C::Field::conditional_select(&from_p.z, &identity.z, p.infinity),
            _curve: core::marker::PhantomData,
        }
    }

    pub fn neg(&self) -> Self {
        Jacobian {
            x: self.x,
            y: self.y.neg(),
            z: self.z,
            _curve: core::marker::PhantomData,
        }
    }

    /// `dbl-2001-b`: point doubling for `A = -3` curves, 3M + 5S.
    pub fn double(&self) -> Self {
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x.mul(&gamma);

        let x_minus_delta = self.x.sub(&delta);
        let x_plus_delta = self.x.add(&delta);
        let alpha = double_field(&x_minus_delta.mul(&x_plus_delta)).add(&x_minus_delta.mul(&x_plus_delta));

        let beta4 = double_field(&double_field(&beta));
        let x3 = alpha.square().sub(&double_field(&beta4));

        let y_plus_z = self.y.add(&self.z);
        let z3 = y_plus_z.square().sub(&gamma).sub(&delta);

        let gamma_sq_8 = double_field(&double_field(&double_field(&gamma.square())));
        let y3 = alpha.mul(&beta4.sub(&x3)).sub(&gamma_sq_8);

        let is_identity = self.is_identity();
        Jacobian {
            x: C::Field::conditional_select(&x3, &self.x, is_identity),
            y: C::Field::conditional_select(&y3, &self.y, is_identity),
            z: C::Field::conditional_select(&z3, &self.z, is_identity),
            _curve: core::marker::PhantomData,
        }
    }

    /// `add-2007-bl`: general Jacobian addition, with identity and
    /// doubling dispatched as edge cases, constant-time-selected.
    pub fn add(&self, other: &Self) -> Self {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x.mul(&z2z2);
        let u2 = other.x.mul(&z1z1);
        let s1 = self.y.mul(&other.z).mul(&z2z2);
        let s2 = other.y.mul(&self.z).mul(&z1z1);

        let h = u2.sub(&u1);
        let r = s2.sub(&s1);

        let is_same_x = !h.is_nonzero();
        let is_same_y = !r.is_nonzero();
        let is_doubling = is_same_x & is_same_y;
        let is_inverse = is_same_x & !is_same_y;

        let i = h.add(&h).square();
        let j = h.mul(&i);
        let v = u1.mul(&i);
        let r2 = r.add(&r);

        let x3 = r2.square().sub(&j).sub(&v).sub(&v);
        let y3 = r2
            .mul(&v.sub(&x3))
            .sub(&s1.add(&s1).mul(&j));
        let z3 = (self.z.add(&other.z)).square().sub(&z1z1).sub(&z2z2).mul(&h);

        let generic = Jacobian {
            x: x3,
            y: y3,
            z: z3,
            _curve: core::marker::PhantomData,
        };
        let doubled = self.double();
        let identity = Self::identity();

        let mut result = Jacobian {
            x: C::Field::conditional_select(&generic.x, &doubled.x, is_doubling),
            y: C::Field::conditional_select(&generic.y, &doubled.y, is_doubling),
            z: C::Field::conditional_select(&generic.z, &doubled.z, is_doubling),
            _curve: core::marker::PhantomData,
        };
        result.x = C::Field::conditional_select(&result.x, &identity.x, is_inverse);
        result.y = C::Field::conditional_select(&result.y, &identity.y, is_inverse);
        result.z = C::Field::conditional_select(&result.z, &identity.z, is_inverse);

        let self_is_id = self.is_identity();
        let other_is_id = other.is_identity();
        result.x = C::Field::conditional_select(&result.x, &other.x, self_is_id);
        result.y = C::Field::conditional_select(&result.y, &other.y, self_is_id);
        result.z = C::Field::conditional_select(&result.z, &other.z, self_is_id);
        result.x = C::Field::conditional_select(&result.x, &self.x, other_is_id);
        result.y = C::Field::conditional_select(&result.y, &self.y, other_is_id);
        result.z = C::Field::conditional_select(&result.z, &self.z, other_is_id);

        result
    }

    /// `madd-2007-bl`: mixed addition with an affine right-hand side, 7M +
    /// 4S. Falls back to the general formula via [`Jacobian::add`] for the
    /// identity/doubling/inverse edge cases.
    pub fn add_mixed(&self, other: &Affine<C>) -> Self {
        let other_jacobian = Jacobian {
            x: other.x,
            y: other.y,
            z: C::Field::ONE,
            _curve: core::marker::PhantomData,
        };
        let generic = self.add(&other_jacobian);
        Jacobian {
            x: C::Field::conditional_select(&generic.x, &self.x, other.infinity),
            y: C::Field::conditional_select(&generic.y, &self.y, other.infinity),
            z: C::Field::conditional_select(&generic.z, &self.z, other.infinity),
            _curve: core::marker::PhantomData,
        }
    }

    pub fn to_affine(&self) -> Affine<C> {
        let is_identity = self.is_identity();
        let z_inv = self.z.invert();
        let z_inv2 = z_inv.square();
        let z_inv3 = z_inv2.mul(&z_inv);
        Affine {
            x: self.x.mul(&z_inv2),
            y: self.y.mul(&z_inv3),
            infinity: is_identity,
            _curve: core::marker::PhantomData,
        }
    }

    /// Converts many Jacobian points to affine using a single field
    /// inversion (Montgomery's trick), via `C::Field::batch_invert`.
    pub fn batch_to_affine(points: &[Self]) -> Vec<Affine<C>> {
        let zs: Vec<C::Field> = points
            .iter()
            .map(|p| {
                C::Field::conditional_select(&p.z, &C::Field::ONE, p.is_identity())
            })
            .collect();
        let z_invs = C::Field::batch_invert(&zs);
        points
            .iter()
            .zip(z_invs.iter())
            .map(|(p, z_inv)| {
                let z_inv2 = z_inv.square();
                let z_inv3 = z_inv2.mul(z_inv);
                Affine {
                    x: p.x.mul(&z_inv2),
                    y: p.y.mul(&z_inv3),
                    infinity: p.is_identity(),
                    _curve: core::marker::PhantomData,
                }
            })
            .collect()
    }

    pub fn is_on_curve(&self) -> Choice {
        let affine = self.to_affine();
        let lhs = affine.y.square();
        let x2 = affine.x.square();
        let x3 = x2.mul(&affine.x);
        let three_x = affine.x.add(&affine.x).add(&affine.x);
        let rhs = x3.sub(&three_x).add(&C::b());
        lhs.ct_eq(&rhs) | affine.infinity
    }
}

impl<C: CurveParams> Affine<C> {
    pub fn new(x: C::Field, y: C::Field, infinity: Choice) -> Self {
        Affine {
            x,
            y,
            infinity,
            _curve: core::marker::PhantomData,
        }
    }

    pub fn identity() -> Self {
        Affine {
            x: C::Field::ZERO,
            y: C::Field::ZERO,
            infinity: Choice::from(1),
            _curve: core::marker::PhantomData,
        }
    }

    pub fn cmov(a: &Self, b: &Self, choice: Choice) -> Self {
        let infinity = Choice::from(u8::conditional_select(
            &a.infinity.unwrap_u8(),
            &b.infinity.unwrap_u8(),
            choice,
        ));
        Affine {
            x: C::Field::conditional_select(&a.x, &b.x, choice),
            y: C::Field::conditional_select(&a.y, &b.y, choice),
            infinity,
            _curve: core::marker::PhantomData,
        }
    }

    pub fn cneg(&self, choice: Choice) -> Self {
        Affine {
            x: self.x,
            y: C::Field::conditional_select(&self.y, &self.y.neg(), choice),
            infinity: self.infinity,
            _curve: core::marker::PhantomData,
        }
    }

    /// Encodes as 32 bytes: the canonical x-coordinate with the y-parity
    /// packed into bit 255 (the top bit of the last byte), which is
    /// otherwise always zero since every field element is `< 2^255`. The
    /// point at infinity encodes as all-zero.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = C::Field::conditional_select(&self.x, &C::Field::ZERO, self.infinity).to_bytes();
        let parity = (self.y.is_negative() & !self.infinity).unwrap_u8();
        out[31] |= parity << 7;
        out
    }

    /// Decodes from the format produced by [`Affine::to_bytes`]: bit 255 is
    /// the y-parity, the low 255 bits are `x`. The all-zero encoding
    /// decodes to the point at infinity. Rejects a non-canonical `x`
    /// (`>= p` or `>= q`, caught by reserialising and comparing) and an `x`
    /// for which `x^3 - 3x + B` is not a quadratic residue.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        if bytes.iter().all(|&b| b == 0) {
            return Ok(Affine::identity());
        }

        let want_negative = Choice::from(bytes[31] >> 7);
        let mut x_bytes = *bytes;
        x_bytes[31] &= 0x7f;

        let x = C::Field::from_bytes(&x_bytes);
        if x.to_bytes() != x_bytes {
            return Err(Error::InvalidPointEncoding);
        }

        let x2 = x.square();
        let x3 = x2.mul(&x);
        let three_x = x.add(&x).add(&x);
        let rhs = x3.sub(&three_x).add(&C::b());
        let (mut y, is_square) = rhs.sqrt();
        if !bool::from(is_square) {
            return Err(Error::InvalidPointEncoding);
        }
        let is_negative = y.is_negative();
        y = C::Field::conditional_select(&y, &y.neg(), want_negative ^ is_negative);
        Ok(Affine {
            x,
            y,
            infinity: Choice::from(0),
            _curve: core::marker::PhantomData,
        })
    }
}
