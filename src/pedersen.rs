//! Pedersen vector commitments.
//!
//! `commit(values, blinding) = blinding * H + sum_i values[i] * G_i`, built
//! from a single [`crate::msm::msm_vartime`] call against NUMS generators
//! from [`crate::generators`].

use crate::curve::{Affine, CurveParams, Jacobian};
use crate::msm;

/// A Pedersen commitment scheme over one curve: a blinding generator `H`
/// plus a sequence of value generators `G_0, G_1, ..`.
pub struct PedersenGenerators<C: CurveParams> {
    pub blinding_generator: Affine<C>,
    pub value_generators: Vec<Affine<C>>,
}

impl<C: CurveParams> PedersenGenerators<C> {
    pub fn new(blinding_generator: Affine<C>, value_generators: Vec<Affine<C>>) -> Self {
        PedersenGenerators {
            blinding_generator,
            value_generators,
        }
    }

    /// Commits to `values` (one scalar per value generator) under
    /// `blinding`. `values.len()` must not exceed the number of configured
    /// value generators.
    pub fn commit(&self, values: &[[u8; 32]], blinding: &[u8; 32]) -> Jacobian<C> {
        assert!(values.len() <= self.value_generators.len());
        let mut points = Vec::with_capacity(values.len() + 1);
        let mut scalars = Vec::with_capacity(values.len() + 1);
        points.push(self.blinding_generator);
        scalars.push(*blinding);
        points.extend_from_slice(&self.value_generators[..values.len()]);
        scalars.extend_from_slice(values);
        msm::msm_vartime(&points, &scalars)
    }
}
