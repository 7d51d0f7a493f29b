//! Curve-to-curve bridging.
//!
//! Helios and Selene form a 2-cycle: `|Helios| = q` and `|Selene| = p`, so a
//! Helios point's affine x-coordinate (an `F_p` element) is exactly the
//! right shape to reuse as a Selene scalar, and vice versa. This crate does
//! not reduce scalars, so bridging is just a byte reinterpretation, not a
//! modular reduction.

use crate::fp::Fp;
use crate::fq::Fq;

/// Reinterprets a Helios affine x-coordinate (`F_p`) as Selene scalar bytes.
pub fn helios_x_as_selene_scalar(x: Fp) -> [u8; 32] {
    x.to_bytes()
}

/// Reinterprets a Selene affine x-coordinate (`F_q`) as Helios scalar bytes.
pub fn selene_x_as_helios_scalar(x: Fq) -> [u8; 32] {
    x.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridging_is_a_pure_reinterpretation() {
        let mut bytes = [0u8; 32];
        bytes[0] = 42;
        let x = Fp::from_bytes(&bytes);
        let scalar = helios_x_as_selene_scalar(x);
        assert_eq!(scalar, x.to_bytes());
    }
}
