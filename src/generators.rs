//! NUMS ("nothing up my sleeve") generator derivation.
//!
//! Every base point this crate uses — curve generators, the Pedersen
//! generator sequence — is derived here via [`crate::hash_to_curve`] over a
//! domain-separated label, rather than hardcoded (see `DESIGN.md` Open
//! Question #4 for why a static generator table was rejected in favor of
//! NUMS derivation).
//!
//! Seed construction is a plain deterministic byte fold, not a
//! cryptographic hash: this crate's Non-goals put message hashing (the
//! `hash_to_field` step of RFC 9380) out of scope, so the label-to-seed
//! step here is intentionally the simplest thing that is still
//! deterministic and domain-separated, not a security boundary.

use crate::hash_to_curve::{helios_map_to_curve, selene_map_to_curve};
use crate::point::{HeliosAffine, SeleneAffine};

/// Folds a domain label and an index into a 32-byte seed.
fn seed(label: &str, index: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    let bytes = label.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        out[i % 32] ^= *b;
    }
    let index_bytes = index.to_le_bytes();
    for (i, b) in index_bytes.iter().enumerate() {
        out[(bytes.len() + i) % 32] ^= *b;
    }
    out
}

/// Derives the `index`-th Helios generator under `label`.
pub fn helios_generator(label: &str, index: u64) -> HeliosAffine {
    tracing::trace!(label, index, "deriving helios generator");
    helios_map_to_curve(&seed(label, index)).to_affine()
}

/// Derives the `index`-th Selene generator under `label`.
pub fn selene_generator(label: &str, index: u64) -> SeleneAffine {
    tracing::trace!(label, index, "deriving selene generator");
    selene_map_to_curve(&seed(label, index)).to_affine()
}

/// The Helios base point used as the conventional scalar-multiplication
/// generator throughout this crate.
pub fn helios_base_point() -> HeliosAffine {
    helios_generator("helioselene/helios/base", 0)
}

/// The Selene base point used as the conventional scalar-multiplication
/// generator throughout this crate.
pub fn selene_base_point() -> SeleneAffine {
    selene_generator("helioselene/selene/base", 0)
}

/// Derives `count` independent Helios generators for a Pedersen vector
/// commitment, under the given domain label.
pub fn helios_pedersen_generators(label: &str, count: u64) -> Vec<HeliosAffine> {
    (0..count).map(|i| helios_generator(label, i)).collect()
}

/// Derives `count` independent Selene generators for a Pedersen vector
/// commitment, under the given domain label.
pub fn selene_pedersen_generators(label: &str, count: u64) -> Vec<SeleneAffine> {
    (0..count).map(|i| selene_generator(label, i)).collect()
}
