//! CPU-feature detection and backend dispatch.
//!
//! A lazy-singleton dispatch pattern: feature detection runs once, the
//! result is cached, and the rest of the crate reads it through
//! [`backend`].
//!
//! All detected tiers currently route to the same radix-51 kernel in
//! [`crate::fp`]/[`crate::fq`] (see `DESIGN.md`): hand-writing several
//! independent numeric backends (AVX2 4-way, AVX-512 IFMA 8-way, MULX+ADX)
//! without a compiler to check them against each other is not a trade
//! worth taking here. The detection and dispatch table are real; only the
//! number of distinct kernels behind it is reduced to one.

use once_cell::sync::Lazy;
use tracing::instrument;

/// Which instruction-set tier this process's CPU was detected to support,
/// highest first. All variants currently dispatch to the same kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Avx512Ifma,
    Avx2,
    Mulx,
    NativeU64,
    PortableU32,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Backend::Avx512Ifma => "avx512ifma",
            Backend::Avx2 => "avx2",
            Backend::Mulx => "mulx+adx",
            Backend::NativeU64 => "native-u64",
            Backend::PortableU32 => "portable-u32",
        }
    }
}

#[cfg(target_arch = "x86_64")]
fn detect() -> Backend {
    if is_x86_feature_detected!("avx512ifma") {
        Backend::Avx512Ifma
    } else if is_x86_feature_detected!("avx2") {
        Backend::Avx2
    } else if is_x86_feature_detected!("bmi2") && is_x86_feature_detected!("adx") {
        Backend::Mulx
    } else {
        Backend::NativeU64
    }
}

#[cfg(not(target_arch = "x86_64"))]
fn detect() -> Backend {
    Backend::PortableU32
}

static BACKEND: Lazy<Backend> = Lazy::new(|| {
    let backend = detect();
    tracing::info!(backend = backend.name(), "selected arithmetic backend");
    backend
});

/// Returns the backend selected for this process. Detection runs once, on
/// first call, and is cached for the life of the process.
#[instrument]
pub fn backend() -> Backend {
    *BACKEND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_is_stable_across_calls() {
        assert_eq!(backend(), backend());
    }
}
