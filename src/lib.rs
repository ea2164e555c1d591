#![cfg_attr(not(feature = "std"), no_std)]
//! A pure Rust implementation of KangarooTwelve (K12), an extendable-output
//! function built on the Keccak-p\[1600,12\] permutation with a
//! tree-hashing construction for data-parallel processing of large inputs.
//!
//! The incremental, object-oriented surface lives on [`KangarooTwelve`].
//! The free functions (`k12_oneshot`, `k12_init`, `k12_update`,
//! `k12_final`, `k12_squeeze`) are a thin C-ABI-shaped wrapper around the
//! same type, named to match this crate's originating specification.

mod dispatch;
mod error;
mod k12;
mod keccak1600;
mod sponge;
mod state;
mod times;

#[cfg(test)]
mod fuzzing;

pub use dispatch::{disable_avx2, disable_avx512, disable_ssse3, enable_all, has_times2, has_times4, has_times8};
pub use error::{Error, Result};
pub use k12::{KangarooTwelve, CHUNK_SIZE};
pub use state::{CAPACITY, RATE};

/// Computes a fixed-length K12 digest in one call. Returns exactly
/// `output_len` bytes, or [`Error::ZeroLengthRequest`] if `output_len == 0`.
#[cfg(feature = "std")]
pub fn k12_oneshot(input: &[u8], customization: &[u8], output_len: usize) -> Result<std::vec::Vec<u8>> {
    KangarooTwelve::oneshot(input, customization, output_len)
}

/// Starts a new streaming instance. `output_len = 0` selects streaming squeeze.
pub fn k12_init(output_len: usize) -> KangarooTwelve {
    KangarooTwelve::new(output_len)
}

/// Absorbs message bytes into an instance created by [`k12_init`].
pub fn k12_update(instance: &mut KangarooTwelve, bytes: &[u8]) -> Result<()> {
    instance.update(bytes)
}

/// Finalizes an instance with the given customization string, writing the
/// fixed-length output into `output` when the instance was created with a
/// nonzero `output_len`.
pub fn k12_final(instance: &mut KangarooTwelve, customization: &[u8], output: &mut [u8]) -> Result<()> {
    instance.finalize(customization, output)
}

/// Draws `output.len()` more bytes from a streaming instance.
pub fn k12_squeeze(instance: &mut KangarooTwelve, output: &mut [u8]) -> Result<()> {
    instance.squeeze(output)
}
