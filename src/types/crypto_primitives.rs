/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Cryptographic primitives.
//!
//! The only cryptographic primitive the crate needs is a cryptographic hash, which the default
//! [rendezvous hasher](crate::selector::Sha256Hasher) uses to rank nodes. It is provided by the [`sha2`]
//! crate.

// re-exports below.
pub use sha2::Digest;
pub use sha2::Sha256 as CryptoHasher;

/// Number of leading digest bytes that are kept when a digest is truncated to a rendezvous weight.
pub(crate) const WEIGHT_LEN: usize = 8;

/// Hash `bytes` with [`CryptoHasher`] and read the first [`WEIGHT_LEN`] bytes of the digest as a
/// little-endian `u64`.
pub(crate) fn truncated_digest(bytes: &[u8]) -> u64 {
    let digest = CryptoHasher::digest(bytes);
    let mut weight = [0u8; WEIGHT_LEN];
    weight.copy_from_slice(&digest[..WEIGHT_LEN]);
    u64::from_le_bytes(weight)
}
