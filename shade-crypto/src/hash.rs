//! Keccak-256 hashing, scalar derivation, and the note keystream.
//!
//! Every hash in the protocol is Keccak-256 (the Ethereum variant, not
//! SHA3-256 - the padding differs). Two derived constructions are built on
//! top of it:
//!
//! - [`hash_to_scalar`]: maps arbitrary bytes into a valid secp256k1 scalar
//!   in `[1, n)` by re-hashing any out-of-range digest, so an invalid digest
//!   is never silently wrapped or truncated.
//! - [`note_keystream`]: a counter-extended keystream for notes longer than
//!   one hash output:
//!
//! ```text
//! B_0 = keccak256(seed)
//! B_i = keccak256(B_{i-1} || i_be32)    for i >= 1
//! keystream = B_0 || B_1 || ...
//! ```

use k256::Scalar;
use k256::elliptic_curve::PrimeField;
use sha3::{Digest, Keccak256};
use zeroize::Zeroize;

use shade_core::constants::KECCAK256_SIZE;

/// Computes the Keccak-256 hash of the input.
pub fn keccak256(input: &[u8]) -> [u8; KECCAK256_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Maps arbitrary bytes to a secp256k1 scalar in `[1, n)`.
///
/// The digest is interpreted as a big-endian integer. A digest of zero or
/// one at or above the curve order is re-hashed until a valid scalar comes
/// out. The probability of even one re-hash is about 2^-128, but the loop
/// keeps the function total instead of wrapping modulo n.
pub fn hash_to_scalar(input: &[u8]) -> Scalar {
    let mut digest = keccak256(input);
    loop {
        // from_repr rejects values >= n; a zero scalar is rejected separately
        let candidate = Option::<Scalar>::from(Scalar::from_repr(digest.into()));
        if let Some(scalar) = candidate {
            if !bool::from(k256::elliptic_curve::Field::is_zero(&scalar)) {
                digest.zeroize();
                return scalar;
            }
        }
        digest = keccak256(&digest);
    }
}

/// Generates `length` keystream bytes from a 32-byte seed.
///
/// The first block is `keccak256(seed)`; each further block chains the
/// previous block with a big-endian 32-bit counter. Callers must never reuse
/// a seed across messages; in the protocol the seed is a per-payment ECDH
/// shared secret, which holds by construction.
pub fn note_keystream(seed: &[u8; KECCAK256_SIZE], length: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(length.next_multiple_of(KECCAK256_SIZE));
    let mut block = keccak256(seed);
    out.extend_from_slice(&block);

    let mut counter: u32 = 1;
    while out.len() < length {
        let mut chained = [0u8; KECCAK256_SIZE + 4];
        chained[..KECCAK256_SIZE].copy_from_slice(&block);
        chained[KECCAK256_SIZE..].copy_from_slice(&counter.to_be_bytes());
        block = keccak256(&chained);
        chained.zeroize();
        out.extend_from_slice(&block);
        counter += 1;
    }

    block.zeroize();
    out.truncate(length);
    out
}
