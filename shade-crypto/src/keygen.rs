//! Key generation: deterministic derivation from entropy and random keys.
//!
//! A recipient derives both long-term key pairs from one entropy value
//! (typically a wallet signature over a fixed message), so the same wallet
//! always reproduces the same stealth keys:
//!
//! ```text
//! viewing_sk  = hash_to_scalar(entropy)
//! spending_sk = hash_to_scalar(viewing_sk)
//! ```
//!
//! Senders use [`random_keypair`] for the per-payment ephemeral key, drawn
//! from the OS RNG and never reused.

use k256::Scalar;
use k256::elliptic_curve::PrimeField;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use shade_core::error::{Result, ShadeError};
use shade_core::types::{KeyPair, StealthKeySet};

use crate::hash::hash_to_scalar;
use crate::point::{encode_scalar, public_for_scalar};

/// Derives the complete (viewing, spending) key set from entropy.
///
/// Deterministic: the same entropy always yields the same key set. The
/// spending key is chained from the viewing key so that revealing the
/// viewing secret (e.g. to an auditor) does not reveal the spending secret.
///
/// # Errors
/// Returns [`ShadeError::InvalidEntropy`] for empty input. No other
/// structure is required of the entropy; any non-empty byte string works.
pub fn derive_key_set(entropy: &[u8]) -> Result<StealthKeySet> {
    if entropy.is_empty() {
        return Err(ShadeError::InvalidEntropy);
    }

    let viewing_scalar = hash_to_scalar(entropy);

    let mut viewing_bytes = [0u8; 32];
    viewing_bytes.copy_from_slice(&viewing_scalar.to_bytes());
    let spending_scalar = hash_to_scalar(&viewing_bytes);
    viewing_bytes.zeroize();

    let viewing = KeyPair::new(
        encode_scalar(&viewing_scalar),
        public_for_scalar(&viewing_scalar),
    );
    let spending = KeyPair::new(
        encode_scalar(&spending_scalar),
        public_for_scalar(&spending_scalar),
    );

    Ok(StealthKeySet::new(viewing, spending))
}

/// Generates a key pair from the OS RNG.
pub fn random_keypair() -> KeyPair {
    let scalar = random_scalar(&mut OsRng);
    KeyPair::new(encode_scalar(&scalar), public_for_scalar(&scalar))
}

/// Draws a uniform scalar in `[1, n)` by rejection sampling.
///
/// Roughly one draw in 2^128 is rejected, so the loop terminates immediately
/// in practice.
pub(crate) fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let mut candidate = [0u8; 32];
        rng.fill_bytes(&mut candidate);

        let scalar = Option::<Scalar>::from(Scalar::from_repr(candidate.into()));
        candidate.zeroize();

        if let Some(scalar) = scalar {
            if !bool::from(k256::elliptic_curve::Field::is_zero(&scalar)) {
                return scalar;
            }
        }
    }
}
