//! Diffie-Hellman shared secrets over secp256k1.
//!
//! Both directions of the protocol reduce to the same computation: scalar
//! times point, keep only the x-coordinate of the result. The sender runs
//! it with (ephemeral secret, viewing public); the recipient with (viewing
//! secret, ephemeral public). Commutativity of scalar multiplication makes
//! the two equal.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, Scalar};
use zeroize::{Zeroize, ZeroizeOnDrop};

use shade_core::constants::SHARED_SECRET_SIZE;

/// The 32-byte x-coordinate of an ECDH point.
///
/// The parity byte is deliberately stripped: both sides must derive the
/// identical 32 bytes, and the x-coordinate alone carries the full secret.
/// Zeroized on drop; never log it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Wraps raw secret bytes. Intended for tests and key-import paths.
    pub fn from_array(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// Computes the ECDH shared secret `scalar * point` and keeps the
/// x-coordinate.
///
/// Inputs are already-validated arithmetic values, so this cannot fail: a
/// scalar in `[1, n)` times a valid public point is never the identity.
pub fn shared_secret(scalar: &Scalar, point: &ProjectivePoint) -> SharedSecret {
    let product = point * scalar;
    let encoded = product.to_affine().to_encoded_point(true);

    let mut bytes = [0u8; SHARED_SECRET_SIZE];
    bytes.copy_from_slice(&encoded.as_bytes()[1..]);
    SharedSecret { bytes }
}
