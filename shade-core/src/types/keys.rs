//! Key types for Shade.
//!
//! This module defines the key structures used in the protocol:
//!
//! - [`SecretScalar`]: a private scalar in [1, n) (32 bytes, zeroized on drop)
//! - [`PublicPoint`]: a compressed secp256k1 point (33 bytes)
//! - [`KeyPair`]: combined secret + public half
//! - [`StealthKeySet`]: the (viewing, spending) pair owned by one identity
//!
//! Range and on-curve validation is performed by `shade-crypto`; these types
//! enforce sizes and encodings only, so that the core crate stays free of
//! curve arithmetic.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{COMPRESSED_POINT_SIZE, POINT_PREFIX_EVEN, POINT_PREFIX_ODD, SCALAR_SIZE};
use crate::error::{Result, ShadeError};

// ═══════════════════════════════════════════════════════════════════════════════
// SECRET SCALAR
// ═══════════════════════════════════════════════════════════════════════════════

/// A private scalar (big-endian, 32 bytes).
///
/// This is sensitive material and will be automatically zeroized when dropped.
/// Never expose it in logs or error messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretScalar {
    bytes: [u8; SCALAR_SIZE],
}

impl SecretScalar {
    /// Creates a secret scalar from raw big-endian bytes.
    ///
    /// # Errors
    /// Returns an error if the length is not `SCALAR_SIZE`. Range validation
    /// (nonzero, below the curve order) is the crypto layer's job.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SCALAR_SIZE {
            return Err(ShadeError::InvalidKeySize {
                expected: SCALAR_SIZE,
                actual: bytes.len(),
            });
        }

        let mut arr = [0u8; SCALAR_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a secret scalar from a fixed-size array.
    pub fn from_array(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw big-endian bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the scalar as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; SCALAR_SIZE] {
        &self.bytes
    }

    /// Parses from a hex string (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the hex-encoded scalar with a `0x` marker.
    ///
    /// Only use this for explicit, user-consented export paths.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl std::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose secret scalar content
        write!(f, "SecretScalar([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// A compressed secp256k1 point: 1-byte parity prefix + 32-byte x-coordinate.
///
/// This is safe to share publicly. Serialized as a `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicPoint {
    bytes: [u8; COMPRESSED_POINT_SIZE],
}

impl PublicPoint {
    /// Creates a public point from raw compressed bytes.
    ///
    /// # Errors
    /// Returns an error if the length is not 33 bytes or the prefix byte is
    /// not a SEC1 compressed-point marker. On-curve validation happens in
    /// the crypto layer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_POINT_SIZE {
            return Err(ShadeError::InvalidKeySize {
                expected: COMPRESSED_POINT_SIZE,
                actual: bytes.len(),
            });
        }

        if bytes[0] != POINT_PREFIX_EVEN && bytes[0] != POINT_PREFIX_ODD {
            return Err(ShadeError::PointNotOnCurve);
        }

        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates a public point from a fixed-size array without prefix checks.
    ///
    /// Intended for values produced by the crypto layer, which are compressed
    /// encodings of actual curve points by construction.
    pub fn from_array(bytes: [u8; COMPRESSED_POINT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Reassembles a point from its registry encoding: parity prefix + x.
    pub fn from_parts(prefix: u8, x: &[u8; SCALAR_SIZE]) -> Result<Self> {
        if prefix != POINT_PREFIX_EVEN && prefix != POINT_PREFIX_ODD {
            return Err(ShadeError::PointNotOnCurve);
        }

        let mut arr = [0u8; COMPRESSED_POINT_SIZE];
        arr[0] = prefix;
        arr[1..].copy_from_slice(x);
        Ok(Self { bytes: arr })
    }

    /// Returns the raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the point as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; COMPRESSED_POINT_SIZE] {
        &self.bytes
    }

    /// Returns the SEC1 parity prefix byte.
    pub fn prefix(&self) -> u8 {
        self.bytes[0]
    }

    /// Returns the 32-byte x-coordinate (parity prefix stripped).
    pub fn x_bytes(&self) -> [u8; SCALAR_SIZE] {
        let mut x = [0u8; SCALAR_SIZE];
        x.copy_from_slice(&self.bytes[1..]);
        x
    }

    /// Splits into the registry encoding: (parity prefix, x-coordinate).
    pub fn to_parts(&self) -> (u8, [u8; SCALAR_SIZE]) {
        (self.prefix(), self.x_bytes())
    }

    /// Returns the hex-encoded point with a `0x` marker.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Parses from a hex string (with or without `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns true if every byte is zero (an absent/unset point).
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for PublicPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicPoint({})", self.to_hex())
    }
}

impl std::fmt::Display for PublicPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for PublicPoint {
    fn default() -> Self {
        Self {
            bytes: [0u8; COMPRESSED_POINT_SIZE],
        }
    }
}

impl Serialize for PublicPoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicPoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A secp256k1 key pair (secret scalar + public point).
///
/// Invariant: `public` is always the generator multiple of `secret`; the two
/// halves are only ever constructed together by the crypto layer and are
/// never set independently.
#[derive(Clone)]
pub struct KeyPair {
    /// Secret scalar (keep private, auto-zeroized)
    pub secret: SecretScalar,
    /// Public point (safe to share)
    pub public: PublicPoint,
}

impl KeyPair {
    /// Creates a key pair from its two halves.
    ///
    /// Callers must uphold the `public = secret · G` invariant; the crypto
    /// layer's constructors do this by deriving the public half.
    pub fn new(secret: SecretScalar, public: PublicPoint) -> Self {
        Self { secret, public }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH KEY SET
// ═══════════════════════════════════════════════════════════════════════════════

/// The complete key set owned by one identity (viewing + spending).
///
/// The viewing pair is used only for shared-secret computation and never for
/// spending; the spending pair contributes to the final stealth private key.
/// The viewing secret can be shared with third parties (e.g. auditors) to let
/// them detect incoming payments without spending ability.
#[derive(Clone)]
pub struct StealthKeySet {
    /// Keys for detecting incoming payments
    pub viewing: KeyPair,
    /// Keys for spending from stealth addresses
    pub spending: KeyPair,
}

impl StealthKeySet {
    /// Creates a new key set.
    pub fn new(viewing: KeyPair, spending: KeyPair) -> Self {
        Self { viewing, spending }
    }
}

impl std::fmt::Debug for StealthKeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StealthKeySet")
            .field("viewing", &self.viewing)
            .field("spending", &self.spending)
            .finish()
    }
}
