//! Error types for Shade.
//!
//! This module provides a comprehensive error hierarchy using `thiserror`.
//! Crypto-validity failures (malformed points, out-of-range scalars) are
//! always surfaced to the caller and never silently coerced. The single
//! intentional exception is note decryption, which degrades to a sentinel
//! value because a decrypt attempt is routinely made against metadata that
//! was never addressed to the caller.

use thiserror::Error;

/// Result type alias using `ShadeError`.
pub type Result<T> = std::result::Result<T, ShadeError>;

/// Main error type for all Shade operations.
#[derive(Debug, Error)]
pub enum ShadeError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Key derivation was given empty entropy.
    #[error("Invalid entropy: input is empty")]
    InvalidEntropy,

    /// A recipient public key could not be decoded as a curve point.
    #[error("Invalid recipient key ({role}): {reason}")]
    InvalidRecipientKey {
        /// Which of the recipient's keys was malformed ("viewing" or "spending").
        role: &'static str,
        /// Why decoding failed.
        reason: String,
    },

    /// An ephemeral public key could not be decoded as a curve point.
    #[error("Invalid ephemeral key: {0}")]
    InvalidEphemeralKey(String),

    /// A byte string decoded to a point that is not on secp256k1.
    #[error("Point is not on the curve")]
    PointNotOnCurve,

    /// A scalar was zero or not below the curve order.
    #[error("Scalar out of range: must be in [1, n)")]
    ScalarOutOfRange,

    /// Invalid key or point size.
    #[error("Invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected byte length.
        expected: usize,
        /// Actual byte length received.
        actual: usize,
    },

    /// Note metadata could not be decoded.
    ///
    /// This variant exists for completeness of the taxonomy; the note codec
    /// itself never propagates it and instead returns a sentinel, since
    /// undecryptable metadata is a normal negative outcome when scanning.
    #[error("Metadata is not decryptable with this key")]
    UndecryptableMetadata,

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The registry holds no meta-address for the queried account.
    ///
    /// A boundary condition, not a crypto fault: the recipient has simply
    /// not set up stealth keys yet.
    #[error("No stealth keys registered for {0}")]
    RegistryKeysAbsent(String),

    /// Invalid announcement format or content.
    #[error("Invalid announcement: {0}")]
    InvalidAnnouncement(String),

    /// Invalid meta-address format or content.
    #[error("Invalid meta-address: {0}")]
    InvalidMetaAddress(String),

    /// Registry storage failure.
    #[error("Registry error: {0}")]
    RegistryError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Invalid stealth or account address encoding.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ShadeError {
    /// Returns true if this is a cryptographic-validity error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            ShadeError::InvalidEntropy
                | ShadeError::InvalidRecipientKey { .. }
                | ShadeError::InvalidEphemeralKey(_)
                | ShadeError::PointNotOnCurve
                | ShadeError::ScalarOutOfRange
                | ShadeError::InvalidKeySize { .. }
        )
    }

    /// Returns true if this is a boundary condition rather than a fault:
    /// the caller should treat it as "recipient not set up" or "not for me".
    pub fn is_negative_outcome(&self) -> bool {
        matches!(
            self,
            ShadeError::RegistryKeysAbsent(_) | ShadeError::UndecryptableMetadata
        )
    }

    /// Returns true if this is a validation error on untrusted input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ShadeError::ValidationError(_)
                | ShadeError::InvalidAnnouncement(_)
                | ShadeError::InvalidMetaAddress(_)
                | ShadeError::InvalidAddress(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShadeError::InvalidKeySize {
            expected: 33,
            actual: 20,
        };
        assert!(err.to_string().contains("33"));
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_error_classification() {
        assert!(ShadeError::InvalidEntropy.is_crypto_error());
        assert!(ShadeError::PointNotOnCurve.is_crypto_error());
        assert!(!ShadeError::RegistryKeysAbsent("0xabc".into()).is_crypto_error());

        assert!(ShadeError::RegistryKeysAbsent("0xabc".into()).is_negative_outcome());
        assert!(ShadeError::UndecryptableMetadata.is_negative_outcome());
        assert!(!ShadeError::ScalarOutOfRange.is_negative_outcome());

        assert!(ShadeError::InvalidAnnouncement("bad".into()).is_validation_error());
        assert!(!ShadeError::InvalidEntropy.is_validation_error());
    }

    #[test]
    fn test_hex_error_conversion() {
        let hex_result = hex::decode("zz");
        let shade_result: Result<Vec<u8>> = hex_result.map_err(ShadeError::from);
        assert!(matches!(shade_result, Err(ShadeError::HexError(_))));
    }
}
