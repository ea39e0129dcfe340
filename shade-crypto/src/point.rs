//! Conversions between wire encodings and secp256k1 arithmetic types.
//!
//! The rest of the workspace handles keys as byte-level [`PublicPoint`] and
//! [`SecretScalar`] values; this module is the only place those encodings
//! meet `k256` field elements. Decoding is strict in both directions:
//! off-curve points and out-of-range scalars are rejected, never coerced.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar};

use shade_core::constants::ETH_ADDRESS_SIZE;
use shade_core::error::{Result, ShadeError};
use shade_core::types::{EthAddress, PublicPoint, SecretScalar};

// ═══════════════════════════════════════════════════════════════════════════════
// POINT ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes a compressed point into curve arithmetic form.
///
/// # Errors
/// Returns [`ShadeError::PointNotOnCurve`] when the x-coordinate does not
/// lie on secp256k1 for the claimed parity.
pub fn decode_point(point: &PublicPoint) -> Result<ProjectivePoint> {
    let encoded =
        EncodedPoint::from_bytes(point.as_bytes()).map_err(|_| ShadeError::PointNotOnCurve)?;

    let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
        .ok_or(ShadeError::PointNotOnCurve)?;

    Ok(ProjectivePoint::from(affine))
}

/// Encodes a curve point in compressed SEC1 form.
pub fn encode_point(point: &ProjectivePoint) -> PublicPoint {
    let encoded = point.to_affine().to_encoded_point(true);
    let mut bytes = [0u8; 33];
    bytes.copy_from_slice(encoded.as_bytes());
    PublicPoint::from_array(bytes)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCALAR ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes a secret scalar into curve arithmetic form.
///
/// # Errors
/// Returns [`ShadeError::ScalarOutOfRange`] for zero or any value at or
/// above the curve order.
pub fn decode_scalar(scalar: &SecretScalar) -> Result<Scalar> {
    let decoded = Option::<Scalar>::from(Scalar::from_repr((*scalar.as_array()).into()))
        .ok_or(ShadeError::ScalarOutOfRange)?;

    if bool::from(k256::elliptic_curve::Field::is_zero(&decoded)) {
        return Err(ShadeError::ScalarOutOfRange);
    }

    Ok(decoded)
}

/// Encodes a curve scalar as big-endian bytes.
pub fn encode_scalar(scalar: &Scalar) -> SecretScalar {
    let repr = scalar.to_bytes();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&repr);
    SecretScalar::from_array(bytes)
}

/// Computes the public point for a secret scalar.
pub fn public_for_scalar(scalar: &Scalar) -> PublicPoint {
    encode_point(&(ProjectivePoint::GENERATOR * scalar))
}

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the account address of a curve point.
///
/// Standard Ethereum construction: keccak256 over the 64-byte uncompressed
/// encoding (0x04 marker stripped), keep the last 20 bytes.
pub fn eth_address(point: &ProjectivePoint) -> EthAddress {
    let encoded = point.to_affine().to_encoded_point(false);
    let hash = crate::hash::keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; ETH_ADDRESS_SIZE];
    address.copy_from_slice(&hash[32 - ETH_ADDRESS_SIZE..]);
    EthAddress::from_array(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_to_scalar;

    #[test]
    fn test_point_roundtrip() {
        let scalar = hash_to_scalar(b"roundtrip point");
        let point = ProjectivePoint::GENERATOR * scalar;

        let encoded = encode_point(&point);
        let decoded = decode_point(&encoded).unwrap();
        assert_eq!(point.to_affine(), decoded.to_affine());
    }

    #[test]
    fn test_decode_point_off_curve() {
        // Valid prefix, but an x-coordinate with no square root for y^2
        let mut bytes = [0xFFu8; 33];
        bytes[0] = 0x02;
        let point = PublicPoint::from_bytes(&bytes).unwrap();
        assert!(matches!(
            decode_point(&point),
            Err(ShadeError::PointNotOnCurve)
        ));
    }

    #[test]
    fn test_scalar_roundtrip() {
        let scalar = hash_to_scalar(b"roundtrip scalar");
        let encoded = encode_scalar(&scalar);
        let decoded = decode_scalar(&encoded).unwrap();
        assert_eq!(scalar, decoded);
    }

    #[test]
    fn test_decode_scalar_zero_rejected() {
        let zero = SecretScalar::from_array([0u8; 32]);
        assert!(matches!(
            decode_scalar(&zero),
            Err(ShadeError::ScalarOutOfRange)
        ));
    }

    #[test]
    fn test_decode_scalar_above_order_rejected() {
        // All-ones is well above the secp256k1 group order
        let too_big = SecretScalar::from_array([0xFF; 32]);
        assert!(matches!(
            decode_scalar(&too_big),
            Err(ShadeError::ScalarOutOfRange)
        ));
    }

    #[test]
    fn test_eth_address_of_generator() {
        // Address of the generator point's "public key", a fixed value any
        // Ethereum library agrees on
        let address = eth_address(&ProjectivePoint::GENERATOR);
        assert_eq!(
            address.to_hex_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }
}
