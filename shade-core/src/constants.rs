//! Protocol constants for Shade.
//!
//! All sizes follow the SEC1 encoding conventions for secp256k1 and the
//! standard Ethereum account-address derivation rule.

// ═══════════════════════════════════════════════════════════════════════════════
// SECP256K1 SIZES (SEC1)
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a private scalar in bytes (256 bits, taken modulo the curve order).
pub const SCALAR_SIZE: usize = 32;

/// Size of a compressed curve point: 1-byte parity prefix + 32-byte x-coordinate.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Size of an uncompressed point body (x || y, without the 0x04 marker byte).
/// This is what gets hashed for Ethereum address derivation.
pub const UNCOMPRESSED_POINT_BODY_SIZE: usize = 64;

/// SEC1 prefix byte for a compressed point with even y.
pub const POINT_PREFIX_EVEN: u8 = 0x02;

/// SEC1 prefix byte for a compressed point with odd y.
pub const POINT_PREFIX_ODD: u8 = 0x03;

// ═══════════════════════════════════════════════════════════════════════════════
// HASH / ADDRESS SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a keccak256 hash output.
pub const KECCAK256_SIZE: usize = 32;

/// Size of an Ethereum address in bytes (last 20 bytes of the pubkey hash).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of the ECDH shared secret: the x-coordinate of the shared point,
/// parity prefix stripped.
pub const SHARED_SECRET_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// PROTOCOL VERSIONING
// ═══════════════════════════════════════════════════════════════════════════════

/// Stealth scheme identifier carried in announcements.
/// Scheme 1 is the secp256k1 dual-key scheme implemented by this workspace.
pub const SCHEME_ID: u8 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// SERIALIZATION CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of a compact-encoded meta-address: spending point || viewing point.
pub const META_ADDRESS_SERIALIZED_SIZE: usize = 2 * COMPRESSED_POINT_SIZE;

/// Minimum size of a compact-encoded announcement:
/// scheme (1) || stealth address (20) || ephemeral point (33) || value (16)
/// || timestamp (8) || metadata length (4).
pub const ANNOUNCEMENT_MIN_SIZE: usize = 1 + ETH_ADDRESS_SIZE + COMPRESSED_POINT_SIZE + 16 + 8 + 4;

/// Maximum accepted length for announcement metadata (encrypted note) in bytes.
/// Anything larger is rejected at validation time.
pub const MAX_METADATA_SIZE: usize = 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// PERFORMANCE TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Default batch size when scanning an announcement log.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sec1_sizes() {
        assert_eq!(COMPRESSED_POINT_SIZE, 1 + SCALAR_SIZE);
        assert_eq!(UNCOMPRESSED_POINT_BODY_SIZE, 2 * SCALAR_SIZE);
    }

    #[test]
    fn test_announcement_min_size() {
        // scheme (1) + address (20) + point (33) + value (16) + ts (8) + len (4)
        assert_eq!(ANNOUNCEMENT_MIN_SIZE, 82);
    }

    #[test]
    fn test_point_prefixes_are_sec1() {
        assert_eq!(POINT_PREFIX_EVEN, 0x02);
        assert_eq!(POINT_PREFIX_ODD, 0x03);
    }
}
