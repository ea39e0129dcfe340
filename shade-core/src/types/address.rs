//! Address types for Shade.
//!
//! - [`EthAddress`]: a standard 20-byte account address
//! - [`StealthMetaAddress`]: the (spending, viewing) public points a
//!   recipient publishes for receiving stealth payments
//! - [`MetaAddressRecord`]: the registry-boundary encoding of a meta-address
//!   (parity prefix + x-coordinate per key, for storage compactness)

use serde::{Deserialize, Serialize};

use super::PublicPoint;
use crate::constants::{ETH_ADDRESS_SIZE, META_ADDRESS_SERIALIZED_SIZE, SCALAR_SIZE};
use crate::error::{Result, ShadeError};

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// A 20-byte account address: the last 20 bytes of the keccak256 hash of the
/// uncompressed public point (0x04 marker stripped).
///
/// Stealth addresses are ordinary addresses of this form; nothing on-chain
/// distinguishes them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress {
    bytes: [u8; ETH_ADDRESS_SIZE],
}

impl EthAddress {
    /// Creates an address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ETH_ADDRESS_SIZE {
            return Err(ShadeError::InvalidAddress(format!(
                "expected {} bytes, got {}",
                ETH_ADDRESS_SIZE,
                bytes.len()
            )));
        }

        let mut arr = [0u8; ETH_ADDRESS_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Creates from a fixed-size array.
    pub fn from_array(bytes: [u8; ETH_ADDRESS_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the `0x`-prefixed hex string.
    pub fn to_hex_string(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// Parses from hex string (with or without 0x prefix).
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Returns the zero address.
    pub fn zero() -> Self {
        Self {
            bytes: [0u8; ETH_ADDRESS_SIZE],
        }
    }

    /// Returns true if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl std::fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EthAddress({})", self.to_hex_string())
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_string())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH META-ADDRESS
// ═══════════════════════════════════════════════════════════════════════════════

/// The pair of public points a recipient publishes for receiving stealth
/// payments.
///
/// Senders use the viewing point for the ECDH shared secret and the spending
/// point for the final stealth public key. Only public halves ever appear
/// here; the corresponding secrets stay in a [`super::StealthKeySet`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StealthMetaAddress {
    /// Spending public point - contributes to the stealth public key
    pub spending: PublicPoint,
    /// Viewing public point - used for the ECDH shared secret
    pub viewing: PublicPoint,
}

impl StealthMetaAddress {
    /// Creates a new meta-address from the two public points.
    pub fn new(spending: PublicPoint, viewing: PublicPoint) -> Self {
        Self { spending, viewing }
    }

    /// Validates the meta-address structure.
    pub fn validate(&self) -> Result<()> {
        if self.spending.is_zero() {
            return Err(ShadeError::InvalidMetaAddress(
                "spending key is unset".into(),
            ));
        }

        if self.viewing.is_zero() {
            return Err(ShadeError::InvalidMetaAddress("viewing key is unset".into()));
        }

        Ok(())
    }

    /// Serializes to compact binary format.
    ///
    /// Format: spending point (33) || viewing point (33)
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(META_ADDRESS_SERIALIZED_SIZE);
        bytes.extend_from_slice(self.spending.as_bytes());
        bytes.extend_from_slice(self.viewing.as_bytes());
        bytes
    }

    /// Deserializes from compact binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_ADDRESS_SERIALIZED_SIZE {
            return Err(ShadeError::InvalidMetaAddress(format!(
                "expected {} bytes, got {}",
                META_ADDRESS_SERIALIZED_SIZE,
                bytes.len()
            )));
        }

        let spending = PublicPoint::from_bytes(&bytes[..33])?;
        let viewing = PublicPoint::from_bytes(&bytes[33..])?;

        let meta = Self { spending, viewing };
        meta.validate()?;
        Ok(meta)
    }

    /// Encodes to a `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }

    /// Decodes from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY RECORD
// ═══════════════════════════════════════════════════════════════════════════════

/// The registry-boundary encoding of a meta-address.
///
/// The on-chain registry stores each compressed point split into its 1-byte
/// parity prefix and 32-byte x-coordinate for storage compactness. This type
/// reproduces that encoding exactly in both directions.
///
/// An all-zero record means "recipient not set up" and surfaces to callers
/// as [`ShadeError::RegistryKeysAbsent`], never as a crypto error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddressRecord {
    /// Parity prefix of the spending point
    pub spending_prefix: u8,
    /// x-coordinate of the spending point
    #[serde(with = "hex")]
    pub spending_x: [u8; SCALAR_SIZE],
    /// Parity prefix of the viewing point
    pub viewing_prefix: u8,
    /// x-coordinate of the viewing point
    #[serde(with = "hex")]
    pub viewing_x: [u8; SCALAR_SIZE],
}

impl MetaAddressRecord {
    /// Splits a meta-address into its registry encoding.
    pub fn from_meta(meta: &StealthMetaAddress) -> Self {
        let (spending_prefix, spending_x) = meta.spending.to_parts();
        let (viewing_prefix, viewing_x) = meta.viewing.to_parts();
        Self {
            spending_prefix,
            spending_x,
            viewing_prefix,
            viewing_x,
        }
    }

    /// Reassembles the meta-address from the registry encoding.
    ///
    /// # Errors
    /// Returns [`ShadeError::RegistryKeysAbsent`]-compatible `None` handling
    /// at the trait boundary; here an absent record is rejected as invalid
    /// because the caller should have checked [`Self::is_absent`] first.
    pub fn to_meta(&self) -> Result<StealthMetaAddress> {
        if self.is_absent() {
            return Err(ShadeError::InvalidMetaAddress(
                "record is empty (recipient not set up)".into(),
            ));
        }

        let spending = PublicPoint::from_parts(self.spending_prefix, &self.spending_x)?;
        let viewing = PublicPoint::from_parts(self.viewing_prefix, &self.viewing_x)?;
        Ok(StealthMetaAddress::new(spending, viewing))
    }

    /// Returns true if the record is empty (the registry's "not registered"
    /// sentinel: every field zero).
    pub fn is_absent(&self) -> bool {
        self.spending_prefix == 0
            && self.viewing_prefix == 0
            && self.spending_x.iter().all(|&b| b == 0)
            && self.viewing_x.iter().all(|&b| b == 0)
    }
}

impl Default for MetaAddressRecord {
    fn default() -> Self {
        Self {
            spending_prefix: 0,
            spending_x: [0u8; SCALAR_SIZE],
            viewing_prefix: 0,
            viewing_x: [0u8; SCALAR_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMPRESSED_POINT_SIZE;

    fn test_point(fill: u8, prefix: u8) -> PublicPoint {
        let mut bytes = [fill; COMPRESSED_POINT_SIZE];
        bytes[0] = prefix;
        PublicPoint::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_eth_address_formatting() {
        let addr = EthAddress::from_array([0xAB; 20]);
        let s = addr.to_hex_string();
        assert!(s.starts_with("0x"));
        assert_eq!(s.len(), 42); // "0x" + 40 hex chars
    }

    #[test]
    fn test_eth_address_hex_roundtrip() {
        let addr = EthAddress::from_array([0x12; 20]);
        let addr2 = EthAddress::from_hex(&addr.to_hex_string()).unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_eth_address_zero() {
        assert!(EthAddress::zero().is_zero());
        assert!(!EthAddress::from_array([1; 20]).is_zero());
    }

    #[test]
    fn test_eth_address_wrong_size() {
        assert!(EthAddress::from_bytes(&[0u8; 19]).is_err());
        assert!(EthAddress::from_hex("0x1234").is_err());
    }

    #[test]
    fn test_meta_address_bytes_roundtrip() {
        let meta = StealthMetaAddress::new(test_point(0xAA, 0x02), test_point(0xBB, 0x03));
        let meta2 = StealthMetaAddress::from_bytes(&meta.to_bytes()).unwrap();
        assert_eq!(meta, meta2);
    }

    #[test]
    fn test_meta_address_hex_roundtrip() {
        let meta = StealthMetaAddress::new(test_point(0x12, 0x03), test_point(0x34, 0x02));
        let meta2 = StealthMetaAddress::from_hex(&meta.to_hex()).unwrap();
        assert_eq!(meta, meta2);
    }

    #[test]
    fn test_meta_address_validation() {
        let valid = StealthMetaAddress::new(test_point(0x01, 0x02), test_point(0x02, 0x02));
        assert!(valid.validate().is_ok());

        let mut invalid = valid;
        invalid.viewing = PublicPoint::default();
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_registry_record_roundtrip() {
        let meta = StealthMetaAddress::new(test_point(0x45, 0x02), test_point(0x68, 0x03));

        let record = MetaAddressRecord::from_meta(&meta);
        assert_eq!(record.spending_prefix, 0x02);
        assert_eq!(record.viewing_prefix, 0x03);
        assert_eq!(record.spending_x, [0x45u8; SCALAR_SIZE]);

        let rebuilt = record.to_meta().unwrap();
        assert_eq!(meta, rebuilt);
    }

    #[test]
    fn test_registry_record_absent() {
        let record = MetaAddressRecord::default();
        assert!(record.is_absent());
        assert!(record.to_meta().is_err());

        let meta = StealthMetaAddress::new(test_point(0x01, 0x02), test_point(0x02, 0x03));
        let record = MetaAddressRecord::from_meta(&meta);
        assert!(!record.is_absent());
    }
}
