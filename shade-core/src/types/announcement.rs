//! Announcement types for the Shade payment log.
//!
//! An announcement is the public side of a stealth payment: the one-time
//! stealth address that received funds, the sender's ephemeral public key,
//! and an opaque encrypted note. Recipients scan these to find payments
//! addressed to them; the log itself is append-only and immutable.

use serde::{Deserialize, Serialize};

use super::{EthAddress, PublicPoint};
use crate::constants::{
    ANNOUNCEMENT_MIN_SIZE, COMPRESSED_POINT_SIZE, ETH_ADDRESS_SIZE, MAX_METADATA_SIZE, SCHEME_ID,
};
use crate::error::{Result, ShadeError};

/// An announcement published to the payment log.
///
/// # Wire format (binary)
/// ```text
/// scheme_id (1) || stealth_address (20) || ephemeral_pubkey (33)
/// || value_wei (16, LE) || timestamp (8, LE) || metadata_len (4, LE) || metadata
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique identifier (assigned by the log)
    pub id: u64,
    /// Stealth scheme identifier (1 = secp256k1 dual-key)
    pub scheme_id: u8,
    /// The one-time address that received the payment
    pub stealth_address: EthAddress,
    /// The sender's ephemeral public key
    pub ephemeral_pubkey: PublicPoint,
    /// Opaque encrypted note (may be empty)
    #[serde(with = "hex")]
    pub metadata: Vec<u8>,
    /// Payment value in wei
    pub value_wei: u128,
    /// Unix timestamp when the announcement was created
    pub timestamp: u64,
    /// Optional: block number if sourced from chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Optional: transaction hash if sourced from chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
}

impl Announcement {
    /// Creates a new announcement for the current scheme.
    pub fn new(stealth_address: EthAddress, ephemeral_pubkey: PublicPoint, metadata: Vec<u8>) -> Self {
        Self {
            id: 0, // Assigned by the log
            scheme_id: SCHEME_ID,
            stealth_address,
            ephemeral_pubkey,
            metadata,
            value_wei: 0,
            timestamp: Self::current_timestamp(),
            block_number: None,
            tx_hash: None,
        }
    }

    /// Validates the announcement structure.
    pub fn validate(&self) -> Result<()> {
        if self.scheme_id != SCHEME_ID {
            return Err(ShadeError::InvalidAnnouncement(format!(
                "unsupported scheme id {}",
                self.scheme_id
            )));
        }

        if self.stealth_address.is_zero() {
            return Err(ShadeError::InvalidAnnouncement(
                "stealth address is zero".into(),
            ));
        }

        if self.ephemeral_pubkey.is_zero() {
            return Err(ShadeError::InvalidAnnouncement(
                "ephemeral key is unset".into(),
            ));
        }

        if self.metadata.len() > MAX_METADATA_SIZE {
            return Err(ShadeError::InvalidAnnouncement(format!(
                "metadata too large: {} bytes (max {})",
                self.metadata.len(),
                MAX_METADATA_SIZE
            )));
        }

        // Timestamp sanity (not in the future by more than 1 hour)
        let now = Self::current_timestamp();
        if self.timestamp > now + 3600 {
            return Err(ShadeError::InvalidAnnouncement(
                "timestamp is too far in the future".into(),
            ));
        }

        Ok(())
    }

    /// Serializes to compact binary format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(ANNOUNCEMENT_MIN_SIZE + self.metadata.len());
        bytes.push(self.scheme_id);
        bytes.extend_from_slice(self.stealth_address.as_bytes());
        bytes.extend_from_slice(self.ephemeral_pubkey.as_bytes());
        bytes.extend_from_slice(&self.value_wei.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&(self.metadata.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&self.metadata);
        bytes
    }

    /// Deserializes from compact binary format.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ANNOUNCEMENT_MIN_SIZE {
            return Err(ShadeError::InvalidAnnouncement(format!(
                "too short: {} bytes, minimum {}",
                bytes.len(),
                ANNOUNCEMENT_MIN_SIZE
            )));
        }

        let scheme_id = bytes[0];
        let mut offset = 1;

        let stealth_address = EthAddress::from_bytes(&bytes[offset..offset + ETH_ADDRESS_SIZE])?;
        offset += ETH_ADDRESS_SIZE;

        let ephemeral_pubkey =
            PublicPoint::from_bytes(&bytes[offset..offset + COMPRESSED_POINT_SIZE])?;
        offset += COMPRESSED_POINT_SIZE;

        let value_wei = u128::from_le_bytes(
            bytes[offset..offset + 16]
                .try_into()
                .map_err(|_| ShadeError::InvalidAnnouncement("invalid value field".into()))?,
        );
        offset += 16;

        let timestamp = u64::from_le_bytes(
            bytes[offset..offset + 8]
                .try_into()
                .map_err(|_| ShadeError::InvalidAnnouncement("invalid timestamp".into()))?,
        );
        offset += 8;

        let metadata_len = u32::from_le_bytes(
            bytes[offset..offset + 4]
                .try_into()
                .map_err(|_| ShadeError::InvalidAnnouncement("invalid metadata length".into()))?,
        ) as usize;
        offset += 4;

        if bytes.len() != offset + metadata_len {
            return Err(ShadeError::InvalidAnnouncement(format!(
                "metadata length mismatch: declared {}, available {}",
                metadata_len,
                bytes.len() - offset
            )));
        }

        let announcement = Self {
            id: 0, // ID is assigned by the log, not serialized
            scheme_id,
            stealth_address,
            ephemeral_pubkey,
            metadata: bytes[offset..].to_vec(),
            value_wei,
            timestamp,
            block_number: None,
            tx_hash: None,
        };

        announcement.validate()?;
        Ok(announcement)
    }

    /// Returns current Unix timestamp in seconds.
    fn current_timestamp() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Builder for creating announcements with optional fields.
#[derive(Default)]
pub struct AnnouncementBuilder {
    stealth_address: Option<EthAddress>,
    ephemeral_pubkey: Option<PublicPoint>,
    metadata: Vec<u8>,
    value_wei: u128,
    timestamp: Option<u64>,
    block_number: Option<u64>,
    tx_hash: Option<String>,
}

impl AnnouncementBuilder {
    /// Creates a new announcement builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stealth address (required).
    pub fn stealth_address(mut self, address: EthAddress) -> Self {
        self.stealth_address = Some(address);
        self
    }

    /// Sets the ephemeral public key (required).
    pub fn ephemeral_pubkey(mut self, point: PublicPoint) -> Self {
        self.ephemeral_pubkey = Some(point);
        self
    }

    /// Sets the encrypted note bytes (optional).
    pub fn metadata(mut self, metadata: Vec<u8>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the payment value in wei (optional, defaults to 0).
    pub fn value_wei(mut self, value: u128) -> Self {
        self.value_wei = value;
        self
    }

    /// Sets a custom timestamp (optional, defaults to now).
    pub fn timestamp(mut self, ts: u64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    /// Sets the block number (optional).
    pub fn block_number(mut self, num: u64) -> Self {
        self.block_number = Some(num);
        self
    }

    /// Sets the transaction hash (optional).
    pub fn tx_hash(mut self, hash: String) -> Self {
        self.tx_hash = Some(hash);
        self
    }

    /// Builds the announcement.
    pub fn build(self) -> Result<Announcement> {
        let stealth_address = self
            .stealth_address
            .ok_or_else(|| ShadeError::ValidationError("stealth_address is required".into()))?;

        let ephemeral_pubkey = self
            .ephemeral_pubkey
            .ok_or_else(|| ShadeError::ValidationError("ephemeral_pubkey is required".into()))?;

        let mut announcement = Announcement::new(stealth_address, ephemeral_pubkey, self.metadata);
        announcement.value_wei = self.value_wei;
        if let Some(ts) = self.timestamp {
            announcement.timestamp = ts;
        }
        announcement.block_number = self.block_number;
        announcement.tx_hash = self.tx_hash;

        announcement.validate()?;
        Ok(announcement)
    }
}

/// Statistics about announcements in a log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnnouncementStats {
    /// Total number of announcements
    pub total_count: u64,
    /// Sum of announced values in wei
    pub total_value_wei: u128,
    /// Number of announcements carrying a non-empty note
    pub with_metadata: u64,
    /// Earliest announcement timestamp
    pub earliest_timestamp: Option<u64>,
    /// Latest announcement timestamp
    pub latest_timestamp: Option<u64>,
}

impl AnnouncementStats {
    /// Creates empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates stats with a new announcement.
    pub fn add(&mut self, announcement: &Announcement) {
        self.total_count += 1;
        self.total_value_wei = self.total_value_wei.saturating_add(announcement.value_wei);
        if !announcement.metadata.is_empty() {
            self.with_metadata += 1;
        }

        match self.earliest_timestamp {
            Some(t) if announcement.timestamp >= t => {}
            _ => self.earliest_timestamp = Some(announcement.timestamp),
        }

        match self.latest_timestamp {
            Some(t) if announcement.timestamp <= t => {}
            _ => self.latest_timestamp = Some(announcement.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COMPRESSED_POINT_SIZE;

    fn test_address() -> EthAddress {
        EthAddress::from_array([0x42; 20])
    }

    fn test_point() -> PublicPoint {
        let mut bytes = [0x55u8; COMPRESSED_POINT_SIZE];
        bytes[0] = 0x02;
        PublicPoint::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn test_announcement_creation() {
        let ann = Announcement::new(test_address(), test_point(), vec![1, 2, 3]);
        assert_eq!(ann.scheme_id, SCHEME_ID);
        assert!(ann.timestamp > 0);
        assert_eq!(ann.value_wei, 0);
    }

    #[test]
    fn test_announcement_validation() {
        let valid = Announcement::new(test_address(), test_point(), vec![]);
        assert!(valid.validate().is_ok());

        let mut wrong_scheme = valid.clone();
        wrong_scheme.scheme_id = 99;
        assert!(wrong_scheme.validate().is_err());

        let mut zero_addr = valid.clone();
        zero_addr.stealth_address = EthAddress::zero();
        assert!(zero_addr.validate().is_err());

        let mut oversized = valid.clone();
        oversized.metadata = vec![0xAB; MAX_METADATA_SIZE + 1];
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_announcement_bytes_roundtrip() {
        let mut ann = Announcement::new(test_address(), test_point(), vec![0xDE, 0xAD]);
        ann.value_wei = 1_500_000_000_000_000_000; // 1.5 ETH

        let ann2 = Announcement::from_bytes(&ann.to_bytes()).unwrap();

        assert_eq!(ann.stealth_address, ann2.stealth_address);
        assert_eq!(ann.ephemeral_pubkey, ann2.ephemeral_pubkey);
        assert_eq!(ann.metadata, ann2.metadata);
        assert_eq!(ann.value_wei, ann2.value_wei);
        assert_eq!(ann.timestamp, ann2.timestamp);
    }

    #[test]
    fn test_announcement_bytes_empty_metadata() {
        let ann = Announcement::new(test_address(), test_point(), vec![]);
        let ann2 = Announcement::from_bytes(&ann.to_bytes()).unwrap();
        assert!(ann2.metadata.is_empty());
    }

    #[test]
    fn test_announcement_from_bytes_truncated() {
        let ann = Announcement::new(test_address(), test_point(), vec![1, 2, 3, 4]);
        let mut bytes = ann.to_bytes();
        bytes.truncate(bytes.len() - 2); // drop metadata tail
        assert!(Announcement::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_announcement_json_roundtrip() {
        let ann = Announcement::new(test_address(), test_point(), vec![9, 8, 7]);
        let json = serde_json::to_string(&ann).unwrap();
        let ann2: Announcement = serde_json::from_str(&json).unwrap();
        assert_eq!(ann.stealth_address, ann2.stealth_address);
        assert_eq!(ann.metadata, ann2.metadata);
    }

    #[test]
    fn test_announcement_builder() {
        let ann = AnnouncementBuilder::new()
            .stealth_address(test_address())
            .ephemeral_pubkey(test_point())
            .value_wei(42)
            .tx_hash("0xabc".into())
            .build()
            .unwrap();

        assert_eq!(ann.value_wei, 42);
        assert_eq!(ann.tx_hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn test_announcement_builder_missing_required() {
        assert!(AnnouncementBuilder::new()
            .stealth_address(test_address())
            .build()
            .is_err());

        assert!(AnnouncementBuilder::new()
            .ephemeral_pubkey(test_point())
            .build()
            .is_err());
    }

    #[test]
    fn test_announcement_stats() {
        let mut stats = AnnouncementStats::new();

        let mut a = Announcement::new(test_address(), test_point(), vec![1]);
        a.value_wei = 10;
        a.timestamp = 100;
        stats.add(&a);

        let mut b = Announcement::new(test_address(), test_point(), vec![]);
        b.value_wei = 5;
        b.timestamp = 50;
        stats.add(&b);

        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.total_value_wei, 15);
        assert_eq!(stats.with_metadata, 1);
        assert_eq!(stats.earliest_timestamp, Some(50));
        assert_eq!(stats.latest_timestamp, Some(100));
    }
}
