//! Shade wallet implementation.
//!
//! The wallet owns a recipient's (viewing, spending) key set and provides
//! the high-level receive-side operations: publishing a meta-address,
//! checking single announcements, and scanning an announcement log.

use serde::{Deserialize, Serialize};

use shade_core::error::{Result, ShadeError};
use shade_core::traits::AnnouncementLog;
use shade_core::types::{MetaAddressRecord, PublicPoint, StealthKeySet, StealthMetaAddress};
use shade_core::DEFAULT_SCAN_BATCH_SIZE;
use shade_crypto::derive_key_set;

use crate::discovery::{scan_announcements, ClaimedPayment, ScanOutcome, ScanStats};

/// A Shade wallet holding the keys for receiving private payments.
///
/// - Spending keys: for recovering stealth private keys and spending funds
/// - Viewing keys: for detecting incoming payments (sharable with auditors)
pub struct ShadeWallet {
    /// The complete key set (viewing + spending)
    keys: StealthKeySet,
    /// Cached meta-address (public halves only)
    meta_address: StealthMetaAddress,
}

impl ShadeWallet {
    /// Derives a wallet deterministically from entropy.
    ///
    /// The intended entropy source is a wallet signature over a fixed
    /// message, so the same signing key always reproduces the same stealth
    /// keys without storing anything.
    ///
    /// # Errors
    /// Returns [`ShadeError::InvalidEntropy`] for empty input.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let keys = derive_key_set(entropy)?;
        Ok(Self::from_keys(keys))
    }

    /// Creates a wallet from an existing key set.
    pub fn from_keys(keys: StealthKeySet) -> Self {
        let meta_address = StealthMetaAddress::new(keys.spending.public, keys.viewing.public);
        Self { keys, meta_address }
    }

    /// Returns the meta-address for publishing.
    ///
    /// This is what the recipient registers so others can pay them.
    pub fn meta_address(&self) -> &StealthMetaAddress {
        &self.meta_address
    }

    /// Returns the registry encoding of the meta-address.
    pub fn registry_record(&self) -> MetaAddressRecord {
        MetaAddressRecord::from_meta(&self.meta_address)
    }

    /// Returns the spending public key.
    pub fn spending_public_key(&self) -> &PublicPoint {
        &self.keys.spending.public
    }

    /// Returns the viewing public key.
    pub fn viewing_public_key(&self) -> &PublicPoint {
        &self.keys.viewing.public
    }

    /// Checks a single announcement against this wallet's keys.
    pub fn try_discover(&self, announcement: &shade_core::types::Announcement) -> ScanOutcome {
        crate::discovery::scan_announcement(
            announcement,
            &self.keys.viewing.secret,
            &self.keys.spending.secret,
            &self.keys.spending.public,
        )
    }

    /// Scans an announcement log for payments addressed to this wallet.
    ///
    /// Walks the log in batches starting at `start_id` and returns all
    /// discovered payments together with scan statistics. `start_id` lets
    /// callers resume from where a previous scan stopped.
    pub async fn scan_log(
        &self,
        log: &dyn AnnouncementLog,
        start_id: u64,
    ) -> Result<(Vec<ClaimedPayment>, ScanStats)> {
        let mut discoveries = Vec::new();
        let mut stats = ScanStats::new();
        let mut cursor = start_id;

        loop {
            let batch = log.get_range(cursor, DEFAULT_SCAN_BATCH_SIZE as u64).await?;
            if batch.is_empty() {
                break;
            }

            tracing::debug!(
                start = cursor,
                count = batch.len(),
                "scanning announcement batch"
            );

            cursor = batch.iter().map(|a| a.id).max().unwrap_or(cursor) + 1;

            let (mut found, batch_stats) = scan_announcements(
                &batch,
                &self.keys.viewing.secret,
                &self.keys.spending.secret,
                &self.keys.spending.public,
            );

            stats.total_scanned += batch_stats.total_scanned;
            stats.discoveries += batch_stats.discoveries;
            stats.invalid += batch_stats.invalid;
            discoveries.append(&mut found);
        }

        tracing::debug!(
            scanned = stats.total_scanned,
            discovered = stats.discoveries,
            "scan complete"
        );

        Ok((discoveries, stats))
    }

    /// Exports the viewing key material for third-party auditing.
    ///
    /// The export lets an auditor detect incoming payments (and read notes)
    /// but not spend them; the spending secret stays in the wallet.
    pub fn export_viewing_key(&self) -> ViewingKeyExport {
        ViewingKeyExport {
            viewing_secret_key: self.keys.viewing.secret.to_hex(),
            viewing_public_key: self.keys.viewing.public.to_hex(),
            spending_public_key: self.keys.spending.public.to_hex(),
        }
    }
}

impl std::fmt::Debug for ShadeWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadeWallet")
            .field("meta_address", &self.meta_address)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Exported viewing key material for auditors.
///
/// Contains the viewing SECRET key; treat the export itself as sensitive.
#[derive(Clone, Serialize, Deserialize)]
pub struct ViewingKeyExport {
    /// Viewing secret key (hex) - grants detection, not spending
    pub viewing_secret_key: String,
    /// Viewing public key (hex)
    pub viewing_public_key: String,
    /// Spending public key (hex) - needed to recompute stealth addresses
    pub spending_public_key: String,
}

impl std::fmt::Debug for ViewingKeyExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewingKeyExport")
            .field("viewing_secret_key", &"[REDACTED]")
            .field("viewing_public_key", &self.viewing_public_key)
            .field("spending_public_key", &self.spending_public_key)
            .finish()
    }
}
