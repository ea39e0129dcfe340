//! In-memory registry and announcement log.
//!
//! Fast, thread-safe storage suitable for development, testing, and
//! single-process deployments. On-chain backends implement the same traits
//! against the registry and announcer contracts.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use shade_core::error::{Result, ShadeError};
use shade_core::traits::{AnnouncementLog, MetaAddressRegistry};
use shade_core::types::{Announcement, AnnouncementStats, EthAddress, MetaAddressRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory meta-address registry.
///
/// One record per account; re-registration overwrites. All operations are
/// thread-safe and can be called concurrently.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    records: DashMap<EthAddress, MetaAddressRecord>,
}

impl MemoryRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.records.clear();
    }

    /// Returns the number of registered accounts.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no accounts are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MetaAddressRegistry for MemoryRegistry {
    #[instrument(skip(self, record), fields(owner = %owner))]
    async fn set_record(&self, owner: EthAddress, record: MetaAddressRecord) -> Result<()> {
        // An absent-sentinel record would be indistinguishable from "never
        // registered" on read, so reject it at the write boundary
        if record.is_absent() {
            return Err(ShadeError::RegistryError(
                "cannot register an empty record".into(),
            ));
        }

        record.to_meta()?.validate()?;

        let replaced = self.records.insert(owner, record).is_some();
        debug!(replaced, "meta-address record stored");
        Ok(())
    }

    async fn get_record(&self, owner: &EthAddress) -> Result<Option<MetaAddressRecord>> {
        Ok(self.records.get(owner).map(|entry| *entry.value()))
    }

    async fn registered_count(&self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT LOG
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory append-only announcement log.
///
/// # Indexing
///
/// Announcements are held by ID (dense, starting at 0, publication order).
/// A tx-hash index rejects duplicate submissions of the same transaction.
///
/// # Thread Safety
///
/// All operations are thread-safe; concurrent publishers get distinct IDs.
#[derive(Debug)]
pub struct MemoryLog {
    /// Primary storage: ID -> Announcement
    announcements: DashMap<u64, Announcement>,
    /// Tx hash index: normalized tx_hash -> announcement ID
    tx_hash_index: DashMap<String, u64>,
    /// Next announcement ID
    next_id: AtomicU64,
    /// Log statistics
    stats: RwLock<AnnouncementStats>,
}

impl MemoryLog {
    /// Creates a new empty log.
    pub fn new() -> Self {
        Self {
            announcements: DashMap::new(),
            tx_hash_index: DashMap::new(),
            next_id: AtomicU64::new(0),
            stats: RwLock::new(AnnouncementStats::new()),
        }
    }

    /// Creates a log with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            announcements: DashMap::with_capacity(capacity),
            tx_hash_index: DashMap::new(),
            next_id: AtomicU64::new(0),
            stats: RwLock::new(AnnouncementStats::new()),
        }
    }

    /// Normalizes a tx hash for indexing (lowercase, trimmed).
    fn normalize_tx_hash(hash: &str) -> String {
        hash.trim().to_lowercase()
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> AnnouncementStats {
        self.stats.read().clone()
    }

    /// Returns the number of announcements.
    pub fn len(&self) -> usize {
        self.announcements.len()
    }

    /// Returns true if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.announcements.is_empty()
    }

    /// Returns all announcements in ID order (for export/backup).
    pub fn all_announcements(&self) -> Vec<Announcement> {
        let mut all: Vec<Announcement> = self
            .announcements
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|a| a.id);
        all
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnnouncementLog for MemoryLog {
    /// Publishes a new announcement.
    ///
    /// The announcement is validated, assigned the next ID, indexed, and
    /// stored. The caller's `id` field is ignored.
    #[instrument(skip(self, announcement), fields(stealth_address = %announcement.stealth_address))]
    async fn publish(&self, mut announcement: Announcement) -> Result<u64> {
        announcement.validate()?;

        // Reject duplicate tx_hash if provided
        if let Some(ref hash) = announcement.tx_hash {
            let normalized = Self::normalize_tx_hash(hash);
            if normalized.is_empty() {
                return Err(ShadeError::InvalidAnnouncement(
                    "tx_hash cannot be empty".into(),
                ));
            }
            if self.tx_hash_index.contains_key(&normalized) {
                return Err(ShadeError::InvalidAnnouncement(
                    "announcement with this transaction hash already exists".into(),
                ));
            }
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        announcement.id = id;

        debug!(id, "publishing announcement");

        if let Some(ref hash) = announcement.tx_hash {
            self.tx_hash_index.insert(Self::normalize_tx_hash(hash), id);
        }

        self.stats.write().add(&announcement);
        self.announcements.insert(id, announcement);

        Ok(id)
    }

    async fn get_by_id(&self, id: u64) -> Result<Option<Announcement>> {
        Ok(self.announcements.get(&id).map(|entry| entry.clone()))
    }

    /// Retrieves announcements with IDs in `[start_id, start_id + limit)`.
    ///
    /// IDs are dense, so this is a direct lookup per slot.
    #[instrument(skip(self))]
    async fn get_range(&self, start_id: u64, limit: u64) -> Result<Vec<Announcement>> {
        let end = start_id.saturating_add(limit);
        let mut batch = Vec::new();

        for id in start_id..end {
            match self.announcements.get(&id) {
                Some(entry) => batch.push(entry.clone()),
                None => break,
            }
        }

        debug!(start_id, count = batch.len(), "retrieved announcement range");
        Ok(batch)
    }

    #[instrument(skip(self))]
    async fn get_by_time_range(&self, start: u64, end: u64) -> Result<Vec<Announcement>> {
        let mut matching: Vec<Announcement> = self
            .announcements
            .iter()
            .filter(|entry| {
                let ts = entry.value().timestamp;
                ts >= start && ts <= end
            })
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by_key(|a| a.timestamp);

        debug!(start, end, count = matching.len(), "retrieved by time range");
        Ok(matching)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.announcements.len() as u64)
    }

    async fn next_id(&self) -> Result<u64> {
        Ok(self.next_id.load(Ordering::SeqCst))
    }
}
