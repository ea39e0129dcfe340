//! Common traits for Shade.
//!
//! These traits define the two storage boundaries of the protocol: the
//! meta-address registry (recipient setup) and the announcement log
//! (payment discovery). Implementations can be in-memory, database-backed,
//! or on-chain.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Announcement, EthAddress, MetaAddressRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// META-ADDRESS REGISTRY TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the meta-address registry.
///
/// The registry maps account addresses to the (spending, viewing) public
/// keys they registered for receiving stealth payments. Implementations
/// might use:
/// - In-memory storage (for testing/development)
/// - SQLite/PostgreSQL (for production)
/// - On-chain storage (registry contract)
#[async_trait]
pub trait MetaAddressRegistry: Send + Sync {
    /// Registers or replaces the meta-address record for an account.
    ///
    /// Re-registration overwrites the previous record; the registry keeps
    /// no history.
    async fn set_record(&self, owner: EthAddress, record: MetaAddressRecord) -> Result<()>;

    /// Fetches the meta-address record for an account.
    ///
    /// Returns `Ok(None)` when the account has never registered. Absence is
    /// a boundary condition, not an error; callers that need a failure can
    /// map `None` to [`crate::ShadeError::RegistryKeysAbsent`].
    async fn get_record(&self, owner: &EthAddress) -> Result<Option<MetaAddressRecord>>;

    /// Returns true if the account has a registered record.
    async fn is_registered(&self, owner: &EthAddress) -> Result<bool> {
        Ok(self.get_record(owner).await?.is_some())
    }

    /// Returns the number of registered accounts.
    async fn registered_count(&self) -> Result<u64>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// ANNOUNCEMENT LOG TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface for the append-only announcement log.
#[async_trait]
pub trait AnnouncementLog: Send + Sync {
    /// Publishes a new announcement to the log.
    ///
    /// Returns the assigned announcement ID. IDs are dense and strictly
    /// increasing in publication order.
    async fn publish(&self, announcement: Announcement) -> Result<u64>;

    /// Retrieves a specific announcement by ID.
    async fn get_by_id(&self, id: u64) -> Result<Option<Announcement>>;

    /// Retrieves announcements with IDs in `[start_id, start_id + limit)`.
    ///
    /// This is the primary scan query: recipients walk the log in batches
    /// from their last seen ID.
    async fn get_range(&self, start_id: u64, limit: u64) -> Result<Vec<Announcement>>;

    /// Retrieves announcements within a time range (inclusive).
    async fn get_by_time_range(&self, start: u64, end: u64) -> Result<Vec<Announcement>>;

    /// Returns total announcement count.
    async fn count(&self) -> Result<u64>;

    /// Returns the next announcement ID that will be assigned.
    async fn next_id(&self) -> Result<u64>;
}
