//! # Shade Registry
//!
//! Storage backends for the two boundaries of the Shade protocol: the
//! meta-address registry (who can receive stealth payments) and the
//! append-only announcement log (pointers to payments).
//!
//! This crate provides the in-memory reference backend, suitable for
//! development, testing, and single-process deployments. On-chain backends
//! implement the same `shade-core` traits against the registry and
//! announcer contracts.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shade_registry::{MemoryLog, MemoryRegistry};
//!
//! let registry = MemoryRegistry::new();
//! registry.set_record(owner, wallet.registry_record()).await?;
//!
//! let log = MemoryLog::new();
//! let id = log.publish(payment.announcement).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;

pub use memory::{MemoryLog, MemoryRegistry};

// Re-export the traits from core
pub use shade_core::traits::{AnnouncementLog, MetaAddressRegistry};
