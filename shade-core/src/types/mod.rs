//! Domain types for Shade.
//!
//! This module provides all the core data structures used throughout the protocol:
//!
//! - [`SecretScalar`] / [`PublicPoint`]: secp256k1 key material
//! - [`KeyPair`] / [`StealthKeySet`]: long-term key structures
//! - [`StealthMetaAddress`]: published key pair for receiving stealth payments
//! - [`Announcement`]: published payment pointer (ephemeral key + stealth address)

mod address;
mod announcement;
mod keys;

pub use address::*;
pub use announcement::*;
pub use keys::*;
