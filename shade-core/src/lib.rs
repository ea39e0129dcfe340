//! # Shade Core
//!
//! Core types, errors, and traits for the Shade dual-key stealth address protocol.
//!
//! This crate provides the foundational building blocks used by all other Shade crates:
//!
//! - **Types**: Domain models for scalars, curve points, addresses, and announcements
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Protocol constants and sizes
//! - **Traits**: Interfaces for the registry and announcement-log boundaries
//!
//! ## Example
//!
//! ```rust
//! use shade_core::StealthMetaAddress;
//!
//! let meta = StealthMetaAddress::default();
//! let json = serde_json::to_string(&meta).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, ShadeError};
pub use traits::*;
pub use types::*;
