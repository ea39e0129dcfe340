//! # Shade Stealth Payments
//!
//! High-level sender and recipient flows for the Shade protocol.
//!
//! This crate provides:
//!
//! - **Wallet**: key management, meta-address publishing, log scanning
//! - **Payment Creation**: one-time addresses with optional encrypted notes
//! - **Payment Discovery**: scanning announcements to find incoming payments
//!
//! ## Quick Start
//!
//! ```rust
//! use shade_stealth::{ShadeWallet, create_stealth_payment_with_note};
//!
//! // Recipient: derive keys from wallet-signature entropy, publish meta-address
//! let wallet = ShadeWallet::from_entropy(b"65 bytes of signature entropy...")?;
//! let meta_address = *wallet.meta_address();
//! // ... register wallet.registry_record() on chain
//!
//! // Sender: create a stealth payment with a note
//! let payment = create_stealth_payment_with_note(&meta_address, "thanks!")?;
//! // Send funds to payment.stealth_address, publish payment.announcement
//!
//! // Recipient: check the announcement
//! let outcome = wallet.try_discover(&payment.announcement);
//! assert!(outcome.is_discovered());
//! # Ok::<(), shade_core::ShadeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod discovery;
pub mod payment;
pub mod wallet;

pub use discovery::{scan_announcement, scan_announcements, ClaimedPayment, ScanOutcome, ScanStats};
pub use payment::{
    create_stealth_payment, create_stealth_payment_with_note, StealthPayment,
    StealthPaymentBuilder,
};
pub use wallet::{ShadeWallet, ViewingKeyExport};
