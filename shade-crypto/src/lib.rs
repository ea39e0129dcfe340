//! # Shade Cryptography
//!
//! secp256k1 dual-key stealth address cryptography for the Shade protocol.
//!
//! This crate provides:
//!
//! - **Keygen**: deterministic (viewing, spending) key derivation from entropy
//! - **ECDH**: shared-secret computation between ephemeral and viewing keys
//! - **Stealth**: sender-side address derivation, recipient-side key recovery
//! - **Notes**: XOR-stream encryption of payment notes under the shared secret
//! - **Hash**: Keccak-256, hash-to-scalar, and the note keystream
//!
//! ## Security Properties
//!
//! - Scalars outside `[1, n)` are rejected, never wrapped
//! - Secret material (scalars, shared secrets) is zeroized on drop
//! - Address ownership checks compare in constant time
//! - Ephemeral secrets never leave the derivation call
//!
//! ## Example
//!
//! ```rust
//! use shade_crypto::{derive_key_set, derive_stealth_address, recover_stealth_private_key};
//!
//! // Recipient derives keys from wallet-signature entropy
//! let keys = derive_key_set(b"65 bytes of signature entropy...")?;
//!
//! // Sender derives a one-time address from the recipient's public keys
//! let payment = derive_stealth_address(&keys.viewing.public, &keys.spending.public)?;
//!
//! // Recipient recovers the matching private key from the announcement
//! let stealth_sk = recover_stealth_private_key(
//!     payment.ephemeral_public.as_bytes(),
//!     &keys.viewing.secret,
//!     &keys.spending.secret,
//! )?;
//! # Ok::<(), shade_core::ShadeError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod ecdh;
pub mod hash;
pub mod keygen;
pub mod note;
pub mod point;
pub mod stealth;

// Re-export main functions at crate root
pub use ecdh::{shared_secret, SharedSecret};
pub use hash::{hash_to_scalar, keccak256, note_keystream};
pub use keygen::{derive_key_set, random_keypair};
pub use note::{decrypt_note, decrypt_note_text, encrypt_note, NoteDecryption};
pub use stealth::{
    derive_stealth_address, matches_stealth_address, recover_stealth_private_key,
    stealth_address_from_shared, stealth_private_from_shared, DerivedStealthAddress,
};
