//! Stealth payment creation (sender side).

use serde::{Deserialize, Serialize};

use shade_core::error::{Result, ShadeError};
use shade_core::types::{Announcement, AnnouncementBuilder, EthAddress, StealthMetaAddress};
use shade_crypto::{derive_stealth_address, encrypt_note};

/// Stealth payment: address to send to and announcement to publish.
///
/// The shared secret used for the note is consumed during creation and never
/// stored here; everything in this struct is safe to serialize and publish.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StealthPayment {
    /// The one-time address to send funds to
    pub stealth_address: EthAddress,
    /// The announcement to publish (ephemeral key + encrypted note)
    pub announcement: Announcement,
}

/// Creates a stealth payment for a recipient's meta-address.
///
/// Derives a fresh stealth address (new ephemeral key per call) and builds
/// the matching announcement with no note and zero declared value.
pub fn create_stealth_payment(meta_address: &StealthMetaAddress) -> Result<StealthPayment> {
    StealthPaymentBuilder::new().recipient(*meta_address).build()
}

/// Creates a stealth payment with an encrypted text note.
pub fn create_stealth_payment_with_note(
    meta_address: &StealthMetaAddress,
    note: &str,
) -> Result<StealthPayment> {
    StealthPaymentBuilder::new()
        .recipient(*meta_address)
        .note(note)
        .build()
}

/// Builder for stealth payments with optional value and note.
#[derive(Default)]
pub struct StealthPaymentBuilder {
    meta_address: Option<StealthMetaAddress>,
    value_wei: u128,
    note: Option<String>,
}

impl StealthPaymentBuilder {
    /// Creates a new payment builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient's meta-address (required).
    pub fn recipient(mut self, meta_address: StealthMetaAddress) -> Self {
        self.meta_address = Some(meta_address);
        self
    }

    /// Sets the declared payment value in wei.
    pub fn value_wei(mut self, value: u128) -> Self {
        self.value_wei = value;
        self
    }

    /// Attaches a text note, encrypted under the payment's shared secret.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Derives the stealth address and builds the payment.
    pub fn build(self) -> Result<StealthPayment> {
        let meta_address = self.meta_address.ok_or_else(|| {
            ShadeError::ValidationError("recipient meta-address is required".into())
        })?;

        meta_address.validate()?;

        let derived = derive_stealth_address(&meta_address.viewing, &meta_address.spending)?;

        // The shared secret lives exactly as long as note encryption needs it
        let metadata = match &self.note {
            Some(note) => encrypt_note(&derived.shared_secret, note.as_bytes()),
            None => Vec::new(),
        };

        let announcement = AnnouncementBuilder::new()
            .stealth_address(derived.address)
            .ephemeral_pubkey(derived.ephemeral_public)
            .metadata(metadata)
            .value_wei(self.value_wei)
            .build()?;

        Ok(StealthPayment {
            stealth_address: derived.address,
            announcement,
        })
    }
}
