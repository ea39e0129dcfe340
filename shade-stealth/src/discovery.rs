//! Payment discovery (recipient scan).
//!
//! Scanning is pure and order-insensitive: each announcement is judged on
//! its own, so batches can be processed in any order or in parallel.

use shade_core::error::ShadeError;
use shade_core::types::{Announcement, EthAddress, PublicPoint, SecretScalar};
use shade_crypto::note::NoteDecryption;
use shade_crypto::point::{decode_point, decode_scalar};
use shade_crypto::stealth::{matches_stealth_address, stealth_private_from_shared};
use shade_crypto::{decrypt_note_text, shared_secret};

/// A payment discovered during scanning, with everything needed to spend it.
///
/// Holds the stealth private key; handle with the same care as any other
/// secret (it zeroizes on drop and Debug redacts it).
pub struct ClaimedPayment {
    /// ID of the announcement this payment came from
    pub announcement_id: u64,
    /// The stealth address holding the funds
    pub stealth_address: EthAddress,
    /// The private key controlling the stealth address
    pub stealth_private_key: SecretScalar,
    /// The decrypted note, if one was attached and decodes as text
    pub note: Option<String>,
    /// Declared payment value in wei
    pub value_wei: u128,
    /// Announcement timestamp
    pub timestamp: u64,
}

impl std::fmt::Debug for ClaimedPayment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimedPayment")
            .field("announcement_id", &self.announcement_id)
            .field("stealth_address", &self.stealth_address)
            .field("stealth_private_key", &"[REDACTED]")
            .field("note", &self.note)
            .field("value_wei", &self.value_wei)
            .finish()
    }
}

/// Result of scanning a single announcement.
#[derive(Debug)]
pub enum ScanOutcome {
    /// The stealth address does not match - someone else's payment
    NotForUs,
    /// The payment is ours; keys recovered and note decrypted
    Discovered(Box<ClaimedPayment>),
    /// The announcement is malformed or the scanner's own keys are invalid
    Invalid(ShadeError),
}

impl ScanOutcome {
    /// Returns true if a payment was discovered.
    pub fn is_discovered(&self) -> bool {
        matches!(self, ScanOutcome::Discovered(_))
    }

    /// Returns the discovered payment if present.
    pub fn into_payment(self) -> Option<ClaimedPayment> {
        match self {
            ScanOutcome::Discovered(payment) => Some(*payment),
            _ => None,
        }
    }
}

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Total announcements scanned
    pub total_scanned: u64,
    /// Number of payments discovered
    pub discoveries: u64,
    /// Number of announcements that failed validation
    pub invalid: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan outcome.
    pub fn record(&mut self, outcome: &ScanOutcome) {
        self.total_scanned += 1;
        match outcome {
            ScanOutcome::Discovered(_) => self.discoveries += 1,
            ScanOutcome::Invalid(_) => self.invalid += 1,
            ScanOutcome::NotForUs => {}
        }
    }
}

/// Scans a single announcement against the recipient's keys.
///
/// Recomputes the ECDH shared secret from the announcement's ephemeral key,
/// checks whether the announced address belongs to this recipient, and only
/// then recovers the stealth private key and decrypts any note.
pub fn scan_announcement(
    announcement: &Announcement,
    viewing_sk: &SecretScalar,
    spending_sk: &SecretScalar,
    spending_pk: &PublicPoint,
) -> ScanOutcome {
    if let Err(e) = announcement.validate() {
        return ScanOutcome::Invalid(e);
    }

    let ephemeral_point = match decode_point(&announcement.ephemeral_pubkey) {
        Ok(p) => p,
        Err(e) => return ScanOutcome::Invalid(ShadeError::InvalidEphemeralKey(e.to_string())),
    };

    let viewing_scalar = match decode_scalar(viewing_sk) {
        Ok(s) => s,
        Err(e) => return ScanOutcome::Invalid(e),
    };

    let shared = shared_secret(&viewing_scalar, &ephemeral_point);

    match matches_stealth_address(&shared, spending_pk, &announcement.stealth_address) {
        Ok(true) => {}
        Ok(false) => return ScanOutcome::NotForUs,
        Err(e) => return ScanOutcome::Invalid(e),
    }

    let stealth_private_key = match stealth_private_from_shared(&shared, spending_sk) {
        Ok(sk) => sk,
        Err(e) => return ScanOutcome::Invalid(e),
    };

    // Foreign or garbled metadata degrades to None, never to an error
    let note = match decrypt_note_text(&shared, &announcement.metadata) {
        NoteDecryption::Text(text) => Some(text),
        NoteDecryption::Undecryptable => None,
    };

    ScanOutcome::Discovered(Box::new(ClaimedPayment {
        announcement_id: announcement.id,
        stealth_address: announcement.stealth_address,
        stealth_private_key,
        note,
        value_wei: announcement.value_wei,
        timestamp: announcement.timestamp,
    }))
}

/// Scans a batch of announcements, collecting discoveries and stats.
pub fn scan_announcements(
    announcements: &[Announcement],
    viewing_sk: &SecretScalar,
    spending_sk: &SecretScalar,
    spending_pk: &PublicPoint,
) -> (Vec<ClaimedPayment>, ScanStats) {
    let mut stats = ScanStats::new();
    let mut discoveries = Vec::new();

    for announcement in announcements {
        let outcome = scan_announcement(announcement, viewing_sk, spending_sk, spending_pk);
        stats.record(&outcome);
        if let Some(payment) = outcome.into_payment() {
            discoveries.push(payment);
        }
    }

    (discoveries, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{create_stealth_payment, create_stealth_payment_with_note};
    use shade_core::types::{StealthKeySet, StealthMetaAddress};
    use shade_crypto::derive_key_set;

    fn test_keys(seed: &[u8]) -> (StealthKeySet, StealthMetaAddress) {
        let keys = derive_key_set(seed).unwrap();
        let meta = StealthMetaAddress::new(keys.spending.public, keys.viewing.public);
        (keys, meta)
    }

    #[test]
    fn test_scan_discovers_own_payment() {
        let (keys, meta) = test_keys(b"discovery recipient");
        let payment = create_stealth_payment(&meta).unwrap();

        let outcome = scan_announcement(
            &payment.announcement,
            &keys.viewing.secret,
            &keys.spending.secret,
            &keys.spending.public,
        );

        assert!(outcome.is_discovered());
        let claimed = outcome.into_payment().unwrap();
        assert_eq!(claimed.stealth_address, payment.stealth_address);
        assert!(claimed.note.is_none());
    }

    #[test]
    fn test_scan_decrypts_note() {
        let (keys, meta) = test_keys(b"note recipient");
        let payment = create_stealth_payment_with_note(&meta, "see you friday").unwrap();

        let outcome = scan_announcement(
            &payment.announcement,
            &keys.viewing.secret,
            &keys.spending.secret,
            &keys.spending.public,
        );

        let claimed = outcome.into_payment().unwrap();
        assert_eq!(claimed.note.as_deref(), Some("see you friday"));
    }

    #[test]
    fn test_scan_foreign_payment_not_for_us() {
        let (_, meta) = test_keys(b"intended recipient");
        let (other_keys, _) = test_keys(b"bystander");
        let payment = create_stealth_payment(&meta).unwrap();

        let outcome = scan_announcement(
            &payment.announcement,
            &other_keys.viewing.secret,
            &other_keys.spending.secret,
            &other_keys.spending.public,
        );

        assert!(matches!(outcome, ScanOutcome::NotForUs));
    }

    #[test]
    fn test_scan_invalid_announcement() {
        let (keys, meta) = test_keys(b"invalid-scan recipient");
        let mut payment = create_stealth_payment(&meta).unwrap();
        payment.announcement.stealth_address = EthAddress::zero();

        let outcome = scan_announcement(
            &payment.announcement,
            &keys.viewing.secret,
            &keys.spending.secret,
            &keys.spending.public,
        );

        assert!(matches!(outcome, ScanOutcome::Invalid(_)));
    }

    #[test]
    fn test_scan_batch_mixed() {
        let (keys, meta) = test_keys(b"batch recipient");
        let (_, other_meta) = test_keys(b"other recipient");

        let announcements = vec![
            create_stealth_payment(&meta).unwrap().announcement,
            create_stealth_payment(&other_meta).unwrap().announcement,
            create_stealth_payment_with_note(&meta, "second one").unwrap().announcement,
        ];

        let (discoveries, stats) = scan_announcements(
            &announcements,
            &keys.viewing.secret,
            &keys.spending.secret,
            &keys.spending.public,
        );

        assert_eq!(discoveries.len(), 2);
        assert_eq!(stats.total_scanned, 3);
        assert_eq!(stats.discoveries, 2);
        assert_eq!(stats.invalid, 0);
        assert_eq!(discoveries[1].note.as_deref(), Some("second one"));
    }

    #[test]
    fn test_claimed_payment_debug_redacts_key() {
        let (keys, meta) = test_keys(b"debug recipient");
        let payment = create_stealth_payment(&meta).unwrap();

        let claimed = scan_announcement(
            &payment.announcement,
            &keys.viewing.secret,
            &keys.spending.secret,
            &keys.spending.public,
        )
        .into_payment()
        .unwrap();

        let debug = format!("{:?}", claimed);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(&claimed.stealth_private_key.to_hex()[2..]));
    }
}
