//! Stealth address derivation and recovery.
//!
//! The sender and recipient compute the same one-time key pair from
//! opposite halves of an ECDH exchange:
//!
//! ```text
//! Sender:     shared = eph_sk * ViewingPub
//!             tweak  = hash_to_scalar(shared.x)
//!             StealthPub = tweak * G + SpendingPub
//!
//! Recipient:  shared = viewing_sk * EphPub
//!             tweak  = hash_to_scalar(shared.x)
//!             stealth_sk = (tweak + spending_sk) mod n
//! ```
//!
//! The two stealth keys agree because `tweak * G + spending_sk * G` equals
//! `(tweak + spending_sk) * G`. The ephemeral secret is generated inside
//! [`derive_stealth_address`] and dropped there; only its public half and
//! the shared secret (needed for note encryption) leave the call.

use k256::{ProjectivePoint, Scalar};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use shade_core::error::{Result, ShadeError};
use shade_core::types::{EthAddress, PublicPoint, SecretScalar};

use crate::ecdh::{shared_secret, SharedSecret};
use crate::hash::hash_to_scalar;
use crate::keygen::random_scalar;
use crate::point::{decode_point, decode_scalar, encode_scalar, eth_address, public_for_scalar};

// ═══════════════════════════════════════════════════════════════════════════════
// SENDER SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of sender-side stealth address derivation.
///
/// The shared secret is returned so the caller can encrypt a payment note;
/// it is zeroized when this struct drops.
#[derive(Debug)]
pub struct DerivedStealthAddress {
    /// The one-time address to pay into
    pub address: EthAddress,
    /// The ephemeral public key to publish alongside the payment
    pub ephemeral_public: PublicPoint,
    /// The ECDH shared secret (for note encryption only)
    pub shared_secret: SharedSecret,
}

/// Derives a fresh stealth address for a recipient's meta-address.
///
/// A new ephemeral key pair is drawn from the OS RNG on every call, so two
/// payments to the same recipient produce unrelated addresses.
///
/// # Errors
/// Returns [`ShadeError::InvalidRecipientKey`] when either recipient key
/// fails to decode as a curve point.
pub fn derive_stealth_address(
    viewing_pk: &PublicPoint,
    spending_pk: &PublicPoint,
) -> Result<DerivedStealthAddress> {
    derive_stealth_address_with_rng(viewing_pk, spending_pk, &mut OsRng)
}

fn derive_stealth_address_with_rng<R: RngCore + CryptoRng>(
    viewing_pk: &PublicPoint,
    spending_pk: &PublicPoint,
    rng: &mut R,
) -> Result<DerivedStealthAddress> {
    let viewing_point = decode_recipient_point(viewing_pk, "viewing")?;
    let spending_point = decode_recipient_point(spending_pk, "spending")?;

    let ephemeral_scalar = random_scalar(rng);
    let ephemeral_public = public_for_scalar(&ephemeral_scalar);

    let shared = shared_secret(&ephemeral_scalar, &viewing_point);
    let address = address_for_shared(&shared, &spending_point);

    Ok(DerivedStealthAddress {
        address,
        ephemeral_public,
        shared_secret: shared,
    })
}

/// Recomputes the stealth address for an already-known shared secret.
///
/// Recipients use this during scanning: given their own ECDH result and
/// spending public key, the output either matches the announced address
/// (payment is theirs) or does not (payment is someone else's).
pub fn stealth_address_from_shared(
    shared: &SharedSecret,
    spending_pk: &PublicPoint,
) -> Result<EthAddress> {
    let spending_point = decode_recipient_point(spending_pk, "spending")?;
    Ok(address_for_shared(shared, &spending_point))
}

/// Constant-time comparison of a recomputed stealth address against an
/// announced one.
pub fn matches_stealth_address(
    shared: &SharedSecret,
    spending_pk: &PublicPoint,
    announced: &EthAddress,
) -> Result<bool> {
    let derived = stealth_address_from_shared(shared, spending_pk)?;
    Ok(derived.as_bytes().ct_eq(announced.as_bytes()).into())
}

fn address_for_shared(shared: &SharedSecret, spending_point: &ProjectivePoint) -> EthAddress {
    let tweak = hash_to_scalar(shared.as_bytes());
    let stealth_point = ProjectivePoint::GENERATOR * tweak + spending_point;
    eth_address(&stealth_point)
}

fn decode_recipient_point(point: &PublicPoint, role: &'static str) -> Result<ProjectivePoint> {
    decode_point(point).map_err(|e| ShadeError::InvalidRecipientKey {
        role,
        reason: e.to_string(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECIPIENT SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Recovers the private key of a stealth address from an announcement's
/// ephemeral public key.
///
/// The result controls the funds at the stealth address; the caller is
/// responsible for confirming the address actually matches (via
/// [`matches_stealth_address`]) before treating the payment as received.
///
/// # Errors
/// Returns [`ShadeError::InvalidEphemeralKey`] when `ephemeral` is not a
/// 33-byte encoding of a curve point, and [`ShadeError::ScalarOutOfRange`]
/// when either secret key is invalid.
pub fn recover_stealth_private_key(
    ephemeral: &[u8],
    viewing_sk: &SecretScalar,
    spending_sk: &SecretScalar,
) -> Result<SecretScalar> {
    let ephemeral_pk = PublicPoint::from_bytes(ephemeral)
        .map_err(|e| ShadeError::InvalidEphemeralKey(e.to_string()))?;
    let ephemeral_point =
        decode_point(&ephemeral_pk).map_err(|e| ShadeError::InvalidEphemeralKey(e.to_string()))?;

    let viewing_scalar = decode_scalar(viewing_sk)?;
    let shared = shared_secret(&viewing_scalar, &ephemeral_point);

    stealth_private_from_shared(&shared, spending_sk)
}

/// Computes the stealth private key from an already-known shared secret.
///
/// Split out of [`recover_stealth_private_key`] so scanners that computed
/// the shared secret for an ownership check do not repeat the ECDH.
pub fn stealth_private_from_shared(
    shared: &SharedSecret,
    spending_sk: &SecretScalar,
) -> Result<SecretScalar> {
    let spending_scalar = decode_scalar(spending_sk)?;
    let tweak = hash_to_scalar(shared.as_bytes());

    // Scalar addition is modular by construction
    let stealth_scalar: Scalar = tweak + spending_scalar;
    Ok(encode_scalar(&stealth_scalar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::derive_key_set;
    use crate::point::decode_scalar;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn golden_entropy() -> Vec<u8> {
        let mut entropy = vec![0xAAu8; 32];
        entropy.extend_from_slice(&[0xBBu8; 32]);
        entropy.push(0x1B);
        entropy
    }

    #[test]
    fn test_golden_key_derivation() {
        let keys = derive_key_set(&golden_entropy()).unwrap();

        assert_eq!(
            keys.viewing.secret.to_hex(),
            "0x6b1fecfad93f658b789c38a4462f263fd4a282f5ff27382898d99e650ea294c5"
        );
        assert_eq!(
            keys.spending.secret.to_hex(),
            "0x23bce741e99f9d05f416e47ca6243695fdf5490725dff85bf10d5f1b53da871b"
        );
        assert_eq!(
            keys.viewing.public.to_hex(),
            "0x03682ffd97748aa5e3800ae99fb24c6a1f5cbb6ceb660d6ce3cb57f3347cc92dfe"
        );
        assert_eq!(
            keys.spending.public.to_hex(),
            "0x0245ec40e63ed1d905f7ef2502b336f9f52cc3c97c4b70371ef73929fc89435088"
        );
    }

    #[test]
    fn test_golden_stealth_flow() {
        let keys = derive_key_set(&golden_entropy()).unwrap();

        // Fixed ephemeral key so both sides are pinned to known values
        let ephemeral_scalar = hash_to_scalar(b"ephemeral test key");
        let ephemeral_public = public_for_scalar(&ephemeral_scalar);
        assert_eq!(
            ephemeral_public.to_hex(),
            "0x02b32f4124ea72a8342e6cb753d387a8f72370aa94f796b224101f83c2f551f7ec"
        );

        // Sender side
        let viewing_point = decode_point(&keys.viewing.public).unwrap();
        let shared = shared_secret(&ephemeral_scalar, &viewing_point);
        assert_eq!(
            hex::encode(shared.as_bytes()),
            "47ce8ffb2cd114f5f6046ff183196d34c3e2dbe15808221ee7d583859aadd17b"
        );

        let address = stealth_address_from_shared(&shared, &keys.spending.public).unwrap();
        assert_eq!(
            address.to_hex_string(),
            "0x05f3727f6d9da8827d1f7e975804e326a1593f5a"
        );

        // Recipient side
        let stealth_sk = recover_stealth_private_key(
            ephemeral_public.as_bytes(),
            &keys.viewing.secret,
            &keys.spending.secret,
        )
        .unwrap();
        assert_eq!(
            stealth_sk.to_hex(),
            "0x424854e509ef647b37d41b855119c992e99207134573befe30bc963336ea00a2"
        );

        // The recovered key controls exactly the derived address
        let stealth_scalar = decode_scalar(&stealth_sk).unwrap();
        let controlled = eth_address(&(ProjectivePoint::GENERATOR * stealth_scalar));
        assert_eq!(controlled, address);
    }

    #[test]
    fn test_sender_recipient_roundtrip() {
        let keys = derive_key_set(b"roundtrip recipient").unwrap();

        let derived =
            derive_stealth_address(&keys.viewing.public, &keys.spending.public).unwrap();

        let stealth_sk = recover_stealth_private_key(
            derived.ephemeral_public.as_bytes(),
            &keys.viewing.secret,
            &keys.spending.secret,
        )
        .unwrap();

        let stealth_scalar = decode_scalar(&stealth_sk).unwrap();
        let controlled = eth_address(&(ProjectivePoint::GENERATOR * stealth_scalar));
        assert_eq!(controlled, derived.address);
    }

    #[test]
    fn test_unlinkability_across_payments() {
        let keys = derive_key_set(b"unlinkable recipient").unwrap();

        let first = derive_stealth_address(&keys.viewing.public, &keys.spending.public).unwrap();
        let second = derive_stealth_address(&keys.viewing.public, &keys.spending.public).unwrap();

        assert_ne!(first.address, second.address);
        assert_ne!(first.ephemeral_public, second.ephemeral_public);
        assert_ne!(
            first.shared_secret.as_bytes(),
            second.shared_secret.as_bytes()
        );
    }

    #[test]
    fn test_foreign_keys_do_not_match() {
        let recipient = derive_key_set(b"intended recipient").unwrap();
        let bystander = derive_key_set(b"unrelated bystander").unwrap();

        let derived =
            derive_stealth_address(&recipient.viewing.public, &recipient.spending.public).unwrap();

        // The bystander computes their own shared secret for the announcement
        let eph_point = decode_point(&derived.ephemeral_public).unwrap();
        let bystander_viewing = decode_scalar(&bystander.viewing.secret).unwrap();
        let bystander_shared = shared_secret(&bystander_viewing, &eph_point);

        let matched = matches_stealth_address(
            &bystander_shared,
            &bystander.spending.public,
            &derived.address,
        )
        .unwrap();
        assert!(!matched);
    }

    #[test]
    fn test_matches_stealth_address_positive() {
        let keys = derive_key_set(b"matching recipient").unwrap();
        let derived = derive_stealth_address(&keys.viewing.public, &keys.spending.public).unwrap();

        let eph_point = decode_point(&derived.ephemeral_public).unwrap();
        let viewing_scalar = decode_scalar(&keys.viewing.secret).unwrap();
        let shared = shared_secret(&viewing_scalar, &eph_point);

        assert!(
            matches_stealth_address(&shared, &keys.spending.public, &derived.address).unwrap()
        );
    }

    #[test]
    fn test_recover_rejects_malformed_ephemeral() {
        let keys = derive_key_set(b"recipient").unwrap();

        // Wrong length
        let result =
            recover_stealth_private_key(&[0x02; 20], &keys.viewing.secret, &keys.spending.secret);
        assert!(matches!(result, Err(ShadeError::InvalidEphemeralKey(_))));

        // Right length, off curve
        let mut off_curve = [0xFFu8; 33];
        off_curve[0] = 0x02;
        let result =
            recover_stealth_private_key(&off_curve, &keys.viewing.secret, &keys.spending.secret);
        assert!(matches!(result, Err(ShadeError::InvalidEphemeralKey(_))));
    }

    #[test]
    fn test_derive_rejects_malformed_recipient_keys() {
        let keys = derive_key_set(b"recipient").unwrap();

        let mut off_curve = [0xFFu8; 33];
        off_curve[0] = 0x03;
        let bad = PublicPoint::from_bytes(&off_curve).unwrap();

        let result = derive_stealth_address(&bad, &keys.spending.public);
        assert!(matches!(
            result,
            Err(ShadeError::InvalidRecipientKey { role: "viewing", .. })
        ));

        let result = derive_stealth_address(&keys.viewing.public, &bad);
        assert!(matches!(
            result,
            Err(ShadeError::InvalidRecipientKey { role: "spending", .. })
        ));
    }

    #[test]
    fn test_derivation_with_seeded_rng_is_reproducible() {
        let keys = derive_key_set(b"seeded recipient").unwrap();

        let mut rng1 = ChaCha20Rng::seed_from_u64(99);
        let mut rng2 = ChaCha20Rng::seed_from_u64(99);

        let a = derive_stealth_address_with_rng(&keys.viewing.public, &keys.spending.public, &mut rng1)
            .unwrap();
        let b = derive_stealth_address_with_rng(&keys.viewing.public, &keys.spending.public, &mut rng2)
            .unwrap();

        assert_eq!(a.address, b.address);
        assert_eq!(a.ephemeral_public, b.ephemeral_public);
    }
}
