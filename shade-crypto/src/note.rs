//! Payment note encryption.
//!
//! Notes are encrypted with a XOR stream cipher keyed by the per-payment
//! ECDH shared secret. Encryption and decryption are the same operation.
//!
//! ## Security properties
//!
//! Confidentiality only. There is no integrity protection and no
//! authentication: a successful decryption proves the note was keyed to
//! this shared secret, not who wrote it, and a tampered ciphertext decrypts
//! to garbage rather than failing. Key reuse is ruled out by the protocol
//! itself (one fresh ephemeral key, hence one shared secret, per payment).

use zeroize::Zeroize;

use crate::ecdh::SharedSecret;
use crate::hash::note_keystream;

/// Outcome of decrypting announcement metadata as a text note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteDecryption {
    /// The metadata decrypted to valid UTF-8.
    Text(String),
    /// The metadata was empty or did not decrypt to UTF-8 under this key.
    ///
    /// During scanning this is the common case (someone else's payment),
    /// so it is a sentinel rather than an error.
    Undecryptable,
}

/// Encrypts a plaintext note under the shared secret.
///
/// The ciphertext has exactly the plaintext's length; an observer learns
/// the note's size.
pub fn encrypt_note(shared: &SharedSecret, plaintext: &[u8]) -> Vec<u8> {
    xor_with_keystream(shared, plaintext)
}

/// Decrypts a ciphertext note under the shared secret.
///
/// XOR is an involution, so this is [`encrypt_note`] applied again. Any
/// input "succeeds"; only the holder of the right shared secret gets the
/// original bytes back.
pub fn decrypt_note(shared: &SharedSecret, ciphertext: &[u8]) -> Vec<u8> {
    xor_with_keystream(shared, ciphertext)
}

/// Decrypts metadata and interprets it as a UTF-8 text note.
///
/// Never fails: foreign or corrupted metadata comes back as
/// [`NoteDecryption::Undecryptable`].
pub fn decrypt_note_text(shared: &SharedSecret, ciphertext: &[u8]) -> NoteDecryption {
    if ciphertext.is_empty() {
        return NoteDecryption::Undecryptable;
    }

    let decrypted = decrypt_note(shared, ciphertext);
    match String::from_utf8(decrypted) {
        Ok(text) => NoteDecryption::Text(text),
        Err(e) => {
            let mut bytes = e.into_bytes();
            bytes.zeroize();
            NoteDecryption::Undecryptable
        }
    }
}

fn xor_with_keystream(shared: &SharedSecret, data: &[u8]) -> Vec<u8> {
    let mut keystream = note_keystream(shared.as_bytes(), data.len());
    let out: Vec<u8> = data
        .iter()
        .zip(keystream.iter())
        .map(|(a, b)| a ^ b)
        .collect();
    keystream.zeroize();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_secret(fill: u8) -> SharedSecret {
        SharedSecret::from_array([fill; 32])
    }

    #[test]
    fn test_note_roundtrip() {
        let shared = test_secret(0x42);
        let plaintext = b"thanks for lunch";

        let ciphertext = encrypt_note(&shared, plaintext);
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());
        assert_eq!(ciphertext.len(), plaintext.len());

        let decrypted = decrypt_note(&shared, &ciphertext);
        assert_eq!(decrypted.as_slice(), plaintext.as_slice());
    }

    #[test]
    fn test_note_roundtrip_longer_than_one_block() {
        // Exercises the counter-extended keystream past the first 32 bytes
        let shared = test_secret(0x42);
        let plaintext: Vec<u8> = (0u8..100).collect();

        let ciphertext = encrypt_note(&shared, &plaintext);
        let decrypted = decrypt_note(&shared, &ciphertext);
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_golden_note_ciphertext() {
        // Shared secret from the pinned stealth-flow vector
        let mut seed = [0u8; 32];
        seed.copy_from_slice(
            &hex::decode("47ce8ffb2cd114f5f6046ff183196d34c3e2dbe15808221ee7d583859aadd17b")
                .unwrap(),
        );
        let shared = SharedSecret::from_array(seed);

        let ciphertext = encrypt_note(&shared, b"thanks for lunch");
        assert_eq!(hex::encode(&ciphertext), "6ae30ccd4b3ce7132ccf1764df9bf194");

        let long: Vec<u8> = (0u8..100).collect();
        let long_ct = encrypt_note(&shared, &long);
        assert_eq!(
            hex::encode(&long_ct),
            "1e8a6fa0244ac1724bb43d03a6f89cf3fb8dac1f0b86d0b527b62d0cff1267986f534e8b\
             86958fc6e306a0912495ae4ef70b8be7e3d4efded599a45315b6e2759964f555e06c9e13\
             428bc19c5d6b7274bd1d00bce1e22a2ea9e3d23e58d7a55a70051bcf"
        );
    }

    #[test]
    fn test_note_empty_plaintext() {
        let shared = test_secret(0x01);
        assert!(encrypt_note(&shared, b"").is_empty());
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let right = test_secret(0x11);
        let wrong = test_secret(0x22);

        let ciphertext = encrypt_note(&right, b"for your eyes only");
        let decrypted = decrypt_note(&wrong, &ciphertext);
        assert_ne!(decrypted.as_slice(), b"for your eyes only".as_slice());
    }

    #[test]
    fn test_decrypt_note_text() {
        let shared = test_secret(0x33);

        let ciphertext = encrypt_note(&shared, "invoice #42 \u{2714}".as_bytes());
        assert_eq!(
            decrypt_note_text(&shared, &ciphertext),
            NoteDecryption::Text("invoice #42 \u{2714}".to_string())
        );
    }

    #[test]
    fn test_decrypt_note_text_foreign_key_degrades() {
        let right = test_secret(0x44);
        let wrong = test_secret(0x55);

        // A wrong key yields pseudo-random bytes, overwhelmingly invalid UTF-8
        let ciphertext = encrypt_note(&right, "\u{00e9}\u{00e8}\u{00ea}\u{00eb} caf\u{00e9} \u{1f512}".as_bytes());
        assert_eq!(
            decrypt_note_text(&wrong, &ciphertext),
            NoteDecryption::Undecryptable
        );
    }

    #[test]
    fn test_decrypt_note_text_empty_metadata() {
        let shared = test_secret(0x66);
        assert_eq!(
            decrypt_note_text(&shared, b""),
            NoteDecryption::Undecryptable
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn roundtrip_any_plaintext(seed in any::<[u8; 32]>(), plaintext in proptest::collection::vec(any::<u8>(), 0..300)) {
                let shared = SharedSecret::from_array(seed);
                let ciphertext = encrypt_note(&shared, &plaintext);
                prop_assert_eq!(decrypt_note(&shared, &ciphertext), plaintext);
            }

            #[test]
            fn ciphertext_length_equals_plaintext(seed in any::<[u8; 32]>(), plaintext in proptest::collection::vec(any::<u8>(), 0..300)) {
                let shared = SharedSecret::from_array(seed);
                prop_assert_eq!(encrypt_note(&shared, &plaintext).len(), plaintext.len());
            }
        }
    }
}
