//! Frozen wire-compatibility vectors for the legacy token format.
//!
//! All expected values are byte-exact snapshots of the legacy wire format
//! (DES-CBC, demonstration key material). Any change in output here is a
//! wire-format regression, not a refactor.

use queryseal::crypto::{self, CipherKind};
use queryseal::{CodecError, QueryCodec, CHECKSUM_NAME};

/// Demonstration key from the legacy format. Not secure; test-only.
const KEY: &[u8] = b"ABC12345";
/// Demonstration IV from the legacy format. Not secure; test-only.
const IV: &[u8] = &[0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18];
/// Legacy-format token carrying `{"Rating": "80"}`.
const RATING_TOKEN: &str = "F7EBC908B106D4282FA705D0EED915DBE002774B1A152DCC";

// ═══════════════════════════════════════════════════════════════════════
// Query codec — end-to-end token vectors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn decode_rating_token() {
    let codec = QueryCodec::from_token(RATING_TOKEN, KEY, IV).unwrap();
    assert_eq!(codec.len(), 1);
    assert_eq!(codec.query("Rating"), Some("80"));
    assert_eq!(codec.query_string(), "Rating=80&__$$=14D");
}

#[test]
fn encode_rating_map() {
    let mut codec = QueryCodec::new(KEY, IV).unwrap();
    codec.add_query("Rating", "80").unwrap();
    assert_eq!(codec.encode(), RATING_TOKEN);
}

#[test]
fn rating_and_stars_serialization() {
    let mut codec = QueryCodec::from_token(RATING_TOKEN, KEY, IV).unwrap();
    codec.add_query("Stars", "5").unwrap();
    assert_eq!(codec.query_string(), "Rating=80&Stars=5&__$$=26F");
    assert!(codec.remove_query("Stars"));
    assert_eq!(codec.query_string(), "Rating=80&__$$=14D");
}

#[test]
fn decode_empty_token() {
    let codec = QueryCodec::from_token("", KEY, IV).unwrap();
    assert!(codec.is_empty());
}

#[test]
fn full_round_trip_after_mutation() {
    let mut codec = QueryCodec::from_token(RATING_TOKEN, KEY, IV).unwrap();
    codec.add_query("Stars", "5").unwrap();
    let token = codec.encode();

    let decoded = QueryCodec::from_token(&token, KEY, IV).unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded.query("Rating"), Some("80"));
    assert_eq!(decoded.query("Stars"), Some("5"));
}

// ═══════════════════════════════════════════════════════════════════════
// Block cipher adapter — raw encrypt/decrypt vectors
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn adapter_encrypt_stars_vector() {
    let ciphertext = crypto::encrypt(b"Stars=5", KEY, IV, CipherKind::Des);
    assert_eq!(hex::encode_upper(ciphertext), "8A92415A14CD52A5");
}

#[test]
fn adapter_decrypt_stars_vector() {
    assert_eq!(
        crypto::decrypt("8A92415A14CD52A5", KEY, IV, CipherKind::Des),
        "Stars=5"
    );
}

#[test]
fn stars_token_lacks_checksum_so_decodes_empty() {
    // The raw cipher vector is a valid segment but carries no checksum;
    // at the query level nothing survives fail-closed validation.
    let codec = QueryCodec::from_token("8A92415A14CD52A5", KEY, IV).unwrap();
    assert!(codec.is_empty());
}

#[test]
fn adapter_encrypt_rating_plaintext_vector() {
    let ciphertext = crypto::encrypt(b"Rating=80&__$$=14D", KEY, IV, CipherKind::Des);
    assert_eq!(hex::encode_upper(ciphertext), RATING_TOKEN);
}

// ═══════════════════════════════════════════════════════════════════════
// Tamper detection
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn flipped_hex_characters_are_rejected() {
    // Positions in the final two ciphertext blocks: corruption there
    // destroys the checksum segment or its claimed value.
    for position in 16..RATING_TOKEN.len() {
        let mut tampered: Vec<char> = RATING_TOKEN.chars().collect();
        tampered[position] = if tampered[position] == 'A' { 'B' } else { 'A' };
        let tampered: String = tampered.into_iter().collect();
        let codec = QueryCodec::from_token(&tampered, KEY, IV).unwrap();
        assert!(codec.is_empty(), "flip at position {position} was accepted");
    }
}

#[test]
fn truncated_token_is_rejected() {
    let codec = QueryCodec::from_token(&RATING_TOKEN[..32], KEY, IV).unwrap();
    assert!(codec.is_empty());
    // Odd-length truncation is not even valid hex.
    let codec = QueryCodec::from_token(&RATING_TOKEN[..31], KEY, IV).unwrap();
    assert!(codec.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════
// Configuration errors — frozen messages
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn short_key_message() {
    let mut codec = QueryCodec::new(KEY, IV).unwrap();
    let err = codec.set_key(b"a").unwrap_err();
    assert_eq!(err.to_string(), "Key must be at least 8 characters long");
}

#[test]
fn short_init_vector_message() {
    let mut codec = QueryCodec::new(KEY, IV).unwrap();
    let err = codec.set_init_vector(b"a").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Initialization vector must be at least 8 characters long"
    );
}

#[test]
fn unknown_cipher_message() {
    let mut codec = QueryCodec::new(KEY, IV).unwrap();
    let err = codec.set_cipher("IDoNotExist").unwrap_err();
    assert!(matches!(err, CodecError::UnknownCipher(_)));
    assert_eq!(err.to_string(), "Cipher IDoNotExist is not known");
}

#[test]
fn constructor_rejects_short_material() {
    let err = QueryCodec::new(b"a", IV).unwrap_err();
    assert_eq!(err.to_string(), "Key must be at least 8 characters long");
    let err = QueryCodec::new(KEY, b"a").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Initialization vector must be at least 8 characters long"
    );
}

#[test]
fn sentinel_name_is_reserved() {
    let mut codec = QueryCodec::new(KEY, IV).unwrap();
    assert!(codec.add_query(CHECKSUM_NAME, "x").is_err());
    assert!(!codec.has_query(CHECKSUM_NAME));
}
