//! The query codec: an ordered name → value mapping sealed into hex tokens.
//!
//! [`QueryCodec`] owns the mapping and the cipher configuration, and
//! exposes only vetted operations over both. The checksum sentinel segment
//! is metadata, computed on every serialize and verified on every decode;
//! it is never stored in the mapping and never visible through an accessor.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::warn;

use crate::crypto::{self, CipherKind};
use crate::error::CodecError;

/// Reserved segment name that carries the integrity checksum on the wire.
///
/// Chosen by the legacy format to be unlikely to collide with real query
/// names. It is matched raw (before percent-decoding) and written raw.
pub const CHECKSUM_NAME: &str = "__$$";

/// Everything outside RFC 3986's unreserved set (`A-Z a-z 0-9 - _ . ~`) is
/// percent-escaped in names and values.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

fn decode_component(s: &str) -> String {
    // Legacy form-encoded tokens write spaces as '+'; accept both. '+'
    // itself always travels as %2B, so this cannot misfire.
    let s = s.replace('+', " ");
    percent_decode_str(&s).decode_utf8_lossy().into_owned()
}

/// Reversible codec between named string values and opaque hex tokens.
///
/// Decoding is all-or-nothing: a token whose checksum is missing or wrong
/// yields an empty mapping, never a partially populated one. Validation
/// errors from the setters leave the previous configuration fully intact.
///
/// The codec is synchronous and internally unsynchronized; give each
/// logical session its own instance, or guard a shared one with a mutex.
pub struct QueryCodec {
    entries: Vec<(String, String)>,
    cipher: CipherKind,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl QueryCodec {
    /// Creates an empty codec using the legacy default cipher (DES).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::KeyTooShort`] or
    /// [`CodecError::InitVectorTooShort`] if the material is smaller than
    /// DES requires (8 bytes each).
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self, CodecError> {
        Self::with_cipher(CipherKind::Des, key, iv)
    }

    /// Creates an empty codec with an explicit cipher.
    ///
    /// # Errors
    ///
    /// Returns a range error if `key` or `iv` is shorter than the cipher's
    /// required key or block size.
    pub fn with_cipher(cipher: CipherKind, key: &[u8], iv: &[u8]) -> Result<Self, CodecError> {
        validate_material(cipher, key, iv)?;
        Ok(QueryCodec {
            entries: Vec::new(),
            cipher,
            key: key.to_vec(),
            iv: iv.to_vec(),
        })
    }

    /// Creates a codec from a validated [`CodecConfig`](crate::CodecConfig).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownCipher`] or a key/IV range error.
    pub fn from_config(config: &crate::CodecConfig) -> Result<Self, CodecError> {
        let kind = config.cipher_kind()?;
        Self::with_cipher(kind, config.key.as_bytes(), config.init_vector.as_bytes())
    }

    /// Creates a codec (DES) and immediately decodes `token` into it.
    ///
    /// Mirrors the legacy decrypting constructor: an unreadable or
    /// tampered token yields an empty mapping, not an error.
    ///
    /// # Errors
    ///
    /// Returns a range error only for undersized key material.
    pub fn from_token(token: &str, key: &[u8], iv: &[u8]) -> Result<Self, CodecError> {
        let mut codec = Self::new(key, iv)?;
        codec.decode(token);
        Ok(codec)
    }

    /// Decodes `token`, replacing the current mapping wholesale.
    ///
    /// The token is decrypted and split on `&` into `name=value` segments
    /// (segments without `=` are skipped). The raw segment name
    /// [`CHECKSUM_NAME`] captures the claimed checksum; every other
    /// segment is percent-decoded and inserted, later duplicates winning.
    /// If the claimed checksum is missing or does not match the checksum
    /// computed over the decoded entries, the whole mapping is discarded.
    ///
    /// An empty or non-decryptable token yields an empty mapping.
    pub fn decode(&mut self, token: &str) {
        self.entries.clear();
        let plaintext = crypto::decrypt(token, &self.key, &self.iv, self.cipher);
        if plaintext.is_empty() {
            return;
        }
        let mut claimed: Option<String> = None;
        for segment in plaintext.split('&') {
            let Some((name, value)) = segment.split_once('=') else {
                continue;
            };
            if name == CHECKSUM_NAME {
                claimed = Some(value.to_owned());
            } else {
                self.insert(decode_component(name), decode_component(value));
            }
        }
        if claimed.as_deref() != Some(self.checksum().as_str()) {
            warn!("checksum missing or mismatched; discarding decoded queries");
            self.entries.clear();
        }
    }

    /// Encodes the current mapping into an opaque uppercase hex token.
    ///
    /// A cipher engine failure yields an empty token; callers must treat
    /// that as "no data" rather than a valid encoding.
    pub fn encode(&self) -> String {
        let plaintext = self.query_string();
        let ciphertext = crypto::encrypt(plaintext.as_bytes(), &self.key, &self.iv, self.cipher);
        hex::encode_upper(ciphertext)
    }

    /// The plaintext serialization: percent-encoded `name=value` segments
    /// joined with `&`, followed by the raw checksum segment.
    ///
    /// This is the exact string that gets encrypted; exposed for
    /// diagnostics and wire-format tests.
    pub fn query_string(&self) -> String {
        let mut segments: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
            .collect();
        segments.push(format!("{CHECKSUM_NAME}={}", self.checksum()));
        segments.join("&")
    }

    /// Inserts or overwrites a query value.
    ///
    /// Overwriting moves the entry to the end of the serialization order.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyQueryName`] for an empty name and
    /// [`CodecError::ReservedQueryName`] for the checksum sentinel.
    pub fn add_query(&mut self, name: &str, value: &str) -> Result<(), CodecError> {
        if name.is_empty() {
            return Err(CodecError::EmptyQueryName);
        }
        if name == CHECKSUM_NAME {
            return Err(CodecError::ReservedQueryName(name.to_owned()));
        }
        self.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    /// Removes a query, returning whether it existed.
    pub fn remove_query(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    /// Returns whether a query with this name exists.
    pub fn has_query(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Returns the value stored under `name`, if any.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Number of visible queries (the checksum sentinel never counts).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The active cipher.
    pub fn cipher(&self) -> CipherKind {
        self.cipher
    }

    /// Switches to the named cipher.
    ///
    /// The stored key and IV are re-validated against the new cipher's
    /// sizes before anything changes; on failure the previous cipher, key,
    /// and IV all remain active.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownCipher`] for an unrecognized name, or
    /// [`CodecError::CipherRejected`] wrapping the key/IV validation
    /// failure.
    pub fn set_cipher(&mut self, name: &str) -> Result<(), CodecError> {
        let kind = CipherKind::from_name(name)
            .ok_or_else(|| CodecError::UnknownCipher(name.to_owned()))?;
        validate_material(kind, &self.key, &self.iv).map_err(|source| {
            CodecError::CipherRejected {
                name: kind.name().to_owned(),
                source: Box::new(source),
            }
        })?;
        self.cipher = kind;
        Ok(())
    }

    /// Replaces the encryption key.
    ///
    /// The stored key may be longer than the active cipher requires; only
    /// the required prefix is used when encrypting. The previous key is
    /// zeroed before it is released.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::KeyTooShort`] if `key` is shorter than the
    /// active cipher's key size; the previous key stays in place.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CodecError> {
        if key.len() < self.cipher.key_size() {
            return Err(CodecError::KeyTooShort(self.cipher.key_size()));
        }
        self.key.iter_mut().for_each(|b| *b = 0);
        self.key = key.to_vec();
        Ok(())
    }

    /// Replaces the CBC initialization vector.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InitVectorTooShort`] if `iv` is shorter than
    /// the active cipher's block size; the previous IV stays in place.
    pub fn set_init_vector(&mut self, iv: &[u8]) -> Result<(), CodecError> {
        if iv.len() < self.cipher.block_size() {
            return Err(CodecError::InitVectorTooShort(self.cipher.block_size()));
        }
        self.iv.iter_mut().for_each(|b| *b = 0);
        self.iv = iv.to_vec();
        Ok(())
    }

    /// Order-independent additive checksum over all names and values.
    ///
    /// Each Unicode scalar contributes `scalar - '0'`, accumulated in a
    /// wrapping `i32`; the result is rendered as uppercase hex, negatives
    /// in 32-bit two's-complement form. A weak integrity tag, not an
    /// authentication code.
    fn checksum(&self) -> String {
        let mut sum: i32 = 0;
        for (name, value) in &self.entries {
            sum = sum.wrapping_add(char_sum(name));
            sum = sum.wrapping_add(char_sum(value));
        }
        format!("{sum:X}")
    }

    /// Last-write-wins insert; an overwritten name moves to the end.
    fn insert(&mut self, name: String, value: String) {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, value));
    }
}

fn validate_material(cipher: CipherKind, key: &[u8], iv: &[u8]) -> Result<(), CodecError> {
    if key.len() < cipher.key_size() {
        return Err(CodecError::KeyTooShort(cipher.key_size()));
    }
    if iv.len() < cipher.block_size() {
        return Err(CodecError::InitVectorTooShort(cipher.block_size()));
    }
    Ok(())
}

fn char_sum(s: &str) -> i32 {
    s.chars()
        .fold(0i32, |acc, c| acc.wrapping_add(c as i32 - '0' as i32))
}

impl fmt::Debug for QueryCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material — not even in debug builds.
        f.debug_struct("QueryCodec")
            .field("entries", &self.entries)
            .field("cipher", &self.cipher)
            .field("key", &"[REDACTED]")
            .field("iv", &"[REDACTED]")
            .finish()
    }
}

impl Drop for QueryCodec {
    /// Zero the key material on drop.
    fn drop(&mut self) {
        self.key.iter_mut().for_each(|b| *b = 0);
        self.iv.iter_mut().for_each(|b| *b = 0);
    }
}
