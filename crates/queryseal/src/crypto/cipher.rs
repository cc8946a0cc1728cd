//! CBC block cipher adapter with runtime algorithm selection.
//!
//! Wraps the RustCrypto block ciphers in CBC mode behind a small registry
//! ([`CipherKind`]) so the algorithm stays selectable at runtime. DES is
//! the legacy default; the token format carries no cipher identifier, so
//! both ends must agree on the algorithm, key, and IV out of band.
//!
//! # Failure policy
//!
//! This layer fails soft: undersized parameters, engine failures, and
//! malformed hex all yield an empty output instead of an error. Callers
//! treat empty ciphertext or plaintext as "no data". The validating,
//! error-raising surface lives in the [`crate::query::QueryCodec`] setters,
//! which guarantee well-sized key material long before this code runs.

use cbc::cipher::{
    block_padding::NoPadding, BlockCipher, BlockDecrypt, BlockDecryptMut, BlockEncrypt,
    BlockEncryptMut, KeyInit, KeyIvInit,
};
use tracing::{debug, warn};

use crate::crypto::padding;

/// Supported CBC block cipher algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherKind {
    /// Single DES: 8-byte key, 8-byte block. The legacy default;
    /// cryptographically weak, kept for token compatibility.
    Des,
    /// Triple DES (EDE3): 24-byte key, 8-byte block.
    TripleDes,
    /// AES-128: 16-byte key, 16-byte block.
    Aes128,
    /// AES-256: 32-byte key, 16-byte block.
    Aes256,
}

impl CipherKind {
    /// Looks up a cipher by name, case-insensitively.
    ///
    /// Accepted spellings: `DES`, `TripleDES`/`3DES`, `AES-128`/`AES128`,
    /// `AES-256`/`AES256`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "des" => Some(CipherKind::Des),
            "tripledes" | "3des" => Some(CipherKind::TripleDes),
            "aes-128" | "aes128" => Some(CipherKind::Aes128),
            "aes-256" | "aes256" => Some(CipherKind::Aes256),
            _ => None,
        }
    }

    /// Canonical display name, accepted by [`CipherKind::from_name`].
    pub const fn name(self) -> &'static str {
        match self {
            CipherKind::Des => "DES",
            CipherKind::TripleDes => "TripleDES",
            CipherKind::Aes128 => "AES-128",
            CipherKind::Aes256 => "AES-256",
        }
    }

    /// Required key length in bytes. Longer keys are truncated to this
    /// prefix at use time.
    pub const fn key_size(self) -> usize {
        match self {
            CipherKind::Des => 8,
            CipherKind::TripleDes => 24,
            CipherKind::Aes128 => 16,
            CipherKind::Aes256 => 32,
        }
    }

    /// Block length in bytes; also the required IV length.
    pub const fn block_size(self) -> usize {
        match self {
            CipherKind::Des | CipherKind::TripleDes => 8,
            CipherKind::Aes128 | CipherKind::Aes256 => 16,
        }
    }
}

/// Encrypts `plaintext` under CBC, returning raw ciphertext bytes.
///
/// The plaintext is padded to the cipher's block size first (see
/// [`padding::add_padding`]); the caller hex-frames the result. Key and IV
/// may be longer than required — only the required prefix is used. An
/// undersized key or IV, or an engine failure, yields an empty vector.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8], kind: CipherKind) -> Vec<u8> {
    let (Some(key), Some(iv)) = (key.get(..kind.key_size()), iv.get(..kind.block_size())) else {
        warn!(cipher = kind.name(), "key or IV shorter than the cipher requires; producing no ciphertext");
        return Vec::new();
    };
    let padded = padding::add_padding(plaintext, kind.block_size());
    let ciphertext = match kind {
        CipherKind::Des => cbc_encrypt::<des::Des>(key, iv, &padded),
        CipherKind::TripleDes => cbc_encrypt::<des::TdesEde3>(key, iv, &padded),
        CipherKind::Aes128 => cbc_encrypt::<aes::Aes128>(key, iv, &padded),
        CipherKind::Aes256 => cbc_encrypt::<aes::Aes256>(key, iv, &padded),
    };
    match ciphertext {
        Some(ciphertext) => ciphertext,
        None => {
            warn!(cipher = kind.name(), "cipher engine rejected the parameters; producing no ciphertext");
            Vec::new()
        }
    }
}

/// Decrypts a hex token back to plaintext.
///
/// Malformed hex, an undersized key or IV, or a ciphertext that is not a
/// whole number of blocks yields an empty string. Decrypted bytes that are
/// not valid UTF-8 are replaced rather than rejected — the checksum layer
/// above discards garbage wholesale.
pub fn decrypt(token: &str, key: &[u8], iv: &[u8], kind: CipherKind) -> String {
    let Ok(ciphertext) = hex::decode(token) else {
        debug!("token is not valid hex; producing no plaintext");
        return String::new();
    };
    if ciphertext.is_empty() {
        return String::new();
    }
    let (Some(key), Some(iv)) = (key.get(..kind.key_size()), iv.get(..kind.block_size())) else {
        warn!(cipher = kind.name(), "key or IV shorter than the cipher requires; producing no plaintext");
        return String::new();
    };
    let decrypted = match kind {
        CipherKind::Des => cbc_decrypt::<des::Des>(key, iv, &ciphertext),
        CipherKind::TripleDes => cbc_decrypt::<des::TdesEde3>(key, iv, &ciphertext),
        CipherKind::Aes128 => cbc_decrypt::<aes::Aes128>(key, iv, &ciphertext),
        CipherKind::Aes256 => cbc_decrypt::<aes::Aes256>(key, iv, &ciphertext),
    };
    let Some(decrypted) = decrypted else {
        debug!(cipher = kind.name(), "ciphertext is not a whole number of blocks; producing no plaintext");
        return String::new();
    };
    let unpadded = padding::remove_padding(&decrypted, kind.block_size());
    String::from_utf8_lossy(unpadded).into_owned()
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], padded: &[u8]) -> Option<Vec<u8>>
where
    C: BlockCipher + BlockEncrypt + KeyInit,
{
    let enc = cbc::Encryptor::<C>::new_from_slices(key, iv).ok()?;
    Some(enc.encrypt_padded_vec_mut::<NoPadding>(padded))
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Option<Vec<u8>>
where
    C: BlockCipher + BlockDecrypt + KeyInit,
{
    let dec = cbc::Decryptor::<C>::new_from_slices(key, iv).ok()?;
    dec.decrypt_padded_vec_mut::<NoPadding>(ciphertext).ok()
}
