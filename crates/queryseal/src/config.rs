//! Configuration for a codec instance.
//!
//! The cipher identifier, key, and initialization vector are supplied by
//! the calling application; nothing here is persisted and there are no
//! built-in key defaults. Applications that configure the codec through the
//! environment can use [`CodecConfig::from_env`], which reads `QUERYSEAL_*`
//! variables.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::crypto::CipherKind;
use crate::error::CodecError;

/// Codec configuration: cipher name plus raw key material.
///
/// Key and IV are byte strings; both may be longer than the cipher requires
/// (only the required prefix is used) but never shorter.
#[derive(Clone, Deserialize)]
pub struct CodecConfig {
    /// Cipher algorithm name (see [`CipherKind::from_name`]).
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Encryption key byte string. **Required.**
    pub key: String,

    /// CBC initialization vector byte string. **Required.**
    pub init_vector: String,
}

fn default_cipher() -> String {
    "DES".into()
}

impl CodecConfig {
    /// Load and validate configuration from `QUERYSEAL_*` environment
    /// variables (`QUERYSEAL_CIPHER`, `QUERYSEAL_KEY`,
    /// `QUERYSEAL_INIT_VECTOR`).
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is absent or the resulting
    /// configuration fails [`CodecConfig::validate`].
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("QUERYSEAL"))
            .build()
            .context("failed to build configuration from environment")?;

        let c: CodecConfig = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate the cipher name and the key/IV lengths against it.
    ///
    /// # Errors
    ///
    /// Returns the same range errors the codec setters raise:
    /// [`CodecError::UnknownCipher`], [`CodecError::KeyTooShort`], or
    /// [`CodecError::InitVectorTooShort`].
    pub fn validate(&self) -> Result<(), CodecError> {
        let kind = self.cipher_kind()?;
        if self.key.len() < kind.key_size() {
            return Err(CodecError::KeyTooShort(kind.key_size()));
        }
        if self.init_vector.len() < kind.block_size() {
            return Err(CodecError::InitVectorTooShort(kind.block_size()));
        }
        Ok(())
    }

    /// Resolve the configured cipher name to a [`CipherKind`].
    pub fn cipher_kind(&self) -> Result<CipherKind, CodecError> {
        CipherKind::from_name(&self.cipher)
            .ok_or_else(|| CodecError::UnknownCipher(self.cipher.clone()))
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.debug_struct("CodecConfig")
            .field("cipher", &self.cipher)
            .field("key", &"[REDACTED]")
            .field("init_vector", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_config() -> CodecConfig {
        CodecConfig {
            cipher: default_cipher(),
            key: "ABC12345".into(),
            init_vector: "\x11\x12\x13\x14\x15\x16\x17\x18".into(),
        }
    }

    #[test]
    fn default_cipher_is_des() {
        assert_eq!(default_cipher(), "DES");
        assert_eq!(demo_config().cipher_kind().unwrap(), CipherKind::Des);
    }

    #[test]
    fn demo_config_validates() {
        assert!(demo_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_unknown_cipher() {
        let mut cfg = demo_config();
        cfg.cipher = "IDoNotExist".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Cipher IDoNotExist is not known");
    }

    #[test]
    fn validate_rejects_short_key() {
        let mut cfg = demo_config();
        cfg.key = "a".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Key must be at least 8 characters long");
    }

    #[test]
    fn validate_rejects_short_init_vector() {
        let mut cfg = demo_config();
        cfg.init_vector = "a".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Initialization vector must be at least 8 characters long"
        );
    }

    #[test]
    fn validate_checks_sizes_for_configured_cipher() {
        let mut cfg = demo_config();
        cfg.cipher = "AES-256".into();
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.to_string(), "Key must be at least 32 characters long");
    }

    #[test]
    fn debug_redacts_key_material() {
        let rendered = format!("{:?}", demo_config());
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("ABC12345"));
    }
}
