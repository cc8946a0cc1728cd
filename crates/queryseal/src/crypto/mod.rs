//! Block cipher adapter and the legacy padding codec.
//!
//! This module is free of query-string concerns. It provides the low-level
//! encrypt/decrypt pipeline used by [`crate::query::QueryCodec`].
//!
//! # Pipeline
//!
//! ```text
//! encrypt: plaintext → add_padding → CBC(key, iv) → raw bytes (hex framed by the caller)
//! decrypt: hex token → CBC⁻¹(key, iv) → remove_padding → plaintext
//! ```

pub mod cipher;
pub mod padding;

pub use cipher::{decrypt, encrypt, CipherKind};
