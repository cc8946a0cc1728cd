//! queryseal: reversible encrypted query-string tokens.
//!
//! Packs named string values into a single opaque hex token suitable for
//! embedding in a URL, and unpacks the token back, detecting corruption or
//! a key mismatch through an additive checksum. Validation is
//! all-or-nothing: a token that fails its checksum decodes to an empty
//! mapping, never a partial one.
//!
//! # Token pipeline
//!
//! ```text
//! name=value&…&__$$=<checksum>      percent-encoded query-string serialization
//!            │
//!            ▼
//! self-describing trailing padding → CBC block cipher (DES by default)
//!            │
//!            ▼
//! "F7EBC908B106D4282FA705D0EED915DBE002774B1A152DCC"   uppercase hex token
//! ```
//!
//! The key and IV are caller-supplied. The legacy format's default DES
//! cipher and short static keys are demonstration-grade, not modern
//! cryptography; the checksum detects corruption and key mismatch, not
//! adversarial tampering.
//!
//! # Examples
//!
//! ```
//! use queryseal::QueryCodec;
//!
//! let key = b"ABC12345";
//! let iv = [0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18];
//!
//! let mut codec = QueryCodec::new(key, &iv)?;
//! codec.add_query("Rating", "80")?;
//! let token = codec.encode();
//!
//! let decoded = QueryCodec::from_token(&token, key, &iv)?;
//! assert_eq!(decoded.query("Rating"), Some("80"));
//! # Ok::<(), queryseal::CodecError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod query;

pub use config::CodecConfig;
pub use crypto::CipherKind;
pub use error::CodecError;
pub use query::{QueryCodec, CHECKSUM_NAME};
