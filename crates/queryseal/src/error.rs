//! Error types for the queryseal codec.

use thiserror::Error;

/// Validation errors raised synchronously at the point of misuse.
///
/// Every variant leaves the codec's configuration and mapping unchanged.
/// Integrity failures on decode are deliberately NOT represented here — a
/// token that fails its checksum degrades to an empty mapping instead of
/// raising (fail-closed).
#[derive(Debug, Error)]
pub enum CodecError {
    /// The supplied key is shorter than the active cipher's key size.
    #[error("Key must be at least {0} characters long")]
    KeyTooShort(usize),

    /// The supplied initialization vector is shorter than the active
    /// cipher's block size.
    #[error("Initialization vector must be at least {0} characters long")]
    InitVectorTooShort(usize),

    /// The cipher name does not match any supported algorithm.
    #[error("Cipher {0} is not known")]
    UnknownCipher(String),

    /// A cipher change was rejected because the stored key or IV is too
    /// short for the new algorithm. The previous cipher remains active.
    #[error("Cipher {name} rejected: {source}")]
    CipherRejected {
        /// Canonical name of the cipher that was requested.
        name: String,
        /// The key or IV validation failure that blocked the change.
        #[source]
        source: Box<CodecError>,
    },

    /// Query names must be non-empty.
    #[error("Query name must not be empty")]
    EmptyQueryName,

    /// The checksum sentinel cannot be stored as a visible query.
    #[error("Query name {0} is reserved")]
    ReservedQueryName(String),
}
