//! Error types shared by all fallible operations in this crate.

use std::fmt;

/// Errors reported by header parsing, base-string construction, signing and
/// validation.
///
/// Every fallible operation in the crate returns one of these; the
/// human-readable message is available through `Display`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The header value is syntactically malformed, or a required Hawk
    /// parameter is absent.
    #[error("malformed authentication header at byte {pos}: {reason}")]
    Parse { pos: usize, reason: &'static str },

    /// The authentication scheme token is not `Hawk`.
    #[error("authentication scheme is not Hawk")]
    BadScheme,

    /// Reserved for higher-level token validators built on this crate.
    #[error("token validation failed")]
    TokenValidation,

    /// No algorithm is registered under the given name.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A cryptographic primitive failed; with `ring` this is only ever the
    /// system random source.
    #[error("crypto primitive failure: {0}")]
    Crypto(&'static str),

    /// A `ts` parameter is not a valid signed decimal number.
    #[error("invalid time value: {0:?}")]
    TimeValue(String),

    /// The allocator refused to provide a dynamic base-string buffer.
    #[error("memory allocation failed")]
    NoMemory,

    /// The base string would exceed the hard size cap. Guards against
    /// oversized-URL denial of service.
    #[error("required buffer of {required} bytes exceeds maximum of {max} bytes")]
    BufferTooLarge { required: usize, max: usize },

    /// A caller-supplied output buffer is smaller than the exact size
    /// reported by the matching length calculation.
    #[error("output buffer of {actual} bytes is smaller than required {required} bytes")]
    BufferTooSmall { required: usize, actual: usize },

    /// Malformed base64 input: bad alphabet, misaligned length or
    /// non-canonical padding.
    #[error("invalid base64: {0}")]
    Base64(String),

    /// Integer overflow while parsing a number or computing a size.
    #[error("integer overflow")]
    Overflow,

    /// Unclassified error.
    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub(crate) fn parse(pos: usize, reason: &'static str) -> Error {
        Error::Parse { pos, reason }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Error {
        Error::Base64(e.to_string())
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Error {
        Error::Generic(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
