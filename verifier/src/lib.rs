#![cfg_attr(not(feature = "std"), no_std)]

// Two-level JWS authentication for device-update manifests.

#[cfg(feature = "alloc")]
extern crate alloc;

use core::fmt;

pub mod anchor;
pub mod arena;
pub mod base64url;
pub mod chain;
pub mod compact;
pub mod digest;
pub mod json;
pub mod rs256;
#[cfg(feature = "sign")]
pub mod sign;

#[cfg(all(test, feature = "std"))]
mod fixtures;

pub use anchor::{root_key, RootKey};
pub use arena::{ScratchArena, SCRATCH_BUFFER_SIZE};
pub use chain::{verify_manifest, Verifier};
pub use rs256::PublicKey;

/// Result alias used by the verifier.
pub type Result<T> = core::result::Result<T, Error>;

/// Which signature of the chain failed to verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// The embedded signing key, signed by the root key.
    SigningKey,
    /// The manifest JWS, signed by the embedded signing key.
    Manifest,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::SigningKey => f.write_str("signing key"),
            Level::Manifest => f.write_str("manifest"),
        }
    }
}

/// Every way a manifest can fail authentication.
///
/// Callers should treat any variant as "do not trust this manifest"; the
/// discriminant only exists so the failing stage can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Wrong number of `.` separators or an empty signature segment.
    StructuralFormat,
    /// Scratch arena or one of its regions is too small, or an input exceeds
    /// the published maximum.
    BufferCapacity,
    /// A base64 segment is not valid.
    Decode,
    /// A required JSON field is absent. Carries the field name.
    FieldNotFound(&'static str),
    /// The embedded key was not issued by the trusted root key id.
    TrustAnchorMismatch,
    /// An RSA check failed at the given level of the chain.
    SignatureVerification(Level),
    /// The manifest digest does not match the digest claimed in the payload.
    ContentDigestMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StructuralFormat => f.write_str("malformed compact serialization"),
            Error::BufferCapacity => f.write_str("buffer capacity exceeded"),
            Error::Decode => f.write_str("invalid base64"),
            Error::FieldNotFound(name) => write!(f, "json field `{name}` not found"),
            Error::TrustAnchorMismatch => f.write_str("signing key not issued by the root key"),
            Error::SignatureVerification(level) => {
                write!(f, "{level} signature verification failed")
            }
            Error::ContentDigestMismatch => f.write_str("manifest digest mismatch"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
