//! SHA-256 into caller-provided regions.

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Length of a SHA-256 digest.
pub const SHA256_SIZE: usize = 32;

/// Hashes `input` into the first [`SHA256_SIZE`] bytes of `dst`.
///
/// A short `dst` is a caller bug; it is reported instead of panicking.
pub fn sha256_into<'d>(input: &[u8], dst: &'d mut [u8]) -> Result<&'d [u8; SHA256_SIZE]> {
    let out: &'d mut [u8; SHA256_SIZE] = dst
        .get_mut(..SHA256_SIZE)
        .and_then(|region| region.try_into().ok())
        .ok_or(Error::BufferCapacity)?;
    out.copy_from_slice(&Sha256::digest(input));
    Ok(out)
}
