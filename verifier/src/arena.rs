//! Fixed scratch memory for one verification.
//!
//! Layout of the caller buffer (sizes in bytes):
//! - outer header: 1400
//! - outer payload: 60
//! - outer signature: 400
//! - inner header: 48
//! - inner payload: 700
//! - inner signature: 500
//! - signing key modulus: 384
//! - signing key exponent: 10
//! - computed manifest digest: 32
//! - claimed manifest digest: 32
//! - calculation scratch: 384 (decrypted block) + 32 (content digest)
//!
//! Region sizes follow the 3072-bit key class; smaller keys fit as well.

use crate::digest::SHA256_SIZE;
use crate::{Error, Result};

/// Modulus size of the largest supported key.
pub const RSA3072_SIZE: usize = 384;

pub const JWS_HEADER_SIZE: usize = 1400;
pub const JWS_PAYLOAD_SIZE: usize = 60;
pub const JWS_SIGNATURE_SIZE: usize = 400;
pub const JWK_HEADER_SIZE: usize = 48;
pub const JWK_PAYLOAD_SIZE: usize = 700;
pub const JWK_SIGNATURE_SIZE: usize = 500;
pub const SIGNING_KEY_N_SIZE: usize = RSA3072_SIZE;
pub const SIGNING_KEY_E_SIZE: usize = 10;

/// Scratch needed by one RSA check: the decrypted block and a digest.
pub const CALCULATION_SCRATCH_SIZE: usize = RSA3072_SIZE + SHA256_SIZE;

/// Smallest buffer accepted by [`ScratchArena::carve`].
pub const SCRATCH_BUFFER_SIZE: usize = JWS_HEADER_SIZE
    + JWS_PAYLOAD_SIZE
    + JWS_SIGNATURE_SIZE
    + JWK_HEADER_SIZE
    + JWK_PAYLOAD_SIZE
    + JWK_SIGNATURE_SIZE
    + SIGNING_KEY_N_SIZE
    + SIGNING_KEY_E_SIZE
    + SHA256_SIZE
    + SHA256_SIZE
    + CALCULATION_SCRATCH_SIZE;

/// Longest detached JWS whose segments can decode into the outer regions.
pub const MAX_JWS_LEN: usize = base64_len(JWS_HEADER_SIZE)
    + base64_len(JWS_PAYLOAD_SIZE)
    + base64_len(JWS_SIGNATURE_SIZE)
    + 2;

/// Largest manifest document accepted for hashing.
pub const MAX_MANIFEST_LEN: usize = 64 * 1024;

const fn base64_len(decoded: usize) -> usize {
    (decoded + 2) / 3 * 4
}

/// The caller buffer cut into disjoint named regions.
///
/// Regions come from successive `split_at_mut` calls, so they can never
/// overlap and none of them outlives the buffer.
#[derive(Debug)]
pub struct ScratchArena<'s> {
    pub outer_header: &'s mut [u8],
    pub outer_payload: &'s mut [u8],
    pub outer_signature: &'s mut [u8],
    pub inner_header: &'s mut [u8],
    pub inner_payload: &'s mut [u8],
    pub inner_signature: &'s mut [u8],
    pub key_modulus: &'s mut [u8],
    pub key_exponent: &'s mut [u8],
    pub manifest_digest: &'s mut [u8],
    pub claimed_digest: &'s mut [u8],
    pub calculation: &'s mut [u8],
}

impl<'s> ScratchArena<'s> {
    /// Carves `buf`; fails before touching it when it is too small.
    ///
    /// Bytes past [`SCRATCH_BUFFER_SIZE`] are left unused.
    pub fn carve(buf: &'s mut [u8]) -> Result<Self> {
        if buf.len() < SCRATCH_BUFFER_SIZE {
            log::error!(
                "[JWS] scratch buffer too small: {} < {}",
                buf.len(),
                SCRATCH_BUFFER_SIZE
            );
            return Err(Error::BufferCapacity);
        }

        let mut rest = buf;
        Ok(ScratchArena {
            outer_header: take(&mut rest, JWS_HEADER_SIZE),
            outer_payload: take(&mut rest, JWS_PAYLOAD_SIZE),
            outer_signature: take(&mut rest, JWS_SIGNATURE_SIZE),
            inner_header: take(&mut rest, JWK_HEADER_SIZE),
            inner_payload: take(&mut rest, JWK_PAYLOAD_SIZE),
            inner_signature: take(&mut rest, JWK_SIGNATURE_SIZE),
            key_modulus: take(&mut rest, SIGNING_KEY_N_SIZE),
            key_exponent: take(&mut rest, SIGNING_KEY_E_SIZE),
            manifest_digest: take(&mut rest, SHA256_SIZE),
            claimed_digest: take(&mut rest, SHA256_SIZE),
            calculation: take(&mut rest, CALCULATION_SCRATCH_SIZE),
        })
    }
}

fn take<'s>(rest: &mut &'s mut [u8], len: usize) -> &'s mut [u8] {
    let (head, tail) = core::mem::take(rest).split_at_mut(len);
    *rest = tail;
    head
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    fn ranges(arena: &ScratchArena<'_>) -> std::vec::Vec<(usize, usize)> {
        [
            &*arena.outer_header,
            &*arena.outer_payload,
            &*arena.outer_signature,
            &*arena.inner_header,
            &*arena.inner_payload,
            &*arena.inner_signature,
            &*arena.key_modulus,
            &*arena.key_exponent,
            &*arena.manifest_digest,
            &*arena.claimed_digest,
            &*arena.calculation,
        ]
        .iter()
        .map(|region| {
            let start = region.as_ptr() as usize;
            (start, start + region.len())
        })
        .collect()
    }

    #[test]
    fn published_size_matches_layout() {
        assert_eq!(SCRATCH_BUFFER_SIZE, 3_982);
        assert_eq!(MAX_JWS_LEN, 1_868 + 80 + 536 + 2);
    }

    #[test]
    fn carves_disjoint_regions_in_order() {
        let mut buf = vec![0u8; SCRATCH_BUFFER_SIZE];
        let base = buf.as_ptr() as usize;
        let arena = ScratchArena::carve(&mut buf).unwrap();
        let ranges = ranges(&arena);

        assert_eq!(ranges[0].0, base);
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        assert_eq!(ranges[10].1, base + SCRATCH_BUFFER_SIZE);
        assert_eq!(arena.calculation.len(), CALCULATION_SCRATCH_SIZE);
        assert_eq!(arena.key_modulus.len(), RSA3072_SIZE);
    }

    #[test]
    fn larger_buffers_leave_a_tail() {
        let mut buf = vec![0u8; SCRATCH_BUFFER_SIZE + 100];
        let arena = ScratchArena::carve(&mut buf).unwrap();
        assert_eq!(arena.calculation.len(), CALCULATION_SCRATCH_SIZE);
    }

    #[test]
    fn short_buffer_is_rejected_untouched() {
        let mut buf = vec![0x5Au8; SCRATCH_BUFFER_SIZE - 1];
        assert_eq!(ScratchArena::carve(&mut buf).unwrap_err(), Error::BufferCapacity);
        assert!(buf.iter().all(|b| *b == 0x5A));
        assert_eq!(ScratchArena::carve(&mut []).unwrap_err(), Error::BufferCapacity);
    }
}
