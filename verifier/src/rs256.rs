//! RS256 (RSASSA-PKCS1-v1_5 with SHA-256) verification over raw key bytes.
//!
//! The key arrives as big-endian modulus and exponent bytes taken straight
//! from a JWK or from the compiled anchor. The signature is opened with the
//! public exponent into the caller's scratch region, the type-1 padding is
//! removed, and the digest inside the `DigestInfo` is compared with a fresh
//! SHA-256 of the signed content.

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};

use crate::arena::{CALCULATION_SCRATCH_SIZE, RSA3072_SIZE};
use crate::digest::{sha256_into, SHA256_SIZE};
use crate::{Error, Level, Result};

/// DER prefix of a SHA-256 `DigestInfo`; the digest follows it.
const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Offset of the digest inside the unpadded block.
pub const PKCS7_PAYLOAD_OFFSET: usize = SHA256_DIGEST_INFO.len();

const MIN_PADDING_LEN: usize = 8;

/// Raw RSA public key: big-endian modulus and exponent, leading zeros allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey<'k> {
    pub n: &'k [u8],
    pub e: &'k [u8],
}

/// Verifies `signature` over `signed` with `key`.
///
/// `scratch` must hold at least [`CALCULATION_SCRATCH_SIZE`] bytes: the
/// opened block goes into the first [`RSA3072_SIZE`] and the digest of
/// `signed` into the next [`SHA256_SIZE`]. Keys larger than 3072 bits do not
/// fit and are reported as [`Error::BufferCapacity`].
///
/// Every other failure maps to [`Error::SignatureVerification`] for `level`.
pub fn verify_rs256(
    signed: &[u8],
    signature: &[u8],
    key: PublicKey<'_>,
    scratch: &mut [u8],
    level: Level,
) -> Result<()> {
    if scratch.len() < CALCULATION_SCRATCH_SIZE {
        log::error!("[JWS] rsa scratch too small: {}", scratch.len());
        return Err(Error::BufferCapacity);
    }
    let (block_region, digest_region) = scratch.split_at_mut(RSA3072_SIZE);
    let rejected = Error::SignatureVerification(level);

    let rsa_key = RsaPublicKey::new(BigUint::from_bytes_be(key.n), BigUint::from_bytes_be(key.e))
        .map_err(|err| {
            log::error!("[JWS] {level} key rejected: {err}");
            rejected
        })?;

    let k = rsa_key.size();
    if k > RSA3072_SIZE {
        log::error!("[JWS] {level} key is {k} bytes, at most {RSA3072_SIZE} supported");
        return Err(Error::BufferCapacity);
    }
    if signature.len() != k {
        log::error!(
            "[JWS] {level} signature is {} bytes, key is {k}",
            signature.len()
        );
        return Err(rejected);
    }

    let s = BigUint::from_bytes_be(signature);
    if &s >= rsa_key.n() {
        log::error!("[JWS] {level} signature out of range");
        return Err(rejected);
    }
    let opened = s.modpow(rsa_key.e(), rsa_key.n()).to_bytes_be();

    // m < n, so the block always fits in k bytes.
    let block = &mut block_region[..k];
    let pad = k - opened.len();
    block[..pad].fill(0);
    block[pad..].copy_from_slice(&opened);

    let Some(digest_info) = strip_type1_padding(block) else {
        log::error!("[JWS] {level} signature padding invalid");
        return Err(rejected);
    };
    let Some(claimed) = digest_info
        .strip_prefix(&SHA256_DIGEST_INFO)
        .filter(|digest| digest.len() == SHA256_SIZE)
    else {
        log::error!("[JWS] {level} signature does not carry a SHA-256 digest");
        return Err(rejected);
    };

    let computed = sha256_into(signed, digest_region)?;
    if claimed != computed {
        log::error!("[JWS] {level} signature does not match signed content");
        return Err(rejected);
    }

    log::debug!("[JWS] {level} signature verified");
    Ok(())
}

/// Removes `00 01 FF.. 00` and returns what follows.
fn strip_type1_padding(block: &[u8]) -> Option<&[u8]> {
    let rest = block.strip_prefix(&[0x00, 0x01])?;
    let fill = rest.iter().take_while(|b| **b == 0xFF).count();
    if fill < MIN_PADDING_LEN {
        return None;
    }
    rest[fill..].strip_prefix(&[0x00])
}
