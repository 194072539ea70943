//! Test vectors shared by the unit tests.
//!
//! `valid.jws` is a production detached signature over `valid_manifest.json`,
//! chained to the compiled-in root. `invalid_manifest.json` differs from the
//! signed manifest, and `wrong_sha.jws` carries an altered digest claim
//! without a matching signature. The PEM keys are throwaway test keys.

use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;

pub const VALID_MANIFEST: &[u8] = include_bytes!("../testdata/valid_manifest.json");
pub const INVALID_MANIFEST: &[u8] = include_bytes!("../testdata/invalid_manifest.json");
pub const VALID_JWS: &[u8] = include_bytes!("../testdata/valid.jws");
pub const WRONG_SHA_JWS: &[u8] = include_bytes!("../testdata/wrong_sha.jws");

const ROOT_PEM: &str = include_str!("../testdata/root_3072.pem");
const SIGNING_PEM: &str = include_str!("../testdata/signing_2048.pem");
const ROGUE_PEM: &str = include_str!("../testdata/rogue_3072.pem");

/// Kid used for chains produced with the test root.
pub const TEST_ROOT_KID: &str = "TEST.200702.R";

fn load(pem: &str) -> RsaPrivateKey {
    RsaPrivateKey::from_pkcs8_pem(pem).expect("fixture key parses")
}

/// 3072-bit root key.
pub fn root_private_key() -> RsaPrivateKey {
    load(ROOT_PEM)
}

/// 2048-bit signing key.
pub fn signing_private_key() -> RsaPrivateKey {
    load(SIGNING_PEM)
}

/// 3072-bit key unrelated to the test root.
pub fn rogue_private_key() -> RsaPrivateKey {
    load(ROGUE_PEM)
}

/// Mutable copy of a JWS; verification rewrites it in place.
pub fn jws_buf(jws: &[u8]) -> Vec<u8> {
    jws.to_vec()
}

/// Zeroed scratch of exactly the published size.
pub fn arena() -> Vec<u8> {
    vec![0u8; crate::SCRATCH_BUFFER_SIZE]
}
