//! Manifest chain verification.
//!
//! A detached manifest JWS carries its own signing key: the outer header has
//! an `sjwk` member holding a compact JWS whose payload is an RSA JWK and whose
//! signature comes from the root key. Verification walks that chain from the
//! root down and finally ties the outer payload to the manifest bytes through
//! their SHA-256 digest.

use core::ops::Range;

use crate::anchor::{root_key, RootKey};
use crate::arena::{ScratchArena, MAX_JWS_LEN, MAX_MANIFEST_LEN};
use crate::base64url::{decode_segment, decode_signature};
use crate::compact::SignedMessageMut;
use crate::digest::{sha256_into, SHA256_SIZE};
use crate::json::{find_fields, JsonReader};
use crate::rs256::{verify_rs256, PublicKey};
use crate::{Error, Level, Result};

const RS256: &[u8] = b"RS256";

/// Verifies manifests against one trust anchor.
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'k> {
    anchor: RootKey<'k>,
}

impl<'k> Verifier<'k> {
    pub const fn new(anchor: RootKey<'k>) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> &RootKey<'k> {
        &self.anchor
    }

    /// Authenticates `manifest` with its detached `jws`.
    ///
    /// `jws` is scratch as well as input: its signature segments are rewritten
    /// to the standard base64 alphabet. Verifying the same buffer again gives
    /// the same answer. `arena` must hold at least
    /// [`SCRATCH_BUFFER_SIZE`](crate::SCRATCH_BUFFER_SIZE) bytes; its contents
    /// are meaningless afterwards.
    ///
    /// Returns `Ok(())` only when every step of the chain passed.
    pub fn verify_manifest(&self, manifest: &[u8], jws: &mut [u8], arena: &mut [u8]) -> Result<()> {
        let ScratchArena {
            outer_header,
            outer_payload,
            outer_signature,
            inner_header,
            inner_payload,
            inner_signature,
            key_modulus,
            key_exponent,
            manifest_digest,
            claimed_digest,
            calculation,
        } = ScratchArena::carve(arena)?;

        if jws.len() > MAX_JWS_LEN {
            log::error!("[JWS] jws too long: {} > {MAX_JWS_LEN}", jws.len());
            return Err(Error::BufferCapacity);
        }
        if manifest.len() > MAX_MANIFEST_LEN {
            log::error!("[JWS] manifest too long: {} > {MAX_MANIFEST_LEN}", manifest.len());
            return Err(Error::BufferCapacity);
        }

        let outer = SignedMessageMut::split(jws).map_err(|err| {
            log::error!("[JWS] manifest jws is not in compact form");
            err
        })?;
        let header_len = decode_segment(outer.header, outer_header)?.len();
        let payload = decode_segment(outer.payload, outer_payload)?;
        let signature = decode_signature(outer.signature, outer_signature)?;
        let signed = outer.signed;
        log::debug!("[JWS] outer jws decoded ({header_len} byte header)");

        // The inner JWS is the `sjwk` string inside the decoded header; its
        // signature is normalized there, never in the caller's buffer.
        let sjwk = {
            let header = &outer_header[..header_len];
            let [sjwk] = find_fields(&mut JsonReader::new(header), ["sjwk"])?;
            span_within(header, sjwk).ok_or(Error::FieldNotFound("sjwk"))?
        };
        let inner = SignedMessageMut::split(&mut outer_header[sjwk]).map_err(|err| {
            log::error!("[JWS] sjwk is not in compact form");
            err
        })?;
        let jwk_header = decode_segment(inner.header, inner_header)?;
        let jwk_payload = decode_segment(inner.payload, inner_payload)?;
        let jwk_signature = decode_signature(inner.signature, inner_signature)?;
        let jwk_signed = inner.signed;

        let [kid] = find_fields(&mut JsonReader::new(jwk_header), ["kid"])?;
        if kid != self.anchor.kid {
            log::error!("[JWS] signing key issued by an unknown root key");
            return Err(Error::TrustAnchorMismatch);
        }

        let [n, e, alg] = find_fields(&mut JsonReader::new(jwk_payload), ["n", "e", "alg"])?;
        if alg != RS256 {
            log::error!("[JWS] signing key algorithm is not RS256");
            return Err(Error::SignatureVerification(Level::SigningKey));
        }
        let n = decode_segment(n, key_modulus)?;
        let e = decode_segment(e, key_exponent)?;

        verify_rs256(
            jwk_signed,
            jwk_signature,
            self.anchor.public(),
            calculation,
            Level::SigningKey,
        )?;
        let signing_key = PublicKey { n, e };
        verify_rs256(signed, signature, signing_key, calculation, Level::Manifest)?;

        let computed = sha256_into(manifest, manifest_digest)?;
        let [sha256] = find_fields(&mut JsonReader::new(payload), ["sha256"])?;
        let claimed = match decode_segment(sha256, claimed_digest) {
            Err(Error::BufferCapacity) => return Err(digest_mismatch()),
            other => other?,
        };
        if claimed.len() != SHA256_SIZE || claimed != computed {
            return Err(digest_mismatch());
        }

        log::info!("[JWS] manifest authenticated");
        Ok(())
    }
}

/// Verifies against the compiled-in production root key.
pub fn verify_manifest(manifest: &[u8], jws: &mut [u8], arena: &mut [u8]) -> Result<()> {
    Verifier::new(*root_key()).verify_manifest(manifest, jws, arena)
}

fn digest_mismatch() -> Error {
    log::error!("[JWS] manifest digest does not match the signed claim");
    Error::ContentDigestMismatch
}

/// Position of `inner` inside `outer`, if it is a subslice of it.
fn span_within(outer: &[u8], inner: &[u8]) -> Option<Range<usize>> {
    let start = (inner.as_ptr() as usize).checked_sub(outer.as_ptr() as usize)?;
    let end = start.checked_add(inner.len())?;
    (end <= outer.len()).then_some(start..end)
}


#[cfg(all(test, feature = "std", feature = "sign"))]
mod chain_tests {
    use rsa::RsaPrivateKey;

    use super::*;
    use crate::fixtures::{self, arena, jws_buf, TEST_ROOT_KID};
    use crate::sign::{
        dev_anchor_parts, manifest_header, sign_compact, sign_manifest, signed_jwk,
    };

    const MANIFEST: &[u8] = br#"{"manifestVersion":"4","updateId":{"provider":"Contoso","name":"Sensor","version":"2.0"}}"#;

    struct Chain {
        n: Vec<u8>,
        e: Vec<u8>,
        sjwk: String,
        signing: RsaPrivateKey,
    }

    impl Chain {
        fn issued_by(root: &RsaPrivateKey, kid: &str) -> Self {
            let signing = fixtures::signing_private_key();
            let sjwk = signed_jwk(&signing.to_public_key(), root, kid).unwrap();
            let (n, e) = dev_anchor_parts(&fixtures::root_private_key().to_public_key());
            Chain { n, e, sjwk, signing }
        }

        fn test_root() -> Self {
            Self::issued_by(&fixtures::root_private_key(), TEST_ROOT_KID)
        }

        fn verify(&self, manifest: &[u8], jws: &str) -> Result<()> {
            let anchor = RootKey { kid: TEST_ROOT_KID.as_bytes(), n: &self.n, e: &self.e };
            Verifier::new(anchor).verify_manifest(manifest, &mut jws_buf(jws.as_bytes()), &mut arena())
        }

        fn sign(&self, manifest: &[u8]) -> String {
            sign_manifest(manifest, &self.signing, &self.sjwk).unwrap()
        }
    }

    #[test]
    fn generated_chain_verifies() {
        let chain = Chain::test_root();
        chain.verify(MANIFEST, &chain.sign(MANIFEST)).unwrap();
    }

    #[test]
    fn any_manifest_byte_flip_is_a_digest_mismatch() {
        let chain = Chain::test_root();
        let jws = chain.sign(MANIFEST);
        for idx in [0, 7, MANIFEST.len() / 2, MANIFEST.len() - 1] {
            let mut manifest = MANIFEST.to_vec();
            manifest[idx] ^= 0x20;
            assert_eq!(chain.verify(&manifest, &jws).unwrap_err(), Error::ContentDigestMismatch);
        }
    }

    #[test]
    fn any_outer_signature_flip_fails_manifest_level() {
        let chain = Chain::test_root();
        let jws = chain.sign(MANIFEST);
        let sig_start = jws.rfind('.').unwrap() + 1;
        // The final character carries unused low bits; see the next test.
        for idx in [sig_start, sig_start + 10, jws.len() - 2] {
            let mut bytes = jws.clone().into_bytes();
            bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                chain.verify(MANIFEST, &tampered).unwrap_err(),
                Error::SignatureVerification(Level::Manifest)
            );
        }
    }

    #[test]
    fn nonzero_trailing_bits_in_signature_are_a_decode_error() {
        const URL_SAFE_ALPHABET: &[u8] =
            b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
        let chain = Chain::test_root();
        let mut bytes = chain.sign(MANIFEST).into_bytes();
        // A 2048-bit signature is 342 characters; the last one uses 2 of its 6 bits.
        let last = bytes.len() - 1;
        let value = URL_SAFE_ALPHABET.iter().position(|c| *c == bytes[last]).unwrap();
        assert_eq!(value & 0x0F, 0);
        bytes[last] = URL_SAFE_ALPHABET[value | 0x01];
        let tampered = String::from_utf8(bytes).unwrap();
        assert_eq!(chain.verify(MANIFEST, &tampered).unwrap_err(), Error::Decode);
    }

    #[test]
    fn unknown_kid_is_a_trust_anchor_mismatch() {
        let chain = Chain::issued_by(&fixtures::root_private_key(), "OTHER.1");
        assert_eq!(
            chain.verify(MANIFEST, &chain.sign(MANIFEST)).unwrap_err(),
            Error::TrustAnchorMismatch
        );
    }

    #[test]
    fn rogue_root_with_trusted_kid_fails_key_level() {
        let chain = Chain::issued_by(&fixtures::rogue_private_key(), TEST_ROOT_KID);
        assert_eq!(
            chain.verify(MANIFEST, &chain.sign(MANIFEST)).unwrap_err(),
            Error::SignatureVerification(Level::SigningKey)
        );
    }

    #[test]
    fn resigned_claim_passes_signatures_then_fails_digest() {
        let chain = Chain::test_root();
        let payload = r#"{"sha256":"AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="}"#;
        let jws = sign_compact(&manifest_header(&chain.sjwk), payload, &chain.signing).unwrap();
        assert_eq!(chain.verify(MANIFEST, &jws).unwrap_err(), Error::ContentDigestMismatch);
    }

    #[test]
    fn short_or_long_claims_are_digest_mismatches() {
        let chain = Chain::test_root();
        // 3 bytes, then 33 bytes: one more than the claim region holds.
        for claim in ["AAAA", "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA"] {
            let payload = format!(r#"{{"sha256":"{claim}"}}"#);
            let jws = sign_compact(&manifest_header(&chain.sjwk), &payload, &chain.signing).unwrap();
            assert_eq!(chain.verify(MANIFEST, &jws).unwrap_err(), Error::ContentDigestMismatch);
        }
    }

    #[test]
    fn missing_members_are_reported_by_name() {
        let chain = Chain::test_root();

        let no_sjwk = sign_compact(r#"{"alg":"RS256"}"#, "{}", &chain.signing).unwrap();
        assert_eq!(chain.verify(MANIFEST, &no_sjwk).unwrap_err(), Error::FieldNotFound("sjwk"));

        let no_claim = sign_compact(&manifest_header(&chain.sjwk), r#"{"sha":"x"}"#, &chain.signing).unwrap();
        assert_eq!(chain.verify(MANIFEST, &no_claim).unwrap_err(), Error::FieldNotFound("sha256"));
    }

    #[test]
    fn non_rs256_signing_key_is_rejected() {
        let root = fixtures::root_private_key();
        let chain = Chain::test_root();
        let header = format!(r#"{{"alg":"RS256","kid":"{TEST_ROOT_KID}"}}"#);
        let payload = r#"{"kty":"RSA","n":"AQAB","e":"AQAB","alg":"PS256"}"#;
        let sjwk = sign_compact(&header, payload, &root).unwrap();
        let jws = sign_manifest(MANIFEST, &chain.signing, &sjwk).unwrap();
        assert_eq!(
            chain.verify(MANIFEST, &jws).unwrap_err(),
            Error::SignatureVerification(Level::SigningKey)
        );
    }
}
