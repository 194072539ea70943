//! Producing two-level manifest signatures.
//!
//! The device side only verifies. Host tools and tests use this module to
//! build chains the verifier accepts: a signing JWK signed by a root key,
//! embedded as `sjwk` in the header of a JWS over the manifest digest.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::arena::JWK_HEADER_SIZE;

/// The only algorithm the verifier accepts.
pub const RS256: &str = "RS256";

/// Longest key id whose signed-JWK header still fits the verifier's region.
pub const MAX_KID_LEN: usize = JWK_HEADER_SIZE - r#"{"alg":"RS256","kid":""}"#.len();

/// Errors while producing a chain.
#[derive(Debug)]
pub enum SignError {
    /// Key ids must be plain JSON strings without escapes.
    KeyId,
    /// The key id would overflow the verifier's signed-JWK header region.
    KeyIdTooLong { len: usize, max: usize },
    /// The RSA signer refused the key or message.
    Signature(rsa::signature::Error),
}

impl fmt::Display for SignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignError::KeyId => f.write_str("key id must not contain quotes, backslashes or control characters"),
            SignError::KeyIdTooLong { len, max } => {
                write!(f, "key id is {len} bytes, devices accept at most {max}")
            }
            SignError::Signature(err) => write!(f, "rsa signing failed: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignError {}

impl From<rsa::signature::Error> for SignError {
    fn from(err: rsa::signature::Error) -> Self {
        SignError::Signature(err)
    }
}

/// Signs `header_json` and `payload_json` as an RS256 compact JWS.
pub fn sign_compact(
    header_json: &str,
    payload_json: &str,
    key: &RsaPrivateKey,
) -> Result<String, SignError> {
    let mut out = String::new();
    URL_SAFE_NO_PAD.encode_string(header_json, &mut out);
    out.push('.');
    URL_SAFE_NO_PAD.encode_string(payload_json, &mut out);

    let signature = SigningKey::<Sha256>::new(key.clone()).try_sign(out.as_bytes())?;
    out.push('.');
    URL_SAFE_NO_PAD.encode_string(signature.to_bytes(), &mut out);
    Ok(out)
}

/// Publishes `signing` as a JWK signed by `root` under `root_kid`.
pub fn signed_jwk(
    signing: &RsaPublicKey,
    root: &RsaPrivateKey,
    root_kid: &str,
) -> Result<String, SignError> {
    if root_kid
        .chars()
        .any(|c| c == '"' || c == '\\' || c.is_control())
    {
        return Err(SignError::KeyId);
    }
    if root_kid.len() > MAX_KID_LEN {
        return Err(SignError::KeyIdTooLong {
            len: root_kid.len(),
            max: MAX_KID_LEN,
        });
    }

    let header = format!(r#"{{"alg":"{RS256}","kid":"{root_kid}"}}"#);
    let payload = format!(
        r#"{{"kty":"RSA","n":"{}","e":"{}","alg":"{RS256}"}}"#,
        URL_SAFE_NO_PAD.encode(signing.n().to_bytes_be()),
        URL_SAFE_NO_PAD.encode(signing.e().to_bytes_be()),
    );
    sign_compact(&header, &payload, root)
}

/// Outer header carrying the signed JWK.
pub fn manifest_header(sjwk: &str) -> String {
    format!(r#"{{"alg":"{RS256}","sjwk":"{sjwk}"}}"#)
}

/// Outer payload claiming the manifest digest (standard alphabet, padded).
pub fn manifest_payload(manifest: &[u8]) -> String {
    format!(r#"{{"sha256":"{}"}}"#, STANDARD.encode(Sha256::digest(manifest)))
}

/// Detached JWS over `manifest`, signed with `signing` and carrying `sjwk`.
pub fn sign_manifest(
    manifest: &[u8],
    signing: &RsaPrivateKey,
    sjwk: &str,
) -> Result<String, SignError> {
    sign_compact(&manifest_header(sjwk), &manifest_payload(manifest), signing)
}

/// Big-endian modulus and exponent of `public`, ready for a development anchor.
pub fn dev_anchor_parts(public: &RsaPublicKey) -> (Vec<u8>, Vec<u8>) {
    (public.n().to_bytes_be(), public.e().to_bytes_be())
}
