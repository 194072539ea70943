//! Base64 decoding into fixed destination regions.
//!
//! Segments arrive in either alphabet and with or without padding. Decoding
//! never allocates: output lands in a caller region and the decoded prefix of
//! that region is handed back.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::{DecodePaddingMode, Engine};
use base64::DecodeSliceError;

use crate::{Error, Result};

const INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, implied padding accepted.
pub const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, INDIFFERENT);

/// URL-safe alphabet, implied padding accepted.
pub const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, INDIFFERENT);

/// Rewrites the URL-safe characters of `segment` to the standard alphabet.
pub fn swap_url_alphabet(segment: &mut [u8]) {
    for byte in segment.iter_mut() {
        match *byte {
            b'-' => *byte = b'+',
            b'_' => *byte = b'/',
            _ => {}
        }
    }
}

/// Decodes a signature segment in place-normalized form.
///
/// The segment is rewritten to the standard alphabet first, so callers must
/// own it exclusively.
pub fn decode_signature<'d>(segment: &mut [u8], dst: &'d mut [u8]) -> Result<&'d [u8]> {
    swap_url_alphabet(segment);
    decode_with(&STANDARD_LENIENT, segment, dst)
}

/// Decodes a segment that must stay untouched (signed content, JSON values).
///
/// The alphabet is picked from the segment itself; mixing both alphabets is
/// invalid input.
pub fn decode_segment<'d>(segment: &[u8], dst: &'d mut [u8]) -> Result<&'d [u8]> {
    if segment.iter().any(|b| *b == b'-' || *b == b'_') {
        decode_with(&URL_SAFE_LENIENT, segment, dst)
    } else {
        decode_with(&STANDARD_LENIENT, segment, dst)
    }
}

fn decode_with<'d>(engine: &GeneralPurpose, segment: &[u8], dst: &'d mut [u8]) -> Result<&'d [u8]> {
    match engine.decode_slice(segment, dst) {
        Ok(len) => Ok(&dst[..len]),
        Err(DecodeSliceError::OutputSliceTooSmall) => {
            log::error!(
                "[JWS] decoded segment does not fit its region ({} encoded bytes, {} available)",
                segment.len(),
                dst.len()
            );
            Err(Error::BufferCapacity)
        }
        Err(DecodeSliceError::DecodeError(err)) => {
            log::error!("[JWS] base64 decode failed: {err}");
            Err(Error::Decode)
        }
    }
}
