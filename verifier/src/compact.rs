//! Compact serialization splitter.
//!
//! Layout: `base64url(header) "." base64url(payload) "." base64url(signature)`.
//! The signed content is everything up to (but not including) the second
//! separator.

use crate::{Error, Result};

/// Byte offsets of the two separators inside a compact message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Separators {
    first: usize,
    second: usize,
}

impl Separators {
    fn locate(buf: &[u8]) -> Result<Self> {
        let mut first = None;
        let mut second = None;

        for (idx, byte) in buf.iter().enumerate() {
            if *byte != b'.' {
                continue;
            }
            if first.is_none() {
                first = Some(idx);
            } else if second.is_none() {
                second = Some(idx);
            } else {
                return Err(Error::StructuralFormat);
            }
        }

        match (first, second) {
            // The signature segment must not be empty.
            (Some(first), Some(second)) if second + 1 < buf.len() => Ok(Self { first, second }),
            _ => Err(Error::StructuralFormat),
        }
    }
}

/// Read-only view of a compact message.
#[derive(Debug, Clone, Copy)]
pub struct SignedMessage<'a> {
    pub header: &'a [u8],
    pub payload: &'a [u8],
    pub signature: &'a [u8],
    /// `header "." payload`, the bytes covered by the signature.
    pub signed: &'a [u8],
}

impl<'a> SignedMessage<'a> {
    /// Splits `buf` into its three segments without copying.
    pub fn split(buf: &'a [u8]) -> Result<Self> {
        let sep = Separators::locate(buf)?;
        Ok(SignedMessage {
            header: &buf[..sep.first],
            payload: &buf[sep.first + 1..sep.second],
            signature: &buf[sep.second + 1..],
            signed: &buf[..sep.second],
        })
    }
}

/// Compact message whose signature segment may be rewritten in place.
///
/// Header and payload stay shared: they are the signed content and must reach
/// the digest untouched.
#[derive(Debug)]
pub struct SignedMessageMut<'a> {
    pub header: &'a [u8],
    pub payload: &'a [u8],
    pub signature: &'a mut [u8],
    pub signed: &'a [u8],
}

impl<'a> SignedMessageMut<'a> {
    /// Splits `buf`, handing out the signature segment mutably.
    pub fn split(buf: &'a mut [u8]) -> Result<Self> {
        let sep = Separators::locate(buf)?;
        let (signed_and_dot, signature) = buf.split_at_mut(sep.second + 1);
        let signed_and_dot: &'a [u8] = signed_and_dot;
        let signed = &signed_and_dot[..sep.second];
        Ok(SignedMessageMut {
            header: &signed[..sep.first],
            payload: &signed[sep.first + 1..],
            signature,
            signed,
        })
    }
}
