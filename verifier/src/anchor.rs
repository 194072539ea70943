//! Compiled-in trust anchor.

use crate::rs256::PublicKey;

/// A root RSA public key, identified by its key id.
///
/// `n` and `e` are big-endian and may carry leading zero bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootKey<'k> {
    pub kid: &'k [u8],
    pub n: &'k [u8],
    pub e: &'k [u8],
}

impl<'k> RootKey<'k> {
    pub fn public(&self) -> PublicKey<'k> {
        PublicKey {
            n: self.n,
            e: self.e,
        }
    }
}

/// Production root key `ADU.200702.R` (3072-bit, issued 2020-07-02).
pub const ADU_ROOT_KEY: RootKey<'static> = RootKey {
    kid: b"ADU.200702.R",
    n: &ADU_ROOT_KEY_N,
    e: &[0x01, 0x00, 0x01],
};

const ADU_ROOT_KEY_N: [u8; 385] = [
    0x00, 0xd5, 0x42, 0x2e, 0xaf, 0x11, 0x54, 0xa3, 0x50, 0x65, 0x87, 0xa2,
    0x4d, 0x5b, 0xba, 0x1a, 0xfb, 0xa9, 0x32, 0xdf, 0xe9, 0x99, 0x5f, 0x05,
    0x45, 0xc8, 0xaf, 0xbd, 0x35, 0x1d, 0x89, 0xe8, 0x27, 0x27, 0x58, 0xa3,
    0xa8, 0xee, 0xc5, 0xc5, 0x1e, 0x4f, 0xf7, 0x92, 0xa6, 0x12, 0x06, 0x7d,
    0x3d, 0x7d, 0xb0, 0x07, 0xf6, 0x2c, 0x7f, 0xde, 0x6d, 0x2a, 0xf5, 0xbc,
    0x49, 0xbc, 0x15, 0xef, 0xf0, 0x81, 0xcb, 0x3f, 0x88, 0x4f, 0x27, 0x1d,
    0x88, 0x71, 0x28, 0x60, 0x08, 0xb6, 0x19, 0xd2, 0xd2, 0x39, 0xd0, 0x05,
    0x1f, 0x3c, 0x76, 0x86, 0x71, 0xbb, 0x59, 0x58, 0xbc, 0xb1, 0x88, 0x7b,
    0xab, 0x56, 0x28, 0xbf, 0x31, 0x73, 0x44, 0x32, 0x10, 0xfd, 0x3d, 0xd3,
    0x96, 0x5c, 0xff, 0x4e, 0x5c, 0xb3, 0x6b, 0xff, 0x8b, 0x84, 0x9b, 0x8b,
    0x80, 0xb8, 0x49, 0xd0, 0x7d, 0xfa, 0xd6, 0x40, 0x58, 0x76, 0x4d, 0xc0,
    0x72, 0x27, 0x75, 0xcb, 0x9a, 0x2f, 0x9b, 0xb4, 0x9f, 0x0f, 0x25, 0xf1,
    0x1c, 0xc5, 0x1b, 0x0b, 0x5a, 0x30, 0x7d, 0x2f, 0xb8, 0xef, 0xa7, 0x26,
    0x58, 0x53, 0xaf, 0xd5, 0x1d, 0x55, 0x01, 0x51, 0x0d, 0xe9, 0x1b, 0xa2,
    0x0f, 0x3f, 0xd7, 0xe9, 0x1d, 0x20, 0x41, 0xa6, 0xe6, 0x14, 0x0a, 0xae,
    0xfe, 0xf2, 0x1c, 0x2a, 0xd6, 0xe4, 0x04, 0x7b, 0xf6, 0x14, 0x7e, 0xec,
    0x0f, 0x97, 0x83, 0xfa, 0x58, 0xfa, 0x81, 0x36, 0x21, 0xb9, 0xa3, 0x2b,
    0xfa, 0xd9, 0x61, 0x0b, 0x1a, 0x94, 0xf7, 0xc1, 0xbe, 0x7f, 0x40, 0x14,
    0x4a, 0xc9, 0xfa, 0x35, 0x7f, 0xef, 0x66, 0x70, 0x00, 0xb1, 0xfd, 0xdb,
    0xd7, 0x61, 0x0d, 0x3b, 0x58, 0x74, 0x67, 0x94, 0x89, 0x75, 0x76, 0x96,
    0x7c, 0x91, 0x87, 0xd2, 0x8e, 0x11, 0x97, 0xee, 0x7b, 0x87, 0x6c, 0x9a,
    0x2f, 0x45, 0xd8, 0x65, 0x3f, 0x52, 0x70, 0x98, 0x2a, 0xcb, 0xc8, 0x04,
    0x63, 0xf5, 0xc9, 0x47, 0xcf, 0x70, 0xf4, 0xed, 0x64, 0xa7, 0x74, 0xa5,
    0x23, 0x8f, 0xb6, 0xed, 0xf7, 0x1c, 0xd3, 0xb0, 0x1c, 0x64, 0x57, 0x12,
    0x5a, 0xa9, 0x81, 0x84, 0x1f, 0xa0, 0xe7, 0x50, 0x19, 0x96, 0xb4, 0x82,
    0xb1, 0xac, 0x48, 0xe3, 0xe1, 0x32, 0x82, 0xcb, 0x40, 0x1f, 0xac, 0xc4,
    0x59, 0xbc, 0x10, 0x34, 0x51, 0x82, 0xf9, 0x28, 0x8d, 0xa8, 0x1e, 0x9b,
    0xf5, 0x79, 0x45, 0x75, 0xb2, 0xdc, 0x9a, 0x11, 0x43, 0x08, 0xbe, 0x61,
    0xcc, 0x9a, 0xc4, 0xcb, 0x77, 0x36, 0xff, 0x83, 0xdd, 0xa8, 0x71, 0x4f,
    0x51, 0x8e, 0x0e, 0x7b, 0x4d, 0xfa, 0x79, 0x98, 0x8d, 0xbe, 0xfc, 0x82,
    0x7e, 0x40, 0x48, 0xa9, 0x12, 0x01, 0xa8, 0xd9, 0x7e, 0xf3, 0xa5, 0x1b,
    0xf1, 0xfb, 0x90, 0x77, 0x3e, 0x40, 0x87, 0x18, 0xc9, 0xab, 0xd9, 0xf7,
    0x79,
];

/// The root key every manifest chain must end at.
pub fn root_key() -> &'static RootKey<'static> {
    &ADU_ROOT_KEY
}
