//! Recursive length-prefixed encoding (RLP).
//!
//! # Format
//!
//! - A single byte below `0x80` is its own encoding
//! - Byte strings: `0x80 + len` for up to 55 bytes, otherwise `0xb7 + len_of_len`
//!   followed by the big-endian length
//! - Lists: same scheme with base `0xc0` / `0xf7`
//! - Scalars: minimal big-endian, zero is the empty string
//!
//! # Optional fields
//!
//! Absence is written as the empty string. Because zero also encodes as the
//! empty string, a present-but-zero optional scalar reads back as absent.
//! Fixed 32-byte optionals are present only when exactly 32 bytes are read.

pub mod decode;
pub mod encode;

pub use decode::{validate, validate_with_depth, RlpReader};
pub use encode::RlpWriter;

/// Offset added to a short string length.
pub const STRING_OFFSET: u8 = 0x80;
/// Offset added to a short list payload length.
pub const LIST_OFFSET: u8 = 0xc0;
/// Payloads at or above this length use the long form.
pub const SHORT_LIMIT: usize = 56;
/// Encoding of the empty byte string.
pub const EMPTY_STRING: u8 = STRING_OFFSET;
/// Encoding of the empty list.
pub const EMPTY_LIST: u8 = LIST_OFFSET;
/// Default bound on list nesting accepted by [`validate`].
pub const DEFAULT_MAX_DEPTH: usize = 16;
/// Largest nesting bound a [`crate::config::CodecConfig`] may request.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Number of bytes needed to write `len` big-endian without leading zeros.
pub(crate) fn be_len(len: usize) -> usize {
    let bits = usize::BITS - len.leading_zeros();
    bits.div_ceil(8) as usize
}

/// Width of the length prefix in front of a payload of `payload_len` bytes.
///
/// Applies to both strings and lists. Single bytes below `0x80` carry no
/// prefix; that case is handled by the writer, not here.
pub fn length_prefix_len(payload_len: usize) -> usize {
    if payload_len < SHORT_LIMIT {
        1
    } else {
        1 + be_len(payload_len)
    }
}

/// Total size of a list whose items encode to `payload_len` bytes.
pub fn encoded_list_len(payload_len: usize) -> usize {
    length_prefix_len(payload_len) + payload_len
}

/// Strips leading zero bytes, the minimal scalar form.
pub(crate) fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[first..]
}
