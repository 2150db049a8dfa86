//! RLP reader with strict canonical-form checks.

use super::{DEFAULT_MAX_DEPTH, LIST_OFFSET, SHORT_LIMIT, STRING_OFFSET};
use crate::error::DecodeError;
use primitive_types::U256;

/// Location of one item inside a buffer.
#[derive(Debug, Clone, Copy)]
struct ItemHeader {
    is_list: bool,
    header_len: usize,
    payload_len: usize,
}

impl ItemHeader {
    fn total_len(&self) -> usize {
        self.header_len + self.payload_len
    }
}

/// Parses the item starting at `pos`, which must end at or before `limit`.
fn parse_header(data: &[u8], pos: usize, limit: usize) -> Result<ItemHeader, DecodeError> {
    if pos >= limit {
        return Err(DecodeError::UnexpectedEof(pos));
    }
    let prefix = data[pos];

    let header = match prefix {
        0x00..=0x7f => ItemHeader {
            is_list: false,
            header_len: 0,
            payload_len: 1,
        },
        0x80..=0xb7 => {
            let len = (prefix - STRING_OFFSET) as usize;
            if len == 1 {
                let byte = *data.get(pos + 1).ok_or(DecodeError::UnexpectedEof(pos + 1))?;
                if byte < STRING_OFFSET {
                    return Err(DecodeError::NonCanonical(pos));
                }
            }
            ItemHeader {
                is_list: false,
                header_len: 1,
                payload_len: len,
            }
        }
        0xb8..=0xbf => {
            let width = (prefix - 0xb7) as usize;
            ItemHeader {
                is_list: false,
                header_len: 1 + width,
                payload_len: read_long_length(data, pos, width, limit)?,
            }
        }
        0xc0..=0xf7 => ItemHeader {
            is_list: true,
            header_len: 1,
            payload_len: (prefix - LIST_OFFSET) as usize,
        },
        0xf8..=0xff => {
            let width = (prefix - 0xf7) as usize;
            ItemHeader {
                is_list: true,
                header_len: 1 + width,
                payload_len: read_long_length(data, pos, width, limit)?,
            }
        }
    };

    let end = pos
        .checked_add(header.total_len())
        .ok_or(DecodeError::LengthOverflow(pos))?;
    if end > limit {
        return Err(DecodeError::UnexpectedEof(limit));
    }
    Ok(header)
}

/// Reads a long-form length of `width` bytes following the prefix at `pos`.
fn read_long_length(
    data: &[u8],
    pos: usize,
    width: usize,
    limit: usize,
) -> Result<usize, DecodeError> {
    if width > std::mem::size_of::<usize>() {
        return Err(DecodeError::LengthOverflow(pos));
    }
    let start = pos + 1;
    let end = start + width;
    if end > limit {
        return Err(DecodeError::UnexpectedEof(limit));
    }
    let bytes = &data[start..end];
    if bytes[0] == 0 {
        return Err(DecodeError::NonCanonical(pos));
    }
    let len = bytes.iter().fold(0usize, |acc, b| (acc << 8) | *b as usize);
    if len < SHORT_LIMIT {
        return Err(DecodeError::NonCanonical(pos));
    }
    Ok(len)
}

/// Checks that `data` is exactly one well-formed item, walking every nested list.
pub fn validate(data: &[u8]) -> Result<(), DecodeError> {
    validate_with_depth(data, DEFAULT_MAX_DEPTH)
}

/// Like [`validate`] with an explicit nesting bound. The outermost list is level 1.
pub fn validate_with_depth(data: &[u8], max_depth: usize) -> Result<(), DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::Empty);
    }
    let header = parse_header(data, 0, data.len())?;
    let end = header.total_len();
    if end != data.len() {
        return Err(DecodeError::TrailingBytes(data.len() - end));
    }
    if !header.is_list {
        return Ok(());
    }

    // end offsets of the lists currently open, innermost last
    let mut list_ends = vec![end];
    if list_ends.len() > max_depth {
        return Err(DecodeError::TooDeep(max_depth));
    }
    let mut pos = header.header_len;
    while let Some(&list_end) = list_ends.last() {
        if pos == list_end {
            list_ends.pop();
            continue;
        }
        let item = parse_header(data, pos, list_end)?;
        if item.is_list {
            list_ends.push(pos + item.total_len());
            if list_ends.len() > max_depth {
                return Err(DecodeError::TooDeep(max_depth));
            }
            pos += item.header_len;
        } else {
            pos += item.total_len();
        }
    }
    Ok(())
}

/// Cursor over an RLP buffer.
///
/// The reader trusts structure only as far as it checks it: call [`validate`]
/// first when the whole buffer should be rejected before any field is read.
#[derive(Debug)]
pub struct RlpReader<'a> {
    data: &'a [u8],
    pos: usize,
    list_ends: Vec<usize>,
}

impl<'a> RlpReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            list_ends: Vec::new(),
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn limit(&self) -> usize {
        self.list_ends.last().copied().unwrap_or(self.data.len())
    }

    fn next_header(&self) -> Result<ItemHeader, DecodeError> {
        parse_header(self.data, self.pos, self.limit())
    }

    /// True once every item of the innermost open list (or the buffer) is read.
    pub fn is_end_of_list(&self) -> bool {
        self.pos >= self.limit()
    }

    pub fn next_is_list(&self) -> Result<bool, DecodeError> {
        Ok(self.next_header()?.is_list)
    }

    /// Returns true if the next item is the empty byte string.
    pub fn next_is_empty(&self) -> bool {
        self.pos < self.limit() && self.data[self.pos] == STRING_OFFSET
    }

    /// Enters the list at the cursor and returns how many items it holds.
    pub fn enter_list(&mut self) -> Result<usize, DecodeError> {
        let header = self.next_header()?;
        if !header.is_list {
            return Err(DecodeError::ExpectedList(self.pos));
        }
        let start = self.pos + header.header_len;
        let end = start + header.payload_len;

        let mut count = 0;
        let mut cursor = start;
        while cursor < end {
            cursor += parse_header(self.data, cursor, end)?.total_len();
            count += 1;
        }

        self.pos = start;
        self.list_ends.push(end);
        Ok(count)
    }

    /// Leaves the innermost list; fails if any of its items were not read.
    pub fn leave_list(&mut self) -> Result<(), DecodeError> {
        let end = self.list_ends.pop().ok_or(DecodeError::NotInList)?;
        if self.pos != end {
            return Err(DecodeError::UnconsumedItems(end));
        }
        Ok(())
    }

    /// Advances past the next item without looking at its contents.
    pub fn skip_next(&mut self) -> Result<(), DecodeError> {
        let header = self.next_header()?;
        self.pos += header.total_len();
        Ok(())
    }

    /// Returns the next item verbatim, prefix included.
    pub fn read_raw(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.next_header()?;
        let start = self.pos;
        self.pos += header.total_len();
        Ok(&self.data[start..self.pos])
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let header = self.next_header()?;
        if header.is_list {
            return Err(DecodeError::ExpectedBytes(self.pos));
        }
        let start = self.pos + header.header_len;
        self.pos = start + header.payload_len;
        Ok(&self.data[start..self.pos])
    }

    fn read_scalar_bytes(&mut self, max_len: usize, target: &'static str) -> Result<&'a [u8], DecodeError> {
        let offset = self.pos;
        let bytes = self.read_bytes()?;
        if bytes.len() > max_len {
            return Err(DecodeError::ScalarOverflow { offset, target });
        }
        if bytes.first() == Some(&0) {
            return Err(DecodeError::LeadingZero { offset });
        }
        Ok(bytes)
    }

    pub fn read_u64_scalar(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.read_scalar_bytes(8, "u64")?;
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
    }

    pub fn read_u32_scalar(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_scalar_bytes(4, "u32")?;
        Ok(bytes.iter().fold(0u32, |acc, b| (acc << 8) | *b as u32))
    }

    pub fn read_u256_scalar(&mut self) -> Result<U256, DecodeError> {
        let bytes = self.read_scalar_bytes(32, "u256")?;
        Ok(U256::from_big_endian(bytes))
    }

    /// Reads an eight-byte big-endian integer written by `write_fixed_u64`.
    pub fn read_fixed_u64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        let bytes = self.read_exact::<8>(field)?;
        Ok(u64::from_be_bytes(bytes))
    }

    pub fn read_bool(&mut self, field: &'static str) -> Result<bool, DecodeError> {
        match self.read_u64_scalar()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(DecodeError::InvalidFlag { field, value }),
        }
    }

    /// Reads a byte string that must be exactly `N` bytes long.
    pub fn read_exact<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes()?;
        bytes.try_into().map_err(|_| DecodeError::InvalidLength {
            field,
            expected: N,
            actual: bytes.len(),
        })
    }

    pub fn read_bytes32(&mut self, field: &'static str) -> Result<[u8; 32], DecodeError> {
        self.read_exact::<32>(field)
    }

    pub fn read_string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8(field))
    }

    pub fn read_optional_bytes(&mut self) -> Result<Option<&'a [u8]>, DecodeError> {
        let bytes = self.read_bytes()?;
        Ok(if bytes.is_empty() { None } else { Some(bytes) })
    }

    pub fn read_optional_u64(&mut self) -> Result<Option<u64>, DecodeError> {
        if self.next_is_empty() {
            self.pos += 1;
            return Ok(None);
        }
        self.read_u64_scalar().map(Some)
    }

    pub fn read_optional_u256(&mut self) -> Result<Option<U256>, DecodeError> {
        if self.next_is_empty() {
            self.pos += 1;
            return Ok(None);
        }
        self.read_u256_scalar().map(Some)
    }

    /// Present only when exactly 32 bytes follow; any other length reads as absent.
    pub fn read_optional_bytes32(&mut self) -> Result<Option<[u8; 32]>, DecodeError> {
        let bytes = self.read_bytes()?;
        Ok(bytes.try_into().ok())
    }

    pub fn read_optional_string(&mut self, field: &'static str) -> Result<Option<String>, DecodeError> {
        match self.read_optional_bytes()? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| DecodeError::InvalidUtf8(field)),
            None => Ok(None),
        }
    }

    /// Reads a nested item verbatim, or `None` if the empty string stands in for it.
    pub fn read_optional_raw(&mut self) -> Result<Option<&'a [u8]>, DecodeError> {
        if self.next_is_empty() {
            self.pos += 1;
            return Ok(None);
        }
        self.read_raw().map(Some)
    }
}
