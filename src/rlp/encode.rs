//! RLP writer.

use super::{be_len, trim_leading_zeros, LIST_OFFSET, SHORT_LIMIT, STRING_OFFSET};
use primitive_types::U256;

/// Append-only RLP writer.
///
/// Lists are opened and closed through [`RlpWriter::write_list`], so a writer
/// can never be left with an unbalanced list. The list prefix is inserted
/// once the list's payload length is known.
#[derive(Debug, Default)]
pub struct RlpWriter {
    buf: Vec<u8>,
}

impl RlpWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Runs `f` against a fresh writer and returns the bytes it produced.
    pub fn encode<F: FnOnce(&mut RlpWriter)>(f: F) -> Vec<u8> {
        let mut writer = RlpWriter::new();
        f(&mut writer);
        writer.finish()
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a list whose items are produced by `f`.
    pub fn write_list<F: FnOnce(&mut RlpWriter)>(&mut self, f: F) {
        let start = self.buf.len();
        f(self);
        let payload_len = self.buf.len() - start;
        let header = length_header(LIST_OFFSET, payload_len);
        self.buf.splice(start..start, header);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
            self.buf.push(bytes[0]);
            return;
        }
        let header = length_header(STRING_OFFSET, bytes.len());
        self.buf.extend_from_slice(&header);
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_empty(&mut self) {
        self.buf.push(STRING_OFFSET);
    }

    pub fn write_u64_scalar(&mut self, value: u64) {
        let bytes = value.to_be_bytes();
        self.write_bytes(trim_leading_zeros(&bytes));
    }

    pub fn write_u256_scalar(&mut self, value: &U256) {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        self.write_bytes(trim_leading_zeros(&bytes));
    }

    /// Writes all eight bytes of `value`, keeping leading zeros.
    pub fn write_fixed_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u64_scalar(u64::from(value));
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_bytes(value.as_bytes());
    }

    /// Appends an item that is already RLP encoded.
    pub fn write_raw(&mut self, encoded: &[u8]) {
        self.buf.extend_from_slice(encoded);
    }

    pub fn write_optional_bytes(&mut self, value: Option<&[u8]>) {
        match value {
            Some(bytes) => self.write_bytes(bytes),
            None => self.write_empty(),
        }
    }

    pub fn write_optional_u64(&mut self, value: Option<u64>) {
        match value {
            Some(v) => self.write_u64_scalar(v),
            None => self.write_empty(),
        }
    }

    pub fn write_optional_u256(&mut self, value: Option<&U256>) {
        match value {
            Some(v) => self.write_u256_scalar(v),
            None => self.write_empty(),
        }
    }

    pub fn write_optional_string(&mut self, value: Option<&str>) {
        self.write_optional_bytes(value.map(str::as_bytes));
    }

    pub fn write_optional_raw(&mut self, encoded: Option<&[u8]>) {
        match encoded {
            Some(bytes) => self.write_raw(bytes),
            None => self.write_empty(),
        }
    }
}

/// Builds the prefix for a string or list of `len` payload bytes.
fn length_header(offset: u8, len: usize) -> Vec<u8> {
    if len < SHORT_LIMIT {
        return vec![offset + len as u8];
    }
    let width = be_len(len);
    let mut header = Vec::with_capacity(1 + width);
    // long form markers sit 55 above the short-form offset
    header.push(offset + 55 + width as u8);
    header.extend_from_slice(&len.to_be_bytes()[std::mem::size_of::<usize>() - width..]);
    header
}
