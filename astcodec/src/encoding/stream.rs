//! Raw byte-stream primitives.
//!
//! [`ByteSink`] is the append-only buffer used while encoding and
//! [`ByteSource`] the read cursor used while decoding. Neither knows about
//! tags; they only move bytes and fixed-width little-endian integers.

use crate::utils::error::{CodecError, CodecResult};

/// Growable, append-only output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteSink {
    bytes: Vec<u8>,
}

impl ByteSink {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    #[inline]
    pub fn write_u32_le(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64_le(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }
}

/// Read cursor over an immutable byte slice.
///
/// Every read is bounds-checked: running past the end yields
/// [`CodecError::MalformedInput`] carrying the offset of the failed read.
#[derive(Debug, Clone)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn truncated(&self, wanted: usize) -> CodecError {
        CodecError::malformed(
            self.position,
            format!(
                "unexpected end of input (wanted {} byte(s), {} left)",
                wanted,
                self.remaining()
            ),
        )
    }

    #[inline]
    pub fn peek_byte(&self) -> CodecResult<u8> {
        self.bytes
            .get(self.position)
            .copied()
            .ok_or_else(|| self.truncated(1))
    }

    #[inline]
    pub fn read_byte(&mut self) -> CodecResult<u8> {
        let byte = self.peek_byte()?;
        self.position += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.truncated(len));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.bytes[start..self.position])
    }

    /// Move the cursor to an offset of the input, e.g. back to a value
    /// that was skipped earlier.
    pub fn seek(&mut self, position: usize) -> CodecResult<()> {
        if position > self.bytes.len() {
            return Err(CodecError::malformed(
                self.position,
                format!("offset {position} is past the end of the input"),
            ));
        }
        self.position = position;
        Ok(())
    }

    pub fn skip_bytes(&mut self, len: usize) -> CodecResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_u32_le(&mut self) -> CodecResult<u32> {
        let bytes = self.read_bytes(4)?;
        let mut raw = [0u8; 4];
        raw.copy_from_slice(bytes);
        Ok(u32::from_le_bytes(raw))
    }

    pub fn read_u64_le(&mut self) -> CodecResult<u64> {
        let bytes = self.read_bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_integers_are_little_endian() {
        let mut sink = ByteSink::new();
        sink.write_u32_le(0x0403_0201);
        sink.write_u64_le(0x0807_0605_0403_0201);
        assert_eq!(
            sink.as_slice(),
            &[1, 2, 3, 4, 1, 2, 3, 4, 5, 6, 7, 8][..]
        );

        let bytes = sink.into_vec();
        let mut source = ByteSource::new(&bytes);
        assert_eq!(source.read_u32_le().unwrap(), 0x0403_0201);
        assert_eq!(source.read_u64_le().unwrap(), 0x0807_0605_0403_0201);
        assert!(source.is_empty());
    }

    #[test]
    fn reading_past_the_end_reports_offset() {
        let bytes = [1u8, 2, 3];
        let mut source = ByteSource::new(&bytes);
        source.read_byte().unwrap();
        match source.read_u32_le() {
            Err(CodecError::MalformedInput { offset, .. }) => assert_eq!(offset, 1),
            other => panic!("expected malformed input, got {other:?}"),
        }
        // A failed read does not move the cursor
        assert_eq!(source.position(), 1);
        assert_eq!(source.read_bytes(2).unwrap(), &[2, 3]);
        assert!(source.peek_byte().is_err());
    }

    #[test]
    fn seek_rewinds_within_the_input() {
        let bytes = [1u8, 2, 3];
        let mut source = ByteSource::new(&bytes);
        source.read_bytes(3).unwrap();
        source.seek(1).unwrap();
        assert_eq!(source.read_byte().unwrap(), 2);
        assert!(source.seek(4).is_err());
        assert_eq!(source.position(), 2);
    }
}
