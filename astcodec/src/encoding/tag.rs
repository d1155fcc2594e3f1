//! Tag bytes and the scalar encodings built on top of them.
//!
//! Every encoded value starts with a tag byte. Bytes below [`END`] stand for
//! themselves (small unsigned integers); the remaining values form the whole
//! structural vocabulary of the format:
//!
//! | byte       | tag          | followed by                          |
//! |------------|--------------|--------------------------------------|
//! | `0..=239`  | small int    | nothing                              |
//! | `240`      | [`END`]      | nothing                              |
//! | `241`      | [`START`]    | `(field, value)*` then `END`         |
//! | `242`      | [`REF`]      | uint index                           |
//! | `243`      | [`N_VALUES`] | uint count, then `count` values      |
//! | `244`      | [`N_BYTES`]  | uint length, then `length` raw bytes |
//! | `245..=254`| reserved     | never valid                          |
//! | `255`      | [`NIL`]      | nothing                              |
//!
//! Unsigned integers that do not fit below [`END`] reuse the `N_BYTES` form
//! with a length of exactly 4 or 8 little-endian bytes.

use crate::{
    encoding::{
        integer::{zigzag_decode, zigzag_encode},
        stream::{ByteSink, ByteSource},
    },
    utils::error::{CodecError, CodecResult},
};

/// Absent value (nil handle, absent list).
pub const NIL: u8 = 255;
/// Raw bytes: uint length then the bytes.
pub const N_BYTES: u8 = 244;
/// Sequence: uint count then the values.
pub const N_VALUES: u8 = 243;
/// Back-reference to an already started composite value.
pub const REF: u8 = 242;
/// Beginning of a composite value's field stream.
pub const START: u8 = 241;
/// End of a composite value's field stream.
pub const END: u8 = 240;

/// Human readable name of a tag byte, used in error messages.
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        NIL => "NIL",
        N_BYTES => "N_BYTES",
        N_VALUES => "N_VALUES",
        REF => "REF",
        START => "START",
        END => "END",
        t if t < END => "small integer",
        _ => "reserved",
    }
}

impl ByteSink {
    /// Write an unsigned integer using the narrowest of the three widths.
    pub fn put_uint(&mut self, value: u64) {
        if value < END as u64 {
            self.write_byte(value as u8);
        } else if value <= u32::MAX as u64 {
            self.write_byte(N_BYTES);
            self.write_byte(4);
            self.write_u32_le(value as u32);
        } else {
            self.write_byte(N_BYTES);
            self.write_byte(8);
            self.write_u64_le(value);
        }
    }

    #[inline]
    pub fn put_int(&mut self, value: i64) {
        self.put_uint(zigzag_encode(value));
    }

    #[inline]
    pub fn put_bool(&mut self, value: bool) {
        self.write_byte(value as u8);
    }

    #[inline]
    pub fn put_float(&mut self, value: f64) {
        self.put_uint(value.to_bits());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.write_byte(N_BYTES);
        self.put_uint(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    #[inline]
    pub fn put_str(&mut self, value: &str) {
        self.put_bytes(value.as_bytes());
    }
}

impl<'a> ByteSource<'a> {
    pub(crate) fn bad_tag(&self, tag: u8, expected: &str) -> CodecError {
        CodecError::malformed(
            self.position().saturating_sub(1),
            format!("expected {}, found {} tag {}", expected, tag_name(tag), tag),
        )
    }

    pub fn take_uint(&mut self) -> CodecResult<u64> {
        let tag = self.read_byte()?;
        if tag < END {
            return Ok(tag as u64);
        }
        if tag != N_BYTES {
            return Err(self.bad_tag(tag, "unsigned integer"));
        }

        match self.read_byte()? {
            4 => Ok(self.read_u32_le()? as u64),
            8 => self.read_u64_le(),
            width => Err(CodecError::malformed(
                self.position() - 1,
                format!("integer escape must be 4 or 8 bytes wide, found {width}"),
            )),
        }
    }

    /// Read an unsigned integer used as a length or count.
    pub fn take_len(&mut self) -> CodecResult<usize> {
        let offset = self.position();
        let value = self.take_uint()?;
        usize::try_from(value)
            .map_err(|_| CodecError::malformed(offset, format!("length {value} is too large")))
    }

    #[inline]
    pub fn take_int(&mut self) -> CodecResult<i64> {
        Ok(zigzag_decode(self.take_uint()?))
    }

    pub fn take_bool(&mut self) -> CodecResult<bool> {
        match self.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(self.bad_tag(other, "boolean")),
        }
    }

    #[inline]
    pub fn take_float(&mut self) -> CodecResult<f64> {
        Ok(f64::from_bits(self.take_uint()?))
    }

    pub fn take_bytes(&mut self) -> CodecResult<&'a [u8]> {
        let tag = self.read_byte()?;
        if tag != N_BYTES {
            return Err(self.bad_tag(tag, "byte string"));
        }
        let len = self.take_len()?;
        self.read_bytes(len)
    }

    pub fn take_str(&mut self) -> CodecResult<&'a str> {
        let offset = self.position();
        let bytes = self.take_bytes()?;
        std::str::from_utf8(bytes)
            .map_err(|e| CodecError::malformed(offset, format!("invalid UTF-8 text: {e}")))
    }
}
