//! Integer mapping helpers for the tag layer.
//!
//! Unsigned values are written in one of three widths (see
//! [`encoded_size_uint`]); signed values are first folded onto the unsigned
//! range with a zig-zag mapping so that small magnitudes of either sign stay
//! on the single-byte path.

use crate::encoding::tag::END;

/// Map a signed integer onto the unsigned range.
///
/// Non-negative values land on even numbers, negative values on odd ones:
/// `0 -> 0`, `-1 -> 1`, `1 -> 2`, `-2 -> 3`, ... The mapping is a bijection
/// over the whole `i64` range, `i64::MIN` included.
///
/// ```
/// use astcodec::encoding::integer::zigzag_encode;
/// assert_eq!(zigzag_encode(0), 0);
/// assert_eq!(zigzag_encode(-1), 1);
/// assert_eq!(zigzag_encode(1), 2);
/// assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
/// ```
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Number of bytes [`ByteSink::put_uint`](crate::encoding::stream::ByteSink::put_uint)
/// produces for `value`.
///
/// - below the first reserved tag: the value is its own tag byte (1 byte)
/// - fits in 32 bits: tag, length, 4 bytes (6 bytes)
/// - otherwise: tag, length, 8 bytes (10 bytes)
pub fn encoded_size_uint(value: u64) -> usize {
    if value < END as u64 {
        1
    } else if value <= u32::MAX as u64 {
        6
    } else {
        10
    }
}

/// Number of bytes a signed value occupies once zig-zag mapped.
pub fn encoded_size_int(value: i64) -> usize {
    encoded_size_uint(zigzag_encode(value))
}
