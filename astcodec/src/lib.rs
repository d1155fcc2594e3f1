//! Astcodec: a compact binary codec for large, cross-referenced syntax trees.
//!
//! Trees are plain Rust structs. Values reachable from several places are
//! stored once in an [`Arena`] and referred to through typed [`Handle`]s;
//! the codec writes each shared value the first time it meets it and a
//! back-reference afterwards, so decoding rebuilds the same sharing.
//!
//! Encoding shape
//!  - Every value starts with a single tag byte; bytes below 240 are small
//!    unsigned integers standing for themselves (see [`encoding::tag`]).
//!  - Records are `START (field-number value)* END`. Fields holding their
//!    default value are omitted, and unknown field numbers are skipped on
//!    decode, which is what keeps old and new schemas compatible.
//!  - Dynamically typed values ([`AnyValue`]) carry a session-local type
//!    number; the table mapping numbers to registered type names is written
//!    in front of the payload.
//!
//! No reflection happens at runtime: the [`Record`] implementations are
//! emitted ahead of time by `astcodec-gen`.
//!
//! Example
//! ```
//! use astcodec::{Arena, decode, encode};
//!
//! let arena = Arena::new();
//! let words = vec![String::from("package"), String::from("main")];
//! let bytes = encode(&words, &arena).unwrap();
//! let (decoded, _arena): (Vec<String>, _) = decode(&bytes).unwrap();
//! assert_eq!(decoded, words);
//! ```

/// Arena of shared values and their handles.
pub mod arena;
/// Byte strings encoded as blobs at any nesting level.
pub mod bytes;
/// Decoding session.
pub mod decoder;
/// Dynamically typed values.
pub mod dynamic;
/// Encoding session.
pub mod encoder;
/// Wire layers and the codec traits.
pub mod encoding;
/// Payload prefix for persisted data.
pub mod envelope;
/// Global registry of dynamically encodable types.
pub mod registry;
pub mod utils;

pub extern crate inventory;

pub use arena::{Arena, Handle};
pub use bytes::Bytes;
pub use decoder::{Decoder, StructHeader};
pub use dynamic::{AnyValue, Dynamic};
pub use encoder::Encoder;
pub use encoding::{Decode, Encode, Record};
pub use registry::{Registry, TypeEntry};
pub use utils::error::{CodecError, CodecResult};

/// Encode `value`, whose handles point into `arena`.
pub fn encode<T: Encode + ?Sized>(value: &T, arena: &Arena) -> CodecResult<Vec<u8>> {
    let mut e = Encoder::with_arena(arena)?;
    value.encode(&mut e)?;
    Ok(e.into_bytes())
}

/// Decode a value produced by [`encode`], together with the arena holding
/// its shared values.
pub fn decode<T: Decode>(data: &[u8]) -> CodecResult<(T, Arena)> {
    let mut d = Decoder::new(data)?;
    let value = T::decode(&mut d)?;
    d.finish()?;
    Ok((value, d.into_arena()))
}

/// Encode a dynamically typed root value.
pub fn encode_dynamic(value: &AnyValue, arena: &Arena) -> CodecResult<Vec<u8>> {
    encode(value, arena)
}

/// Decode a dynamically typed root value.
pub fn decode_dynamic(data: &[u8]) -> CodecResult<(AnyValue, Arena)> {
    decode(data)
}

/// [`encode`], then [`envelope::seal`].
pub fn encode_sealed<T: Encode + ?Sized>(value: &T, arena: &Arena) -> CodecResult<Vec<u8>> {
    Ok(envelope::seal(&encode(value, arena)?))
}

/// [`envelope::open`], then [`decode`].
pub fn decode_sealed<T: Decode>(data: &[u8]) -> CodecResult<(T, Arena)> {
    decode(envelope::open(data)?)
}
