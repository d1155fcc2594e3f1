//! Encoding layers and the traits generated code implements.
//!
//! - [`stream`]: raw byte sink/source with fixed-width little-endian integers
//! - [`tag`]: the tag alphabet and scalar encodings (integers, floats, blobs)
//! - [`integer`]: zig-zag mapping and size helpers
//!
//! Types take part in encoding by implementing [`Encode`] and [`Decode`].
//! Composite values with named fields additionally implement [`Record`],
//! which is what lets them be framed with `START`/`END` and shared through a
//! [`Handle`](crate::arena::Handle).
use crate::{decoder::Decoder, encoder::Encoder, utils::error::CodecResult};

mod impls;
pub mod integer;
pub mod stream;
pub mod tag;

/// Types that can write themselves into an [`Encoder`].
pub trait Encode {
    /// Whether a value of this type may be written as a bare `NIL`.
    ///
    /// An enclosing `Option` then wraps its present values in a one-element
    /// list so that `Some(None)` stays distinct from `None`.
    const MAY_BE_NIL: bool = false;

    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()>;

    /// Whether the value equals the default of its type.
    ///
    /// Record fields holding a default value are left out of the encoding;
    /// decoding restores them from [`Default`].
    fn is_default(&self) -> bool {
        false
    }
}

/// Types that can rebuild themselves from a [`Decoder`].
pub trait Decode: Sized {
    /// Mirror of [`Encode::MAY_BE_NIL`].
    const MAY_BE_NIL: bool = false;

    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self>;
}

/// Composite values made of numbered fields.
///
/// Implementations are emitted by `astcodec-gen`. Field numbers are stable
/// across schema edits; decoders must hand unknown numbers to
/// [`Decoder::skip_unknown_field`] so that data written by a newer schema
/// still decodes.
pub trait Record: Default + Send + Sync + 'static {
    /// Stable name of the record, used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Write every non-default field as a `(number, value)` pair.
    fn encode_fields(&self, e: &mut Encoder<'_>) -> CodecResult<()>;

    /// Read `(number, value)` pairs until the end of the record.
    fn decode_fields(&mut self, d: &mut Decoder<'_>) -> CodecResult<()>;
}
