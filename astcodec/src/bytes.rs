//! Byte strings.
use std::ops::{Deref, DerefMut};

use crate::{
    decoder::Decoder,
    encoder::Encoder,
    encoding::{Decode, Encode},
    utils::error::CodecResult,
};

/// A byte string written as one `N_BYTES` blob wherever it appears.
///
/// A `Vec<u8>` held directly by a generated record field is already written
/// this way, but inside another container it goes through the generic list
/// implementation and becomes a list of integers. Use `Bytes` for byte
/// strings nested in sequences, mappings, options or dynamic values.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    fn from(bytes: &[u8]) -> Self {
        Bytes(bytes.to_vec())
    }
}

impl Encode for Bytes {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_bytes(&self.0)
    }

    fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl Decode for Bytes {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_bytes().map(Bytes)
    }
}
