//! Fixed prefix identifying a stored payload and its format version.
//!
//! The codec itself does not version its output; callers persisting
//! payloads seal them with [`MAGIC`] so that a future, incompatible format
//! can be told apart from this one before decoding starts.
use crate::utils::error::{CodecError, CodecResult};

/// Magic bytes followed by the two-digit format version.
pub const MAGIC: &[u8; 5] = b"AST01";

/// Prefix `payload` with [`MAGIC`].
pub fn seal(payload: &[u8]) -> Vec<u8> {
    let mut sealed = Vec::with_capacity(MAGIC.len() + payload.len());
    sealed.extend_from_slice(MAGIC);
    sealed.extend_from_slice(payload);
    sealed
}

/// Check and strip the [`MAGIC`] prefix.
pub fn open(data: &[u8]) -> CodecResult<&[u8]> {
    match data.strip_prefix(MAGIC.as_slice()) {
        Some(payload) => Ok(payload),
        None => {
            let found = &data[..data.len().min(MAGIC.len())];
            Err(CodecError::malformed(
                0,
                format!(
                    "bad envelope prefix {:?}, expected {:?}",
                    String::from_utf8_lossy(found),
                    String::from_utf8_lossy(MAGIC)
                ),
            ))
        }
    }
}
