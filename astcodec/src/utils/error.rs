use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The input does not follow the wire format: unknown tag, truncated data,
    /// out-of-range counts or type numbers, invalid UTF-8, ...
    #[error("Malformed input at byte {offset}: {message}")]
    MalformedInput { offset: usize, message: String },

    /// A value of a type that is not part of the registry was encoded, or the
    /// payload names a type the current registry does not know.
    #[error("Unregistered type '{0}'")]
    UnregisteredType(String),

    /// Two registrations share the same stable name or the same Rust type.
    #[error("Invalid type registration for '{name}': {reason}")]
    ConfigurationError { name: String, reason: String },

    /// A handle was encoded against an arena that does not hold it.
    #[error("Handle #{0} does not point to a value of the arena")]
    DanglingHandle(u32),
}

impl CodecError {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            offset,
            message: message.into(),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
