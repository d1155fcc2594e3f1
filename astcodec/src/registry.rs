//! Process-wide registry of types that can travel through an [`AnyValue`].
//!
//! Registrations are static: every type is submitted once with
//! [`register_type!`](crate::register_type), and the submissions are
//! collected into the global [`Registry`] the first time a session needs it.
//! After that the registry is read-only and may be shared by any number of
//! concurrent sessions.
//!
//! A stable name or a Rust type submitted twice is a programming error,
//! reported as [`CodecError::ConfigurationError`] by every call that needs
//! the global registry.
//!
//! [`AnyValue`]: crate::dynamic::AnyValue
use std::{any::TypeId, collections::HashMap};

use log::debug;
use once_cell::sync::OnceCell;

use crate::{
    bytes::Bytes,
    decoder::Decoder,
    dynamic::Dynamic,
    encoder::Encoder,
    encoding::{Decode, Encode},
    utils::error::{CodecError, CodecResult},
};

pub type EncodeFn = fn(&dyn Dynamic, &mut Encoder<'_>) -> CodecResult<()>;
pub type DecodeFn = fn(&mut Decoder<'_>) -> CodecResult<Box<dyn Dynamic>>;

/// One registered type: its stable wire name and type-erased codec.
pub struct TypeEntry {
    pub name: &'static str,
    pub type_id: fn() -> TypeId,
    pub encode: EncodeFn,
    pub decode: DecodeFn,
}
inventory::collect!(TypeEntry);

impl TypeEntry {
    pub const fn new<T>(name: &'static str) -> Self
    where
        T: Encode + Decode + Dynamic,
    {
        Self {
            name,
            type_id: TypeId::of::<T>,
            encode: encode_erased::<T>,
            decode: decode_erased::<T>,
        }
    }
}

impl std::fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEntry").field("name", &self.name).finish()
    }
}

fn encode_erased<T: Encode + Dynamic>(value: &dyn Dynamic, e: &mut Encoder<'_>) -> CodecResult<()> {
    match value.downcast_ref::<T>() {
        Some(value) => value.encode(e),
        None => Err(CodecError::UnregisteredType(
            value.rust_type_name().to_string(),
        )),
    }
}

fn decode_erased<T: Decode + Dynamic>(d: &mut Decoder<'_>) -> CodecResult<Box<dyn Dynamic>> {
    Ok(Box::new(T::decode(d)?))
}

/// Register a type for dynamic encoding under a stable name.
///
/// ```ignore
/// astcodec::register_type!(Ident, "ast.Ident");
/// astcodec::register_type!(astcodec::Handle<Ident>, "Handle<ast.Ident>");
/// ```
#[macro_export]
macro_rules! register_type {
    ($ty:ty, $name:expr) => {
        $crate::inventory::submit! {
            $crate::registry::TypeEntry::new::<$ty>($name)
        }
    };
}

/// Lookup tables over a fixed set of registrations.
pub struct Registry {
    by_name: HashMap<&'static str, &'static TypeEntry>,
    by_type: HashMap<TypeId, &'static TypeEntry>,
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();

impl Registry {
    /// Build a registry, rejecting duplicated names and duplicated types.
    pub fn from_entries<I>(entries: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = &'static TypeEntry>,
    {
        let mut by_name = HashMap::new();
        let mut by_type = HashMap::new();

        for entry in entries {
            if by_name.insert(entry.name, entry).is_some() {
                return Err(CodecError::ConfigurationError {
                    name: entry.name.to_string(),
                    reason: "stable name registered more than once".to_string(),
                });
            }
            if let Some(previous) = by_type.insert((entry.type_id)(), entry) {
                return Err(CodecError::ConfigurationError {
                    name: entry.name.to_string(),
                    reason: format!("type already registered as '{}'", previous.name),
                });
            }
        }

        debug!("Type registry built with {} entries", by_name.len());
        Ok(Self { by_name, by_type })
    }

    /// The registry of every [`register_type!`](crate::register_type)
    /// submission linked into the program.
    pub fn global() -> CodecResult<&'static Registry> {
        GLOBAL.get_or_try_init(|| Registry::from_entries(inventory::iter::<TypeEntry>))
    }

    pub fn by_name(&self, name: &str) -> Option<&'static TypeEntry> {
        self.by_name.get(name).copied()
    }

    pub fn by_type(&self, type_id: TypeId) -> Option<&'static TypeEntry> {
        self.by_type.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }
}

register_type!(bool, "bool");
register_type!(u64, "u64");
register_type!(i64, "i64");
register_type!(f64, "f64");
register_type!(String, "String");
register_type!(Bytes, "Bytes");
