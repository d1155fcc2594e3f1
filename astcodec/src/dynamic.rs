//! Self-describing polymorphic values.
//!
//! A field whose concrete type is only known at runtime (an interface-like
//! "any expression" slot of a syntax tree) holds an [`AnyValue`]. On the wire
//! it is either a single `0` byte (absent) or the two-element list
//! `[type number, value]`, where the type number indexes the session's
//! type-name table.
use std::fmt;

use downcast_rs::{DowncastSync, impl_downcast};

use crate::{
    decoder::Decoder,
    encoder::Encoder,
    encoding::{Decode, Encode},
    utils::error::CodecResult,
};

/// Object-safe view of any value that can travel through an [`AnyValue`].
///
/// Blanket-implemented; a value is only encodable if its concrete type was
/// registered with [`register_type!`](crate::register_type).
pub trait Dynamic: DowncastSync + fmt::Debug {
    /// Rust name of the concrete type, for diagnostics.
    fn rust_type_name(&self) -> &'static str;
}
impl_downcast!(sync Dynamic);

impl<T: std::any::Any + Send + Sync + fmt::Debug> Dynamic for T {
    fn rust_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Optional, dynamically typed value.
#[derive(Debug, Default)]
pub struct AnyValue(Option<Box<dyn Dynamic>>);

impl AnyValue {
    pub fn new<T: Dynamic>(value: T) -> Self {
        AnyValue(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        AnyValue(None)
    }

    pub fn from_boxed(value: Option<Box<dyn Dynamic>>) -> Self {
        AnyValue(value)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&dyn Dynamic> {
        self.0.as_deref()
    }

    pub fn downcast_ref<T: Dynamic>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref::<T>()
    }

    pub fn into_inner(self) -> Option<Box<dyn Dynamic>> {
        self.0
    }
}

impl Encode for AnyValue {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_dynamic(self.get())
    }

    fn is_default(&self) -> bool {
        self.is_none()
    }
}

impl Decode for AnyValue {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_dynamic()
    }
}
