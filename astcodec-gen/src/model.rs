//! Shapes of the types the generator knows how to encode.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use strum::{EnumString, IntoStaticStr};

/// Types encoded directly by the tag layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
pub enum Builtin {
    #[strum(serialize = "u8")]
    U8,
    #[strum(serialize = "u16")]
    U16,
    #[strum(serialize = "u32")]
    U32,
    #[strum(serialize = "u64")]
    U64,
    #[strum(serialize = "usize")]
    Usize,
    #[strum(serialize = "i8")]
    I8,
    #[strum(serialize = "i16")]
    I16,
    #[strum(serialize = "i32")]
    I32,
    #[strum(serialize = "i64")]
    I64,
    #[strum(serialize = "isize")]
    Isize,
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "f32")]
    F32,
    #[strum(serialize = "f64")]
    F64,
    #[strum(serialize = "String")]
    String,
    /// `astcodec::Bytes`, a blob at any nesting level.
    #[strum(serialize = "Bytes")]
    Bytes,
    /// `Vec<u8>` held directly by a record field, also written as one blob.
    #[strum(disabled)]
    ByteVec,
}

impl Builtin {
    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Builtin::U8 | Builtin::U16 | Builtin::U32 | Builtin::U64 | Builtin::Usize
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Builtin::I8 | Builtin::I16 | Builtin::I32 | Builtin::I64 | Builtin::Isize
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::ByteVec => "Vec<u8>",
            other => other.into(),
        }
    }

    pub fn rust_type(self, runtime: &syn::Path) -> TokenStream {
        match self {
            Builtin::Bytes => quote!(#runtime::Bytes),
            Builtin::ByteVec => quote!(::std::vec::Vec<u8>),
            Builtin::String => quote!(::std::string::String),
            other => {
                let ident = format_ident!("{}", <&'static str>::from(other));
                quote!(#ident)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    BTree,
    Hash,
}

/// Structure of a field or root type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    Builtin(Builtin),
    /// A struct of the input sources, held by value.
    Record(String),
    /// `Handle<T>` to a struct of the input sources.
    Handle(String),
    Optional(Box<Shape>),
    Boxed(Box<Shape>),
    Sequence(Box<Shape>),
    Mapping {
        kind: MapKind,
        key: Box<Shape>,
        value: Box<Shape>,
    },
    /// `AnyValue`: resolved through the type registry at runtime.
    Dynamic,
}

impl Shape {
    /// Whether values of this shape get a registry entry of their own.
    pub fn is_registered(&self) -> bool {
        matches!(
            self,
            Shape::Record(_) | Shape::Handle(_) | Shape::Sequence(_) | Shape::Mapping { .. }
        )
    }

    /// Whether a `Vec<u8>` appears anywhere in the shape. Inside a container
    /// it would be encoded as a list of integers rather than a blob.
    pub fn has_byte_list(&self) -> bool {
        match self {
            Shape::Sequence(inner) => {
                **inner == Shape::Builtin(Builtin::U8) || inner.has_byte_list()
            }
            Shape::Optional(inner) | Shape::Boxed(inner) => inner.has_byte_list(),
            Shape::Mapping { key, value, .. } => key.has_byte_list() || value.has_byte_list(),
            _ => false,
        }
    }

    /// Stable name under which the type is registered.
    pub fn wire_name(&self, prefix: &str) -> String {
        match self {
            Shape::Builtin(builtin) => builtin.name().to_string(),
            Shape::Record(name) => format!("{prefix}{name}"),
            Shape::Handle(name) => format!("Handle<{prefix}{name}>"),
            Shape::Optional(inner) => format!("Option<{}>", inner.wire_name(prefix)),
            Shape::Boxed(inner) => format!("Box<{}>", inner.wire_name(prefix)),
            Shape::Sequence(inner) => format!("Vec<{}>", inner.wire_name(prefix)),
            Shape::Mapping { kind, key, value } => {
                let map = match kind {
                    MapKind::BTree => "BTreeMap",
                    MapKind::Hash => "HashMap",
                };
                format!(
                    "{map}<{}, {}>",
                    key.wire_name(prefix),
                    value.wire_name(prefix)
                )
            }
            Shape::Dynamic => "AnyValue".to_string(),
        }
    }

    /// Rust type of the shape, with runtime types qualified by `runtime`.
    pub fn rust_type(&self, runtime: &syn::Path) -> TokenStream {
        match self {
            Shape::Builtin(builtin) => builtin.rust_type(runtime),
            Shape::Record(name) => {
                let ident = format_ident!("{}", name);
                quote!(#ident)
            }
            Shape::Handle(name) => {
                let ident = format_ident!("{}", name);
                quote!(#runtime::Handle<#ident>)
            }
            Shape::Optional(inner) => {
                let inner = inner.rust_type(runtime);
                quote!(::std::option::Option<#inner>)
            }
            Shape::Boxed(inner) => {
                let inner = inner.rust_type(runtime);
                quote!(::std::boxed::Box<#inner>)
            }
            Shape::Sequence(inner) => {
                let inner = inner.rust_type(runtime);
                quote!(::std::vec::Vec<#inner>)
            }
            Shape::Mapping { kind, key, value } => {
                let key = key.rust_type(runtime);
                let value = value.rust_type(runtime);
                match kind {
                    MapKind::BTree => quote!(::std::collections::BTreeMap<#key, #value>),
                    MapKind::Hash => quote!(::std::collections::HashMap<#key, #value>),
                }
            }
            Shape::Dynamic => quote!(#runtime::AnyValue),
        }
    }
}

/// A named field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub shape: Shape,
}

/// A struct reachable from the roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl RecordDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }
}
