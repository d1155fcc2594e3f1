//! A small syntax tree shared by the integration tests.
//!
//! Its codec in `ast_codec.rs` is the checked-in output of
//! `astcodec-gen -c tests/common/astcodec-gen.toml`, numbered by
//! `ast.fields.toml`.
#![allow(dead_code)]

use std::collections::BTreeMap;

use astcodec::{AnyValue, Bytes, Handle};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub pos: u32,
}

#[derive(Debug, Default)]
pub struct Call {
    pub func: Option<Handle<Ident>>,
    pub args: Vec<Handle<Ident>>,
    pub note: AnyValue,
}

#[derive(Debug, Default)]
pub struct Scope {
    pub outer: Option<Handle<Scope>>,
    pub objects: BTreeMap<String, Handle<Ident>>,
}

/// Owned nesting, no sharing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Literal {
    pub kind: i8,
    pub value: String,
    pub raw: Vec<u8>,
    pub ratio: f64,
    pub exact: bool,
    pub parts: Option<Vec<Ident>>,
    pub inner: Option<Box<Literal>>,
    pub chunks: Vec<Bytes>,
    pub base: Option<Option<u32>>,
}

include!("ast_codec.rs");

pub fn ident(name: &str, pos: u32) -> Ident {
    Ident {
        name: name.to_string(),
        pos,
    }
}
