//! Reachability analysis over the structs of the input sources.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
    str::FromStr,
};

use log::{debug, trace};
use quote::ToTokens;
use syn::{Fields, GenericArgument, Item, ItemStruct, PathArguments, Type};

use crate::{
    error::{GenError, GenResult},
    model::{Builtin, FieldDef, MapKind, RecordDef, Shape},
};

/// Named structs of the input sources, by name.
#[derive(Default)]
pub struct SourceIndex {
    structs: BTreeMap<String, ItemStruct>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the structs of the Rust file at `path`.
    pub fn add_file(&mut self, path: &Path) -> GenResult<()> {
        let text = std::fs::read_to_string(path).map_err(|source| GenError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_source(&path.display().to_string(), &text)
    }

    /// Index the structs of `text`. `file` only names the source in errors.
    pub fn add_source(&mut self, file: &str, text: &str) -> GenResult<()> {
        let parsed = syn::parse_file(text).map_err(|source| GenError::SourceParseError {
            file: file.to_string(),
            source,
        })?;

        let mut count = 0;
        for item in parsed.items {
            collect_structs(item, &mut |item| {
                let name = item.ident.to_string();
                if self.structs.insert(name.clone(), item).is_some() {
                    return Err(GenError::DuplicateStruct(name));
                }
                count += 1;
                Ok(())
            })?;
        }
        debug!("Indexed {count} struct(s) from '{file}'");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ItemStruct> {
        self.structs.get(name)
    }

    pub fn len(&self) -> usize {
        self.structs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }
}

fn collect_structs(
    item: Item,
    sink: &mut impl FnMut(ItemStruct) -> GenResult<()>,
) -> GenResult<()> {
    match item {
        Item::Struct(item) => sink(item),
        Item::Mod(module) => {
            for item in module.content.map(|(_, items)| items).unwrap_or_default() {
                collect_structs(item, sink)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Everything reachable from the roots, in first-visit order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Discovered {
    pub records: Vec<RecordDef>,
    /// Sequence and mapping types, which get registry entries of their own.
    pub collections: Vec<Shape>,
}

/// Parse a root type written in Rust syntax, e.g. `Handle<File>`.
pub fn parse_root(text: &str) -> GenResult<Type> {
    syn::parse_str::<Type>(text).map_err(|source| GenError::InvalidSyntax {
        what: "root type",
        text: text.to_string(),
        source,
    })
}

/// Walk the type graph from `roots`, collecting every record and collection
/// that needs generated code.
pub fn discover(index: &SourceIndex, roots: &[Type]) -> GenResult<Discovered> {
    let mut walker = Walker {
        index,
        seen_records: HashSet::new(),
        seen_collections: HashSet::new(),
        found: Discovered::default(),
    };

    for root in roots {
        let shape = shape_of(index, root)?;
        if shape.has_byte_list() {
            return Err(unsupported(root, NESTED_BYTES));
        }
        trace!("Root {:?}", shape);
        walker.visit(&shape)?;
    }

    debug!(
        "Discovered {} record(s) and {} collection type(s)",
        walker.found.records.len(),
        walker.found.collections.len()
    );
    Ok(walker.found)
}

struct Walker<'i> {
    index: &'i SourceIndex,
    seen_records: HashSet<String>,
    seen_collections: HashSet<Shape>,
    found: Discovered,
}

impl Walker<'_> {
    fn visit(&mut self, shape: &Shape) -> GenResult<()> {
        match shape {
            Shape::Builtin(_) | Shape::Dynamic => Ok(()),
            Shape::Record(name) | Shape::Handle(name) => {
                if !self.seen_records.insert(name.clone()) {
                    return Ok(());
                }
                let record = self.record(name)?;
                let shapes: Vec<Shape> = record.fields.iter().map(|f| f.shape.clone()).collect();
                self.found.records.push(record);
                for shape in &shapes {
                    self.visit(shape)?;
                }
                Ok(())
            }
            Shape::Optional(inner) | Shape::Boxed(inner) => self.visit(inner),
            Shape::Sequence(inner) => {
                if self.seen_collections.insert(shape.clone()) {
                    self.found.collections.push(shape.clone());
                }
                self.visit(inner)
            }
            Shape::Mapping { key, value, .. } => {
                if self.seen_collections.insert(shape.clone()) {
                    self.found.collections.push(shape.clone());
                }
                self.visit(key)?;
                self.visit(value)
            }
        }
    }

    fn record(&self, name: &str) -> GenResult<RecordDef> {
        let item = self
            .index
            .get(name)
            .ok_or_else(|| GenError::UnknownType(name.to_string()))?;

        let Fields::Named(named) = &item.fields else {
            return Err(GenError::UnsupportedType {
                ty: name.to_string(),
                reason: "only structs with named fields can be encoded".to_string(),
            });
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = &field.ident else { continue };
            let shape = match shape_of(self.index, &field.ty)? {
                Shape::Sequence(inner) if *inner == Shape::Builtin(Builtin::U8) => {
                    Shape::Builtin(Builtin::ByteVec)
                }
                shape => shape,
            };
            if shape.has_byte_list() {
                return Err(GenError::UnsupportedType {
                    ty: format!("{name}::{ident}"),
                    reason: NESTED_BYTES.to_string(),
                });
            }
            if let Shape::Handle(_) = shape {
                return Err(GenError::UnsupportedType {
                    ty: format!("{name}::{ident}"),
                    reason: "a shared value held by a record field must be an Option<Handle<T>>"
                        .to_string(),
                });
            }
            fields.push(FieldDef {
                name: ident.to_string(),
                shape,
            });
        }

        Ok(RecordDef {
            name: name.to_string(),
            fields,
        })
    }
}

const NESTED_BYTES: &str =
    "a Vec<u8> below a record field would be encoded as a list of integers; use astcodec::Bytes";

fn unsupported(ty: &Type, reason: &str) -> GenError {
    GenError::UnsupportedType {
        ty: ty.to_token_stream().to_string(),
        reason: reason.to_string(),
    }
}

fn type_arguments(args: &PathArguments) -> Vec<&Type> {
    match args {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Classify a Rust type.
pub fn shape_of(index: &SourceIndex, ty: &Type) -> GenResult<Shape> {
    let Type::Path(path) = ty else {
        return Err(unsupported(ty, "only named types can be encoded"));
    };
    if path.qself.is_some() {
        return Err(unsupported(ty, "qualified paths cannot be encoded"));
    }
    let Some(last) = path.path.segments.last() else {
        return Err(unsupported(ty, "empty path"));
    };

    let name = last.ident.to_string();
    let args = type_arguments(&last.arguments);

    match (name.as_str(), args.as_slice()) {
        ("Vec", [inner]) => Ok(Shape::Sequence(Box::new(shape_of(index, inner)?))),
        ("Option", [inner]) => Ok(Shape::Optional(Box::new(shape_of(index, inner)?))),
        ("Box", [inner]) => Ok(Shape::Boxed(Box::new(shape_of(index, inner)?))),
        ("BTreeMap" | "HashMap", [key, value]) => Ok(Shape::Mapping {
            kind: if name == "BTreeMap" {
                MapKind::BTree
            } else {
                MapKind::Hash
            },
            key: Box::new(shape_of(index, key)?),
            value: Box::new(shape_of(index, value)?),
        }),
        ("Handle", [target]) => match shape_of(index, target)? {
            Shape::Record(name) => Ok(Shape::Handle(name)),
            _ => Err(unsupported(ty, "handles can only point to structs of the input sources")),
        },
        ("AnyValue", []) => Ok(Shape::Dynamic),
        (_, []) => {
            if let Ok(builtin) = Builtin::from_str(&name) {
                return Ok(Shape::Builtin(builtin));
            }
            match index.get(&name) {
                Some(item) if !item.generics.params.is_empty() => {
                    Err(unsupported(ty, "generic structs cannot be encoded"))
                }
                Some(_) => Ok(Shape::Record(name)),
                None => Err(GenError::UnknownType(name)),
            }
        }
        _ => Err(unsupported(ty, "unrecognised generic type")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
        pub struct Ident { pub name: String, pub pos: u32 }
        pub struct Call { pub func: Option<Handle<Ident>>, pub args: Vec<Handle<Ident>> }
        mod nested {
            pub struct Inner { pub bytes: Vec<u8> }
        }
    "#;

    fn index() -> SourceIndex {
        let mut index = SourceIndex::new();
        index.add_source("test.rs", SOURCE).unwrap();
        index
    }

    #[test]
    fn structs_of_inline_modules_are_indexed() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert!(index.get("Inner").is_some());
    }

    #[test]
    fn field_level_byte_vectors_are_blobs() {
        let index = index();
        let found = discover(&index, &[parse_root("Inner").unwrap()]).unwrap();
        assert_eq!(
            found.records[0].fields[0].shape,
            Shape::Builtin(Builtin::ByteVec)
        );
        assert!(found.collections.is_empty());
    }

    #[test]
    fn nested_byte_vectors_must_be_bytes() {
        let mut index = SourceIndex::new();
        index
            .add_source(
                "bytes.rs",
                "struct A { chunks: Vec<Vec<u8>> } \
                 struct B { tag: Option<Vec<u8>> } \
                 struct C { chunks: Vec<Bytes>, tag: Option<Bytes> }",
            )
            .unwrap();
        for (root, field) in [("A", "A::chunks"), ("B", "B::tag")] {
            assert!(matches!(
                discover(&index, &[parse_root(root).unwrap()]),
                Err(GenError::UnsupportedType { ty, .. }) if ty == field
            ));
        }
        assert!(matches!(
            discover(&index, &[parse_root("Vec<Vec<u8>>").unwrap()]),
            Err(GenError::UnsupportedType { .. })
        ));

        let found = discover(&index, &[parse_root("C").unwrap()]).unwrap();
        assert_eq!(
            found.collections,
            vec![Shape::Sequence(Box::new(Shape::Builtin(Builtin::Bytes)))]
        );
        assert_eq!(
            found.records[0].fields[1].shape,
            Shape::Optional(Box::new(Shape::Builtin(Builtin::Bytes)))
        );
    }

    #[test]
    fn discovery_follows_handles_and_sequences() {
        let index = index();
        let found = discover(&index, &[parse_root("Handle<Call>").unwrap()]).unwrap();
        let names: Vec<_> = found.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Call", "Ident"]);
        assert_eq!(
            found.collections,
            vec![Shape::Sequence(Box::new(Shape::Handle("Ident".into())))]
        );
    }

    #[test]
    fn unknown_and_unsupported_types_are_reported() {
        let index = index();
        assert!(matches!(
            discover(&index, &[parse_root("Missing").unwrap()]),
            Err(GenError::UnknownType(name)) if name == "Missing"
        ));
        assert!(matches!(
            discover(&index, &[parse_root("(u8, u8)").unwrap()]),
            Err(GenError::UnsupportedType { .. })
        ));
        assert!(matches!(
            discover(&index, &[parse_root("Handle<u64>").unwrap()]),
            Err(GenError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn bare_handle_fields_are_rejected() {
        let mut index = SourceIndex::new();
        index
            .add_source("bad.rs", "struct A { b: Handle<B> } struct B { x: u8 }")
            .unwrap();
        assert!(matches!(
            discover(&index, &[parse_root("A").unwrap()]),
            Err(GenError::UnsupportedType { ty, .. }) if ty == "A::b"
        ));
    }
}
