//! Code emission.
//!
//! For every record the generator writes the `Record`, `Encode` and `Decode`
//! implementations and registers both the record and a handle to it, so
//! either can travel inside an `AnyValue`. Sequence and mapping types found
//! along the way are registered through the runtime's generic
//! implementations.

use log::debug;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use crate::{
    discover::Discovered,
    error::{GenError, GenResult},
    manifest::FieldManifest,
    model::{Builtin, RecordDef, Shape},
};

pub const HEADER: &str = "// Code generated by astcodec-gen. DO NOT EDIT.\n\n";

#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Path of the runtime crate, usually `::astcodec`.
    pub runtime: syn::Path,
    /// Prepended to every record name to form its registered name.
    pub name_prefix: String,
    /// Module the record structs live in, glob-imported by the output.
    pub types_path: Option<syn::Path>,
}

impl EmitOptions {
    pub fn new(runtime: &str) -> GenResult<Self> {
        Ok(Self {
            runtime: parse_path(runtime)?,
            name_prefix: String::new(),
            types_path: None,
        })
    }
}

pub fn parse_path(text: &str) -> GenResult<syn::Path> {
    syn::parse_str(text).map_err(|source| GenError::InvalidSyntax {
        what: "path",
        text: text.to_string(),
        source,
    })
}

/// Emit code for `discovered`, numbering fields through `manifest`.
///
/// The manifest is updated in place with the numbering used.
pub fn emit(
    discovered: &Discovered,
    manifest: &mut FieldManifest,
    options: &EmitOptions,
) -> GenResult<TokenStream> {
    let mut items = Vec::with_capacity(discovered.records.len() + 1);

    if let Some(path) = &options.types_path {
        items.push(quote! {
            #[allow(unused_imports)]
            use #path::*;
        });
    }

    for record in &discovered.records {
        items.push(emit_record(record, manifest, options));
    }

    let rt = &options.runtime;
    for shape in &discovered.collections {
        let ty = shape.rust_type(rt);
        let name = shape.wire_name(&options.name_prefix);
        items.push(quote! {
            #rt::register_type!(#ty, #name);
        });
    }

    debug!(
        "Emitted {} record(s), {} collection registration(s)",
        discovered.records.len(),
        discovered.collections.len()
    );
    Ok(quote!(#(#items)*))
}

/// Render emitted tokens as the text of an output file.
pub fn render(tokens: &TokenStream) -> String {
    format!("{HEADER}{tokens}\n")
}

fn emit_record(record: &RecordDef, manifest: &mut FieldManifest, options: &EmitOptions) -> TokenStream {
    let rt = &options.runtime;
    let ident = format_ident!("{}", record.name);
    let type_name = Shape::Record(record.name.clone()).wire_name(&options.name_prefix);
    let handle_name = Shape::Handle(record.name.clone()).wire_name(&options.name_prefix);

    let layout = manifest.layout(&record.name, &record.field_names());
    manifest.record(&record.name, &layout);

    let mut encode_stmts = Vec::new();
    let mut decode_arms = Vec::new();
    let mut non_default = Vec::new();

    for slot in layout.present() {
        // Present slots always name a field of the record
        let Some(field) = record.field(&slot.name) else {
            continue;
        };
        let member = format_ident!("{}", field.name);
        let number = Literal::u64_unsuffixed(slot.number);
        let access = quote!(self.#member);

        let check = non_default_check(&field.shape, &access, rt);
        let write = write_value(&field.shape, &access, rt);
        let read = read_value(&field.shape, rt);

        encode_stmts.push(quote! {
            if #check {
                e.encode_field(#number)?;
                #write
            }
        });
        decode_arms.push(quote! {
            #number => self.#member = #read,
        });
        non_default.push(check);
    }

    let is_default = non_default
        .iter()
        .map(|check| quote!(!(#check)))
        .reduce(|all, next| quote!(#all && #next))
        .unwrap_or_else(|| quote!(true));

    quote! {
        #[allow(unused_variables)]
        impl #rt::Record for #ident {
            const TYPE_NAME: &'static str = #type_name;

            fn encode_fields(&self, e: &mut #rt::Encoder<'_>) -> #rt::CodecResult<()> {
                #(#encode_stmts)*
                Ok(())
            }

            fn decode_fields(&mut self, d: &mut #rt::Decoder<'_>) -> #rt::CodecResult<()> {
                while let Some(number) = d.next_field()? {
                    match number {
                        #(#decode_arms)*
                        _ => d.skip_unknown_field(Self::TYPE_NAME, number)?,
                    }
                }
                Ok(())
            }
        }

        impl #rt::Encode for #ident {
            fn encode(&self, e: &mut #rt::Encoder<'_>) -> #rt::CodecResult<()> {
                e.encode_record(self)
            }

            fn is_default(&self) -> bool {
                #is_default
            }
        }

        impl #rt::Decode for #ident {
            fn decode(d: &mut #rt::Decoder<'_>) -> #rt::CodecResult<Self> {
                d.decode_record()
            }
        }

        #rt::register_type!(#ident, #type_name);
        #rt::register_type!(#rt::Handle<#ident>, #handle_name);
    }
}

/// Expression that is `true` when the field must be written.
fn non_default_check(shape: &Shape, access: &TokenStream, rt: &syn::Path) -> TokenStream {
    match shape {
        Shape::Builtin(Builtin::Bool) => quote!(#access),
        Shape::Builtin(Builtin::F32 | Builtin::F64) => quote!(#access != 0.0),
        Shape::Builtin(Builtin::String | Builtin::Bytes | Builtin::ByteVec) => {
            quote!(!#access.is_empty())
        }
        Shape::Builtin(_) => quote!(#access != 0),
        _ => quote!(!#rt::Encode::is_default(&#access)),
    }
}

fn write_value(shape: &Shape, access: &TokenStream, rt: &syn::Path) -> TokenStream {
    match shape {
        Shape::Builtin(Builtin::U64) => quote!(e.encode_uint(#access)?;),
        Shape::Builtin(Builtin::I64) => quote!(e.encode_int(#access)?;),
        Shape::Builtin(b) if b.is_unsigned() => quote!(e.encode_uint(#access as u64)?;),
        Shape::Builtin(b) if b.is_signed() => quote!(e.encode_int(#access as i64)?;),
        Shape::Builtin(Builtin::Bool) => quote!(e.encode_bool(#access)?;),
        Shape::Builtin(Builtin::F64) => quote!(e.encode_float(#access)?;),
        Shape::Builtin(Builtin::F32) => quote!(e.encode_float(#access as f64)?;),
        Shape::Builtin(Builtin::String) => quote!(e.encode_string(&#access)?;),
        Shape::Builtin(Builtin::ByteVec) => quote!(e.encode_bytes(&#access)?;),
        _ => quote!(#rt::Encode::encode(&#access, e)?;),
    }
}

fn read_value(shape: &Shape, rt: &syn::Path) -> TokenStream {
    match shape {
        Shape::Builtin(Builtin::U64) => quote!(d.decode_uint()?),
        Shape::Builtin(Builtin::I64) => quote!(d.decode_int()?),
        Shape::Builtin(b) if b.is_unsigned() => {
            let ty = b.rust_type(rt);
            quote!(d.decode_uint_as::<#ty>()?)
        }
        Shape::Builtin(b) if b.is_signed() => {
            let ty = b.rust_type(rt);
            quote!(d.decode_int_as::<#ty>()?)
        }
        Shape::Builtin(Builtin::Bool) => quote!(d.decode_bool()?),
        Shape::Builtin(Builtin::F64) => quote!(d.decode_float()?),
        Shape::Builtin(Builtin::F32) => quote!(d.decode_float()? as f32),
        Shape::Builtin(Builtin::String) => quote!(d.decode_string()?),
        Shape::Builtin(Builtin::ByteVec) => quote!(d.decode_bytes()?),
        _ => quote!(#rt::Decode::decode(d)?),
    }
}
