mod common;

use astcodec::{
    AnyValue, Arena, Bytes, CodecError, Handle, Registry, decode, decode_dynamic, decode_sealed,
    encode, encode_dynamic, encode_sealed,
    encoding::tag::{N_BYTES, N_VALUES},
};
use common::{Call, Ident, Literal, ident};

#[test]
fn generated_types_are_in_the_global_registry() {
    let registry = Registry::global().unwrap();
    for name in [
        "test.Call",
        "Handle<test.Call>",
        "test.Ident",
        "Handle<test.Ident>",
        "test.Scope",
        "Handle<test.Scope>",
        "test.Literal",
        "Handle<test.Literal>",
        "Vec<Handle<test.Ident>>",
        "BTreeMap<String, Handle<test.Ident>>",
        "Vec<test.Ident>",
        "Vec<Bytes>",
        "Bytes",
        "String",
        "u64",
    ] {
        assert!(registry.by_name(name).is_some(), "{name} is not registered");
    }
}

#[test]
fn dynamic_fields_roundtrip_with_their_concrete_type() {
    let arena = Arena::new();
    for note in [
        AnyValue::new(String::from("doc comment")),
        AnyValue::new(17_u64),
        AnyValue::new(-17_i64),
        AnyValue::new(true),
        AnyValue::new(ident("x", 3)),
        AnyValue::new(Bytes::from(vec![0, 240, 255])),
        AnyValue::new(vec![ident("a", 1), ident("b", 2)]),
    ] {
        let call = Call {
            note,
            ..Call::default()
        };
        let bytes = encode(&call, &arena).unwrap();
        let (decoded, _): (Call, Arena) = decode(&bytes).unwrap();
        assert_eq!(
            format!("{:?}", decoded.note),
            format!("{:?}", call.note)
        );
    }
}

#[test]
fn dynamic_handle_shares_with_typed_fields() {
    let mut arena = Arena::new();
    let x = arena.alloc(ident("x", 1));
    let call = Call {
        func: Some(x),
        args: Vec::new(),
        note: AnyValue::new(x),
    };

    let bytes = encode(&call, &arena).unwrap();
    let (decoded, arena): (Call, Arena) = decode(&bytes).unwrap();

    let func = decoded.func.unwrap();
    assert_eq!(decoded.note.downcast_ref::<Handle<Ident>>(), Some(&func));
    assert_eq!(arena.len(), 1);
}

#[test]
fn dynamic_root_value() {
    let mut arena = Arena::new();
    let a = arena.alloc(ident("a", 1));
    let b = arena.alloc(ident("b", 2));
    let root = AnyValue::new(vec![a, b, a]);

    let bytes = encode_dynamic(&root, &arena).unwrap();
    let (decoded, arena) = decode_dynamic(&bytes).unwrap();

    let handles = decoded.downcast_ref::<Vec<Handle<Ident>>>().unwrap();
    assert_eq!(handles[0], handles[2]);
    assert_eq!(arena[handles[1]], ident("b", 2));

    let (absent, _) = decode_dynamic(&encode_dynamic(&AnyValue::none(), &arena).unwrap()).unwrap();
    assert!(absent.is_none());
}

#[test]
fn unregistered_type_fails_to_encode() {
    let call = Call {
        note: AnyValue::new(3_u8),
        ..Call::default()
    };
    assert!(matches!(
        encode(&call, &Arena::new()),
        Err(CodecError::UnregisteredType(_))
    ));
}

#[test]
fn unknown_type_name_fails_to_decode() {
    let bytes = [N_VALUES, 1, N_BYTES, 4, b'N', b'o', b'p', b'e', 0];
    assert!(matches!(
        decode_dynamic(&bytes),
        Err(CodecError::UnregisteredType(name)) if name == "Nope"
    ));
}

#[test]
fn sealed_payloads() {
    let literal = Literal {
        value: "sealed".to_string(),
        ..Literal::default()
    };
    let bytes = encode_sealed(&literal, &Arena::new()).unwrap();
    assert!(bytes.starts_with(b"AST01"));

    let (decoded, _): (Literal, Arena) = decode_sealed(&bytes).unwrap();
    assert_eq!(decoded, literal);
    assert!(decode_sealed::<Literal>(&bytes[1..]).is_err());
}
