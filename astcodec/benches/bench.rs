#[path = "../tests/common/mod.rs"]
mod common;

use astcodec::{AnyValue, Arena, Handle, decode, encode};
use common::{Call, Ident, Literal, Scope, ident};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A package-sized tree: a pool of identifiers referenced from many calls
/// and scopes, the way resolved objects are shared in a real syntax tree.
fn build_shared_tree() -> (Vec<Handle<Call>>, Arena) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let mut arena = Arena::new();

    let idents: Vec<Handle<Ident>> = (0..500)
        .map(|i| arena.alloc(ident(&format!("name{i}"), rng.random_range(0..1_000_000))))
        .collect();

    let mut outer = None;
    for _ in 0..20 {
        let mut scope = Scope {
            outer,
            ..Scope::default()
        };
        for _ in 0..25 {
            let id = idents[rng.random_range(0..idents.len())];
            scope.objects.insert(format!("obj{}", id.index()), id);
        }
        outer = Some(arena.alloc(scope));
    }

    let calls = (0..2_000)
        .map(|_| {
            let args = (0..rng.random_range(0..6))
                .map(|_| idents[rng.random_range(0..idents.len())])
                .collect();
            let note = match (rng.random_range(0..4), outer) {
                (0, Some(scope)) => AnyValue::new(scope),
                (1, _) => AnyValue::new(String::from("// comment")),
                _ => AnyValue::none(),
            };
            arena.alloc(Call {
                func: Some(idents[rng.random_range(0..idents.len())]),
                args,
                note,
            })
        })
        .collect();

    (calls, arena)
}

fn build_literals() -> Vec<Literal> {
    let mut rng = ChaCha20Rng::seed_from_u64(0x43);
    (0..2_000)
        .map(|_| Literal {
            kind: rng.random(),
            value: "0x".repeat(rng.random_range(0..8)),
            raw: (0..rng.random_range(0..32)).map(|_| rng.random()).collect(),
            ratio: rng.random(),
            exact: rng.random_bool(0.5),
            parts: Some(vec![ident("re", 1), ident("im", 2)]),
            inner: None,
            chunks: Vec::new(),
            base: Some(Some(10)),
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let (calls, arena) = build_shared_tree();
    c.bench_function("encode_shared_tree", |b| {
        b.iter(|| black_box(encode(&calls, &arena).unwrap()))
    });

    let literals = build_literals();
    let empty = Arena::new();
    c.bench_function("encode_owned_literals", |b| {
        b.iter(|| black_box(encode(&literals, &empty).unwrap()))
    });
}

fn bench_decode(c: &mut Criterion) {
    let (calls, arena) = build_shared_tree();
    let bytes = encode(&calls, &arena).unwrap();
    c.bench_function("decode_shared_tree", |b| {
        b.iter(|| black_box(decode::<Vec<Handle<Call>>>(&bytes).unwrap()))
    });

    let bytes = encode(&build_literals(), &Arena::new()).unwrap();
    c.bench_function("decode_owned_literals", |b| {
        b.iter(|| black_box(decode::<Vec<Literal>>(&bytes).unwrap()))
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
