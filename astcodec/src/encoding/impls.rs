//! [`Encode`]/[`Decode`] for the standard building blocks of a tree.

use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
};

use crate::{
    arena::Handle,
    decoder::Decoder,
    encoder::Encoder,
    encoding::{Decode, Encode, Record},
    utils::error::{CodecError, CodecResult},
};

macro_rules! impl_unsigned {
    ($($ty:ty),* $(,)?) => {$(
        impl Encode for $ty {
            #[inline]
            fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
                e.encode_uint(*self as u64)
            }

            #[inline]
            fn is_default(&self) -> bool {
                *self == 0
            }
        }

        impl Decode for $ty {
            #[inline]
            fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
                d.decode_uint_as::<$ty>()
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($ty:ty),* $(,)?) => {$(
        impl Encode for $ty {
            #[inline]
            fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
                e.encode_int(*self as i64)
            }

            #[inline]
            fn is_default(&self) -> bool {
                *self == 0
            }
        }

        impl Decode for $ty {
            #[inline]
            fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
                d.decode_int_as::<$ty>()
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, usize);
impl_signed!(i8, i16, i32, i64, isize);

impl Encode for bool {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_bool(*self)
    }

    fn is_default(&self) -> bool {
        !*self
    }
}

impl Decode for bool {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_bool()
    }
}

impl Encode for f64 {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_float(*self)
    }

    fn is_default(&self) -> bool {
        *self == 0.0
    }
}

impl Decode for f64 {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_float()
    }
}

impl Encode for f32 {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_float(*self as f64)
    }

    fn is_default(&self) -> bool {
        *self == 0.0
    }
}

impl Decode for f32 {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        Ok(d.decode_float()? as f32)
    }
}

impl Encode for str {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_string(self)
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for String {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_string(self)
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl Decode for String {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_string()
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    const MAY_BE_NIL: bool = T::MAY_BE_NIL;

    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        (**self).encode(e)
    }

    fn is_default(&self) -> bool {
        (**self).is_default()
    }
}

impl<T: Decode> Decode for Box<T> {
    const MAY_BE_NIL: bool = T::MAY_BE_NIL;

    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        T::decode(d).map(Box::new)
    }
}

/// `None` is written as `NIL`. A present value that could itself be `NIL`
/// (`Some(None)` of a nested option) is wrapped in a one-element list.
impl<T: Encode> Encode for Option<T> {
    const MAY_BE_NIL: bool = true;

    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        match self {
            Some(value) if T::MAY_BE_NIL => {
                e.start_list(1)?;
                value.encode(e)
            }
            Some(value) => value.encode(e),
            None => e.encode_nil(),
        }
    }

    fn is_default(&self) -> bool {
        self.is_none()
    }
}

impl<T: Decode> Decode for Option<T> {
    const MAY_BE_NIL: bool = true;

    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        if d.take_nil()? {
            return Ok(None);
        }
        if T::MAY_BE_NIL {
            let offset = d.position();
            if d.start_list()? != Some(1) {
                return Err(CodecError::malformed(
                    offset,
                    "present nested optional must be a one-element list",
                ));
            }
        }
        T::decode(d).map(Some)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.start_list(self.len())?;
        for item in self {
            item.encode(e)?;
        }
        Ok(())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        self.as_slice().encode(e)
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

/// An absent list decodes as an empty one; use `Option<Vec<T>>` to tell
/// them apart.
impl<T: Decode> Decode for Vec<T> {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        let Some(count) = d.start_list()? else {
            return Ok(Vec::new());
        };

        let mut items = Vec::with_capacity(d.capacity_hint(count));
        for _ in 0..count {
            items.push(T::decode(d)?);
        }
        Ok(items)
    }
}

fn encode_entries<'m, K, V, I>(e: &mut Encoder<'_>, len: usize, entries: I) -> CodecResult<()>
where
    K: Encode + 'm,
    V: Encode + 'm,
    I: Iterator<Item = (&'m K, &'m V)>,
{
    e.start_list(2 * len)?;
    for (key, value) in entries {
        key.encode(e)?;
        value.encode(e)?;
    }
    Ok(())
}

fn decode_entries<K, V, F>(d: &mut Decoder<'_>, mut insert: F) -> CodecResult<()>
where
    K: Decode,
    V: Decode,
    F: FnMut(K, V),
{
    let Some(count) = d.start_list()? else {
        return Ok(());
    };
    if count % 2 != 0 {
        return Err(CodecError::MalformedInput {
            offset: d.position(),
            message: format!("mapping holds an odd number of values ({count})"),
        });
    }

    for _ in 0..count / 2 {
        let key = K::decode(d)?;
        let value = V::decode(d)?;
        insert(key, value);
    }
    Ok(())
}

/// Mappings are lists of `2 * len` values alternating keys and values.
impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        encode_entries(e, self.len(), self.iter())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        let mut map = BTreeMap::new();
        decode_entries(d, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        encode_entries(e, self.len(), self.iter())
    }

    fn is_default(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: Decode + Eq + Hash,
    V: Decode,
    S: std::hash::BuildHasher + Default,
{
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        let mut map = HashMap::default();
        decode_entries(d, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }
}

impl<T: Record> Encode for Handle<T> {
    fn encode(&self, e: &mut Encoder<'_>) -> CodecResult<()> {
        e.encode_handle(*self)
    }
}

impl<T: Record> Decode for Handle<T> {
    fn decode(d: &mut Decoder<'_>) -> CodecResult<Self> {
        d.decode_handle()
    }
}
