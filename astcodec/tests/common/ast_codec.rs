// Code generated by astcodec-gen. DO NOT EDIT.

#[allow(unused_variables)]
impl ::astcodec::Record for Call {
    const TYPE_NAME: &'static str = "test.Call";

    fn encode_fields(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        if !::astcodec::Encode::is_default(&self.func) {
            e.encode_field(0)?;
            ::astcodec::Encode::encode(&self.func, e)?;
        }
        if !::astcodec::Encode::is_default(&self.args) {
            e.encode_field(1)?;
            ::astcodec::Encode::encode(&self.args, e)?;
        }
        if !::astcodec::Encode::is_default(&self.note) {
            e.encode_field(2)?;
            ::astcodec::Encode::encode(&self.note, e)?;
        }
        Ok(())
    }

    fn decode_fields(&mut self, d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<()> {
        while let Some(number) = d.next_field()? {
            match number {
                0 => self.func = ::astcodec::Decode::decode(d)?,
                1 => self.args = ::astcodec::Decode::decode(d)?,
                2 => self.note = ::astcodec::Decode::decode(d)?,
                _ => d.skip_unknown_field(Self::TYPE_NAME, number)?,
            }
        }
        Ok(())
    }
}

impl ::astcodec::Encode for Call {
    fn encode(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        e.encode_record(self)
    }

    fn is_default(&self) -> bool {
        !(!::astcodec::Encode::is_default(&self.func))
            && !(!::astcodec::Encode::is_default(&self.args))
            && !(!::astcodec::Encode::is_default(&self.note))
    }
}

impl ::astcodec::Decode for Call {
    fn decode(d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<Self> {
        d.decode_record()
    }
}

::astcodec::register_type!(Call, "test.Call");
::astcodec::register_type!(::astcodec::Handle<Call>, "Handle<test.Call>");

#[allow(unused_variables)]
impl ::astcodec::Record for Ident {
    const TYPE_NAME: &'static str = "test.Ident";

    fn encode_fields(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        if !self.name.is_empty() {
            e.encode_field(0)?;
            e.encode_string(&self.name)?;
        }
        if self.pos != 0 {
            e.encode_field(1)?;
            e.encode_uint(self.pos as u64)?;
        }
        Ok(())
    }

    fn decode_fields(&mut self, d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<()> {
        while let Some(number) = d.next_field()? {
            match number {
                0 => self.name = d.decode_string()?,
                1 => self.pos = d.decode_uint_as::<u32>()?,
                _ => d.skip_unknown_field(Self::TYPE_NAME, number)?,
            }
        }
        Ok(())
    }
}

impl ::astcodec::Encode for Ident {
    fn encode(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        e.encode_record(self)
    }

    fn is_default(&self) -> bool {
        !(!self.name.is_empty()) && !(self.pos != 0)
    }
}

impl ::astcodec::Decode for Ident {
    fn decode(d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<Self> {
        d.decode_record()
    }
}

::astcodec::register_type!(Ident, "test.Ident");
::astcodec::register_type!(::astcodec::Handle<Ident>, "Handle<test.Ident>");

#[allow(unused_variables)]
impl ::astcodec::Record for Scope {
    const TYPE_NAME: &'static str = "test.Scope";

    fn encode_fields(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        if !::astcodec::Encode::is_default(&self.outer) {
            e.encode_field(0)?;
            ::astcodec::Encode::encode(&self.outer, e)?;
        }
        if !::astcodec::Encode::is_default(&self.objects) {
            e.encode_field(1)?;
            ::astcodec::Encode::encode(&self.objects, e)?;
        }
        Ok(())
    }

    fn decode_fields(&mut self, d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<()> {
        while let Some(number) = d.next_field()? {
            match number {
                0 => self.outer = ::astcodec::Decode::decode(d)?,
                1 => self.objects = ::astcodec::Decode::decode(d)?,
                _ => d.skip_unknown_field(Self::TYPE_NAME, number)?,
            }
        }
        Ok(())
    }
}

impl ::astcodec::Encode for Scope {
    fn encode(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        e.encode_record(self)
    }

    fn is_default(&self) -> bool {
        !(!::astcodec::Encode::is_default(&self.outer))
            && !(!::astcodec::Encode::is_default(&self.objects))
    }
}

impl ::astcodec::Decode for Scope {
    fn decode(d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<Self> {
        d.decode_record()
    }
}

::astcodec::register_type!(Scope, "test.Scope");
::astcodec::register_type!(::astcodec::Handle<Scope>, "Handle<test.Scope>");

#[allow(unused_variables)]
impl ::astcodec::Record for Literal {
    const TYPE_NAME: &'static str = "test.Literal";

    fn encode_fields(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        if self.kind != 0 {
            e.encode_field(0)?;
            e.encode_int(self.kind as i64)?;
        }
        if !self.value.is_empty() {
            e.encode_field(1)?;
            e.encode_string(&self.value)?;
        }
        if !self.raw.is_empty() {
            e.encode_field(2)?;
            e.encode_bytes(&self.raw)?;
        }
        if self.ratio != 0.0 {
            e.encode_field(3)?;
            e.encode_float(self.ratio)?;
        }
        if self.exact {
            e.encode_field(4)?;
            e.encode_bool(self.exact)?;
        }
        if !::astcodec::Encode::is_default(&self.parts) {
            e.encode_field(5)?;
            ::astcodec::Encode::encode(&self.parts, e)?;
        }
        if !::astcodec::Encode::is_default(&self.inner) {
            e.encode_field(6)?;
            ::astcodec::Encode::encode(&self.inner, e)?;
        }
        if !::astcodec::Encode::is_default(&self.chunks) {
            e.encode_field(7)?;
            ::astcodec::Encode::encode(&self.chunks, e)?;
        }
        if !::astcodec::Encode::is_default(&self.base) {
            e.encode_field(8)?;
            ::astcodec::Encode::encode(&self.base, e)?;
        }
        Ok(())
    }

    fn decode_fields(&mut self, d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<()> {
        while let Some(number) = d.next_field()? {
            match number {
                0 => self.kind = d.decode_int_as::<i8>()?,
                1 => self.value = d.decode_string()?,
                2 => self.raw = d.decode_bytes()?,
                3 => self.ratio = d.decode_float()?,
                4 => self.exact = d.decode_bool()?,
                5 => self.parts = ::astcodec::Decode::decode(d)?,
                6 => self.inner = ::astcodec::Decode::decode(d)?,
                7 => self.chunks = ::astcodec::Decode::decode(d)?,
                8 => self.base = ::astcodec::Decode::decode(d)?,
                _ => d.skip_unknown_field(Self::TYPE_NAME, number)?,
            }
        }
        Ok(())
    }
}

impl ::astcodec::Encode for Literal {
    fn encode(&self, e: &mut ::astcodec::Encoder<'_>) -> ::astcodec::CodecResult<()> {
        e.encode_record(self)
    }

    fn is_default(&self) -> bool {
        !(self.kind != 0)
            && !(!self.value.is_empty())
            && !(!self.raw.is_empty())
            && !(self.ratio != 0.0)
            && !(self.exact)
            && !(!::astcodec::Encode::is_default(&self.parts))
            && !(!::astcodec::Encode::is_default(&self.inner))
            && !(!::astcodec::Encode::is_default(&self.chunks))
            && !(!::astcodec::Encode::is_default(&self.base))
    }
}

impl ::astcodec::Decode for Literal {
    fn decode(d: &mut ::astcodec::Decoder<'_>) -> ::astcodec::CodecResult<Self> {
        d.decode_record()
    }
}

::astcodec::register_type!(Literal, "test.Literal");
::astcodec::register_type!(::astcodec::Handle<Literal>, "Handle<test.Literal>");
::astcodec::register_type!(::std::vec::Vec<::astcodec::Handle<Ident>>, "Vec<Handle<test.Ident>>");
::astcodec::register_type!(
    ::std::collections::BTreeMap<::std::string::String, ::astcodec::Handle<Ident>>,
    "BTreeMap<String, Handle<test.Ident>>"
);
::astcodec::register_type!(::std::vec::Vec<Ident>, "Vec<test.Ident>");
::astcodec::register_type!(::std::vec::Vec<::astcodec::Bytes>, "Vec<Bytes>");
