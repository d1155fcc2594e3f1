use std::{any::TypeId, collections::HashMap};

use log::trace;

use crate::{
    arena::{Arena, Handle},
    dynamic::Dynamic,
    encoding::{
        Record,
        stream::ByteSink,
        tag::{END, N_VALUES, NIL, REF, START},
    },
    registry::Registry,
    utils::error::{CodecError, CodecResult},
};

/// One encoding session.
///
/// The encoder owns the output buffer and the per-session tables: the
/// reference table that makes shared values encode once, and the type table
/// numbering every dynamically typed value's concrete type in first-seen
/// order. Both tables are meaningless outside the session, so an encoder is
/// consumed by [`Encoder::into_bytes`].
pub struct Encoder<'a> {
    sink: ByteSink,
    registry: &'a Registry,
    arena: Option<&'a Arena>,
    // Arena index -> reference index
    seen: HashMap<u32, u64>,
    next_ref: u64,
    type_numbers: HashMap<TypeId, u64>,
    type_names: Vec<&'static str>,
}

impl Encoder<'static> {
    /// Session over the global registry, for values that hold no handles.
    pub fn new() -> CodecResult<Self> {
        Ok(Encoder::with_registry(Registry::global()?, None))
    }
}

impl<'a> Encoder<'a> {
    /// Session over the global registry whose handles point into `arena`.
    pub fn with_arena(arena: &'a Arena) -> CodecResult<Self> {
        Ok(Encoder::with_registry(Registry::global()?, Some(arena)))
    }

    pub fn with_registry(registry: &'a Registry, arena: Option<&'a Arena>) -> Self {
        Self {
            sink: ByteSink::new(),
            registry,
            arena,
            seen: HashMap::new(),
            next_ref: 0,
            type_numbers: HashMap::new(),
            type_names: Vec::new(),
        }
    }

    pub fn encode_uint(&mut self, value: u64) -> CodecResult<()> {
        self.sink.put_uint(value);
        Ok(())
    }

    pub fn encode_int(&mut self, value: i64) -> CodecResult<()> {
        self.sink.put_int(value);
        Ok(())
    }

    pub fn encode_bool(&mut self, value: bool) -> CodecResult<()> {
        self.sink.put_bool(value);
        Ok(())
    }

    pub fn encode_float(&mut self, value: f64) -> CodecResult<()> {
        self.sink.put_float(value);
        Ok(())
    }

    pub fn encode_bytes(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.sink.put_bytes(bytes);
        Ok(())
    }

    pub fn encode_string(&mut self, value: &str) -> CodecResult<()> {
        self.sink.put_str(value);
        Ok(())
    }

    pub fn encode_nil(&mut self) -> CodecResult<()> {
        self.sink.write_byte(NIL);
        Ok(())
    }

    /// Start a sequence of `len` values. The caller writes the values.
    pub fn start_list(&mut self, len: usize) -> CodecResult<()> {
        self.sink.write_byte(N_VALUES);
        self.sink.put_uint(len as u64);
        Ok(())
    }

    /// Write the number of the record field whose value follows.
    pub fn encode_field(&mut self, number: u64) -> CodecResult<()> {
        self.sink.put_uint(number);
        Ok(())
    }

    /// Encode a record held by value.
    ///
    /// The record consumes a reference index, like a shared one, but nothing
    /// can point back to it.
    pub fn encode_record<T: Record>(&mut self, value: &T) -> CodecResult<()> {
        self.next_ref += 1;
        self.sink.write_byte(START);
        value.encode_fields(self)?;
        self.sink.write_byte(END);
        Ok(())
    }

    /// Encode the value behind `handle`, or a back-reference to it when it
    /// was already written during this session.
    pub fn encode_handle<T: Record>(&mut self, handle: Handle<T>) -> CodecResult<()> {
        if let Some(&index) = self.seen.get(&handle.index()) {
            self.sink.write_byte(REF);
            self.sink.put_uint(index);
            return Ok(());
        }

        let arena = self.arena;
        let value = arena
            .and_then(|arena| arena.get(handle))
            .ok_or(CodecError::DanglingHandle(handle.index()))?;

        self.seen.insert(handle.index(), self.next_ref);
        self.encode_record(value)
    }

    /// Encode a dynamically typed value as `[type number, value]`, or a
    /// single zero byte when absent.
    pub fn encode_dynamic(&mut self, value: Option<&dyn Dynamic>) -> CodecResult<()> {
        let Some(value) = value else {
            self.sink.write_byte(0);
            return Ok(());
        };

        let type_id = value.as_any().type_id();
        let entry = self
            .registry
            .by_type(type_id)
            .ok_or_else(|| CodecError::UnregisteredType(value.rust_type_name().to_string()))?;

        let number = match self.type_numbers.get(&type_id) {
            Some(&number) => number,
            None => {
                let number = self.type_names.len() as u64;
                self.type_numbers.insert(type_id, number);
                self.type_names.push(entry.name);
                number
            }
        };

        self.start_list(2)?;
        self.sink.put_uint(number);
        (entry.encode)(value, self)
    }

    /// Number of payload bytes written so far (type-name table excluded).
    pub fn len(&self) -> usize {
        self.sink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.is_empty()
    }

    /// Finish the session: the type-name table followed by the payload.
    ///
    /// The table is only known once the whole payload was produced, which is
    /// why it is assembled last and placed in front.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut header = ByteSink::with_capacity(self.sink.len() + 16);
        header.write_byte(N_VALUES);
        header.put_uint(self.type_names.len() as u64);
        for name in &self.type_names {
            header.put_str(name);
        }

        trace!(
            "Encoded {} payload byte(s), {} shared value(s), type table {:?}",
            self.sink.len(),
            self.seen.len(),
            self.type_names
        );

        header.write_bytes(self.sink.as_slice());
        header.into_vec()
    }
}
