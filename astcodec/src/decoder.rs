use log::{debug, trace};
use smallvec::SmallVec;

use crate::{
    arena::{Arena, Handle},
    dynamic::AnyValue,
    encoding::{
        Record,
        stream::ByteSource,
        tag::{END, N_BYTES, N_VALUES, NIL, REF, START},
    },
    registry::{Registry, TypeEntry},
    utils::error::{CodecError, CodecResult},
};

/// Header of a composite value, the first step of decoding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructHeader {
    /// Absent value; no field data follows.
    Nil,
    /// Back-reference to the composite value started with this index.
    Ref(u64),
    /// A field stream follows, terminated by `END`.
    Start,
}

/// Default bound on how deeply records, lists and dynamic values may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What a reference index stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefSlot {
    /// Shared value at this arena index.
    Shared(u32),
    /// Record held by value; nothing may refer to it.
    Owned,
    /// Value skipped as an unknown field, its fields starting at this offset.
    Skipped(usize),
}

/// One decoding session.
///
/// Construction reads the type-name table that prefixes every payload and
/// resolves each name against the registry, so a payload mentioning an
/// unknown type is rejected before any value is decoded. Shared values are
/// materialised into the session's [`Arena`], retrieved with
/// [`Decoder::into_arena`] once decoding is done.
///
/// Input nesting deeper than [`DEFAULT_MAX_DEPTH`] (see
/// [`Decoder::set_max_depth`]) is rejected as malformed instead of
/// exhausting the stack.
pub struct Decoder<'a> {
    source: ByteSource<'a>,
    types: SmallVec<[&'static TypeEntry; 8]>,
    refs: Vec<RefSlot>,
    // Next reference index to reassign while re-reading a skipped value
    replay: Option<usize>,
    arena: Arena,
    depth: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> CodecResult<Self> {
        Self::with_registry(data, Registry::global()?)
    }

    pub fn with_registry(data: &'a [u8], registry: &Registry) -> CodecResult<Self> {
        let mut source = ByteSource::new(data);

        let count = match start_list(&mut source)? {
            Some(count) => count,
            None => return Err(CodecError::malformed(0, "missing type-name table")),
        };

        let mut types: SmallVec<[&'static TypeEntry; 8]> = SmallVec::new();
        for _ in 0..count {
            let name = source.take_str()?;
            let entry = registry
                .by_name(name)
                .ok_or_else(|| CodecError::UnregisteredType(name.to_string()))?;
            types.push(entry);
        }

        if !types.is_empty() {
            debug!(
                "Session type table: {:?}",
                types.iter().map(|entry| entry.name).collect::<Vec<_>>()
            );
        }

        Ok(Self {
            source,
            types,
            refs: Vec::new(),
            replay: None,
            arena: Arena::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    fn enter(&mut self) -> CodecResult<()> {
        if self.depth >= self.max_depth {
            return Err(self.malformed(format!(
                "values nested deeper than {} level(s)",
                self.max_depth
            )));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Assign the reference index of a composite value just started.
    fn claim_ref(&mut self, slot: RefSlot) {
        match &mut self.replay {
            // Nested values of a re-read value already hold their indices
            Some(next) => {
                let index = *next;
                *next += 1;
                match self.refs.get_mut(index) {
                    Some(entry) if matches!(entry, RefSlot::Skipped(_)) => *entry = slot,
                    Some(_) => {}
                    None => self.refs.push(slot),
                }
            }
            None => self.refs.push(slot),
        }
    }

    /// Arena index of the value the replay is about to meet, when a
    /// reference already materialised it.
    fn replayed_shared(&self) -> Option<u32> {
        match self.replay.and_then(|next| self.refs.get(next)) {
            Some(RefSlot::Shared(index)) => Some(*index),
            _ => None,
        }
    }

    fn malformed(&self, message: impl Into<String>) -> CodecError {
        CodecError::malformed(self.source.position(), message)
    }

    pub fn decode_uint(&mut self) -> CodecResult<u64> {
        self.source.take_uint()
    }

    pub fn decode_int(&mut self) -> CodecResult<i64> {
        self.source.take_int()
    }

    /// Decode an unsigned integer into a narrower type, failing when the
    /// value does not fit.
    pub fn decode_uint_as<T: TryFrom<u64>>(&mut self) -> CodecResult<T> {
        let offset = self.source.position();
        let value = self.source.take_uint()?;
        T::try_from(value).map_err(|_| {
            CodecError::malformed(
                offset,
                format!(
                    "{value} does not fit in {}",
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    /// Decode a signed integer into a narrower type, failing when the value
    /// does not fit.
    pub fn decode_int_as<T: TryFrom<i64>>(&mut self) -> CodecResult<T> {
        let offset = self.source.position();
        let value = self.source.take_int()?;
        T::try_from(value).map_err(|_| {
            CodecError::malformed(
                offset,
                format!(
                    "{value} does not fit in {}",
                    std::any::type_name::<T>()
                ),
            )
        })
    }

    pub fn decode_bool(&mut self) -> CodecResult<bool> {
        self.source.take_bool()
    }

    pub fn decode_float(&mut self) -> CodecResult<f64> {
        self.source.take_float()
    }

    pub fn decode_bytes(&mut self) -> CodecResult<Vec<u8>> {
        Ok(self.source.take_bytes()?.to_vec())
    }

    /// Borrow a text value straight from the input.
    pub fn decode_str(&mut self) -> CodecResult<&'a str> {
        self.source.take_str()
    }

    pub fn decode_string(&mut self) -> CodecResult<String> {
        Ok(self.source.take_str()?.to_string())
    }

    /// Consume a `NIL` tag if one comes next.
    pub fn take_nil(&mut self) -> CodecResult<bool> {
        if self.source.peek_byte()? == NIL {
            self.source.read_byte()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Start a sequence: `None` for an absent one, `Some(count)` otherwise.
    pub fn start_list(&mut self) -> CodecResult<Option<usize>> {
        start_list(&mut self.source)
    }

    /// Capacity to reserve for `count` elements.
    ///
    /// Every element occupies at least one byte, so a count larger than the
    /// rest of the input is necessarily malformed; bounding by the remaining
    /// length keeps hostile counts from triggering huge allocations.
    pub fn capacity_hint(&self, count: usize) -> usize {
        count.min(self.source.remaining())
    }

    /// Read the header of a composite value.
    pub fn start_struct(&mut self) -> CodecResult<StructHeader> {
        match self.source.read_byte()? {
            NIL => Ok(StructHeader::Nil),
            REF => Ok(StructHeader::Ref(self.source.take_uint()?)),
            START => Ok(StructHeader::Start),
            tag => Err(self.source.bad_tag(tag, "NIL, REF or START")),
        }
    }

    /// Number of the next field of the current record, `None` at its end.
    pub fn next_field(&mut self) -> CodecResult<Option<u64>> {
        if self.source.peek_byte()? == END {
            self.source.read_byte()?;
            return Ok(None);
        }
        self.source.take_uint().map(Some)
    }

    /// Discard the value of a field this schema does not know.
    ///
    /// Data written by a newer schema may carry fields an older reader has
    /// no slot for; the value is parsed and dropped so the rest of the record
    /// still decodes.
    pub fn skip_unknown_field(&mut self, type_name: &str, number: u64) -> CodecResult<()> {
        trace!("Skipping unknown field {number} of '{type_name}'");
        self.skip()
    }

    /// Parse one value of any shape and drop it.
    ///
    /// A skipped composite value keeps its reference index, so a field this
    /// schema knows may still refer to it later; it is then decoded from
    /// where it was skipped.
    pub fn skip(&mut self) -> CodecResult<()> {
        let tag = self.source.read_byte()?;
        if tag < END {
            return Ok(());
        }

        match tag {
            NIL => Ok(()),
            N_BYTES => {
                let len = self.source.take_len()?;
                self.source.skip_bytes(len)
            }
            N_VALUES => {
                let count = self.source.take_len()?;
                self.enter()?;
                for _ in 0..count {
                    self.skip()?;
                }
                self.leave();
                Ok(())
            }
            REF => self.source.take_uint().map(|_| ()),
            START => {
                // Keep reference indices aligned with the encoder
                let offset = self.source.position();
                self.claim_ref(RefSlot::Skipped(offset));
                self.enter()?;
                self.skip_fields()?;
                self.leave();
                Ok(())
            }
            tag => Err(self.source.bad_tag(tag, "a value")),
        }
    }

    fn skip_fields(&mut self) -> CodecResult<()> {
        while self.next_field()?.is_some() {
            self.skip()?;
        }
        Ok(())
    }

    /// Decode a record held by value.
    pub fn decode_record<T: Record>(&mut self) -> CodecResult<T> {
        match self.start_struct()? {
            StructHeader::Start => {
                self.claim_ref(RefSlot::Owned);
                self.enter()?;
                let mut value = T::default();
                value.decode_fields(self)?;
                self.leave();
                Ok(value)
            }
            StructHeader::Nil => Err(self.malformed(format!(
                "unexpected NIL for a value of '{}'",
                T::TYPE_NAME
            ))),
            StructHeader::Ref(index) => Err(self.malformed(format!(
                "unexpected reference #{index} for a value of '{}'",
                T::TYPE_NAME
            ))),
        }
    }

    /// Decode a shared value, allocating it in the session arena the first
    /// time it is met and resolving back-references afterwards.
    pub fn decode_handle<T: Record>(&mut self) -> CodecResult<Handle<T>> {
        match self.start_struct()? {
            StructHeader::Start => {
                if let Some(arena_index) = self.replayed_shared() {
                    // Already decoded through a later reference
                    if !self.arena.holds::<T>(arena_index) {
                        return Err(self.malformed(format!(
                            "value does not match its earlier use as a '{}'",
                            T::TYPE_NAME
                        )));
                    }
                    self.claim_ref(RefSlot::Shared(arena_index));
                    self.enter()?;
                    self.skip_fields()?;
                    self.leave();
                    return Ok(Handle::from_index(arena_index));
                }

                // Registered before its fields so nested references resolve
                let handle = self.arena.reserve::<T>();
                self.claim_ref(RefSlot::Shared(handle.index()));

                self.enter()?;
                let mut value = T::default();
                value.decode_fields(self)?;
                self.leave();
                self.arena.fill(handle, value);
                Ok(handle)
            }
            StructHeader::Ref(index) => {
                let target = usize::try_from(index)
                    .ok()
                    .and_then(|at| Some((at, *self.refs.get(at)?)));
                match target {
                    Some((_, RefSlot::Shared(arena_index))) if self.arena.holds::<T>(arena_index) => {
                        Ok(Handle::from_index(arena_index))
                    }
                    Some((_, RefSlot::Shared(_))) => Err(self.malformed(format!(
                        "reference #{index} does not point to a '{}'",
                        T::TYPE_NAME
                    ))),
                    Some((at, RefSlot::Skipped(offset))) => self.replay_skipped(at, offset),
                    Some((_, RefSlot::Owned)) => Err(self.malformed(format!(
                        "reference #{index} points to a value that cannot be shared"
                    ))),
                    None => Err(self.malformed(format!(
                        "reference #{index} is out of range ({} value(s) started)",
                        self.refs.len()
                    ))),
                }
            }
            StructHeader::Nil => Err(self.malformed(format!(
                "unexpected NIL for a shared '{}'",
                T::TYPE_NAME
            ))),
        }
    }

    /// Decode, as a `T`, a value skipped earlier as an unknown field that a
    /// known field now refers to.
    fn replay_skipped<T: Record>(&mut self, at: usize, offset: usize) -> CodecResult<Handle<T>> {
        trace!("Re-reading skipped value #{at} as '{}'", T::TYPE_NAME);
        let resume = self.source.position();
        let outer = self.replay.replace(at + 1);
        self.source.seek(offset)?;

        let handle = self.arena.reserve::<T>();
        self.refs[at] = RefSlot::Shared(handle.index());

        self.enter()?;
        let mut value = T::default();
        value.decode_fields(self)?;
        self.leave();
        self.arena.fill(handle, value);

        self.replay = outer;
        self.source.seek(resume)?;
        Ok(handle)
    }

    /// Decode a dynamically typed value.
    pub fn decode_dynamic(&mut self) -> CodecResult<AnyValue> {
        if self.source.peek_byte()? == 0 {
            self.source.read_byte()?;
            return Ok(AnyValue::none());
        }

        match self.start_list()? {
            Some(2) => {}
            Some(len) => {
                return Err(self.malformed(format!(
                    "dynamic value must be a 2-element list, found {len} element(s)"
                )));
            }
            None => return Err(self.malformed("dynamic value must be a 2-element list, found NIL")),
        }

        let number = self.decode_uint()?;
        let entry = usize::try_from(number)
            .ok()
            .and_then(|number| self.types.get(number).copied())
            .ok_or_else(|| {
                self.malformed(format!(
                    "type number {number} is out of range ({} type(s) in table)",
                    self.types.len()
                ))
            })?;

        self.enter()?;
        let value = (entry.decode)(self)?;
        self.leave();
        Ok(AnyValue::from_boxed(Some(value)))
    }

    /// Offset of the next byte to be decoded.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Fail if bytes remain after the root value.
    pub fn finish(&self) -> CodecResult<()> {
        if self.source.is_empty() {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "{} trailing byte(s) after the root value",
                self.source.remaining()
            )))
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn into_arena(self) -> Arena {
        self.arena
    }
}

fn start_list(source: &mut ByteSource<'_>) -> CodecResult<Option<usize>> {
    match source.read_byte()? {
        NIL => Ok(None),
        N_VALUES => source.take_len().map(Some),
        tag => Err(source.bad_tag(tag, "N_VALUES or NIL")),
    }
}
