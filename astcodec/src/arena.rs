use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    ops::{Index, IndexMut},
};

/// Typed index of a value stored in an [`Arena`].
///
/// Handles are how a tree expresses sharing: two fields holding the same
/// handle point to one value, and the encoder writes that value once and a
/// back-reference for every further occurrence. Decoding rebuilds the same
/// topology, so identity (not mere equality) survives a round-trip.
pub struct Handle<T> {
    index: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn from_index(index: u32) -> Self {
        Self {
            index,
            marker: PhantomData,
        }
    }

    /// Position of the value inside its arena.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle#{}", self.index)
    }
}

struct Slot {
    type_id: TypeId,
    // Empty while the decoder is still reading the value's fields
    value: Option<Box<dyn Any + Send + Sync>>,
}

/// Owner of every shared composite value of a tree.
///
/// Values of any `'static` thread-safe type live side by side; a [`Handle<T>`] remembers
/// the type so lookups downcast without a runtime failure for well-formed
/// handles. Values are never removed, so handles stay valid for the
/// lifetime of the arena.
///
/// ```
/// use astcodec::arena::Arena;
///
/// let mut arena = Arena::new();
/// let a = arena.alloc(String::from("shared"));
/// let b = a;
/// assert_eq!(arena[a], arena[b]);
/// assert_eq!(arena.len(), 1);
/// ```
#[derive(Default)]
pub struct Arena {
    slots: Vec<Slot>,
}

impl Arena {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Move `value` into the arena and return its handle.
    pub fn alloc<T: Send + Sync + 'static>(&mut self, value: T) -> Handle<T> {
        let handle = self.reserve::<T>();
        self.slots[handle.index as usize].value = Some(Box::new(value));
        handle
    }

    /// Allocate an empty slot for a value of type `T`.
    ///
    /// The decoder reserves the slot of a shared value before reading its
    /// fields, so that nested back-references to it resolve.
    pub(crate) fn reserve<T: 'static>(&mut self) -> Handle<T> {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            type_id: TypeId::of::<T>(),
            value: None,
        });
        Handle::from_index(index)
    }

    pub(crate) fn fill<T: Send + Sync + 'static>(&mut self, handle: Handle<T>, value: T) {
        let slot = &mut self.slots[handle.index as usize];
        debug_assert_eq!(slot.type_id, TypeId::of::<T>());
        slot.value = Some(Box::new(value));
    }

    /// Whether `index` names a slot holding (or reserved for) a `T`.
    pub(crate) fn holds<T: 'static>(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|slot| slot.type_id == TypeId::of::<T>())
    }

    pub fn get<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        self.slots
            .get(handle.index as usize)?
            .value
            .as_ref()?
            .downcast_ref::<T>()
    }

    pub fn get_mut<T: 'static>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)?
            .value
            .as_mut()?
            .downcast_mut::<T>()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("len", &self.slots.len())
            .finish()
    }
}

impl<T: 'static> Index<Handle<T>> for Arena {
    type Output = T;

    fn index(&self, handle: Handle<T>) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("{handle:?} does not belong to this arena"),
        }
    }
}

impl<T: 'static> IndexMut<Handle<T>> for Arena {
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("{handle:?} does not belong to this arena"),
        }
    }
}
