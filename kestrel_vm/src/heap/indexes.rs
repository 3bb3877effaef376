// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::{
    cmp::Ordering,
    fmt::{Debug, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::size_of,
    num::NonZeroU32,
};

#[cfg(feature = "array-buffer")]
use crate::ecmascript::builtins::{
    array_buffer::ArrayBufferHeapData, typed_array::TypedArrayHeapData,
};
#[cfg(feature = "shared-array-buffer")]
use crate::ecmascript::builtins::shared_array_buffer::SharedArrayBufferHeapData;
use crate::ecmascript::{
    builtins::{
        array::ArrayHeapData, builtin_function::BuiltinFunctionHeapData, error::ErrorHeapData,
    },
    types::{ObjectHeapData, StringHeapData},
};

/// Handle to a `T` in one of the heap's vectors.
///
/// Stored as the vector offset plus one, so that `Option<BaseIndex<T>>` is
/// as small as the index itself.
pub struct BaseIndex<T: ?Sized>(NonZeroU32, PhantomData<T>);

const _INDEX_SIZE_IS_U32: () = assert!(size_of::<BaseIndex<()>>() == size_of::<u32>());
const _OPTION_INDEX_SIZE_IS_U32: () =
    assert!(size_of::<Option<BaseIndex<()>>>() == size_of::<u32>());

// Derives would bound the impls on `T`, which is only a marker here.
impl<T: ?Sized> Clone for BaseIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: ?Sized> Copy for BaseIndex<T> {}
impl<T: ?Sized> PartialEq for BaseIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl<T: ?Sized> Eq for BaseIndex<T> {}
impl<T: ?Sized> PartialOrd for BaseIndex<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T: ?Sized> Ord for BaseIndex<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
impl<T: ?Sized> Hash for BaseIndex<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
impl<T: ?Sized> Debug for BaseIndex<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.into_index())
    }
}

impl<T: ?Sized> BaseIndex<T> {
    /// Offset of the entity in its heap vector.
    pub const fn into_index(self) -> usize {
        self.0.get() as usize - 1
    }

    pub const fn from_index(index: usize) -> Self {
        assert!(index < u32::MAX as usize, "heap vector is full");
        match NonZeroU32::new(index as u32 + 1) {
            Some(value) => Self(value, PhantomData),
            None => unreachable!(),
        }
    }
}

impl<T> BaseIndex<T> {
    /// Handle to the most recently pushed entity.
    pub fn last(vec: &[T]) -> Self {
        debug_assert!(!vec.is_empty());
        Self::from_index(vec.len() - 1)
    }
}

pub type ArrayIndex = BaseIndex<ArrayHeapData>;
#[cfg(feature = "array-buffer")]
pub type ArrayBufferIndex = BaseIndex<ArrayBufferHeapData>;
pub type BuiltinFunctionIndex = BaseIndex<BuiltinFunctionHeapData>;
pub type ErrorIndex = BaseIndex<ErrorHeapData>;
pub type ObjectIndex = BaseIndex<ObjectHeapData>;
#[cfg(feature = "shared-array-buffer")]
pub type SharedArrayBufferIndex = BaseIndex<SharedArrayBufferHeapData>;
pub type StringIndex = BaseIndex<StringHeapData>;
#[cfg(feature = "array-buffer")]
pub type TypedArrayIndex = BaseIndex<TypedArrayHeapData>;
