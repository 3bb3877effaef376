// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub(crate) mod indexes;

use core::ops::{Index, IndexMut};

use ahash::RandomState;
use hashbrown::HashTable;

#[cfg(feature = "array-buffer")]
use crate::ecmascript::builtins::{
    array_buffer::{ArrayBuffer, ArrayBufferHeapData},
    typed_array::{TypedArray, TypedArrayHeapData},
};
#[cfg(feature = "shared-array-buffer")]
use crate::ecmascript::builtins::shared_array_buffer::{SharedArrayBuffer, SharedArrayBufferHeapData};
use crate::ecmascript::{
    builtins::{
        array::{Array, ArrayHeapData},
        builtin_function::{BuiltinFunction, BuiltinFunctionHeapData},
        error::{Error, ErrorHeapData},
        ordinary::{
            caches::Caches,
            shape::{ObjectShape, ObjectShapeRecord, ObjectShapeTransitionMap, PrototypeShapeTable},
        },
    },
    types::{HeapString, ObjectHeapData, OrdinaryObject, PropertyKey, StringHeapData},
};
use indexes::{BaseIndex, StringIndex};

/// Arena of all engine data.
///
/// Every heap entity is addressed by a [BaseIndex] into one of the vectors
/// below. Nothing is ever freed: the heap only grows.
#[derive(Debug)]
pub struct Heap {
    pub(crate) strings: Vec<StringHeapData>,
    /// Lookup table for interning heap strings: equal contents always map to
    /// the same [StringIndex].
    string_lookup_table: HashTable<StringIndex>,
    pub(crate) hasher: RandomState,
    pub(crate) objects: Vec<ObjectHeapData>,
    pub(crate) object_shapes: Vec<ObjectShapeRecord>,
    pub(crate) object_shape_transitions: Vec<ObjectShapeTransitionMap>,
    /// Key storage of Object Shapes. Child shapes share a prefix of their
    /// parent's storage where possible.
    pub(crate) shape_keys: Vec<Vec<PropertyKey>>,
    pub(crate) prototype_shapes: PrototypeShapeTable,
    pub(crate) caches: Caches,
    pub(crate) arrays: Vec<ArrayHeapData>,
    pub(crate) builtin_functions: Vec<BuiltinFunctionHeapData>,
    pub(crate) errors: Vec<ErrorHeapData>,
    #[cfg(feature = "array-buffer")]
    pub(crate) array_buffers: Vec<ArrayBufferHeapData>,
    #[cfg(feature = "shared-array-buffer")]
    pub(crate) shared_array_buffers: Vec<SharedArrayBufferHeapData>,
    #[cfg(feature = "array-buffer")]
    pub(crate) typed_arrays: Vec<TypedArrayHeapData>,
}

pub trait CreateHeapData<T, F> {
    /// Creates a heap entity from the given data and returns a handle to it.
    fn create(&mut self, data: T) -> F;
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    pub fn new() -> Self {
        Self {
            strings: Vec::with_capacity(256),
            string_lookup_table: HashTable::with_capacity(256),
            hasher: RandomState::new(),
            objects: Vec::with_capacity(64),
            object_shapes: vec![ObjectShapeRecord::NULL],
            object_shape_transitions: vec![ObjectShapeTransitionMap::EMPTY],
            shape_keys: vec![Vec::new()],
            prototype_shapes: PrototypeShapeTable::with_capacity(16),
            caches: Caches::with_capacity(64),
            arrays: Vec::with_capacity(16),
            builtin_functions: Vec::with_capacity(32),
            errors: Vec::with_capacity(8),
            #[cfg(feature = "array-buffer")]
            array_buffers: Vec::new(),
            #[cfg(feature = "shared-array-buffer")]
            shared_array_buffers: Vec::new(),
            #[cfg(feature = "array-buffer")]
            typed_arrays: Vec::new(),
        }
    }

    /// Find an existing heap string with the given contents.
    pub(crate) fn find_equal_string(&self, message: &str) -> Option<HeapString> {
        let hash = self.hasher.hash_one(message);
        self.string_lookup_table
            .find(hash, |index| self.strings[index.into_index()].as_str() == message)
            .map(|index| HeapString(*index))
    }

    /// Allocate a heap string, or return the existing one if a string with
    /// equal contents has already been allocated.
    ///
    /// Strings of 7 bytes or fewer should be created as
    /// [SmallString](small_string::SmallString)s instead.
    pub(crate) fn alloc_string(&mut self, message: &str) -> HeapString {
        debug_assert!(message.len() > small_string::MAX_LEN);
        if let Some(found) = self.find_equal_string(message) {
            return found;
        }
        let hash = self.hasher.hash_one(message);
        self.strings.push(StringHeapData::from_str(message));
        let index = StringIndex::last(&self.strings);
        let strings = &self.strings;
        let hasher = &self.hasher;
        self.string_lookup_table
            .insert_unique(hash, index, |index| {
                hasher.hash_one(strings[index.into_index()].as_str())
            });
        HeapString(index)
    }
}

impl CreateHeapData<ObjectHeapData, OrdinaryObject> for Heap {
    fn create(&mut self, data: ObjectHeapData) -> OrdinaryObject {
        self.objects.push(data);
        OrdinaryObject(BaseIndex::last(&self.objects))
    }
}

impl CreateHeapData<(ObjectShapeRecord, ObjectShapeTransitionMap), ObjectShape> for Heap {
    fn create(&mut self, (record, transitions): (ObjectShapeRecord, ObjectShapeTransitionMap)) -> ObjectShape {
        self.object_shapes.push(record);
        self.object_shape_transitions.push(transitions);
        ObjectShape::last(&self.object_shapes)
    }
}

impl CreateHeapData<ArrayHeapData, Array> for Heap {
    fn create(&mut self, data: ArrayHeapData) -> Array {
        self.arrays.push(data);
        Array(BaseIndex::last(&self.arrays))
    }
}

impl CreateHeapData<BuiltinFunctionHeapData, BuiltinFunction> for Heap {
    fn create(&mut self, data: BuiltinFunctionHeapData) -> BuiltinFunction {
        self.builtin_functions.push(data);
        BuiltinFunction(BaseIndex::last(&self.builtin_functions))
    }
}

impl CreateHeapData<ErrorHeapData, Error> for Heap {
    fn create(&mut self, data: ErrorHeapData) -> Error {
        self.errors.push(data);
        Error(BaseIndex::last(&self.errors))
    }
}

#[cfg(feature = "array-buffer")]
impl CreateHeapData<ArrayBufferHeapData, ArrayBuffer> for Heap {
    fn create(&mut self, data: ArrayBufferHeapData) -> ArrayBuffer {
        self.array_buffers.push(data);
        ArrayBuffer(BaseIndex::last(&self.array_buffers))
    }
}

#[cfg(feature = "shared-array-buffer")]
impl CreateHeapData<SharedArrayBufferHeapData, SharedArrayBuffer> for Heap {
    fn create(&mut self, data: SharedArrayBufferHeapData) -> SharedArrayBuffer {
        self.shared_array_buffers.push(data);
        SharedArrayBuffer(BaseIndex::last(&self.shared_array_buffers))
    }
}

#[cfg(feature = "array-buffer")]
impl CreateHeapData<TypedArrayHeapData, TypedArray> for Heap {
    fn create(&mut self, data: TypedArrayHeapData) -> TypedArray {
        self.typed_arrays.push(data);
        TypedArray(BaseIndex::last(&self.typed_arrays))
    }
}

impl Index<OrdinaryObject> for Heap {
    type Output = ObjectHeapData;

    fn index(&self, index: OrdinaryObject) -> &Self::Output {
        &self.objects[index.0.into_index()]
    }
}

impl IndexMut<OrdinaryObject> for Heap {
    fn index_mut(&mut self, index: OrdinaryObject) -> &mut Self::Output {
        &mut self.objects[index.0.into_index()]
    }
}

impl Index<Array> for Heap {
    type Output = ArrayHeapData;

    fn index(&self, index: Array) -> &Self::Output {
        &self.arrays[index.0.into_index()]
    }
}

impl IndexMut<Array> for Heap {
    fn index_mut(&mut self, index: Array) -> &mut Self::Output {
        &mut self.arrays[index.0.into_index()]
    }
}

impl Index<BuiltinFunction> for Heap {
    type Output = BuiltinFunctionHeapData;

    fn index(&self, index: BuiltinFunction) -> &Self::Output {
        &self.builtin_functions[index.0.into_index()]
    }
}

impl Index<Error> for Heap {
    type Output = ErrorHeapData;

    fn index(&self, index: Error) -> &Self::Output {
        &self.errors[index.0.into_index()]
    }
}

impl Index<HeapString> for Heap {
    type Output = StringHeapData;

    fn index(&self, index: HeapString) -> &Self::Output {
        &self.strings[index.0.into_index()]
    }
}

#[cfg(feature = "array-buffer")]
impl Index<ArrayBuffer> for Heap {
    type Output = ArrayBufferHeapData;

    fn index(&self, index: ArrayBuffer) -> &Self::Output {
        &self.array_buffers[index.0.into_index()]
    }
}

#[cfg(feature = "array-buffer")]
impl IndexMut<ArrayBuffer> for Heap {
    fn index_mut(&mut self, index: ArrayBuffer) -> &mut Self::Output {
        &mut self.array_buffers[index.0.into_index()]
    }
}

#[cfg(feature = "shared-array-buffer")]
impl Index<SharedArrayBuffer> for Heap {
    type Output = SharedArrayBufferHeapData;

    fn index(&self, index: SharedArrayBuffer) -> &Self::Output {
        &self.shared_array_buffers[index.0.into_index()]
    }
}

#[cfg(feature = "shared-array-buffer")]
impl IndexMut<SharedArrayBuffer> for Heap {
    fn index_mut(&mut self, index: SharedArrayBuffer) -> &mut Self::Output {
        &mut self.shared_array_buffers[index.0.into_index()]
    }
}

#[cfg(feature = "array-buffer")]
impl Index<TypedArray> for Heap {
    type Output = TypedArrayHeapData;

    fn index(&self, index: TypedArray) -> &Self::Output {
        &self.typed_arrays[index.0.into_index()]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interns_equal_strings() {
        let mut heap = Heap::new();
        let a = heap.alloc_string("a rather long string");
        let b = heap.alloc_string("a rather long string");
        let c = heap.alloc_string("another long string");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(heap.strings.len(), 2);
        assert_eq!(heap.find_equal_string("another long string"), Some(c));
        assert_eq!(heap.find_equal_string("not yet allocated"), None);
    }
}
