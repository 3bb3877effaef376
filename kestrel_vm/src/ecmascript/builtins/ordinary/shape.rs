// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::num::NonZeroU32;

use ahash::AHashMap;
use hashbrown::{HashTable, hash_table::Entry};

use crate::{
    ecmascript::types::{OrdinaryObject, PropertyKey},
    heap::{CreateHeapData, Heap},
};

/// Data structure describing the shape of an object.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ObjectShape(NonZeroU32);

impl ObjectShape {
    /// Object Shape for `{ __proto__: null }`.
    ///
    /// This is the root Object Shape for all null-prototype objects, hence why
    /// it can be accessed statically.
    pub(crate) const NULL: Self = Self(NonZeroU32::new(1).unwrap());

    /// Get the implied usize index of the ObjectShape reference.
    #[inline(always)]
    pub(crate) fn get_index(self) -> usize {
        self.0.get().wrapping_sub(1) as usize
    }

    /// Get the keys of the Object Shape in insertion order.
    pub(crate) fn keys(self, heap: &Heap) -> &[PropertyKey] {
        let data = &heap.object_shapes[self.get_index()];
        &heap.shape_keys[data.keys as usize][..data.len as usize]
    }

    /// Get the prototype of the Object Shape.
    pub(crate) fn get_prototype(self, heap: &Heap) -> Option<OrdinaryObject> {
        heap.object_shapes[self.get_index()].prototype
    }

    /// Find the offset of the given key in the Object Shape.
    pub(crate) fn find_offset(self, heap: &Heap, key: PropertyKey) -> Option<u32> {
        self.keys(heap)
            .iter()
            .position(|k| *k == key)
            .map(|offset| offset as u32)
    }

    /// Get the Object Shape that is reached by adding the given property to
    /// this Object Shape.
    ///
    /// Returns None if no transition exists.
    pub(crate) fn get_transition_to(self, key: PropertyKey, heap: &Heap) -> Option<ObjectShape> {
        let transitions = &heap.object_shape_transitions[self.get_index()];
        transitions
            .table
            .find(key.heap_hash(), |(k, _)| *k == key)
            .map(|(_, shape)| *shape)
    }

    /// Get an Object Shape pointing to the last Object Shape Record.
    pub(crate) fn last(shapes: &[ObjectShapeRecord]) -> Self {
        debug_assert!(!shapes.is_empty());
        ObjectShape(
            // SAFETY: The shapes list is not empty.
            unsafe { NonZeroU32::new_unchecked(shapes.len() as u32) },
        )
    }

    pub(crate) fn get_or_create_shape_for_prototype(
        heap: &mut Heap,
        prototype: Option<OrdinaryObject>,
    ) -> ObjectShape {
        let Some(prototype) = prototype else {
            return ObjectShape::NULL;
        };
        if let Some(base_shape) = heap.prototype_shapes.get_shape_for_prototype(prototype) {
            return base_shape;
        }
        let shape = heap.create((
            ObjectShapeRecord::create_root(prototype),
            ObjectShapeTransitionMap::EMPTY,
        ));
        heap.prototype_shapes
            .set_shape_for_prototype(prototype, shape);
        shape
    }

    /// Get the Object Shape reached by adding `key` to this Object Shape,
    /// creating it if it does not exist yet.
    pub(crate) fn get_child_shape(self, heap: &mut Heap, key: PropertyKey) -> ObjectShape {
        if let Some(next_shape) = self.get_transition_to(key, heap) {
            return next_shape;
        }
        let ObjectShapeRecord {
            prototype,
            keys,
            len,
        } = heap.object_shapes[self.get_index()];
        let storage = &mut heap.shape_keys[keys as usize];
        // Share the parent's key storage if our key can go right after the
        // parent's keys in it.
        let keys = if storage.len() == len as usize {
            storage.push(key);
            keys
        } else if storage.get(len as usize) == Some(&key) {
            keys
        } else {
            let mut own_storage = Vec::with_capacity(len as usize + 1);
            own_storage.extend_from_slice(&storage[..len as usize]);
            own_storage.push(key);
            heap.shape_keys.push(own_storage);
            (heap.shape_keys.len() - 1) as u32
        };
        let next_shape = heap.create((
            ObjectShapeRecord::create(prototype, keys, len + 1),
            ObjectShapeTransitionMap::EMPTY,
        ));
        heap.object_shape_transitions[self.get_index()].insert(key, next_shape);
        next_shape
    }

    /// Get the Object Shape reached by adding all of the given keys in order.
    pub(crate) fn get_or_create_child_shape(
        self,
        heap: &mut Heap,
        keys: &[PropertyKey],
    ) -> ObjectShape {
        keys.iter()
            .fold(self, |shape, key| shape.get_child_shape(heap, *key))
    }
}

/// Data structure describing the shape of an object.
///
/// ## What is a shape?
///
/// Object shapes describe the "shape", ie. the keys of an object and their
/// order. For shape-finding purposes, they also describe any descendants that
/// the shape may have, eg. the object shape `{ x, y }` is a descendant of the
/// shape `{ x }`, as it is created by adding `y` to the latter.
///
/// Two objects containing `{ x, y }` do not need to store a list of keys
/// each: they refer to the same shape, and only store their values. The
/// shape is also what property lookup caches are keyed by: if an object's
/// shape matches a cached shape, the cached offset is valid for it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ObjectShapeRecord {
    /// Prototype of the object shape.
    ///
    /// This takes the place of the \[\[Prototype]] internal slot for shaped
    /// objects. Two otherwise equivalent objects may take different code
    /// paths upon property lookup based on their prototypes, hence the
    /// prototype must be a part of the shape.
    prototype: Option<OrdinaryObject>,
    /// Index of the key storage in the heap's shape key lists.
    keys: u32,
    /// Number of keys of the shape, a prefix of the key storage.
    len: u32,
}

impl ObjectShapeRecord {
    /// Null Object Shape Record.
    ///
    /// This record has a `null` prototype and no keys.
    pub(crate) const NULL: Self = Self {
        prototype: None,
        keys: 0,
        len: 0,
    };

    /// Create a root Object Shape for the given prototype.
    pub(crate) fn create_root(prototype: OrdinaryObject) -> Self {
        Self {
            prototype: Some(prototype),
            keys: 0,
            len: 0,
        }
    }

    pub(crate) fn create(prototype: Option<OrdinaryObject>, keys: u32, len: u32) -> Self {
        Self {
            prototype,
            keys,
            len,
        }
    }
}

/// Data structure for finding a forward transition from an Object Shape to a
/// larger one when a property key is added.
#[derive(Debug)]
pub(crate) struct ObjectShapeTransitionMap {
    /// Hash table keyed by PropertyKeys, pointing to an ObjectShape that is
    /// reached by adding said property key to the current Shape.
    table: HashTable<(PropertyKey, ObjectShape)>,
}

impl ObjectShapeTransitionMap {
    /// Transition map of a newly created Object Shape.
    pub(crate) const EMPTY: Self = Self {
        table: HashTable::new(),
    };

    /// Insert a new transition.
    pub(crate) fn insert(&mut self, key: PropertyKey, shape: ObjectShape) {
        match self.table.entry(
            key.heap_hash(),
            |e| e.0 == key,
            |e| e.0.heap_hash(),
        ) {
            Entry::Occupied(_) => {
                unreachable!("Attempted to overwrite an existing Object Shape transition")
            }
            Entry::Vacant(e) => e.insert((key, shape)),
        };
    }
}

/// Lookup-table to find a root Object Shape for a given prototype.
#[derive(Debug)]
#[repr(transparent)]
pub(crate) struct PrototypeShapeTable {
    table: AHashMap<OrdinaryObject, ObjectShape>,
}

impl PrototypeShapeTable {
    /// Create a new PrototypeShapeTable with the given capacity.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            table: AHashMap::with_capacity(capacity),
        }
    }

    /// Get the base Object Shape for the given prototype.
    ///
    /// Returns None if the no base Object Shape exists for the given prototype.
    pub(crate) fn get_shape_for_prototype(&self, prototype: OrdinaryObject) -> Option<ObjectShape> {
        self.table.get(&prototype).copied()
    }

    /// Set the base Object Shape for the given prototype.
    pub(crate) fn set_shape_for_prototype(&mut self, prototype: OrdinaryObject, shape: ObjectShape) {
        let previous = self.table.insert(prototype, shape);
        debug_assert!(previous.is_none());
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use small_string::SmallString;

    fn key(name: &'static str) -> PropertyKey {
        PropertyKey::SmallString(SmallString::try_from(name).unwrap())
    }

    #[test]
    fn transitions_are_shared() {
        let mut heap = Heap::new();
        let x = ObjectShape::NULL.get_child_shape(&mut heap, key("x"));
        let xy = x.get_child_shape(&mut heap, key("y"));
        assert_eq!(ObjectShape::NULL.get_child_shape(&mut heap, key("x")), x);
        assert_eq!(x.get_child_shape(&mut heap, key("y")), xy);
        assert_eq!(xy.keys(&heap), &[key("x"), key("y")]);
        assert_eq!(xy.find_offset(&heap, key("y")), Some(1));
        assert_eq!(xy.find_offset(&heap, key("z")), None);
        assert_eq!(x.get_transition_to(key("y"), &heap), Some(xy));
        assert_eq!(xy.get_transition_to(key("x"), &heap), None);
    }

    #[test]
    fn child_shapes_share_key_storage_prefix() {
        let mut heap = Heap::new();
        let xyz = ObjectShape::NULL.get_or_create_child_shape(&mut heap, &[key("x"), key("y"), key("z")]);
        let storages = heap.shape_keys.len();
        // Branching off from `{ x }` needs a new storage for `{ x, w }`.
        let x = ObjectShape::NULL.get_child_shape(&mut heap, key("x"));
        let xw = x.get_child_shape(&mut heap, key("w"));
        assert_eq!(heap.shape_keys.len(), storages + 1);
        assert_eq!(xw.keys(&heap), &[key("x"), key("w")]);
        assert_eq!(xyz.keys(&heap), &[key("x"), key("y"), key("z")]);
    }
}
