// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use ahash::AHashMap;

use super::{OrdinaryObject, PropertyKey};
use crate::ecmascript::{
    builtins::ordinary::shape::ObjectShape,
    types::{Value, ValueTypeTag},
};

/// Heap data of an ordinary object.
///
/// Property values live in `values`, in insertion order. `tags` holds, for
/// each slot, the type of the last value written into it. The key of each
/// slot is determined by the layout: either the Object Shape's key list or
/// the object's own dictionary.
#[derive(Debug)]
pub struct ObjectHeapData {
    pub(crate) layout: ObjectLayout,
    pub(crate) values: Vec<Value>,
    pub(crate) tags: Vec<ValueTypeTag>,
    /// Set once the object has been used as the prototype of another object.
    /// Structural changes to prototype objects invalidate prototype lookup
    /// caches.
    pub(crate) is_prototype: bool,
}

impl ObjectHeapData {
    pub(crate) fn new(shape: ObjectShape) -> Self {
        Self {
            layout: ObjectLayout::Shaped(shape),
            values: Vec::new(),
            tags: Vec::new(),
            is_prototype: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

#[derive(Debug)]
pub(crate) enum ObjectLayout {
    /// Keys and prototype are shared through an Object Shape.
    Shaped(ObjectShape),
    /// Keys and prototype are owned by the object.
    ///
    /// Objects enter dictionary mode when a property is deleted or when they
    /// grow beyond the shaped property limit, and never leave it.
    Dictionary(Box<DictionaryLayout>),
}

#[derive(Debug)]
pub(crate) struct DictionaryLayout {
    pub(crate) prototype: Option<OrdinaryObject>,
    /// Keys in insertion order; index equals the value slot.
    pub(crate) keys: Vec<PropertyKey>,
    pub(crate) lookup: AHashMap<PropertyKey, u32>,
}

impl DictionaryLayout {
    pub(crate) fn new(prototype: Option<OrdinaryObject>, keys: Vec<PropertyKey>) -> Self {
        let lookup = keys
            .iter()
            .enumerate()
            .map(|(index, key)| (*key, index as u32))
            .collect();
        Self {
            prototype,
            keys,
            lookup,
        }
    }

    pub(crate) fn push(&mut self, key: PropertyKey) -> u32 {
        let index = self.keys.len() as u32;
        self.keys.push(key);
        self.lookup.insert(key, index);
        index
    }

    /// Remove the key at `index`, shifting all later keys one slot down.
    pub(crate) fn remove(&mut self, index: u32) {
        let key = self.keys.remove(index as usize);
        self.lookup.remove(&key);
        for (i, key) in self.keys.iter().enumerate().skip(index as usize) {
            self.lookup.insert(*key, i as u32);
        }
    }
}
