// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::num::NonZeroU32;

use hashbrown::{HashTable, hash_table::Entry};

use crate::ecmascript::{
    execution::Agent,
    types::{InternalMethods, OrdinaryObject, PropertyKey, Value, ValueTypeTag},
};

use super::shape::ObjectShape;

/// Heap structure holding all property lookup caches.
#[derive(Debug)]
pub(crate) struct Caches {
    property_lookup_cache_lookup_table: HashTable<(PropertyKey, PropertyLookupCache)>,
    property_lookup_caches: Vec<PropertyLookupCacheRecord>,
}

impl Caches {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            property_lookup_cache_lookup_table: HashTable::with_capacity(capacity),
            property_lookup_caches: Vec::with_capacity(capacity),
        }
    }

    /// Invalidate property lookup caches on prototype property addition.
    ///
    /// A property added to an object in some prototype chain may shadow
    /// properties further up the chain, and make previously missing
    /// properties present. Any prototype or not-found entries for the key
    /// are removed.
    pub(crate) fn invalidate_caches_on_prototype_property_addition(&mut self, key: PropertyKey) {
        let Some((_, cache)) = self
            .property_lookup_cache_lookup_table
            .find(key.heap_hash(), |(k, _)| *k == key)
        else {
            // Couldn't find caches for this key; nothing to invalidate.
            return;
        };
        let mut cache = Some(*cache);
        while let Some(current) = cache {
            let record = &mut self.property_lookup_caches[current.get_index()];
            record.retain(|offset, _| !offset.is_not_found() && !offset.is_prototype_property());
            cache = record.next;
        }
    }

    /// Invalidate property lookup caches on prototype property removal.
    ///
    /// Removing a property shifts the offsets of all later properties of the
    /// prototype, so every entry that reads from the prototype is removed.
    pub(crate) fn invalidate_caches_on_prototype_property_removal(
        &mut self,
        prototype: OrdinaryObject,
    ) {
        for record in self.property_lookup_caches.iter_mut() {
            record.retain(|_, proto| proto != Some(prototype));
        }
    }

    /// Invalidate all property lookup caches that depend on a prototype
    /// chain.
    ///
    /// Used when the prototype of a prototype object changes.
    pub(crate) fn invalidate_prototype_chain_caches(&mut self) {
        for record in self.property_lookup_caches.iter_mut() {
            record.retain(|offset, _| !offset.is_not_found() && !offset.is_prototype_property());
        }
    }
}

/// Property lookup cache for a single property key.
///
/// Maps receiver Object Shapes to the location of the property: an offset in
/// the receiver, an offset in a prototype, or nothing at all. All lookups
/// of the same key share one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PropertyLookupCache(NonZeroU32);

/// Location of a property found through a [PropertyLookupCache].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CachedLookup {
    /// Property is at the offset in the receiver.
    Own(u16),
    /// Property is at the offset in the given prototype.
    Prototype(u16, OrdinaryObject),
    /// Property does not exist in the receiver or its prototype chain.
    NotFound,
}

impl PropertyLookupCache {
    /// Get the property lookup cache for the given key, creating it if
    /// needed.
    pub(crate) fn new(agent: &mut Agent, key: PropertyKey) -> PropertyLookupCache {
        let caches = &mut agent.heap.caches;
        let entry = caches.property_lookup_cache_lookup_table.entry(
            key.heap_hash(),
            |(k, _)| *k == key,
            |(k, _)| k.heap_hash(),
        );
        match entry {
            Entry::Occupied(e) => e.get().1,
            Entry::Vacant(e) => {
                caches
                    .property_lookup_caches
                    .push(PropertyLookupCacheRecord::new());
                let cache = PropertyLookupCache::last(&caches.property_lookup_caches);
                e.insert((key, cache));
                cache
            }
        }
    }

    pub(crate) fn find(self, agent: &Agent, shape: ObjectShape) -> Option<CachedLookup> {
        let caches = &agent.heap.caches;
        let record = &caches.property_lookup_caches[self.get_index()];
        if let Some((i, offset)) = record.find(shape) {
            return Some(if offset.is_not_found() {
                CachedLookup::NotFound
            } else if offset.is_prototype_property() {
                // Prototype entries are always written with their prototype.
                let prototype = record.prototypes[i as usize]?;
                CachedLookup::Prototype(offset.get_property_offset(), prototype)
            } else {
                CachedLookup::Own(offset.get_property_offset())
            });
        }
        if let Some(next) = record.next {
            next.find(agent, shape)
        } else {
            None
        }
    }

    pub(crate) fn insert_lookup_offset(self, agent: &mut Agent, shape: ObjectShape, index: u32) {
        debug_assert!(self.find(agent, shape).is_none());
        let Some(offset) = PropertyOffset::new(index) else {
            return;
        };
        self.insert(agent, shape, offset, None);
    }

    pub(crate) fn insert_prototype_lookup_offset(
        self,
        agent: &mut Agent,
        shape: ObjectShape,
        index: u32,
        prototype: OrdinaryObject,
    ) {
        debug_assert!(self.find(agent, shape).is_none());
        let Some(offset) = PropertyOffset::new_prototype(index) else {
            return;
        };
        self.insert(agent, shape, offset, Some(prototype));
    }

    pub(crate) fn insert_not_found(self, agent: &mut Agent, shape: ObjectShape) {
        debug_assert!(self.find(agent, shape).is_none());
        self.insert(agent, shape, PropertyOffset::NOT_FOUND, None);
    }

    fn insert(
        self,
        agent: &mut Agent,
        shape: ObjectShape,
        offset: PropertyOffset,
        prototype: Option<OrdinaryObject>,
    ) {
        let caches = &mut agent.heap.caches;
        let mut cache = self;
        let next_to_create = PropertyLookupCache::from_index(caches.property_lookup_caches.len());
        loop {
            let record = &mut caches.property_lookup_caches[cache.get_index()];
            if record.insert(shape, offset, prototype).is_some() {
                return;
            }
            if let Some(next) = record.next {
                cache = next;
                continue;
            }
            // All records in the chain are full: chain a new one.
            record.next = Some(next_to_create);
            caches
                .property_lookup_caches
                .push(PropertyLookupCacheRecord::with_entry(shape, offset, prototype));
            debug_assert_eq!(
                PropertyLookupCache::last(&caches.property_lookup_caches),
                next_to_create
            );
            break;
        }
    }

    /// Read the value of `key` from `object` through this cache.
    ///
    /// Returns the value and the type feedback tag of the slot it was read
    /// from, or `None` for the tag if the property was not found. The cache
    /// is populated on a miss; dictionary mode receivers bypass the cache.
    pub(crate) fn get(
        self,
        agent: &mut Agent,
        object: OrdinaryObject,
        key: PropertyKey,
    ) -> (Value, Option<ValueTypeTag>) {
        let Some(shape) = object.get_shape(agent) else {
            return object.get_with_tag(agent, key);
        };
        if let Some(found) = self.find(agent, shape) {
            return match found {
                CachedLookup::Own(offset) => {
                    let (value, tag) = object.get_slot(agent, offset as u32);
                    (value, Some(tag))
                }
                CachedLookup::Prototype(offset, prototype) => {
                    let (value, tag) = prototype.get_slot(agent, offset as u32);
                    (value, Some(tag))
                }
                CachedLookup::NotFound => (Value::Undefined, None),
            };
        }
        if agent.options.print_internals {
            eprintln!(
                "Property lookup cache miss: {} on shape {:?}",
                key.as_display(agent),
                shape
            );
        }
        let mut holder = object;
        loop {
            if let Some(offset) = holder.find_own_offset(agent, key) {
                if holder == object {
                    self.insert_lookup_offset(agent, shape, offset);
                } else {
                    self.insert_prototype_lookup_offset(agent, shape, offset, holder);
                }
                let (value, tag) = holder.get_slot(agent, offset);
                return (value, Some(tag));
            }
            match holder.internal_get_prototype_of(agent) {
                Some(prototype) => holder = prototype,
                None => {
                    self.insert_not_found(agent, shape);
                    return (Value::Undefined, None);
                }
            }
        }
    }

    #[inline(always)]
    fn from_index(index: usize) -> Self {
        // SAFETY: index + 1 is never zero.
        Self(unsafe { NonZeroU32::new_unchecked(index as u32 + 1) })
    }

    #[inline(always)]
    fn last(caches: &[PropertyLookupCacheRecord]) -> Self {
        debug_assert!(!caches.is_empty());
        Self::from_index(caches.len() - 1)
    }

    #[inline(always)]
    pub(crate) fn get_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

const N: usize = 4;

#[derive(Debug)]
pub(crate) struct PropertyLookupCacheRecord {
    shapes: [Option<ObjectShape>; N],
    offsets: [PropertyOffset; N],
    prototypes: [Option<OrdinaryObject>; N],
    next: Option<PropertyLookupCache>,
}

impl PropertyLookupCacheRecord {
    const fn new() -> Self {
        Self {
            shapes: [None; N],
            offsets: [PropertyOffset(0); N],
            prototypes: [None; N],
            next: None,
        }
    }

    fn with_entry(
        shape: ObjectShape,
        offset: PropertyOffset,
        prototype: Option<OrdinaryObject>,
    ) -> Self {
        let mut record = Self::new();
        record.shapes[0] = Some(shape);
        record.offsets[0] = offset;
        record.prototypes[0] = prototype;
        record
    }

    /// Find the property lookup cache for the given Object Shape.
    fn find(&self, shape: ObjectShape) -> Option<(u8, PropertyOffset)> {
        self.shapes
            .iter()
            .position(|s| *s == Some(shape))
            .map(|i| (i as u8, self.offsets[i]))
    }

    /// Insert the given Object Shape and offset into the property lookup
    /// cache record. Returns None if the record is full.
    fn insert(
        &mut self,
        shape: ObjectShape,
        offset: PropertyOffset,
        prototype: Option<OrdinaryObject>,
    ) -> Option<u8> {
        let i = self.shapes.iter().position(|s| s.is_none())?;
        self.shapes[i] = Some(shape);
        self.offsets[i] = offset;
        self.prototypes[i] = prototype;
        Some(i as u8)
    }

    /// Keep only the entries for which `f` returns true.
    fn retain(&mut self, f: impl Fn(PropertyOffset, Option<OrdinaryObject>) -> bool) {
        for i in 0..N {
            if self.shapes[i].is_some() && !f(self.offsets[i], self.prototypes[i]) {
                self.shapes[i] = None;
                self.offsets[i] = PropertyOffset(0);
                self.prototypes[i] = None;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct PropertyOffset(i16);

impl PropertyOffset {
    /// Property lookup index indicating that the property was not found in the
    /// Object Shape or its prototype chain.
    const NOT_FOUND: Self = Self(i16::MIN);

    /// Create a new property lookup offset.
    ///
    /// Returns None if the offset is beyond supported limits.
    #[inline(always)]
    pub(crate) fn new(offset: u32) -> Option<Self> {
        Some(Self(i16::try_from(offset).ok()?))
    }

    /// Create a new prototype property lookup offset.
    ///
    /// Prototype offsets are stored as `-offset - 1` so that offset zero
    /// stays distinguishable. Returns None if the offset is beyond supported
    /// limits.
    #[inline(always)]
    pub(crate) fn new_prototype(offset: u32) -> Option<Self> {
        let offset = i16::try_from(offset).ok().filter(|o| *o < i16::MAX)?;
        Some(Self(-offset - 1))
    }

    /// Returns true if the property was not found on the Object with this
    /// Object Shape.
    #[inline(always)]
    pub(crate) fn is_not_found(self) -> bool {
        self == Self::NOT_FOUND
    }

    /// Returns true if the property was found on the Object Shape's prototype.
    #[inline(always)]
    pub(crate) fn is_prototype_property(self) -> bool {
        self.0.is_negative() && !self.is_not_found()
    }

    /// Returns the offset that the property was found at.
    #[inline(always)]
    pub(crate) fn get_property_offset(self) -> u16 {
        debug_assert!(!self.is_not_found());
        if self.0.is_negative() {
            (-(self.0 + 1)) as u16
        } else {
            self.0 as u16
        }
    }
}
