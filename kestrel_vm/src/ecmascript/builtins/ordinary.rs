// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.1 Ordinary Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots)

pub(crate) mod caches;
pub mod for_in_iterator;
pub(crate) mod shape;
pub mod type_feedback;

use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{
            DictionaryLayout, InternalMethods, ObjectHeapData, ObjectLayout, OrdinaryObject,
            PropertyDescriptor, PropertyKey, Value, ValueTypeTag,
        },
    },
    heap::{CreateHeapData, Heap},
};
use for_in_iterator::ForInIterator;
use shape::ObjectShape;

/// ### [10.1.12 OrdinaryObjectCreate ( proto )](https://tc39.es/ecma262/#sec-ordinaryobjectcreate)
///
/// Creates an ordinary object without properties directly on the heap.
pub(crate) fn ordinary_object_create_with_heap(
    heap: &mut Heap,
    prototype: Option<OrdinaryObject>,
) -> OrdinaryObject {
    if let Some(prototype) = prototype {
        heap[prototype].is_prototype = true;
    }
    let shape = ObjectShape::get_or_create_shape_for_prototype(heap, prototype);
    heap.create(ObjectHeapData::new(shape))
}

/// ### [10.1.11.1 OrdinaryOwnPropertyKeys ( O )](https://tc39.es/ecma262/#sec-ordinaryownpropertykeys)
pub(crate) fn ordinary_own_property_keys(keys: &[PropertyKey]) -> Vec<PropertyKey> {
    // 1. Let keys be a new empty List.
    let mut result = Vec::with_capacity(keys.len());
    // 2. For each own property key P of O such that P is an array index, in
    // ascending numeric index order, do
    let mut integer_keys = keys
        .iter()
        .filter_map(|key| key.into_u32())
        .collect::<Vec<_>>();
    integer_keys.sort_unstable();
    // a. Append P to keys.
    result.extend(integer_keys.into_iter().map(PropertyKey::Integer));
    // 3. For each own property key P of O such that P is a String and P is
    // not an array index, in ascending chronological order of property
    // creation, do
    // a. Append P to keys.
    result.extend(keys.iter().filter(|key| !key.is_array_index()).copied());
    // 4. For each own property key P of O such that P is a Symbol, in
    // ascending chronological order of property creation, do
    // NOTE: Symbols are not supported.
    // 5. Return keys.
    result
}

impl OrdinaryObject {
    /// Create an empty object with %Object.prototype% as its prototype.
    pub fn create_empty_object(agent: &mut Agent) -> Self {
        let prototype = agent.current_realm().intrinsics().object_prototype();
        ordinary_object_create_with_heap(&mut agent.heap, Some(prototype))
    }

    /// Create an object with the given prototype and properties.
    pub fn create_object(
        agent: &mut Agent,
        prototype: Option<OrdinaryObject>,
        entries: &[(PropertyKey, Value)],
    ) -> Self {
        let object = ordinary_object_create_with_heap(&mut agent.heap, prototype);
        for (key, value) in entries {
            object.set(agent, *key, *value);
        }
        object
    }

    pub(crate) fn get_shape(self, agent: &Agent) -> Option<ObjectShape> {
        match &agent.heap[self].layout {
            ObjectLayout::Shaped(shape) => Some(*shape),
            ObjectLayout::Dictionary(_) => None,
        }
    }

    /// Returns true if the object stores its own key table instead of
    /// referring to a shared Object Shape.
    pub fn is_dictionary(self, agent: &Agent) -> bool {
        matches!(agent.heap[self].layout, ObjectLayout::Dictionary(_))
    }

    /// Returns true if both objects are shaped and share their Object Shape.
    pub fn has_same_shape(self, agent: &Agent, other: OrdinaryObject) -> bool {
        match (self.get_shape(agent), other.get_shape(agent)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Number of own properties.
    pub fn len(self, agent: &Agent) -> usize {
        agent.heap[self].len()
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        self.len(agent) == 0
    }

    /// Own keys in insertion order.
    fn keys(self, agent: &Agent) -> &[PropertyKey] {
        match &agent.heap[self].layout {
            ObjectLayout::Shaped(shape) => shape.keys(&agent.heap),
            ObjectLayout::Dictionary(dictionary) => &dictionary.keys,
        }
    }

    pub(crate) fn find_own_offset(self, agent: &Agent, key: PropertyKey) -> Option<u32> {
        match &agent.heap[self].layout {
            ObjectLayout::Shaped(shape) => shape.find_offset(&agent.heap, key),
            ObjectLayout::Dictionary(dictionary) => dictionary.lookup.get(&key).copied(),
        }
    }

    pub(crate) fn get_slot(self, agent: &Agent, offset: u32) -> (Value, ValueTypeTag) {
        let data = &agent.heap[self];
        (data.values[offset as usize], data.tags[offset as usize])
    }

    /// Read a property through the prototype chain.
    ///
    /// Returns `undefined` if the property is not found.
    pub fn get(self, agent: &Agent, key: PropertyKey) -> Value {
        self.get_with_tag(agent, key).0
    }

    /// Read an own property. Returns None if the object does not have the
    /// property.
    pub fn get_own(self, agent: &Agent, key: PropertyKey) -> Option<Value> {
        let offset = self.find_own_offset(agent, key)?;
        Some(self.get_slot(agent, offset).0)
    }

    /// Read a property through the prototype chain along with the type
    /// feedback tag of the slot it was found in.
    pub(crate) fn get_with_tag(
        self,
        agent: &Agent,
        key: PropertyKey,
    ) -> (Value, Option<ValueTypeTag>) {
        let mut holder = self;
        loop {
            if let Some(offset) = holder.find_own_offset(agent, key) {
                let (value, tag) = holder.get_slot(agent, offset);
                return (value, Some(tag));
            }
            match holder.get_prototype_of(agent) {
                Some(prototype) => holder = prototype,
                None => return (Value::Undefined, None),
            }
        }
    }

    /// Type feedback tag of an own property: the type of the last value
    /// written to it.
    pub fn property_type_tag(self, agent: &Agent, key: PropertyKey) -> Option<ValueTypeTag> {
        let offset = self.find_own_offset(agent, key)?;
        Some(self.get_slot(agent, offset).1)
    }

    pub fn has_own_property(self, agent: &Agent, key: PropertyKey) -> bool {
        self.find_own_offset(agent, key).is_some()
    }

    /// Own property keys in \[\[OwnPropertyKeys]] order: array indices
    /// ascending, then string keys in insertion order.
    pub fn own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        ordinary_own_property_keys(self.keys(agent))
    }

    /// Start a for-in enumeration over the object and its prototype chain.
    pub fn enumerate_keys(self) -> ForInIterator {
        ForInIterator::new(self.into())
    }

    /// Insert or update an own property.
    ///
    /// An update overwrites the slot and refreshes the slot's type feedback
    /// tag if the type of the value changed. An insertion appends the key to
    /// the object's insertion order.
    pub fn set(self, agent: &mut Agent, key: PropertyKey, value: Value) {
        let tag = value.type_tag();
        let Some(offset) = self.find_own_offset(agent, key) else {
            self.add_property(agent, key, value, tag);
            return;
        };
        let data = &mut agent.heap[self];
        data.values[offset as usize] = value;
        let previous = core::mem::replace(&mut data.tags[offset as usize], tag);
        if previous != tag && agent.options.print_internals {
            eprintln!(
                "Type feedback of {} changed: {} -> {}",
                key.as_display(agent),
                previous.name(),
                tag.name()
            );
        }
    }

    fn add_property(self, agent: &mut Agent, key: PropertyKey, value: Value, tag: ValueTypeTag) {
        let max_shaped_properties = agent.options.max_shaped_properties as usize;
        let data = &agent.heap[self];
        let is_prototype = data.is_prototype;
        if let ObjectLayout::Shaped(shape) = data.layout {
            if data.len() < max_shaped_properties {
                let next_shape = shape.get_child_shape(&mut agent.heap, key);
                if agent.options.print_internals {
                    eprintln!(
                        "Shape transition: {:?} --{}--> {:?}",
                        shape,
                        key.as_display(agent),
                        next_shape
                    );
                }
                let data = &mut agent.heap[self];
                data.layout = ObjectLayout::Shaped(next_shape);
                data.values.push(value);
                data.tags.push(tag);
            } else {
                self.convert_to_dictionary(agent);
            }
        }
        if let ObjectLayout::Dictionary(dictionary) = &mut agent.heap[self].layout {
            dictionary.push(key);
            let data = &mut agent.heap[self];
            data.values.push(value);
            data.tags.push(tag);
        }
        if is_prototype {
            agent
                .heap
                .caches
                .invalidate_caches_on_prototype_property_addition(key);
        }
    }

    /// Move the object to dictionary mode. Does nothing if the object is
    /// already in dictionary mode.
    fn convert_to_dictionary(self, agent: &mut Agent) {
        let ObjectLayout::Shaped(shape) = agent.heap[self].layout else {
            return;
        };
        let keys = shape.keys(&agent.heap).to_vec();
        let prototype = shape.get_prototype(&agent.heap);
        if agent.options.print_internals {
            eprintln!(
                "Dictionary transition: object with {} properties leaves shape {:?}",
                keys.len(),
                shape
            );
        }
        agent.heap[self].layout =
            ObjectLayout::Dictionary(Box::new(DictionaryLayout::new(prototype, keys)));
    }

    /// Remove an own property. Returns true if the property no longer
    /// exists.
    ///
    /// Deletion moves the object to dictionary mode; the remaining
    /// properties keep their relative order.
    pub fn delete(self, agent: &mut Agent, key: PropertyKey) -> bool {
        let Some(offset) = self.find_own_offset(agent, key) else {
            return true;
        };
        self.convert_to_dictionary(agent);
        let ObjectHeapData {
            layout,
            values,
            tags,
            is_prototype,
        } = &mut agent.heap[self];
        let ObjectLayout::Dictionary(dictionary) = layout else {
            unreachable!()
        };
        dictionary.remove(offset);
        values.remove(offset as usize);
        tags.remove(offset as usize);
        if *is_prototype {
            agent
                .heap
                .caches
                .invalidate_caches_on_prototype_property_removal(self);
        }
        true
    }

    /// ### [10.1.1.1 OrdinaryGetPrototypeOf ( O )](https://tc39.es/ecma262/#sec-ordinarygetprototypeof)
    pub fn get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        // 1. Return O.[[Prototype]].
        match &agent.heap[self].layout {
            ObjectLayout::Shaped(shape) => shape.get_prototype(&agent.heap),
            ObjectLayout::Dictionary(dictionary) => dictionary.prototype,
        }
    }

    /// ### [10.1.2.1 OrdinarySetPrototypeOf ( O, V )](https://tc39.es/ecma262/#sec-ordinarysetprototypeof)
    ///
    /// Returns false if the change would create a prototype cycle.
    pub fn set_prototype_of(self, agent: &mut Agent, prototype: Option<OrdinaryObject>) -> bool {
        // 1. Let current be O.[[Prototype]].
        let current = self.get_prototype_of(agent);
        // 2. If SameValue(V, current) is true, return true.
        if prototype == current {
            return true;
        }
        // 3. Let extensible be O.[[Extensible]].
        // 4. If extensible is false, return false.
        // NOTE: All objects are extensible.
        // 5. Let p be V.
        let mut p = prototype;
        // 6. Let done be false.
        // 7. Repeat, while done is false,
        // a. If p is null, then
        // i. Set done to true.
        while let Some(p_inner) = p {
            // b. Else if SameValue(p, O) is true, then
            if p_inner == self {
                // i. Return false.
                return false;
            }
            // c. Else,
            // ii. Else, set p to p.[[Prototype]].
            p = p_inner.get_prototype_of(agent);
        }
        // 8. Set O.[[Prototype]] to V.
        if let Some(prototype) = prototype {
            agent.heap[prototype].is_prototype = true;
        }
        let data = &agent.heap[self];
        let is_prototype = data.is_prototype;
        if let ObjectLayout::Shaped(shape) = data.layout {
            // Replay our keys on top of the new prototype's root shape.
            let keys = shape.keys(&agent.heap).to_vec();
            let root = ObjectShape::get_or_create_shape_for_prototype(&mut agent.heap, prototype);
            let next_shape = root.get_or_create_child_shape(&mut agent.heap, &keys);
            agent.heap[self].layout = ObjectLayout::Shaped(next_shape);
        } else if let ObjectLayout::Dictionary(dictionary) = &mut agent.heap[self].layout {
            dictionary.prototype = prototype;
        }
        if is_prototype {
            agent.heap.caches.invalidate_prototype_chain_caches();
        }
        // 9. Return true.
        true
    }
}

impl InternalMethods for OrdinaryObject {
    fn internal_get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        self.get_prototype_of(agent)
    }

    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        self.get_own(agent, property_key)
            .map(|value| PropertyDescriptor {
                value,
                enumerable: true,
            })
    }

    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> bool {
        self.get_with_tag(agent, property_key).1.is_some()
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        _receiver: Value,
    ) -> JsResult<Value> {
        Ok(self.get(agent, property_key))
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        _receiver: Value,
    ) -> JsResult<bool> {
        self.set(agent, property_key, value);
        Ok(true)
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        Ok(self.delete(agent, property_key))
    }

    fn internal_own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        self.own_property_keys(agent)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::execution::Options;

    fn key(agent: &mut Agent, name: &str) -> PropertyKey {
        PropertyKey::from_str(agent, name)
    }

    #[test]
    fn integer_keys_come_first() {
        let mut agent = Agent::new(Options::default());
        let object = OrdinaryObject::create_empty_object(&mut agent);
        for name in ["b", "10", "a", "2", "0"] {
            let k = key(&mut agent, name);
            object.set(&mut agent, k, Value::Null);
        }
        let keys = object
            .own_property_keys(&agent)
            .iter()
            .map(|k| k.as_display(&agent).to_string())
            .collect::<Vec<_>>();
        assert_eq!(keys, ["0", "2", "10", "b", "a"]);
    }

    #[test]
    fn objects_with_same_insertion_order_share_shape() {
        let mut agent = Agent::new(Options::default());
        let x = key(&mut agent, "x");
        let y = key(&mut agent, "y");
        let a = OrdinaryObject::create_object(&mut agent, None, &[(x, 1.0.into()), (y, 2.0.into())]);
        let b = OrdinaryObject::create_object(&mut agent, None, &[(x, 3.0.into()), (y, 4.0.into())]);
        let c = OrdinaryObject::create_object(&mut agent, None, &[(y, 3.0.into()), (x, 4.0.into())]);
        assert!(a.has_same_shape(&agent, b));
        assert!(!a.has_same_shape(&agent, c));
        assert_eq!(b.get(&agent, x), Value::from(3.0));
    }

    #[test]
    fn delete_moves_to_dictionary_and_keeps_order() {
        let mut agent = Agent::new(Options::default());
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let keys = ["p", "q", "r", "s"].map(|name| key(&mut agent, name));
        for (i, k) in keys.iter().enumerate() {
            object.set(&mut agent, *k, Value::from(i as f64));
        }
        assert!(!object.is_dictionary(&agent));
        assert!(object.delete(&mut agent, keys[1]));
        assert!(object.is_dictionary(&agent));
        assert_eq!(object.own_property_keys(&agent), [keys[0], keys[2], keys[3]]);
        assert_eq!(object.get_own(&agent, keys[3]), Some(Value::from(3.0)));
        assert_eq!(object.get_own(&agent, keys[1]), None);
        // Deleting a missing key succeeds without changes.
        assert!(object.delete(&mut agent, keys[1]));
        object.set(&mut agent, keys[1], Value::Null);
        assert_eq!(
            object.own_property_keys(&agent),
            [keys[0], keys[2], keys[3], keys[1]]
        );
        assert!(object.is_dictionary(&agent));
    }

    #[test]
    fn too_many_properties_moves_to_dictionary() {
        let mut agent = Agent::new(Options {
            max_shaped_properties: 2,
            ..Default::default()
        });
        let object = OrdinaryObject::create_empty_object(&mut agent);
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let k = key(&mut agent, name);
            object.set(&mut agent, k, Value::from(i as f64));
            assert_eq!(object.is_dictionary(&agent), i == 2);
        }
        let c = key(&mut agent, "c");
        assert_eq!(object.get(&agent, c), Value::from(2.0));
        assert_eq!(object.len(&agent), 3);
    }

    #[test]
    fn type_tags_follow_writes() {
        let mut agent = Agent::new(Options::default());
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let f = key(&mut agent, "f");
        assert_eq!(object.property_type_tag(&agent, f), None);
        object.set(&mut agent, f, Value::Null);
        assert_eq!(object.property_type_tag(&agent, f), Some(ValueTypeTag::Null));
        object.set(&mut agent, f, Value::from(1.0));
        assert_eq!(object.property_type_tag(&agent, f), Some(ValueTypeTag::Number));
    }

    #[test]
    fn prototype_chain_reads_and_cycles() {
        let mut agent = Agent::new(Options::default());
        let shared = key(&mut agent, "shared");
        let parent = OrdinaryObject::create_object(&mut agent, None, &[(shared, true.into())]);
        let child = OrdinaryObject::create_object(&mut agent, Some(parent), &[]);
        assert_eq!(child.get(&agent, shared), Value::Boolean(true));
        assert_eq!(child.get_own(&agent, shared), None);
        assert!(!child.has_own_property(&agent, shared));
        assert!(child.internal_has_property(&agent, shared));
        assert!(!parent.set_prototype_of(&mut agent, Some(child)));
        assert!(child.set_prototype_of(&mut agent, None));
        assert_eq!(child.get(&agent, shared), Value::Undefined);
    }
}
