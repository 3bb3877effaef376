// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod data;
mod property_key;

#[cfg(feature = "array-buffer")]
use crate::ecmascript::builtins::{array_buffer::ArrayBuffer, typed_array::TypedArray};
#[cfg(feature = "shared-array-buffer")]
use crate::ecmascript::builtins::shared_array_buffer::SharedArrayBuffer;
use crate::{
    ecmascript::{
        builtins::{array::Array, builtin_function::BuiltinFunction, error::Error},
        execution::{Agent, JsResult},
    },
    heap::indexes::ObjectIndex,
};

pub use data::ObjectHeapData;
pub(crate) use data::{DictionaryLayout, ObjectLayout};
pub use property_key::PropertyKey;

use super::Value;

/// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
///
/// In Kestrel an Object is a handle to one of several kinds of heap data.
/// Only ordinary objects and arrays carry own properties; the remaining
/// kinds expose none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Object(OrdinaryObject),
    Array(Array),
    BuiltinFunction(BuiltinFunction),
    Error(Error),
    #[cfg(feature = "array-buffer")]
    ArrayBuffer(ArrayBuffer),
    #[cfg(feature = "shared-array-buffer")]
    SharedArrayBuffer(SharedArrayBuffer),
    #[cfg(feature = "array-buffer")]
    TypedArray(TypedArray),
}

/// Handle to an ordinary object on the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct OrdinaryObject(pub(crate) ObjectIndex);

/// ### [6.2.6 The Property Descriptor Specification Type](https://tc39.es/ecma262/#sec-property-descriptor-specification-type)
///
/// All properties are writable data properties, so only the value and the
/// enumerability are described.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor {
    pub value: Value,
    pub enumerable: bool,
}

/// ### [6.1.7.2 Object Internal Methods and Internal Slots](https://tc39.es/ecma262/#sec-object-internal-methods-and-internal-slots)
///
/// The default implementations describe an object without own properties
/// and with a `null` prototype.
pub trait InternalMethods: Copy + Into<Object> {
    /// ### [\[\[GetPrototypeOf\]\]()](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-getprototypeof)
    fn internal_get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        let _ = agent;
        None
    }

    /// ### [\[\[GetOwnProperty\]\] (P)](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-getownproperty-p)
    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        let _ = (agent, property_key);
        None
    }

    /// ### [\[\[HasProperty\]\] (P)](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-hasproperty-p)
    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> bool {
        // 1. Let hasOwn be ? O.[[GetOwnProperty]](P).
        // 2. If hasOwn is not undefined, return true.
        if self
            .internal_get_own_property(agent, property_key)
            .is_some()
        {
            return true;
        }
        // 3. Let parent be ? O.[[GetPrototypeOf]]().
        // 4. If parent is not null, then
        //     a. Return ? parent.[[HasProperty]](P).
        // 5. Return false.
        self.internal_get_prototype_of(agent)
            .is_some_and(|parent| parent.internal_has_property(agent, property_key))
    }

    /// ### [\[\[Get\]\] (P, Receiver)](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-get-p-receiver)
    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        // 1. Let desc be ? O.[[GetOwnProperty]](P).
        let Some(descriptor) = self.internal_get_own_property(agent, property_key) else {
            // 2. If desc is undefined, then
            // a. Let parent be ? O.[[GetPrototypeOf]]().
            // b. If parent is null, return undefined.
            let Some(parent) = self.internal_get_prototype_of(agent) else {
                return Ok(Value::Undefined);
            };
            // c. Return ? parent.[[Get]](P, Receiver).
            return parent.internal_get(agent, property_key, receiver);
        };
        // 3. If IsDataDescriptor(desc) is true, return desc.[[Value]].
        Ok(descriptor.value)
    }

    /// ### [\[\[Set\]\] (P, V, Receiver)](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-set-p-v-receiver)
    ///
    /// Returns false if the property could not be set.
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        let _ = (agent, property_key, value, receiver);
        Ok(false)
    }

    /// ### [\[\[Delete\]\] (P)](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-delete-p)
    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        // Deleting a property that does not exist succeeds.
        Ok(self
            .internal_get_own_property(agent, property_key)
            .is_none())
    }

    /// ### [\[\[OwnPropertyKeys\]\] ()](https://tc39.es/ecma262/#sec-ordinary-object-internal-methods-and-internal-slots-ownpropertykeys)
    fn internal_own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        let _ = agent;
        Vec::new()
    }
}

macro_rules! for_each_object {
    ($object:expr, $inner:ident => $body:expr) => {
        match $object {
            Object::Object($inner) => $body,
            Object::Array($inner) => $body,
            Object::BuiltinFunction($inner) => $body,
            Object::Error($inner) => $body,
            #[cfg(feature = "array-buffer")]
            Object::ArrayBuffer($inner) => $body,
            #[cfg(feature = "shared-array-buffer")]
            Object::SharedArrayBuffer($inner) => $body,
            #[cfg(feature = "array-buffer")]
            Object::TypedArray($inner) => $body,
        }
    };
}

impl InternalMethods for Object {
    fn internal_get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        for_each_object!(self, o => o.internal_get_prototype_of(agent))
    }

    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        for_each_object!(self, o => o.internal_get_own_property(agent, property_key))
    }

    fn internal_has_property(self, agent: &Agent, property_key: PropertyKey) -> bool {
        for_each_object!(self, o => o.internal_has_property(agent, property_key))
    }

    fn internal_get(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        receiver: Value,
    ) -> JsResult<Value> {
        for_each_object!(self, o => o.internal_get(agent, property_key, receiver))
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        receiver: Value,
    ) -> JsResult<bool> {
        for_each_object!(self, o => o.internal_set(agent, property_key, value, receiver))
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        for_each_object!(self, o => o.internal_delete(agent, property_key))
    }

    fn internal_own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        for_each_object!(self, o => o.internal_own_property_keys(agent))
    }
}

impl Object {
    /// Returns true if the object is callable.
    pub fn is_callable(self) -> bool {
        matches!(self, Object::BuiltinFunction(_))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self)
    }

    pub(crate) fn to_display_string(self, agent: &Agent) -> std::string::String {
        match self {
            Object::Object(_) => "[object Object]".to_string(),
            Object::Array(array) => {
                let elements = array
                    .as_slice(agent)
                    .iter()
                    .map(|value| value.to_display_string(agent))
                    .collect::<Vec<_>>();
                format!("[{}]", elements.join(", "))
            }
            Object::BuiltinFunction(function) => {
                format!("function {}() {{ [native code] }}", function.name(agent))
            }
            Object::Error(error) => {
                format!("{}: {}", error.kind(agent).name(), error.message(agent))
            }
            #[cfg(feature = "array-buffer")]
            Object::ArrayBuffer(_) => "[object ArrayBuffer]".to_string(),
            #[cfg(feature = "shared-array-buffer")]
            Object::SharedArrayBuffer(_) => "[object SharedArrayBuffer]".to_string(),
            #[cfg(feature = "array-buffer")]
            Object::TypedArray(ta) => format!("[object {}]", ta.kind(agent).name()),
        }
    }
}

impl From<OrdinaryObject> for Object {
    fn from(value: OrdinaryObject) -> Self {
        Object::Object(value)
    }
}

impl From<Array> for Object {
    fn from(value: Array) -> Self {
        Object::Array(value)
    }
}

impl From<BuiltinFunction> for Object {
    fn from(value: BuiltinFunction) -> Self {
        Object::BuiltinFunction(value)
    }
}

impl From<Error> for Object {
    fn from(value: Error) -> Self {
        Object::Error(value)
    }
}

#[cfg(feature = "array-buffer")]
impl From<ArrayBuffer> for Object {
    fn from(value: ArrayBuffer) -> Self {
        Object::ArrayBuffer(value)
    }
}

#[cfg(feature = "shared-array-buffer")]
impl From<SharedArrayBuffer> for Object {
    fn from(value: SharedArrayBuffer) -> Self {
        Object::SharedArrayBuffer(value)
    }
}

#[cfg(feature = "array-buffer")]
impl From<TypedArray> for Object {
    fn from(value: TypedArray) -> Self {
        Object::TypedArray(value)
    }
}

impl TryFrom<Value> for Object {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, ()> {
        match value {
            Value::Object(object) => Ok(object),
            _ => Err(()),
        }
    }
}

impl TryFrom<Object> for OrdinaryObject {
    type Error = ();

    fn try_from(value: Object) -> Result<Self, ()> {
        match value {
            Object::Object(object) => Ok(object),
            _ => Err(()),
        }
    }
}

impl TryFrom<Value> for OrdinaryObject {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, ()> {
        match value {
            Value::Object(Object::Object(object)) => Ok(object),
            _ => Err(()),
        }
    }
}
