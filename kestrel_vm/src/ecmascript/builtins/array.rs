// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [10.4.2 Array Exotic Objects](https://tc39.es/ecma262/#sec-array-exotic-objects)
//!
//! Arrays in Kestrel are always dense: they have no holes and no properties
//! other than their elements and `length`.

use crate::{
    ecmascript::{
        abstract_operations::type_conversion::to_integer_or_infinity,
        execution::{Agent, ExceptionType, JsResult},
        types::{
            InternalMethods, Object, OrdinaryObject, PropertyDescriptor, PropertyKey, Value,
        },
    },
    heap::{CreateHeapData, indexes::ArrayIndex},
};

const LENGTH_KEY: PropertyKey = PropertyKey::from_small_string("length");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Array(pub(crate) ArrayIndex);

#[derive(Debug, Clone, Default)]
pub struct ArrayHeapData {
    pub(crate) elements: Vec<Value>,
}

impl Array {
    /// Creates a new array with the given elements.
    ///
    /// This is equal to the [CreateArrayFromList](https://tc39.es/ecma262/#sec-createarrayfromlist)
    /// abstract operation.
    pub fn from_slice(agent: &mut Agent, elements: &[Value]) -> Self {
        agent.heap.create(ArrayHeapData {
            elements: elements.to_vec(),
        })
    }

    pub fn len(self, agent: &Agent) -> u32 {
        agent.heap[self].elements.len() as u32
    }

    pub fn is_empty(self, agent: &Agent) -> bool {
        agent.heap[self].elements.is_empty()
    }

    pub fn as_slice(self, agent: &Agent) -> &[Value] {
        &agent.heap[self].elements
    }

    pub fn get_index(self, agent: &Agent, index: u32) -> Option<Value> {
        agent.heap[self].elements.get(index as usize).copied()
    }

    /// Append an element to the end of the array.
    pub fn push(self, agent: &mut Agent, value: Value) {
        agent.heap[self].elements.push(value);
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into())
    }

    /// ### [23.1.3.13 Array.prototype.flat ( \[ depth \] )](https://tc39.es/ecma262/#sec-array.prototype.flat)
    pub fn flat(self, agent: &mut Agent, depth: Value) -> JsResult<Array> {
        // 1. Let O be ? ToObject(this value).
        // 2. Let sourceLen be ? LengthOfArrayLike(O).
        let source_len = self.len(agent);
        // 3. Let depthNum be 1.
        let mut depth_num = 1.0;
        // 4. If depth is not undefined, then
        if !depth.is_undefined() {
            // a. Set depthNum to ? ToIntegerOrInfinity(depth).
            depth_num = to_integer_or_infinity(agent, depth)?;
            // b. If depthNum < 0, set depthNum to 0.
            if depth_num < 0.0 {
                depth_num = 0.0;
            }
        }
        // 5. Let A be ? ArraySpeciesCreate(O, 0).
        let a = Array::from_slice(agent, &[]);
        // 6. Perform ? FlattenIntoArray(A, O, sourceLen, 0, depthNum).
        flatten_into_array(agent, a, self, source_len, depth_num)?;
        // 7. Return A.
        Ok(a)
    }
}

/// ### [23.1.3.13.1 FlattenIntoArray ( target, source, sourceLen, start, depth )](https://tc39.es/ecma262/#sec-flattenintoarray)
///
/// The target index is the target's length as arrays are dense.
fn flatten_into_array(
    agent: &mut Agent,
    target: Array,
    source: Array,
    source_len: u32,
    depth: f64,
) -> JsResult<()> {
    // 3. Let sourceIndex be +0𝔽.
    // 4. Repeat, while ℝ(sourceIndex) < sourceLen,
    for source_index in 0..source_len {
        // a. Let P be ! ToString(sourceIndex).
        // b. Let exists be ? HasProperty(source, P).
        // c. If exists is true, then
        let Some(element) = source.get_index(agent, source_index) else {
            break;
        };
        // iii. Let shouldFlatten be false.
        // iv. If depth > 0, then
        // 1. Set shouldFlatten to ? IsArray(element).
        match element {
            // v. If shouldFlatten is true, then
            Value::Object(Object::Array(element)) if depth > 0.0 => {
                // 1. If depth = +∞, let newDepth be +∞.
                // 2. Else, let newDepth be depth - 1.
                let new_depth = depth - 1.0;
                // 3. Let elementLen be ? LengthOfArrayLike(element).
                let element_len = element.len(agent);
                // 4. Set targetIndex to ? FlattenIntoArray(target, element,
                //    elementLen, targetIndex, newDepth).
                flatten_into_array(agent, target, element, element_len, new_depth)?;
            }
            // vi. Else,
            _ => {
                // 1. If targetIndex ≥ 2**53 - 1, throw a TypeError exception.
                if target.len(agent) == u32::MAX {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::TypeError,
                        "Target index overflowed",
                    ));
                }
                // 2. Perform ? CreateDataPropertyOrThrow(target, ! ToString(𝔽(targetIndex)), element).
                // 3. Set targetIndex to targetIndex + 1.
                target.push(agent, element);
            }
        }
    }
    Ok(())
}

impl InternalMethods for Array {
    fn internal_get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        Some(agent.current_realm().intrinsics().object_prototype())
    }

    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        if property_key == LENGTH_KEY {
            return Some(PropertyDescriptor {
                value: Value::from(self.len(agent)),
                enumerable: false,
            });
        }
        let value = self.get_index(agent, property_key.into_u32()?)?;
        Some(PropertyDescriptor {
            value,
            enumerable: true,
        })
    }

    /// ### [10.4.2.4 ArraySetLength ( A, Desc )](https://tc39.es/ecma262/#sec-arraysetlength)
    /// for `length`, otherwise an element write.
    ///
    /// Writes that would leave a hole fail.
    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        _receiver: Value,
    ) -> JsResult<bool> {
        let len = self.len(agent);
        if property_key == LENGTH_KEY {
            let new_len = match value {
                Value::Number(n) if n == (n as u32) as f64 => n as u32,
                _ => {
                    return Err(agent.throw_exception_with_static_message(
                        ExceptionType::RangeError,
                        "Invalid array length",
                    ));
                }
            };
            if new_len > len {
                return Ok(false);
            }
            agent.heap[self].elements.truncate(new_len as usize);
            return Ok(true);
        }
        match property_key.into_u32() {
            Some(index) if index < len => {
                agent.heap[self].elements[index as usize] = value;
                Ok(true)
            }
            Some(index) if index == len => {
                self.push(agent, value);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn internal_delete(self, agent: &mut Agent, property_key: PropertyKey) -> JsResult<bool> {
        Ok(self.internal_get_own_property(agent, property_key).is_none())
    }

    fn internal_own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        let len = self.len(agent);
        let mut keys = Vec::with_capacity(len as usize + 1);
        keys.extend((0..len).map(PropertyKey::Integer));
        keys.push(LENGTH_KEY);
        keys
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::types::OrdinaryObject;

    fn numbers(agent: &Agent, array: Array) -> Vec<f64> {
        array
            .as_slice(agent)
            .iter()
            .map(|value| match value {
                Value::Number(n) => *n,
                _ => panic!("not a number"),
            })
            .collect()
    }

    #[test]
    fn flat_defaults_to_one_level() {
        let mut agent = Agent::default();
        let innermost = Array::from_slice(&mut agent, &[3.0.into()]);
        let inner = Array::from_slice(&mut agent, &[2.0.into(), innermost.into_value()]);
        let outer = Array::from_slice(&mut agent, &[1.0.into(), inner.into_value()]);
        let flat = outer.flat(&mut agent, Value::Undefined).unwrap();
        assert_eq!(flat.len(&agent), 3);
        assert_eq!(flat.get_index(&agent, 2), Some(innermost.into_value()));
        let flat = outer.flat(&mut agent, Value::pos_inf()).unwrap();
        assert_eq!(numbers(&agent, flat), [1.0, 2.0, 3.0]);
        let flat = outer.flat(&mut agent, Value::from(-1.0)).unwrap();
        assert_eq!(flat.as_slice(&agent), outer.as_slice(&agent));
    }

    #[test]
    fn flat_keeps_non_array_objects() {
        let mut agent = Agent::default();
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let inner = Array::from_slice(&mut agent, &[object.into()]);
        let outer = Array::from_slice(&mut agent, &[inner.into_value(), Value::Null]);
        let flat = outer.flat(&mut agent, Value::Undefined).unwrap();
        assert_eq!(flat.as_slice(&agent), &[object.into(), Value::Null]);
    }

    #[test]
    fn arrays_are_dense() {
        let mut agent = Agent::default();
        let array = Array::from_slice(&mut agent, &[Value::Null]);
        assert!(array.internal_set(&mut agent, PropertyKey::Integer(1), Value::Null, Value::Undefined).unwrap());
        assert!(!array.internal_set(&mut agent, PropertyKey::Integer(3), Value::Null, Value::Undefined).unwrap());
        assert!(!array.internal_delete(&mut agent, PropertyKey::Integer(0)).unwrap());
        assert_eq!(array.len(&agent), 2);
        assert!(array.internal_set(&mut agent, LENGTH_KEY, Value::from(1.0), Value::Undefined).unwrap());
        assert_eq!(array.len(&agent), 1);
        let error = array
            .internal_set(&mut agent, LENGTH_KEY, Value::from(1.5), Value::Undefined)
            .unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::RangeError));
        assert_eq!(
            array.internal_own_property_keys(&agent),
            [PropertyKey::Integer(0), LENGTH_KEY]
        );
        let length = array.internal_get_own_property(&agent, LENGTH_KEY).unwrap();
        assert!(!length.enumerable);
    }
}
