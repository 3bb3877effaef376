// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.4 Operations on Iterator Objects](https://tc39.es/ecma262/#sec-operations-on-iterator-objects)
//!
//! Arrays are the only iterable objects in Kestrel, and iterating one never
//! calls into user code.

use crate::ecmascript::{
    builtins::array::Array,
    execution::{Agent, ExceptionType, JsResult},
    types::{Object, Value},
};

/// ### [7.4.1 Iterator Records](https://tc39.es/ecma262/#sec-iterator-records)
///
/// Iterator over the values of an Array, equivalent to the Iterator Record
/// of `%ArrayIteratorPrototype%` created by `array[Symbol.iterator]()`.
/// Elements pushed onto the array during iteration are visited.
#[derive(Debug, Clone, Copy)]
pub struct ArrayValuesIterator {
    array: Array,
    next_index: u32,
    done: bool,
}

impl ArrayValuesIterator {
    pub fn new(array: Array) -> Self {
        Self {
            array,
            next_index: 0,
            done: false,
        }
    }

    /// ### [7.4.10 IteratorStepValue ( iteratorRecord )](https://tc39.es/ecma262/#sec-iteratorstepvalue)
    ///
    /// Returns None once the iterator is exhausted.
    pub fn step_value(&mut self, agent: &Agent) -> Option<Value> {
        if self.done {
            return None;
        }
        let value = self.array.get_index(agent, self.next_index);
        match value {
            Some(value) => {
                self.next_index += 1;
                Some(value)
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

/// ### [7.4.3 GetIterator ( obj, kind )](https://tc39.es/ecma262/#sec-getiterator)
///
/// Throws a TypeError if the value is not iterable.
pub fn get_iterator(agent: &mut Agent, obj: Value) -> JsResult<ArrayValuesIterator> {
    match obj {
        Value::Object(Object::Array(array)) => Ok(ArrayValuesIterator::new(array)),
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Value is not iterable",
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iterates_live_array() {
        let mut agent = Agent::default();
        let array = Array::from_slice(&mut agent, &[Value::from(1.0)]);
        let mut iterator = get_iterator(&mut agent, array.into_value()).unwrap();
        assert_eq!(iterator.step_value(&agent), Some(Value::from(1.0)));
        array.push(&mut agent, Value::from(2.0));
        assert_eq!(iterator.step_value(&agent), Some(Value::from(2.0)));
        assert_eq!(iterator.step_value(&agent), None);
        // Exhausted iterators stay exhausted.
        array.push(&mut agent, Value::from(3.0));
        assert_eq!(iterator.step_value(&agent), None);
    }

    #[test]
    fn non_arrays_are_not_iterable() {
        let mut agent = Agent::default();
        let error = get_iterator(&mut agent, Value::from(1.0)).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
    }
}
