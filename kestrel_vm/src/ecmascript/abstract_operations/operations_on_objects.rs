// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.3 Operations on Objects](https://tc39.es/ecma262/#sec-operations-on-objects)

use crate::ecmascript::{
    builtins::{
        ArgumentsList, BuiltinFunction, ordinary::for_in_iterator::ForInIterator,
        ordinary::type_feedback::CompareSite,
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{InternalMethods, Object, PropertyKey, Value},
};

/// ### [7.3.2 Get ( O, P )](https://tc39.es/ecma262/#sec-get-o-p)
///
/// The abstract operation Get takes arguments O (an Object) and P (a property
/// key) and returns either a normal completion containing an ECMAScript
/// language value or a throw completion. It is used to retrieve the value of
/// a specific property of an object.
pub fn get(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<Value> {
    // 1. Return ? O.[[Get]](P, O).
    o.internal_get(agent, p, o.into_value())
}

/// ### [7.3.4 Set ( O, P, V, Throw )](https://tc39.es/ecma262/#sec-set-o-p-v-throw)
///
/// The abstract operation Set takes arguments O (an Object), P (a property
/// key), V (an ECMAScript language value), and Throw (a Boolean) and returns
/// either a normal completion containing UNUSED or a throw completion. It is
/// used to set the value of a specific property of an object. V is the new
/// value for the property.
pub fn set(agent: &mut Agent, o: Object, p: PropertyKey, v: Value, throw: bool) -> JsResult<()> {
    // 1. Let success be ? O.[[Set]](P, V, O).
    let success = o.internal_set(agent, p, v, o.into_value())?;
    // 2. If success is false and Throw is true, throw a TypeError exception.
    if !success && throw {
        let message = format!("Could not set property '{}'.", p.as_display(agent));
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.11 DeletePropertyOrThrow ( O, P )](https://tc39.es/ecma262/#sec-deletepropertyorthrow)
pub fn delete_property_or_throw(agent: &mut Agent, o: Object, p: PropertyKey) -> JsResult<()> {
    // 1. Let success be ? O.[[Delete]](P).
    let success = o.internal_delete(agent, p)?;
    // 2. If success is false, throw a TypeError exception.
    if !success {
        let message = format!("Could not delete property '{}'.", p.as_display(agent));
        return Err(agent.throw_exception(ExceptionType::TypeError, message));
    }
    // 3. Return UNUSED.
    Ok(())
}

/// ### [7.3.12 HasProperty ( O, P )](https://tc39.es/ecma262/#sec-hasproperty)
pub fn has_property(agent: &Agent, o: Object, p: PropertyKey) -> bool {
    // 1. Return ? O.[[HasProperty]](P).
    o.internal_has_property(agent, p)
}

/// ### [7.3.13 HasOwnProperty ( O, P )](https://tc39.es/ecma262/#sec-hasownproperty)
pub fn has_own_property(agent: &Agent, o: Object, p: PropertyKey) -> bool {
    // 1. Let desc be ? O.[[GetOwnProperty]](P).
    // 2. If desc is undefined, return false.
    // 3. Return true.
    o.internal_get_own_property(agent, p).is_some()
}

/// ### [7.3.14 Call ( F, V \[ , argumentsList \] )](https://tc39.es/ecma262/#sec-call)
///
/// The abstract operation Call takes arguments F (an ECMAScript language
/// value) and V (an ECMAScript language value) and optional argument
/// argumentsList (a List of ECMAScript language values) and returns either a
/// normal completion containing an ECMAScript language value or a throw
/// completion. It is used to call the \[\[Call]] internal method of a function
/// object. F is the function object, V is an ECMAScript language value that
/// is the value of \[\[this]], and argumentsList is the value passed to the
/// corresponding argument of the internal method. If argumentsList is not
/// present, a new empty List is used as its value.
pub fn call(
    agent: &mut Agent,
    f: Value,
    v: Value,
    arguments_list: Option<ArgumentsList>,
) -> JsResult<Value> {
    // 1. If argumentsList is not present, set argumentsList to a new empty List.
    let arguments_list = arguments_list.unwrap_or_default();
    // 2. If IsCallable(F) is false, throw a TypeError exception.
    match f {
        Value::Object(Object::BuiltinFunction(f)) => {
            // 3. Return ? F.[[Call]](V, argumentsList).
            f.call(agent, v, arguments_list)
        }
        _ => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Not a callable object",
        )),
    }
}

/// Call a known function object.
pub fn call_function(
    agent: &mut Agent,
    f: BuiltinFunction,
    v: Value,
    arguments_list: Option<ArgumentsList>,
) -> JsResult<Value> {
    f.call(agent, v, arguments_list.unwrap_or_default())
}

/// Evaluate `O[P] == literal` through a one-off [CompareSite].
///
/// Repeated comparisons should keep a CompareSite around instead so that
/// its lookup cache and type feedback carry over between calls.
pub fn compare_equals(
    agent: &mut Agent,
    o: Object,
    p: PropertyKey,
    literal: Value,
) -> JsResult<bool> {
    CompareSite::new(agent, p).compare_equals(agent, o, literal)
}

/// ### [14.7.5.9 EnumerateObjectProperties ( O )](https://tc39.es/ecma262/#sec-enumerate-object-properties)
pub fn enumerate_object_properties(o: Object) -> ForInIterator {
    ForInIterator::new(o)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{builtins::array::Array, types::OrdinaryObject};

    #[test]
    fn get_and_set_through_object_handles() {
        let mut agent = Agent::default();
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let key = PropertyKey::from_small_string("answer");
        set(&mut agent, object.into(), key, Value::from(42.0), true).unwrap();
        assert_eq!(get(&mut agent, object.into(), key).unwrap(), Value::from(42.0));
        assert!(has_own_property(&agent, object.into(), key));
        delete_property_or_throw(&mut agent, object.into(), key).unwrap();
        assert!(!has_property(&agent, object.into(), key));
    }

    #[test]
    fn array_length_cannot_be_deleted() {
        let mut agent = Agent::default();
        let array = Array::from_slice(&mut agent, &[Value::Null]);
        let length = PropertyKey::from_small_string("length");
        let error = delete_property_or_throw(&mut agent, array.into(), length).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
        assert_eq!(array.len(&agent), 1);
    }

    #[test]
    fn calling_non_callables_throws() {
        let mut agent = Agent::default();
        let error = call(&mut agent, Value::Null, Value::Undefined, None).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
        assert_eq!(error.message(&agent), Some("Not a callable object"));
    }
}
