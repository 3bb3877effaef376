// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.2 Testing and Comparison Operations](https://tc39.es/ecma262/#sec-testing-and-comparison-operations)

use crate::ecmascript::{
    execution::{Agent, JsResult},
    types::{Number, Value},
};

use super::type_conversion::{string_to_number, to_primitive};

/// ### [7.2.3 IsCallable ( argument )](https://tc39.es/ecma262/#sec-iscallable)
///
/// The abstract operation IsCallable takes argument argument (an ECMAScript
/// language value) and returns a Boolean. It determines if argument is a
/// callable function with a \[\[Call]] internal method.
pub fn is_callable(argument: Value) -> bool {
    match argument {
        // 1. If argument is not an Object, return false.
        // 2. If argument has a [[Call]] internal method, return true.
        // 3. Return false.
        Value::Object(object) => object.is_callable(),
        _ => false,
    }
}

fn is_same_type(x: Value, y: Value) -> bool {
    x.type_tag() == y.type_tag()
}

/// ### [7.2.10 SameValue ( x, y )](https://tc39.es/ecma262/#sec-samevalue)
pub fn same_value(x: Value, y: Value) -> bool {
    // 1. If Type(x) is not Type(y), return false.
    if !is_same_type(x, y) {
        return false;
    }
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::sameValue(x, y).
        return Number::from_f64(x).same_value(Number::from_f64(y));
    }
    // 3. Return SameValueNonNumber(x, y).
    same_value_non_number(x, y)
}

/// ### [7.2.13 SameValueNonNumber ( x, y )](https://tc39.es/ecma262/#sec-samevaluenonnumber)
fn same_value_non_number(x: Value, y: Value) -> bool {
    // 1. Assert: Type(x) is Type(y).
    debug_assert!(is_same_type(x, y));
    // 2. If x is either null or undefined, return true.
    // 4. If x is a String, then
    // a. If x and y have the same length and the same code units in the same
    //    positions, return true; otherwise, return false.
    // 5. If x is a Boolean, then
    // a. If x and y are both true or both false, return true; otherwise,
    //    return false.
    // 7. If x is y, return true; otherwise, return false.
    // NOTE: Heap strings are interned and strings that fit inline are never
    // on the heap, so comparing the handles compares the contents.
    x == y
}

/// ### [7.2.14 IsLooselyEqual ( x, y )](https://tc39.es/ecma262/#sec-islooselyequal)
///
/// The abstract operation IsLooselyEqual takes arguments x (an ECMAScript
/// language value) and y (an ECMAScript language value) and returns either a
/// normal completion containing a Boolean or a throw completion. It provides
/// the semantics for the == operator.
pub fn is_loosely_equal(agent: &mut Agent, x: Value, y: Value) -> JsResult<bool> {
    // 1. If Type(x) is Type(y), then
    if is_same_type(x, y) {
        // a. Return IsStrictlyEqual(x, y).
        return Ok(is_strictly_equal(agent, x, y));
    }

    // 2. If x is null and y is undefined, return true.
    // 3. If x is undefined and y is null, return true.
    if (x.is_null() && y.is_undefined()) || (x.is_undefined() && y.is_null()) {
        return Ok(true);
    }

    // 4. NOTE: [[IsHTMLDDA]] objects do not exist in Kestrel.

    // 5. If x is a Number and y is a String, return ! IsLooselyEqual(x, ! ToNumber(y)).
    if let (Value::Number(_), true) = (x, y.is_string()) {
        let y = string_value_to_number(agent, y);
        return is_loosely_equal(agent, x, y);
    }

    // 6. If x is a String and y is a Number, return ! IsLooselyEqual(! ToNumber(x), y).
    if let (true, Value::Number(_)) = (x.is_string(), y) {
        let x = string_value_to_number(agent, x);
        return is_loosely_equal(agent, x, y);
    }

    // 7. If x is a BigInt and y is a String, then
    // 8. If x is a String and y is a BigInt, return ! IsLooselyEqual(y, x).
    // NOTE: BigInts are not supported.

    // 9. If x is a Boolean, return ! IsLooselyEqual(! ToNumber(x), y).
    if let Value::Boolean(b) = x {
        return is_loosely_equal(agent, Value::from(b as u32), y);
    }

    // 10. If y is a Boolean, return ! IsLooselyEqual(x, ! ToNumber(y)).
    if let Value::Boolean(b) = y {
        return is_loosely_equal(agent, x, Value::from(b as u32));
    }

    // 11. If x is either a String, a Number, a BigInt, or a Symbol and y is an
    //     Object, return ! IsLooselyEqual(x, ? ToPrimitive(y)).
    if (x.is_string() || x.is_number()) && y.is_object() {
        let y = to_primitive(agent, y, None)?;
        return is_loosely_equal(agent, x, y);
    }

    // 12. If x is an Object and y is either a String, a Number, a BigInt, or a
    //     Symbol, return ! IsLooselyEqual(? ToPrimitive(x), y).
    if x.is_object() && (y.is_string() || y.is_number()) {
        let x = to_primitive(agent, x, None)?;
        return is_loosely_equal(agent, x, y);
    }

    // 13. If x is a BigInt and y is a Number, or if x is a Number and y is a
    //     BigInt, then
    // NOTE: BigInts are not supported.

    // 14. Return false.
    Ok(false)
}

fn string_value_to_number(agent: &Agent, value: Value) -> Value {
    let number = match value {
        Value::SmallString(s) => string_to_number(s.as_str()),
        Value::String(s) => string_to_number(s.as_str(agent)),
        _ => unreachable!(),
    };
    Value::Number(number)
}

/// ### [7.2.15 IsStrictlyEqual ( x, y )](https://tc39.es/ecma262/#sec-isstrictlyequal)
///
/// The abstract operation IsStrictlyEqual takes arguments x (an ECMAScript
/// language value) and y (an ECMAScript language value) and returns a Boolean.
/// It provides the semantics for the === operator.
pub fn is_strictly_equal(agent: &Agent, x: Value, y: Value) -> bool {
    let _ = agent;
    // 1. If Type(x) is not Type(y), return false.
    if !is_same_type(x, y) {
        return false;
    }
    // 2. If x is a Number, then
    if let (Value::Number(x), Value::Number(y)) = (x, y) {
        // a. Return Number::equal(x, y).
        return Number::from_f64(x).equal(Number::from_f64(y));
    }
    // 3. Return SameValueNonNumber(x, y).
    same_value_non_number(x, y)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::types::OrdinaryObject;

    #[test]
    fn strict_equality() {
        let mut agent = Agent::default();
        let long_a = Value::from_str(&mut agent, "a longer string");
        let long_b = Value::from_str(&mut agent, "a longer string");
        assert!(is_strictly_equal(&agent, long_a, long_b));
        assert!(is_strictly_equal(&agent, Value::from(0.0), Value::neg_zero()));
        assert!(!is_strictly_equal(&agent, Value::nan(), Value::nan()));
        assert!(!is_strictly_equal(&agent, Value::Null, Value::Undefined));
        assert!(!same_value(Value::from(0.0), Value::neg_zero()));
        assert!(same_value(Value::nan(), Value::nan()));
    }

    #[test]
    fn loose_equality_coerces_primitives() {
        let mut agent = Agent::default();
        let one = Value::from_str(&mut agent, "1");
        let empty = Value::from_str(&mut agent, "");
        assert!(is_loosely_equal(&mut agent, Value::Null, Value::Undefined).unwrap());
        assert!(is_loosely_equal(&mut agent, one, Value::from(1.0)).unwrap());
        assert!(is_loosely_equal(&mut agent, Value::Boolean(true), one).unwrap());
        assert!(is_loosely_equal(&mut agent, empty, Value::Boolean(false)).unwrap());
        assert!(!is_loosely_equal(&mut agent, Value::Null, Value::from(0.0)).unwrap());
        assert!(!is_loosely_equal(&mut agent, Value::Undefined, Value::Boolean(false)).unwrap());
    }

    #[test]
    fn loose_equality_with_objects() {
        let mut agent = Agent::default();
        let object = OrdinaryObject::create_empty_object(&mut agent);
        assert!(is_loosely_equal(&mut agent, object.into(), object.into()).unwrap());
        assert!(!is_loosely_equal(&mut agent, object.into(), Value::Null).unwrap());
        // Plain objects cannot be converted to primitives.
        assert!(is_loosely_equal(&mut agent, object.into(), Value::from(1.0)).is_err());
    }
}
