// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [7.1 Type Conversion](https://tc39.es/ecma262/#sec-type-conversion)
//!
//! The ECMAScript language implicitly performs automatic type conversion as
//! needed. To clarify the semantics of certain constructs it is useful to
//! define a set of conversion abstract operations. The conversion abstract
//! operations are polymorphic; they can accept a value of any ECMAScript
//! language type.
//!
//! BigInts are not a language type in Kestrel. [to_big_int64] converts
//! directly to the 64-bit element representation used by BigInt64 views.

use crate::ecmascript::{
    execution::{Agent, ExceptionType, JsResult},
    types::{Number, Object, PropertyKey, String, Value},
};

use super::{
    operations_on_objects::{call, get},
    testing_and_comparison::is_callable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferredType {
    String = 1,
    Number,
}

/// ### [7.1.1 ToPrimitive ( input \[ , preferredType \] )](https://tc39.es/ecma262/#sec-toprimitive)
///
/// The abstract operation ToPrimitive takes argument input (an ECMAScript
/// language value) and optional argument preferredType (STRING or NUMBER) and
/// returns either a normal completion containing an ECMAScript language value
/// or a throw completion. It converts its input argument to a non-Object type.
///
/// Kestrel has no symbols, so there is never an `@@toPrimitive` method to
/// consult.
pub fn to_primitive(
    agent: &mut Agent,
    input: Value,
    preferred_type: Option<PreferredType>,
) -> JsResult<Value> {
    // 1. If input is an Object, then
    if let Ok(input) = Object::try_from(input) {
        // a. Let exoticToPrim be ? GetMethod(input, @@toPrimitive).
        // b. If exoticToPrim is not undefined, then
        // NOTE: Symbols are not supported.
        // c. If preferredType is not present, let preferredType be NUMBER.
        // d. Return ? OrdinaryToPrimitive(input, preferredType).
        ordinary_to_primitive(
            agent,
            input,
            preferred_type.unwrap_or(PreferredType::Number),
        )
    } else {
        // 2. Return input.
        Ok(input)
    }
}

/// #### [7.1.1.1 OrdinaryToPrimitive ( O, hint )](https://tc39.es/ecma262/#sec-ordinarytoprimitive)
///
/// The abstract operation OrdinaryToPrimitive takes arguments O (an Object)
/// and hint (STRING or NUMBER) and returns either a normal completion
/// containing an ECMAScript language value or a throw completion.
pub fn ordinary_to_primitive(
    agent: &mut Agent,
    o: Object,
    hint: PreferredType,
) -> JsResult<Value> {
    let to_string_key = PropertyKey::from_str(agent, "toString");
    let value_of_key = PropertyKey::from_small_string("valueOf");
    let method_names = match hint {
        PreferredType::String => {
            // 1. If hint is STRING, then
            // a. Let methodNames be « "toString", "valueOf" ».
            [to_string_key, value_of_key]
        }
        PreferredType::Number => {
            // 2. Else,
            // a. Let methodNames be « "valueOf", "toString" ».
            [value_of_key, to_string_key]
        }
    };
    // 3. For each element name of methodNames, do
    for name in method_names {
        // a. Let method be ? Get(O, name).
        let method = get(agent, o, name)?;
        // b. If IsCallable(method) is true, then
        if is_callable(method) {
            // i. Let result be ? Call(method, O).
            let result = call(agent, method, o.into_value(), None)?;
            // ii. If result is not an Object, return result.
            if !result.is_object() {
                return Ok(result);
            }
        }
    }
    // 4. Throw a TypeError exception.
    Err(agent.throw_exception_with_static_message(
        ExceptionType::TypeError,
        "Cannot convert object to primitive value",
    ))
}

/// ### [7.1.2 ToBoolean ( argument )](https://tc39.es/ecma262/#sec-toboolean)
pub fn to_boolean(agent: &Agent, argument: Value) -> bool {
    match argument {
        // 1. If argument is a Boolean, return argument.
        Value::Boolean(bool) => bool,
        // 2. If argument is one of undefined, null, +0𝔽, -0𝔽, NaN, 0ℤ, or the
        //    empty String, return false.
        Value::Undefined | Value::Null => false,
        Value::Number(n) => !(n == 0.0 || n.is_nan()),
        Value::SmallString(s) => !s.is_empty(),
        Value::String(s) => !s.as_str(agent).is_empty(),
        // 3. NOTE: This step is replaced in section B.3.6.1.
        // 4. Return true.
        Value::Object(_) => true,
    }
}

/// ### [7.1.4 ToNumber ( argument )](https://tc39.es/ecma262/#sec-tonumber)
///
/// Calls into the object's `valueOf` or `toString` methods for Objects.
pub fn to_number(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    match argument {
        // 1. If argument is a Number, return argument.
        Value::Number(n) => Ok(n),
        // 3. If argument is undefined, return NaN.
        Value::Undefined => Ok(f64::NAN),
        // 4. If argument is either null or false, return +0𝔽.
        Value::Null | Value::Boolean(false) => Ok(0.0),
        // 5. If argument is true, return 1𝔽.
        Value::Boolean(true) => Ok(1.0),
        // 6. If argument is a String, return StringToNumber(argument).
        Value::SmallString(s) => Ok(string_to_number(s.as_str())),
        Value::String(s) => Ok(string_to_number(s.as_str(agent))),
        // 7. Assert: argument is an Object.
        Value::Object(_) => {
            // 8. Let primValue be ? ToPrimitive(argument, NUMBER).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::Number))?;
            // 9. Assert: primValue is not an Object.
            debug_assert!(!prim_value.is_object());
            // 10. Return ? ToNumber(primValue).
            to_number(agent, prim_value)
        }
    }
}

/// WhiteSpace and LineTerminator code points trimmed by StringToNumber.
fn is_trimmable_whitespace(c: char) -> bool {
    // U+0085 NEXT LINE is White_Space in Unicode but not in ECMAScript.
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{0085}')
}

/// ### [7.1.4.1.1 StringToNumber ( str )](https://tc39.es/ecma262/#sec-stringtonumber)
pub fn string_to_number(str: &str) -> f64 {
    // 1. Let text be StringToCodePoints(str).
    let text = str.trim_matches(is_trimmable_whitespace);
    // 2. Let literal be ParseText(text, StringNumericLiteral).
    // 3. If literal is a List of errors, return NaN.
    // 4. Return StringNumericValue of literal.
    if text.is_empty() {
        // StringNumericLiteral ::: StrWhiteSpace_opt
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    // NonDecimalIntegerLiteral does not take a sign.
    if let Some(value) = parse_non_decimal_integer_literal(text) {
        return value;
    }
    // fast_float accepts "inf", "infinity" and "nan" in any case, none of
    // which are StrDecimalLiterals.
    if text
        .bytes()
        .any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E'))
    {
        return f64::NAN;
    }
    fast_float::parse::<f64, _>(text).unwrap_or(f64::NAN)
}

/// NonDecimalIntegerLiteral: `0b`, `0o` and `0x` prefixed digits.
///
/// Returns None if the text does not start with one of the prefixes; NaN if
/// the digits are invalid.
fn parse_non_decimal_integer_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut value = 0.0f64;
    for c in digits.chars() {
        let Some(digit) = c.to_digit(radix) else {
            return Some(f64::NAN);
        };
        value = value * radix as f64 + digit as f64;
    }
    Some(value)
}

/// ### [7.1.5 ToIntegerOrInfinity ( argument )](https://tc39.es/ecma262/#sec-tointegerorinfinity)
pub fn to_integer_or_infinity(agent: &mut Agent, argument: Value) -> JsResult<f64> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    // 2. If number is one of NaN, +0𝔽, or -0𝔽, return 0.
    if number.is_nan() || number == 0.0 {
        return Ok(0.0);
    }
    // 3. If number is +∞𝔽, return +∞.
    // 4. If number is -∞𝔽, return -∞.
    if number.is_infinite() {
        return Ok(number);
    }
    // 5. Return truncate(ℝ(number)).
    Ok(number.trunc())
}

/// ### [7.1.6 ToInt32 ( argument )](https://tc39.es/ecma262/#sec-toint32)
pub fn to_int32(agent: &mut Agent, argument: Value) -> JsResult<i32> {
    // 1. Let number be ? ToNumber(argument).
    let number = to_number(agent, argument)?;
    Ok(number_to_int32(number))
}

/// Steps 2 to 5 of ToInt32 for a Number.
pub(crate) fn number_to_int32(number: f64) -> i32 {
    // 2. If number is not finite or number is either +0𝔽 or -0𝔽, return +0𝔽.
    if !number.is_finite() || number == 0.0 {
        return 0;
    }
    // 3. Let int be truncate(ℝ(number)).
    let int = number.trunc();
    // 4. Let int32bit be int modulo 2**32.
    let int32bit = int.rem_euclid(4294967296.0);
    // 5. If int32bit ≥ 2**31, return 𝔽(int32bit - 2**32); otherwise return
    //    𝔽(int32bit).
    int32bit as u32 as i32
}

/// ### [7.1.13 ToBigInt ( argument )](https://tc39.es/ecma262/#sec-tobigint) and
/// ### [7.1.16 ToBigInt64 ( argument )](https://tc39.es/ecma262/#sec-tobigint64)
///
/// Converts the argument to a BigInt and returns it modulo 2**64 as a signed
/// 64-bit integer.
pub fn to_big_int64(agent: &mut Agent, argument: Value) -> JsResult<i64> {
    // 1. Let prim be ? ToPrimitive(argument, NUMBER).
    let prim = to_primitive(agent, argument, Some(PreferredType::Number))?;
    // 2. Return the value that prim corresponds to in Table 12.
    match prim {
        Value::Undefined | Value::Null => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert undefined or null to BigInt",
        )),
        Value::Boolean(bool) => Ok(bool as i64),
        Value::Number(_) => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot convert number to BigInt",
        )),
        Value::SmallString(_) | Value::String(_) => {
            let Ok(string) = String::try_from(prim) else {
                unreachable!()
            };
            // 1. Let n be StringToBigInt(prim).
            // 2. If n is undefined, throw a SyntaxError exception.
            // 3. Return n.
            match string_to_big_int64(string.as_str(agent)) {
                Some(n) => Ok(n),
                None => {
                    let message = format!(
                        "Cannot convert {} to BigInt",
                        string.as_str(agent)
                    );
                    Err(agent.throw_exception(ExceptionType::SyntaxError, message))
                }
            }
        }
        Value::Object(_) => unreachable!(),
    }
}

/// ### [7.1.14 StringToBigInt ( str )](https://tc39.es/ecma262/#sec-stringtobigint)
///
/// Returns the parsed integer modulo 2**64, or None if the string is not a
/// StringIntegerLiteral.
fn string_to_big_int64(str: &str) -> Option<i64> {
    let text = str.trim_matches(is_trimmable_whitespace);
    if text.is_empty() {
        return Some(0);
    }
    let (radix, negative, digits) = match text.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, false, &text[2..]),
        [b'0', b'o' | b'O', ..] => (8, false, &text[2..]),
        [b'0', b'b' | b'B', ..] => (2, false, &text[2..]),
        [b'-', ..] => (10, true, &text[1..]),
        [b'+', ..] => (10, false, &text[1..]),
        _ => (10, false, text),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value = 0u64;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value
            .wrapping_mul(radix as u64)
            .wrapping_add(digit as u64);
    }
    let value = if negative { value.wrapping_neg() } else { value };
    Some(value as i64)
}

/// ### [7.1.17 ToString ( argument )](https://tc39.es/ecma262/#sec-tostring)
pub fn to_string(agent: &mut Agent, argument: Value) -> JsResult<String> {
    match argument {
        // 1. If argument is a String, return argument.
        Value::String(s) => Ok(String::String(s)),
        Value::SmallString(s) => Ok(String::SmallString(s)),
        // 3. If argument is undefined, return "undefined".
        Value::Undefined => Ok(String::from_small_string("undefined")),
        // 4. If argument is null, return "null".
        Value::Null => Ok(String::from_small_string("null")),
        // 5. If argument is true, return "true".
        Value::Boolean(true) => Ok(String::from_small_string("true")),
        // 6. If argument is false, return "false".
        Value::Boolean(false) => Ok(String::from_small_string("false")),
        // 7. If argument is a Number, return Number::toString(argument, 10).
        Value::Number(n) => {
            let string = Number::from_f64(n).to_string_radix_10();
            Ok(String::from_string(agent, string))
        }
        // 9. Assert: argument is an Object.
        Value::Object(_) => {
            // 10. Let primValue be ? ToPrimitive(argument, STRING).
            let prim_value = to_primitive(agent, argument, Some(PreferredType::String))?;
            // 11. Assert: primValue is not an Object.
            debug_assert!(!prim_value.is_object());
            // 12. Return ? ToString(primValue).
            to_string(agent, prim_value)
        }
    }
}

/// ### [7.1.19 ToPropertyKey ( argument )](https://tc39.es/ecma262/#sec-topropertykey)
pub fn to_property_key(agent: &mut Agent, argument: Value) -> JsResult<PropertyKey> {
    // 1. Let key be ? ToPrimitive(argument, STRING).
    let key = to_primitive(agent, argument, Some(PreferredType::String))?;
    // 2. If key is a Symbol, then
    // a. Return key.
    // NOTE: Symbols are not supported.
    // 3. Return ! ToString(key).
    let key = to_string(agent, key)?;
    Ok(PropertyKey::from_string(agent, key))
}

/// ### [7.1.22 ToIndex ( value )](https://tc39.es/ecma262/#sec-toindex)
pub fn to_index(agent: &mut Agent, argument: Value) -> JsResult<u64> {
    // 1. Let integer be ? ToIntegerOrInfinity(value).
    let integer = to_integer_or_infinity(agent, argument)?;
    // 2. If integer is not in the inclusive interval from 0 to 2**53 - 1,
    //    throw a RangeError exception.
    if !(0.0..=9007199254740991.0).contains(&integer) {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Index is out of range",
        ));
    }
    // 3. Return integer.
    Ok(integer as u64)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn string_to_number_literals() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number(" \n\t "), 0.0);
        assert_eq!(string_to_number(" 12.5 "), 12.5);
        assert_eq!(string_to_number("-0.1e1"), -1.0);
        assert_eq!(string_to_number(".5"), 0.5);
        assert_eq!(string_to_number("5."), 5.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("0b101"), 5.0);
        assert_eq!(string_to_number("0o17"), 15.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(string_to_number("\u{FEFF}Infinity"), f64::INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("infinity").is_nan());
        assert!(string_to_number("NaN").is_nan());
        assert!(string_to_number("-0x10").is_nan());
        assert!(string_to_number("0x").is_nan());
        assert!(string_to_number("1e").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("1 2").is_nan());
    }

    #[test]
    fn int32_wraps_modulo() {
        assert_eq!(number_to_int32(f64::NAN), 0);
        assert_eq!(number_to_int32(-0.0), 0);
        assert_eq!(number_to_int32(f64::INFINITY), 0);
        assert_eq!(number_to_int32(-1.9), -1);
        assert_eq!(number_to_int32(2147483648.0), i32::MIN);
        assert_eq!(number_to_int32(4294967297.0), 1);
        assert_eq!(number_to_int32(-4294967297.0), -1);
    }

    #[test]
    fn string_to_big_int_wraps_modulo() {
        assert_eq!(string_to_big_int64(" 42 "), Some(42));
        assert_eq!(string_to_big_int64("-1"), Some(-1));
        assert_eq!(string_to_big_int64(""), Some(0));
        assert_eq!(string_to_big_int64("0xff"), Some(255));
        assert_eq!(string_to_big_int64("18446744073709551617"), Some(1));
        assert_eq!(string_to_big_int64("1.5"), None);
        assert_eq!(string_to_big_int64("-0x1"), None);
    }

    #[test]
    fn to_index_range() {
        let mut agent = Agent::default();
        assert_eq!(to_index(&mut agent, Value::Undefined).unwrap(), 0);
        assert_eq!(to_index(&mut agent, Value::from(3.7)).unwrap(), 3);
        assert_eq!(to_index(&mut agent, Value::from(-0.5)).unwrap(), 0);
        let error = to_index(&mut agent, Value::from(-1.0)).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::RangeError));
        let error = to_index(&mut agent, Value::pos_inf()).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::RangeError));
    }

    #[test]
    fn plain_objects_have_no_primitive_value() {
        let mut agent = Agent::default();
        let object = crate::ecmascript::types::OrdinaryObject::create_empty_object(&mut agent);
        let error = to_number(&mut agent, object.into()).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
    }

    #[test]
    fn property_keys_from_numbers() {
        let mut agent = Agent::default();
        assert_eq!(
            to_property_key(&mut agent, Value::from(7.0)).unwrap(),
            PropertyKey::Integer(7)
        );
        let key = to_property_key(&mut agent, Value::from(1.5)).unwrap();
        assert!(key.equals_str(&agent, "1.5"));
        let key = to_property_key(&mut agent, Value::Null).unwrap();
        assert_eq!(key, PropertyKey::from_small_string("null"));
    }
}
