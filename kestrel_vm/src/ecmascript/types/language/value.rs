// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use small_string::SmallString;

use super::{HeapString, Number, Object, OrdinaryObject, String};
use crate::ecmascript::{
    abstract_operations::type_conversion::to_number,
    execution::{Agent, JsResult},
};

/// ### [6.1 ECMAScript Language Types](https://tc39.es/ecma262/#sec-ecmascript-language-types)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// ### [6.1.1 The Undefined Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-undefined-type)
    #[default]
    Undefined,

    /// ### [6.1.2 The Null Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-null-type)
    Null,

    /// ### [6.1.3 The Boolean Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-boolean-type)
    Boolean(bool),

    /// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
    ///
    /// UTF-8 string on the heap, longer than 7 bytes.
    String(HeapString),
    /// UTF-8 string of 7 bytes or fewer stored inline.
    SmallString(SmallString),

    /// ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)
    Number(f64),

    /// ### [6.1.7 The Object Type](https://tc39.es/ecma262/#sec-object-type)
    Object(Object),
}

/// Dynamic type of a [Value].
///
/// Properties record the tag of the last value written to them as a type
/// feedback hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueTypeTag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Object,
}

impl ValueTypeTag {
    pub const fn of(value: Value) -> Self {
        match value {
            Value::Undefined => Self::Undefined,
            Value::Null => Self::Null,
            Value::Boolean(_) => Self::Boolean,
            Value::String(_) | Value::SmallString(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Object(_) => Self::Object,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Object => "object",
        }
    }
}

impl Value {
    pub const fn nan() -> Self {
        Self::Number(f64::NAN)
    }

    pub const fn pos_inf() -> Self {
        Self::Number(f64::INFINITY)
    }

    pub const fn neg_inf() -> Self {
        Self::Number(f64::NEG_INFINITY)
    }

    pub const fn pos_zero() -> Self {
        Self::Number(0.0)
    }

    pub const fn neg_zero() -> Self {
        Self::Number(-0.0)
    }

    pub fn from_f64(value: f64) -> Self {
        Self::Number(value)
    }

    pub fn from_str(agent: &mut Agent, message: &str) -> Self {
        String::from_str(agent, message).into_value()
    }

    pub fn from_string(agent: &mut Agent, message: std::string::String) -> Self {
        String::from_string(agent, message).into_value()
    }

    pub const fn type_tag(self) -> ValueTypeTag {
        ValueTypeTag::of(self)
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    pub fn is_string(self) -> bool {
        matches!(self, Value::String(_) | Value::SmallString(_))
    }

    pub fn is_number(self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_object(self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    pub fn is_neg_zero(self) -> bool {
        matches!(self, Value::Number(n) if Number::from_f64(n).is_neg_zero())
    }

    pub fn to_number(self, agent: &mut Agent) -> JsResult<f64> {
        to_number(agent, self)
    }

    /// Human readable rendering of the value for diagnostics. Does not call
    /// into any user code.
    pub fn to_display_string(self, agent: &Agent) -> std::string::String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => format!("{:?}", s.as_str(agent)),
            Value::SmallString(s) => format!("{s:?}"),
            Value::Number(n) => {
                if Number::from_f64(n).is_neg_zero() {
                    "-0".to_string()
                } else {
                    Number::from_f64(n).to_string_radix_10()
                }
            }
            Value::Object(o) => o.to_display_string(agent),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<HeapString> for Value {
    fn from(value: HeapString) -> Self {
        Value::String(value)
    }
}

impl From<SmallString> for Value {
    fn from(value: SmallString) -> Self {
        Value::SmallString(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<OrdinaryObject> for Value {
    fn from(value: OrdinaryObject) -> Self {
        Value::Object(Object::Object(value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn type_tags() {
        assert_eq!(Value::Undefined.type_tag(), ValueTypeTag::Undefined);
        assert_eq!(Value::Null.type_tag(), ValueTypeTag::Null);
        assert_eq!(Value::from(true).type_tag(), ValueTypeTag::Boolean);
        assert_eq!(Value::from(1.5).type_tag(), ValueTypeTag::Number);
        assert_eq!(
            Value::from(SmallString::try_from("a").unwrap()).type_tag(),
            ValueTypeTag::String
        );
    }

    #[test]
    fn display_string_of_numbers() {
        let agent = Agent::default();
        assert_eq!(Value::neg_zero().to_display_string(&agent), "-0");
        assert_eq!(Value::from(100.0).to_display_string(&agent), "100");
        assert_eq!(Value::nan().to_display_string(&agent), "NaN");
    }
}
