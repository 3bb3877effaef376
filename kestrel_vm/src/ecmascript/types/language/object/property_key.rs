// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::hash::{Hash, Hasher};

use ahash::AHasher;
use small_string::SmallString;

use crate::ecmascript::{
    execution::Agent,
    types::{HeapString, Number, String, Value},
};

/// # [Property key](https://tc39.es/ecma262/#property-key)
///
/// The properties of an object are uniquely identified using property keys.
/// A _property key_ is a String here: symbols are not supported.
///
/// An _array index_ is an integer index `n` such that
/// `CanonicalNumericIndexString(n)` returns an integral Number in the
/// inclusive interval from `+0𝔽` to `𝔽(2**32 - 2)`. Array indices are always
/// stored as [PropertyKey::Integer]; the string variants never hold a
/// canonical array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    Integer(u32),
    SmallString(SmallString),
    String(HeapString),
}

/// Largest valid array index, `2**32 - 2`.
pub(crate) const MAX_ARRAY_INDEX: u32 = u32::MAX - 1;

impl PropertyKey {
    pub fn from_str(agent: &mut Agent, str: &str) -> Self {
        parse_string_to_integer_property_key(str)
            .unwrap_or_else(|| String::from_str(agent, str).into_property_key_unchecked())
    }

    /// Create a PropertyKey from a static string that fits in a
    /// [SmallString] and is not an array index.
    pub const fn from_small_string(str: &'static str) -> Self {
        match String::from_small_string(str) {
            String::SmallString(s) => PropertyKey::SmallString(s),
            String::String(_) => unreachable!(),
        }
    }

    /// Create a PropertyKey from a String value, converting canonical array
    /// index strings into integer keys.
    pub fn from_string(agent: &Agent, string: String) -> Self {
        if let Some(key) = parse_string_to_integer_property_key(string.as_str(agent)) {
            return key;
        }
        string.into_property_key_unchecked()
    }

    pub fn is_array_index(self) -> bool {
        matches!(self, PropertyKey::Integer(_))
    }

    /// Extract a JavaScript Array index (an integer in the inclusive range of
    /// `0..=(2^32 - 2)`) from a PropertyKey.
    pub fn into_u32(self) -> Option<u32> {
        match self {
            PropertyKey::Integer(index) => Some(index),
            _ => None,
        }
    }

    /// Convert a PropertyKey into a Value.
    ///
    /// This converts any integer keys into strings.
    pub fn convert_to_value(self, agent: &mut Agent) -> Value {
        match self {
            PropertyKey::Integer(index) => {
                Value::from_string(agent, Number::from_f64(index as f64).to_string_radix_10())
            }
            PropertyKey::SmallString(s) => Value::SmallString(s),
            PropertyKey::String(s) => Value::String(s),
        }
    }

    /// Returns true if the key's string form equals the given string.
    pub fn equals_str(self, agent: &Agent, str: &str) -> bool {
        match self {
            PropertyKey::Integer(index) => {
                parse_string_to_integer_property_key(str) == Some(PropertyKey::Integer(index))
            }
            PropertyKey::SmallString(s) => s == str,
            PropertyKey::String(s) => s.as_str(agent) == str,
        }
    }

    pub(crate) fn as_display<'b, 'c>(&'b self, agent: &'c Agent) -> DisplayablePropertyKey<'b, 'c> {
        DisplayablePropertyKey { key: self, agent }
    }

    /// Hash of the key. Heap strings are interned so hashing the handle is
    /// equivalent to hashing the contents.
    pub(crate) fn heap_hash(self) -> u64 {
        let mut hasher = AHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl String {
    /// Reinterpret a String as a PropertyKey without checking for array
    /// index strings.
    fn into_property_key_unchecked(self) -> PropertyKey {
        match self {
            String::String(s) => PropertyKey::String(s),
            String::SmallString(s) => PropertyKey::SmallString(s),
        }
    }
}

pub(crate) struct DisplayablePropertyKey<'b, 'c> {
    key: &'b PropertyKey,
    agent: &'c Agent,
}

impl core::fmt::Display for DisplayablePropertyKey<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.key {
            PropertyKey::Integer(index) => write!(f, "{index}"),
            PropertyKey::SmallString(s) => f.write_str(s.as_str()),
            PropertyKey::String(s) => f.write_str(s.as_str(self.agent)),
        }
    }
}

/// Parse a canonical array index string, `0` or a digit sequence without a
/// leading zero, into an integer PropertyKey.
pub(crate) fn parse_string_to_integer_property_key(str: &str) -> Option<PropertyKey> {
    let bytes = str.as_bytes();
    if bytes.is_empty() || bytes.len() > 10 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    let value: u64 = str.parse().ok()?;
    if value > MAX_ARRAY_INDEX as u64 {
        return None;
    }
    Some(PropertyKey::Integer(value as u32))
}
