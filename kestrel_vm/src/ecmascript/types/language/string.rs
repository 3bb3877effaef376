// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use small_string::SmallString;

use super::Value;
use crate::{ecmascript::execution::Agent, heap::indexes::StringIndex};

/// Handle to an interned string on the heap.
///
/// Heap strings are always longer than 7 bytes: shorter strings are
/// [SmallString]s. Two handles are equal exactly when their contents are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HeapString(pub(crate) StringIndex);

impl HeapString {
    pub fn as_str(self, agent: &Agent) -> &str {
        agent.heap[self].as_str()
    }
}

#[derive(Debug)]
pub struct StringHeapData {
    data: Box<str>,
}

impl StringHeapData {
    pub(crate) fn from_str(data: &str) -> Self {
        Self { data: data.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// ### [6.1.4 The String Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-string-type)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum String {
    String(HeapString),
    SmallString(SmallString),
}

impl String {
    pub const EMPTY_STRING: Self = Self::SmallString(SmallString::EMPTY);

    pub fn from_str(agent: &mut Agent, message: &str) -> Self {
        if let Ok(small) = SmallString::try_from(message) {
            Self::SmallString(small)
        } else {
            Self::String(agent.heap.alloc_string(message))
        }
    }

    pub fn from_string(agent: &mut Agent, message: std::string::String) -> Self {
        Self::from_str(agent, &message)
    }

    /// Create a String from a static string that fits in a [SmallString].
    ///
    /// Panics if the string is longer than 7 bytes.
    pub const fn from_small_string(message: &'static str) -> Self {
        assert!(message.len() <= small_string::MAX_LEN);
        // SAFETY: Length checked above.
        Self::SmallString(unsafe { SmallString::from_str_unchecked(message) })
    }

    pub fn as_str<'a>(&'a self, agent: &'a Agent) -> &'a str {
        match self {
            String::String(s) => s.as_str(agent),
            String::SmallString(s) => s.as_str(),
        }
    }

    /// Byte length of the string.
    pub fn len(self, agent: &Agent) -> usize {
        match self {
            String::String(s) => agent.heap[s].len(),
            String::SmallString(s) => s.len(),
        }
    }

    pub fn is_empty_string(self) -> bool {
        matches!(self, String::SmallString(s) if s.is_empty())
    }

    pub fn into_value(self) -> Value {
        self.into()
    }
}

impl From<HeapString> for String {
    fn from(value: HeapString) -> Self {
        String::String(value)
    }
}

impl From<SmallString> for String {
    fn from(value: SmallString) -> Self {
        String::SmallString(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        match value {
            String::String(s) => Value::String(s),
            String::SmallString(s) => Value::SmallString(s),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = ();

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(String::String(s)),
            Value::SmallString(s) => Ok(String::SmallString(s)),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::execution::Options;

    #[test]
    fn short_strings_stay_inline() {
        let mut agent = Agent::new(Options::default());
        let short = String::from_str(&mut agent, "hello");
        assert!(matches!(short, String::SmallString(_)));
        let long = String::from_str(&mut agent, "hello, world");
        assert!(matches!(long, String::String(_)));
        assert_eq!(long.as_str(&agent), "hello, world");
        assert_eq!(long, String::from_str(&mut agent, "hello, world"));
        assert!(String::EMPTY_STRING.is_empty_string());
    }
}
