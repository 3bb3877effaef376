// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)

use super::realm::{Intrinsics, Realm};
use crate::{
    ecmascript::{
        builtins::error::ErrorHeapData,
        types::{Object, Value},
    },
    heap::{CreateHeapData, Heap},
};

#[derive(Debug, Clone)]
pub struct Options {
    /// Print engine internals to stderr: shape and dictionary transitions,
    /// lookup cache misses and summation overflow.
    pub print_internals: bool,
    /// Number of properties an object may hold in shaped mode. Adding a
    /// property beyond this moves the object to dictionary mode.
    pub max_shaped_properties: u32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            print_internals: false,
            max_shaped_properties: 64,
        }
    }
}

pub type JsResult<T> = core::result::Result<T, JsError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsError(Value);

impl JsError {
    pub(crate) fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(self) -> Value {
        self.0
    }

    /// Exception type of the thrown value, if it is an Error object.
    pub fn kind(self, agent: &Agent) -> Option<ExceptionType> {
        match self.0 {
            Value::Object(Object::Error(error)) => Some(error.kind(agent)),
            _ => None,
        }
    }

    /// Message of the thrown value, if it is an Error object.
    pub fn message(self, agent: &Agent) -> Option<&str> {
        match self.0 {
            Value::Object(Object::Error(error)) => Some(error.message(agent)),
            _ => None,
        }
    }

    pub fn to_display_string(self, agent: &Agent) -> String {
        match self.0 {
            Value::Object(Object::Error(error)) => {
                format!("{}: {}", error.kind(agent).name(), error.message(agent))
            }
            value => value.to_display_string(agent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Error,
    AggregateError,
    EvalError,
    RangeError,
    ReferenceError,
    SyntaxError,
    TypeError,
    UriError,
}

impl ExceptionType {
    pub const fn name(self) -> &'static str {
        match self {
            ExceptionType::Error => "Error",
            ExceptionType::AggregateError => "AggregateError",
            ExceptionType::EvalError => "EvalError",
            ExceptionType::RangeError => "RangeError",
            ExceptionType::ReferenceError => "ReferenceError",
            ExceptionType::SyntaxError => "SyntaxError",
            ExceptionType::TypeError => "TypeError",
            ExceptionType::UriError => "URIError",
        }
    }
}

/// ### [9.7 Agents](https://tc39.es/ecma262/#sec-agents)
///
/// An agent comprises a set of ECMAScript execution contexts, an execution
/// context stack, a running execution context, an Agent Record, and an
/// executing thread. Here it owns the heap and the single realm that all
/// operations run in.
#[derive(Debug)]
pub struct Agent {
    pub(crate) heap: Heap,
    pub(crate) options: Options,
    realm: Realm,
}

impl Agent {
    pub fn new(options: Options) -> Self {
        let mut heap = Heap::new();
        let intrinsics = Intrinsics::allocate(&mut heap);
        let mut agent = Self {
            heap,
            options,
            realm: Realm::new(intrinsics),
        };
        Realm::initialize_intrinsics(&mut agent);
        agent
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn current_realm(&self) -> &Realm {
        &self.realm
    }

    /// ### [5.2.3.2 Throw an Exception](https://tc39.es/ecma262/#sec-throw-an-exception)
    pub fn throw_exception_with_static_message(
        &mut self,
        kind: ExceptionType,
        message: &'static str,
    ) -> JsError {
        self.throw_exception(kind, message.to_string())
    }

    pub fn throw_exception(&mut self, kind: ExceptionType, message: String) -> JsError {
        let error = self.heap.create(ErrorHeapData::new(kind, message));
        JsError::new(Value::Object(Object::Error(error)))
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
