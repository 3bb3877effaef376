// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [20.5 Error Objects](https://tc39.es/ecma262/#sec-error-objects)

use crate::{
    ecmascript::{
        execution::{Agent, ExceptionType},
        types::InternalMethods,
    },
    heap::indexes::ErrorIndex,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Error(pub(crate) ErrorIndex);

impl Error {
    pub fn kind(self, agent: &Agent) -> ExceptionType {
        agent.heap[self].kind
    }

    pub fn message(self, agent: &Agent) -> &str {
        &agent.heap[self].message
    }
}

/// Error objects expose their kind and message only through [Error::kind]
/// and [Error::message].
impl InternalMethods for Error {}

#[derive(Debug, Clone)]
pub struct ErrorHeapData {
    pub(crate) kind: ExceptionType,
    pub(crate) message: std::string::String,
}

impl ErrorHeapData {
    pub(crate) fn new(kind: ExceptionType, message: std::string::String) -> Self {
        Self { kind, message }
    }
}
