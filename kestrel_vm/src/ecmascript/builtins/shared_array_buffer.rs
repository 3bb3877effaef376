// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.2 SharedArrayBuffer Objects](https://tc39.es/ecma262/#sec-sharedarraybuffer-objects)
//!
//! Kestrel runs a single agent, so a SharedArrayBuffer is never actually
//! shared. It is distinguished from an ArrayBuffer because the Atomics wait
//! operations only accept views on shared memory.

use crate::{
    ecmascript::{
        execution::Agent,
        types::{InternalMethods, Value},
    },
    heap::{CreateHeapData, indexes::SharedArrayBufferIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharedArrayBuffer(pub(crate) SharedArrayBufferIndex);

#[derive(Debug, Clone, Default)]
pub struct SharedArrayBufferHeapData {
    pub(crate) buffer: Box<[u8]>,
}

impl SharedArrayBuffer {
    /// ### [25.2.2.1 AllocateSharedArrayBuffer ( constructor, byteLength \[ , maxByteLength \] )](https://tc39.es/ecma262/#sec-allocatesharedarraybuffer)
    ///
    /// Allocates a zero-filled shared buffer of the given length.
    pub fn new(agent: &mut Agent, byte_length: usize) -> Self {
        agent.heap.create(SharedArrayBufferHeapData {
            buffer: vec![0; byte_length].into_boxed_slice(),
        })
    }

    pub fn byte_length(self, agent: &Agent) -> usize {
        agent.heap[self].buffer.len()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into())
    }
}

impl InternalMethods for SharedArrayBuffer {}
