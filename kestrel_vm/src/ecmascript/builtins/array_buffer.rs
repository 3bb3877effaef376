// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [25.1 ArrayBuffer Objects](https://tc39.es/ecma262/#sec-arraybuffer-objects)

#[cfg(feature = "shared-array-buffer")]
use super::shared_array_buffer::SharedArrayBuffer;
use crate::{
    ecmascript::{
        execution::Agent,
        types::{InternalMethods, Object, Value},
    },
    heap::{CreateHeapData, indexes::ArrayBufferIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayBuffer(pub(crate) ArrayBufferIndex);

#[derive(Debug, Clone, Default)]
pub struct ArrayBufferHeapData {
    pub(crate) buffer: Box<[u8]>,
}

impl ArrayBuffer {
    /// ### [25.1.3.1 AllocateArrayBuffer ( constructor, byteLength \[ , maxByteLength \] )](https://tc39.es/ecma262/#sec-allocatearraybuffer)
    ///
    /// Allocates a zero-filled buffer of the given length.
    pub fn new(agent: &mut Agent, byte_length: usize) -> Self {
        agent.heap.create(ArrayBufferHeapData {
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

impl InternalMethods for ArrayBuffer {}

/// Either an ArrayBuffer or a SharedArrayBuffer: the buffer viewed by a
/// TypedArray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyArrayBuffer {
    ArrayBuffer(ArrayBuffer),
    #[cfg(feature = "shared-array-buffer")]
    SharedArrayBuffer(SharedArrayBuffer),
}

impl AnyArrayBuffer {
    /// ### [25.1.3.21 IsSharedArrayBuffer ( obj )](https://tc39.es/ecma262/#sec-issharedarraybuffer)
    pub fn is_shared(self) -> bool {
        match self {
            AnyArrayBuffer::ArrayBuffer(_) => false,
            #[cfg(feature = "shared-array-buffer")]
            AnyArrayBuffer::SharedArrayBuffer(_) => true,
        }
    }

    pub fn byte_length(self, agent: &Agent) -> usize {
        self.as_slice(agent).len()
    }

    pub(crate) fn as_slice(self, agent: &Agent) -> &[u8] {
        match self {
            AnyArrayBuffer::ArrayBuffer(ab) => &agent.heap[ab].buffer,
            #[cfg(feature = "shared-array-buffer")]
            AnyArrayBuffer::SharedArrayBuffer(sab) => &agent.heap[sab].buffer,
        }
    }

    pub(crate) fn as_mut_slice(self, agent: &mut Agent) -> &mut [u8] {
        match self {
            AnyArrayBuffer::ArrayBuffer(ab) => &mut agent.heap[ab].buffer,
            #[cfg(feature = "shared-array-buffer")]
            AnyArrayBuffer::SharedArrayBuffer(sab) => &mut agent.heap[sab].buffer,
        }
    }
}

impl From<ArrayBuffer> for AnyArrayBuffer {
    fn from(value: ArrayBuffer) -> Self {
        AnyArrayBuffer::ArrayBuffer(value)
    }
}

#[cfg(feature = "shared-array-buffer")]
impl From<SharedArrayBuffer> for AnyArrayBuffer {
    fn from(value: SharedArrayBuffer) -> Self {
        AnyArrayBuffer::SharedArrayBuffer(value)
    }
}

impl From<AnyArrayBuffer> for Object {
    fn from(value: AnyArrayBuffer) -> Self {
        match value {
            AnyArrayBuffer::ArrayBuffer(ab) => Object::ArrayBuffer(ab),
            #[cfg(feature = "shared-array-buffer")]
            AnyArrayBuffer::SharedArrayBuffer(sab) => Object::SharedArrayBuffer(sab),
        }
    }
}
