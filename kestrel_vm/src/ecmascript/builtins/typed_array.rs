// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [23.2 TypedArray Objects](https://tc39.es/ecma262/#sec-typedarray-objects)
//!
//! Elements are stored in little-endian byte order regardless of the host.

use super::array_buffer::{AnyArrayBuffer, ArrayBuffer};
use crate::{
    ecmascript::{
        abstract_operations::type_conversion::{to_big_int64, to_number},
        execution::{Agent, ExceptionType, JsResult},
        types::{InternalMethods, OrdinaryObject, PropertyDescriptor, PropertyKey, Value},
    },
    heap::{CreateHeapData, indexes::TypedArrayIndex},
};

/// ### [Table 71: The TypedArray Constructors](https://tc39.es/ecma262/#table-the-typedarray-constructors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    BigInt64,
    BigUint64,
    Float32,
    Float64,
}

impl TypedArrayKind {
    /// Name of the TypedArray constructor.
    pub const fn name(self) -> &'static str {
        match self {
            TypedArrayKind::Int8 => "Int8Array",
            TypedArrayKind::Uint8 => "Uint8Array",
            TypedArrayKind::Uint8Clamped => "Uint8ClampedArray",
            TypedArrayKind::Int16 => "Int16Array",
            TypedArrayKind::Uint16 => "Uint16Array",
            TypedArrayKind::Int32 => "Int32Array",
            TypedArrayKind::Uint32 => "Uint32Array",
            TypedArrayKind::BigInt64 => "BigInt64Array",
            TypedArrayKind::BigUint64 => "BigUint64Array",
            TypedArrayKind::Float32 => "Float32Array",
            TypedArrayKind::Float64 => "Float64Array",
        }
    }

    /// ### [23.2.4.6 TypedArrayElementSize ( O )](https://tc39.es/ecma262/#sec-typedarrayelementsize)
    pub const fn element_size(self) -> usize {
        match self {
            TypedArrayKind::Int8 | TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => 1,
            TypedArrayKind::Int16 | TypedArrayKind::Uint16 => 2,
            TypedArrayKind::Int32 | TypedArrayKind::Uint32 | TypedArrayKind::Float32 => 4,
            TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 | TypedArrayKind::Float64 => 8,
        }
    }

    /// ### [25.1.3.12 IsBigIntElementType ( type )](https://tc39.es/ecma262/#sec-isbigintelementtype)
    pub const fn is_bigint(self) -> bool {
        matches!(self, TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64)
    }

    /// ### [25.1.3.11 IsUnclampedIntegerElementType ( type )](https://tc39.es/ecma262/#sec-isunclampedintegerelementtype)
    pub const fn is_unclamped_integer(self) -> bool {
        matches!(
            self,
            TypedArrayKind::Int8
                | TypedArrayKind::Uint8
                | TypedArrayKind::Int16
                | TypedArrayKind::Uint16
                | TypedArrayKind::Int32
                | TypedArrayKind::Uint32
        )
    }

    /// ### [25.1.3.15 RawBytesToNumeric ( type, rawBytes, isLittleEndian )](https://tc39.es/ecma262/#sec-rawbytestonumeric)
    ///
    /// The raw bytes are given zero-extended to 64 bits. BigInt elements are
    /// converted to the nearest Number.
    pub(crate) fn raw_bits_to_number(self, bits: u64) -> f64 {
        match self {
            TypedArrayKind::Int8 => bits as u8 as i8 as f64,
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => bits as u8 as f64,
            TypedArrayKind::Int16 => bits as u16 as i16 as f64,
            TypedArrayKind::Uint16 => bits as u16 as f64,
            TypedArrayKind::Int32 => bits as u32 as i32 as f64,
            TypedArrayKind::Uint32 => bits as u32 as f64,
            TypedArrayKind::BigInt64 => bits as i64 as f64,
            TypedArrayKind::BigUint64 => bits as f64,
            TypedArrayKind::Float32 => f32::from_bits(bits as u32) as f64,
            TypedArrayKind::Float64 => f64::from_bits(bits),
        }
    }

    /// ### [25.1.3.17 NumericToRawBytes ( type, value, isLittleEndian )](https://tc39.es/ecma262/#sec-numerictorawbytes)
    pub(crate) fn number_to_raw_bits(self, value: f64) -> u64 {
        match self {
            TypedArrayKind::Float32 => (value as f32).to_bits() as u64,
            TypedArrayKind::Float64 => value.to_bits(),
            TypedArrayKind::Uint8Clamped => to_uint8_clamp(value) as u64,
            TypedArrayKind::BigInt64 | TypedArrayKind::BigUint64 => value as i64 as u64,
            _ => {
                // ToInt8, ToUint8, ToInt16, ToUint16, ToInt32 and ToUint32
                // all take the integer modulo 2**bits; the signed reading
                // happens in RawBytesToNumeric.
                if !value.is_finite() {
                    return 0;
                }
                let modulo = (1u64 << (self.element_size() * 8)) as f64;
                value.trunc().rem_euclid(modulo) as u64
            }
        }
    }
}

/// ### [7.1.12 ToUint8Clamp ( argument )](https://tc39.es/ecma262/#sec-touint8clamp)
fn to_uint8_clamp(number: f64) -> u8 {
    // 2. If number is NaN, return +0𝔽.
    if number.is_nan() {
        return 0;
    }
    // 3. Let mv be the extended mathematical value of number.
    // 4. Let clamped be the result of clamping mv between 0 and 255.
    let clamped = number.clamp(0.0, 255.0);
    // 5. Let f be floor(clamped).
    let f = clamped.floor();
    // 6. If clamped < f + 0.5, return 𝔽(f).
    if clamped < f + 0.5 {
        return f as u8;
    }
    // 7. If clamped > f + 0.5, return 𝔽(f + 1).
    if clamped > f + 0.5 {
        return f as u8 + 1;
    }
    // 8. If f is even, return 𝔽(f). Otherwise, return 𝔽(f + 1).
    if f as u8 % 2 == 0 { f as u8 } else { f as u8 + 1 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypedArray(pub(crate) TypedArrayIndex);

#[derive(Debug, Clone)]
pub struct TypedArrayHeapData {
    pub(crate) kind: TypedArrayKind,
    pub(crate) viewed_array_buffer: AnyArrayBuffer,
    pub(crate) byte_offset: usize,
    pub(crate) array_length: usize,
}

impl TypedArray {
    /// Create a TypedArray of the given length on a new zero-filled
    /// ArrayBuffer.
    pub fn new(agent: &mut Agent, kind: TypedArrayKind, length: usize) -> Self {
        let buffer = ArrayBuffer::new(agent, length * kind.element_size());
        agent.heap.create(TypedArrayHeapData {
            kind,
            viewed_array_buffer: buffer.into(),
            byte_offset: 0,
            array_length: length,
        })
    }

    /// ### [23.2.5.1.3 InitializeTypedArrayFromArrayBuffer ( O, buffer, byteOffset, length )](https://tc39.es/ecma262/#sec-initializetypedarrayfromarraybuffer)
    ///
    /// A length of None views the rest of the buffer.
    pub fn from_buffer(
        agent: &mut Agent,
        kind: TypedArrayKind,
        buffer: AnyArrayBuffer,
        byte_offset: usize,
        length: Option<usize>,
    ) -> JsResult<Self> {
        // 1. Let elementSize be TypedArrayElementSize(O).
        let element_size = kind.element_size();
        // 2. Let offset be ? ToIndex(byteOffset).
        let offset = byte_offset;
        // 3. If offset modulo elementSize ≠ 0, throw a RangeError exception.
        if offset % element_size != 0 {
            let message = format!(
                "Start offset of {} should be a multiple of {}",
                kind.name(),
                element_size
            );
            return Err(agent.throw_exception(ExceptionType::RangeError, message));
        }
        // 7. Let bufferByteLength be ArrayBufferByteLength(buffer, SEQ-CST).
        let buffer_byte_length = buffer.byte_length(agent);
        let new_byte_length = match length {
            // 9. Else if length is undefined, then
            None => {
                // a. If bufferByteLength modulo elementSize ≠ 0, throw a
                //    RangeError exception.
                if buffer_byte_length % element_size != 0 {
                    let message = format!(
                        "Byte length of {} should be a multiple of {}",
                        kind.name(),
                        element_size
                    );
                    return Err(agent.throw_exception(ExceptionType::RangeError, message));
                }
                // b. Let newByteLength be bufferByteLength - offset.
                // c. If newByteLength < 0, throw a RangeError exception.
                buffer_byte_length.checked_sub(offset).ok_or_else(|| {
                    agent.throw_exception_with_static_message(
                        ExceptionType::RangeError,
                        "Start offset is outside the bounds of the buffer",
                    )
                })?
            }
            // 10. Else,
            Some(new_length) => {
                // a. Let newByteLength be newLength × elementSize.
                let new_byte_length = new_length.checked_mul(element_size);
                // b. If offset + newByteLength > bufferByteLength, throw a
                //    RangeError exception.
                match new_byte_length.and_then(|len| len.checked_add(offset)) {
                    Some(end) if end <= buffer_byte_length => new_length * element_size,
                    _ => {
                        let message = format!("Invalid typed array length: {new_length}");
                        return Err(agent.throw_exception(ExceptionType::RangeError, message));
                    }
                }
            }
        };
        // 11. Set O.[[ViewedArrayBuffer]] to buffer.
        // 12. Set O.[[ByteLength]] to newByteLength.
        // 13. Set O.[[ByteOffset]] to offset.
        // 14. Set O.[[ArrayLength]] to newByteLength / elementSize.
        Ok(agent.heap.create(TypedArrayHeapData {
            kind,
            viewed_array_buffer: buffer,
            byte_offset: offset,
            array_length: new_byte_length / element_size,
        }))
    }

    pub fn kind(self, agent: &Agent) -> TypedArrayKind {
        agent.heap[self].kind
    }

    pub fn viewed_array_buffer(self, agent: &Agent) -> AnyArrayBuffer {
        agent.heap[self].viewed_array_buffer
    }

    pub fn byte_offset(self, agent: &Agent) -> usize {
        agent.heap[self].byte_offset
    }

    /// ### [10.4.5.12 TypedArrayLength ( taRecord )](https://tc39.es/ecma262/#sec-typedarraylength)
    pub fn length(self, agent: &Agent) -> usize {
        agent.heap[self].array_length
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into())
    }

    fn byte_index(self, agent: &Agent, index: usize) -> usize {
        let data = &agent.heap[self];
        data.byte_offset + index * data.kind.element_size()
    }

    /// ### [25.1.3.16 GetValueFromBuffer ( arrayBuffer, byteIndex, type, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-getvaluefrombuffer)
    ///
    /// Returns the raw element bytes zero-extended to 64 bits. The index
    /// must be in bounds.
    pub(crate) fn get_raw_element(self, agent: &Agent, index: usize) -> u64 {
        debug_assert!(index < self.length(agent));
        let size = self.kind(agent).element_size();
        let byte_index = self.byte_index(agent, index);
        let bytes = &self.viewed_array_buffer(agent).as_slice(agent)[byte_index..byte_index + size];
        let mut raw = [0u8; 8];
        raw[..size].copy_from_slice(bytes);
        u64::from_le_bytes(raw)
    }

    /// ### [25.1.3.18 SetValueInBuffer ( arrayBuffer, byteIndex, type, value, isTypedArray, order \[ , isLittleEndian \] )](https://tc39.es/ecma262/#sec-setvalueinbuffer)
    ///
    /// Stores the low bytes of the raw bits. The index must be in bounds.
    pub(crate) fn set_raw_element(self, agent: &mut Agent, index: usize, bits: u64) {
        debug_assert!(index < self.length(agent));
        let size = self.kind(agent).element_size();
        let byte_index = self.byte_index(agent, index);
        let buffer = self.viewed_array_buffer(agent);
        buffer.as_mut_slice(agent)[byte_index..byte_index + size]
            .copy_from_slice(&bits.to_le_bytes()[..size]);
    }

    /// Read an element as a Number. Returns None if the index is out of
    /// bounds.
    pub fn get_index(self, agent: &Agent, index: usize) -> Option<Value> {
        if index >= self.length(agent) {
            return None;
        }
        let bits = self.get_raw_element(agent, index);
        Some(Value::Number(self.kind(agent).raw_bits_to_number(bits)))
    }

    /// ### [10.4.5.16 TypedArraySetElement ( O, index, numValue )](https://tc39.es/ecma262/#sec-typedarraysetelement)
    ///
    /// The value is coerced before the bounds check; writes out of bounds
    /// are dropped.
    pub fn set_index(self, agent: &mut Agent, index: usize, value: Value) -> JsResult<()> {
        let kind = self.kind(agent);
        // 1. If O.[[ContentType]] is BIGINT, let numValue be ? ToBigInt(value).
        // 2. Otherwise, let numValue be ? ToNumber(value).
        let bits = if kind.is_bigint() {
            to_big_int64(agent, value)? as u64
        } else {
            kind.number_to_raw_bits(to_number(agent, value)?)
        };
        // 3. If IsValidIntegerIndex(O, 𝔽(index)) is true, then
        if index < self.length(agent) {
            // d. Perform SetValueInBuffer(O.[[ViewedArrayBuffer]], byteIndexInBuffer, elementType, numValue, true, UNORDERED).
            self.set_raw_element(agent, index, bits);
        }
        // 4. Return UNUSED.
        Ok(())
    }
}

/// ### [10.4.5 TypedArray Exotic Objects](https://tc39.es/ecma262/#sec-typedarray-exotic-objects)
///
/// The own properties of a TypedArray are its elements.
impl InternalMethods for TypedArray {
    fn internal_get_prototype_of(self, agent: &Agent) -> Option<OrdinaryObject> {
        Some(agent.current_realm().intrinsics().object_prototype())
    }

    fn internal_get_own_property(
        self,
        agent: &Agent,
        property_key: PropertyKey,
    ) -> Option<PropertyDescriptor> {
        let value = self.get_index(agent, property_key.into_u32()? as usize)?;
        Some(PropertyDescriptor {
            value,
            enumerable: true,
        })
    }

    fn internal_set(
        self,
        agent: &mut Agent,
        property_key: PropertyKey,
        value: Value,
        _receiver: Value,
    ) -> JsResult<bool> {
        let Some(index) = property_key.into_u32() else {
            return Ok(false);
        };
        self.set_index(agent, index as usize, value)?;
        Ok(true)
    }

    fn internal_own_property_keys(self, agent: &Agent) -> Vec<PropertyKey> {
        (0..self.length(agent) as u32)
            .map(PropertyKey::Integer)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integer_elements_wrap() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, TypedArrayKind::Int8, 4);
        ta.set_index(&mut agent, 0, Value::from(200.0)).unwrap();
        ta.set_index(&mut agent, 1, Value::from(-1.5)).unwrap();
        ta.set_index(&mut agent, 9, Value::from(1.0)).unwrap();
        assert_eq!(ta.get_index(&agent, 0), Some(Value::from(-56.0)));
        assert_eq!(ta.get_index(&agent, 1), Some(Value::from(-1.0)));
        assert_eq!(ta.get_index(&agent, 4), None);
    }

    #[test]
    fn clamped_elements_round_half_to_even() {
        assert_eq!(to_uint8_clamp(2.5), 2);
        assert_eq!(to_uint8_clamp(3.5), 4);
        assert_eq!(to_uint8_clamp(-3.0), 0);
        assert_eq!(to_uint8_clamp(300.0), 255);
        assert_eq!(to_uint8_clamp(f64::NAN), 0);
    }

    #[test]
    fn views_share_buffer_bytes() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::new(&mut agent, 8);
        let int32 =
            TypedArray::from_buffer(&mut agent, TypedArrayKind::Int32, buffer.into(), 4, None)
                .unwrap();
        let uint8 =
            TypedArray::from_buffer(&mut agent, TypedArrayKind::Uint8, buffer.into(), 0, None)
                .unwrap();
        assert_eq!(int32.length(&agent), 1);
        assert_eq!(uint8.length(&agent), 8);
        int32.set_index(&mut agent, 0, Value::from(258.0)).unwrap();
        assert_eq!(uint8.get_index(&agent, 4), Some(Value::from(2.0)));
        assert_eq!(uint8.get_index(&agent, 5), Some(Value::from(1.0)));
    }

    #[test]
    fn misaligned_or_oversized_views_are_range_errors() {
        let mut agent = Agent::default();
        let buffer = ArrayBuffer::new(&mut agent, 6);
        for (offset, length) in [(2, None), (0, None), (4, Some(1)), (8, Some(0))] {
            let error = TypedArray::from_buffer(
                &mut agent,
                TypedArrayKind::Int32,
                buffer.into(),
                offset,
                length,
            )
            .unwrap_err();
            assert_eq!(error.kind(&agent), Some(ExceptionType::RangeError));
        }
        let view =
            TypedArray::from_buffer(&mut agent, TypedArrayKind::Int16, buffer.into(), 2, Some(2))
                .unwrap();
        assert_eq!(view.length(&agent), 2);
    }
}
