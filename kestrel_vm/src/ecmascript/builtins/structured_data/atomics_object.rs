// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [25.4 The Atomics Object](https://tc39.es/ecma262/#sec-atomics-object)
//!
//! Kestrel runs a single agent that cannot suspend and has no waiter list.
//! The wait functions therefore only ever return "not-equal" or
//! "timed-out", but all of their arguments are validated and coerced in
//! the specified order.

use crate::ecmascript::{
    abstract_operations::type_conversion::{
        to_big_int64, to_index, to_int32, to_integer_or_infinity, to_number,
    },
    builders::ordinary_object_builder::OrdinaryObjectBuilder,
    builtins::{
        ArgumentsList, Behaviour, Builtin,
        typed_array::{TypedArray, TypedArrayKind},
    },
    execution::{Agent, ExceptionType, JsResult},
    types::{Object, PropertyKey, Value},
};

pub struct AtomicsObject;

struct AtomicsObjectLoad;
impl Builtin for AtomicsObjectLoad {
    const NAME: &'static str = "load";

    const LENGTH: u8 = 2;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(AtomicsObject::load);
}
struct AtomicsObjectStore;
impl Builtin for AtomicsObjectStore {
    const NAME: &'static str = "store";

    const LENGTH: u8 = 3;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(AtomicsObject::store);
}
struct AtomicsObjectWait;
impl Builtin for AtomicsObjectWait {
    const NAME: &'static str = "wait";

    const LENGTH: u8 = 4;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(AtomicsObject::wait);
}
struct AtomicsObjectWaitAsync;
impl Builtin for AtomicsObjectWaitAsync {
    const NAME: &'static str = "waitAsync";

    const LENGTH: u8 = 4;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(AtomicsObject::wait_async);
}
struct AtomicsObjectNotify;
impl Builtin for AtomicsObjectNotify {
    const NAME: &'static str = "notify";

    const LENGTH: u8 = 3;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(AtomicsObject::notify);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitMode {
    Sync,
    Async,
}

impl AtomicsObject {
    /// ### [25.4.9 Atomics.load ( typedArray, index )](https://tc39.es/ecma262/#sec-atomics.load)
    ///
    /// BigInt elements are returned as the nearest Number.
    pub fn load(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = arguments.get(0);
        let index = arguments.get(1);
        // 1. Let byteIndexInBuffer be ? ValidateAtomicAccessOnIntegerTypedArray(typedArray, index).
        let (ta, i) = validate_atomic_access_on_integer_typed_array(agent, typed_array, index, false)?;
        // 2. Perform ? RevalidateAtomicAccess(typedArray, byteIndexInBuffer).
        // 3. Let buffer be typedArray.[[ViewedArrayBuffer]].
        // 4. Let elementType be TypedArrayElementType(typedArray).
        // 5. Return GetValueFromBuffer(buffer, byteIndexInBuffer, elementType, true, SEQ-CST).
        let bits = ta.get_raw_element(agent, i);
        Ok(Value::from(ta.kind(agent).raw_bits_to_number(bits)))
    }

    /// ### [25.4.12 Atomics.store ( typedArray, index, value )](https://tc39.es/ecma262/#sec-atomics.store)
    pub fn store(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = arguments.get(0);
        let index = arguments.get(1);
        let value = arguments.get(2);
        // 1. Let byteIndexInBuffer be ? ValidateAtomicAccessOnIntegerTypedArray(typedArray, index).
        let (ta, i) = validate_atomic_access_on_integer_typed_array(agent, typed_array, index, false)?;
        let kind = ta.kind(agent);
        // 2. If typedArray.[[ContentType]] is BIGINT, let v be ? ToBigInt(value).
        // 3. Otherwise, let v be 𝔽(? ToIntegerOrInfinity(value)).
        let (v, bits) = if kind.is_bigint() {
            let v = to_big_int64(agent, value)?;
            (v as f64, v as u64)
        } else {
            let v = to_integer_or_infinity(agent, value)?;
            (v, kind.number_to_raw_bits(v))
        };
        // 4. Perform ? RevalidateAtomicAccess(typedArray, byteIndexInBuffer).
        // 5. Let buffer be typedArray.[[ViewedArrayBuffer]].
        // 6. Let elementType be TypedArrayElementType(typedArray).
        // 7. Perform SetValueInBuffer(buffer, byteIndexInBuffer, elementType, v, true, SEQ-CST).
        ta.set_raw_element(agent, i, bits);
        // 8. Return v.
        Ok(Value::from(v))
    }

    /// ### [25.4.13 Atomics.wait ( typedArray, index, value, timeout )](https://tc39.es/ecma262/#sec-atomics.wait)
    ///
    /// This function puts the surrounding agent in a wait queue and suspends
    /// it until notified or until the wait times out, returning a String
    /// differentiating those cases.
    pub fn wait(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = arguments.get(0);
        let index = arguments.get(1);
        let value = arguments.get(2);
        let timeout = arguments.get(3);
        // 1. Return ? DoWait(sync, typedArray, index, value, timeout).
        do_wait(agent, WaitMode::Sync, typed_array, index, value, timeout)
    }

    /// ### [25.4.14 Atomics.waitAsync ( typedArray, index, value, timeout )](https://tc39.es/ecma262/#sec-atomics.waitasync)
    ///
    /// This function returns a Promise that is resolved when the calling
    /// agent is notified or the timeout is reached. Kestrel has no
    /// Promises, so only the synchronous results are produced.
    pub fn wait_async(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let typed_array = arguments.get(0);
        let index = arguments.get(1);
        let value = arguments.get(2);
        let timeout = arguments.get(3);
        // 1. Return ? DoWait(async, typedArray, index, value, timeout).
        do_wait(agent, WaitMode::Async, typed_array, index, value, timeout)
    }

    /// ### [25.4.15 Atomics.notify ( typedArray, index, count )](https://tc39.es/ecma262/#sec-atomics.notify)
    ///
    /// There are never any waiters, so this always returns 0.
    pub fn notify(agent: &mut Agent, _this_value: Value, arguments: ArgumentsList) -> JsResult<Value> {
        let typed_array = arguments.get(0);
        let index = arguments.get(1);
        let count = arguments.get(2);
        // 1. Let taRecord be ? ValidateIntegerTypedArray(typedArray, true).
        let ta = validate_integer_typed_array(agent, typed_array, true)?;
        // 2. Let byteIndexInBuffer be ? ValidateAtomicAccess(taRecord, index).
        validate_atomic_access(agent, ta, index)?;
        // 3. If count is undefined, then
        //    a. Let c be +∞.
        // 4. Else,
        if !count.is_undefined() {
            // a. Let intCount be ? ToIntegerOrInfinity(count).
            // b. Let c be max(intCount, 0).
            to_integer_or_infinity(agent, count)?;
        }
        // 5. Let buffer be taRecord.[[Object]].[[ViewedArrayBuffer]].
        // 6. Let block be buffer.[[ArrayBufferData]].
        // 7. If IsSharedArrayBuffer(buffer) is false, return +0𝔽.
        // 8. Let WL be GetWaiterList(block, byteIndexInBuffer).
        // 9-13. Remove and notify up to c waiters from WL.
        // 14. Return 𝔽(n).
        Ok(Value::from(0))
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) {
        let intrinsics = agent.current_realm().intrinsics();
        let object_prototype = intrinsics.object_prototype();
        let this = intrinsics.atomics();

        OrdinaryObjectBuilder::new_intrinsic_object(agent, this)
            .with_property_capacity(5)
            .with_prototype(Some(object_prototype))
            .with_builtin_function_property::<AtomicsObjectLoad>()
            .with_builtin_function_property::<AtomicsObjectStore>()
            .with_builtin_function_property::<AtomicsObjectWait>()
            .with_builtin_function_property::<AtomicsObjectWaitAsync>()
            .with_builtin_function_property::<AtomicsObjectNotify>()
            .build();
    }
}

/// ### [25.4.3.1 ValidateIntegerTypedArray ( typedArray, waitable )](https://tc39.es/ecma262/#sec-validateintegertypedarray)
///
/// Never calls into user code.
pub(crate) fn validate_integer_typed_array(
    agent: &mut Agent,
    typed_array: Value,
    waitable: bool,
) -> JsResult<TypedArray> {
    // 1. Let taRecord be ? ValidateTypedArray(typedArray, UNORDERED).
    let Value::Object(Object::TypedArray(ta)) = typed_array else {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Argument is not a TypedArray",
        ));
    };
    // 2. NOTE: Bounds checking is not a synchronizing operation when
    //    typedArray's backing buffer is a growable SharedArrayBuffer.
    let kind = ta.kind(agent);
    // 3. If waitable is true, then
    if waitable {
        // a. If typedArray.[[TypedArrayName]] is neither "Int32Array" nor
        //    "BigInt64Array", throw a TypeError exception.
        if !matches!(kind, TypedArrayKind::Int32 | TypedArrayKind::BigInt64) {
            let message = format!("{} is not an Int32Array or BigInt64Array", kind.name());
            return Err(agent.throw_exception(ExceptionType::TypeError, message));
        }
    } else {
        // 4. Else,
        // a. Let type be TypedArrayElementType(typedArray).
        // b. If IsUnclampedIntegerElementType(type) is false and
        //    IsBigIntElementType(type) is false, throw a TypeError exception.
        if !kind.is_unclamped_integer() && !kind.is_bigint() {
            let message = format!("{} is not an integer TypedArray", kind.name());
            return Err(agent.throw_exception(ExceptionType::TypeError, message));
        }
    }
    // 5. Return taRecord.
    Ok(ta)
}

/// ### [25.4.3.2 ValidateAtomicAccess ( taRecord, requestIndex )](https://tc39.es/ecma262/#sec-validateatomicaccess)
///
/// Returns the element index rather than the byte index.
pub(crate) fn validate_atomic_access(
    agent: &mut Agent,
    ta: TypedArray,
    request_index: Value,
) -> JsResult<usize> {
    // 1. Let length be TypedArrayLength(taRecord).
    let length = ta.length(agent);
    // 2. Let accessIndex be ? ToIndex(requestIndex).
    let access_index = to_index(agent, request_index)?;
    // 3. Assert: accessIndex ≥ 0.
    // 4. If accessIndex ≥ length, throw a RangeError exception.
    if access_index >= length as u64 {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::RangeError,
            "Index is out of range",
        ));
    }
    // 5. Let typedArray be taRecord.[[Object]].
    // 6. Let elementSize be TypedArrayElementSize(typedArray).
    // 7. Let offset be typedArray.[[ByteOffset]].
    // 8. Return (accessIndex × elementSize) + offset.
    Ok(access_index as usize)
}

/// ### [25.4.3.3 ValidateAtomicAccessOnIntegerTypedArray ( typedArray, requestIndex \[ , waitable \] )](https://tc39.es/ecma262/#sec-validateatomicaccessonintegertypedarray)
fn validate_atomic_access_on_integer_typed_array(
    agent: &mut Agent,
    typed_array: Value,
    request_index: Value,
    waitable: bool,
) -> JsResult<(TypedArray, usize)> {
    // 1. If waitable is not present, set waitable to false.
    // 2. Let taRecord be ? ValidateIntegerTypedArray(typedArray, waitable).
    let ta = validate_integer_typed_array(agent, typed_array, waitable)?;
    // 3. Return ? ValidateAtomicAccess(taRecord, requestIndex).
    let index = validate_atomic_access(agent, ta, request_index)?;
    Ok((ta, index))
}

/// ### [25.4.3.14 DoWait ( mode, typedArray, index, value, timeout )](https://tc39.es/ecma262/#sec-dowait)
///
/// The agent cannot suspend, so a wait that would block throws a TypeError
/// once the comparison and the timeout have been checked.
fn do_wait(
    agent: &mut Agent,
    mode: WaitMode,
    typed_array: Value,
    index: Value,
    value: Value,
    timeout: Value,
) -> JsResult<Value> {
    // 1. Let taRecord be ? ValidateIntegerTypedArray(typedArray, true).
    let ta = validate_integer_typed_array(agent, typed_array, true)?;
    // 2. Let buffer be taRecord.[[Object]].[[ViewedArrayBuffer]].
    let buffer = ta.viewed_array_buffer(agent);
    // 3. If IsSharedArrayBuffer(buffer) is false, throw a TypeError exception.
    if !buffer.is_shared() {
        return Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Cannot wait on a non-shared ArrayBuffer",
        ));
    }
    // 4. Let i be ? ValidateAtomicAccess(taRecord, index).
    let i = validate_atomic_access(agent, ta, index)?;
    // 5. Let arrayTypeName be typedArray.[[TypedArrayName]].
    // 6. If arrayTypeName is "BigInt64Array", let v be ? ToBigInt64(value).
    // 7. Else, let v be ? ToInt32(value).
    let expected_bits = if ta.kind(agent) == TypedArrayKind::BigInt64 {
        to_big_int64(agent, value)? as u64
    } else {
        to_int32(agent, value)? as u32 as u64
    };
    // 8. Let q be ? ToNumber(timeout).
    let q = to_number(agent, timeout)?;
    // 9. If q is either NaN or +∞𝔽, let t be +∞; else if q is -∞𝔽, let t be
    //    0; else let t be max(ℝ(q), 0).
    let t = if q.is_nan() { f64::INFINITY } else { q.max(0.0) };
    // 16. Let elementType be TypedArrayElementType(typedArray).
    // 17. Let w be GetValueFromBuffer(buffer, byteIndexInBuffer, elementType, true, SEQ-CST).
    let w = ta.get_raw_element(agent, i);
    // 18. If v ≠ w, then
    if w != expected_bits {
        // a. Perform LeaveCriticalSection(WL).
        // b. If mode is SYNC, return "not-equal".
        // c-e. Return the result object with [[Value]] "not-equal".
        return Ok(wait_result(agent, mode, "not-equal"));
    }
    // 19. If t is 0 and mode is ASYNC, then
    if t == 0.0 {
        // a. Perform LeaveCriticalSection(WL).
        // b. Perform ! CreateDataPropertyOrThrow(resultObject, "async", false).
        // c. Perform ! CreateDataPropertyOrThrow(resultObject, "value", "timed-out").
        // d. Return resultObject.
        return Ok(wait_result(agent, mode, "timed-out"));
    }
    // NOTE: Step 10 is checked here rather than before step 11, so that
    //       "not-equal" and "timed-out" stay observable in an agent that
    //       cannot suspend.
    match mode {
        // 10. If mode is SYNC and AgentCanSuspend() is false, throw a
        //     TypeError exception.
        WaitMode::Sync => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Atomics.wait cannot be called in this context",
        )),
        // 20. Add waiterRecord to the end of WL.
        WaitMode::Async => Err(agent.throw_exception_with_static_message(
            ExceptionType::TypeError,
            "Atomics.waitAsync cannot wait in this agent",
        )),
    }
}

/// A String for the synchronous form, or the `{ async: false, value }`
/// result object of the asynchronous form.
fn wait_result(agent: &mut Agent, mode: WaitMode, result: &'static str) -> Value {
    let result = Value::from_str(agent, result);
    match mode {
        WaitMode::Sync => result,
        WaitMode::Async => {
            let value_key = PropertyKey::from_small_string("value");
            let async_key = PropertyKey::from_small_string("async");
            OrdinaryObjectBuilder::new(agent)
                .with_property_capacity(2)
                .with_data_property(async_key, Value::Boolean(false))
                .with_data_property(value_key, result)
                .build()
                .into()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::builtins::{
        array_buffer::ArrayBuffer, shared_array_buffer::SharedArrayBuffer,
    };

    fn shared_int32(agent: &mut Agent, length: usize) -> TypedArray {
        let buffer = SharedArrayBuffer::new(agent, length * 4);
        TypedArray::from_buffer(agent, TypedArrayKind::Int32, buffer.into(), 0, None).unwrap()
    }

    fn error_kind(agent: &Agent, result: JsResult<Value>) -> Option<ExceptionType> {
        result.unwrap_err().kind(agent)
    }

    #[test]
    fn wait_returns_not_equal_and_timed_out() {
        let mut agent = Agent::default();
        let ta = shared_int32(&mut agent, 2);
        let args = [ta.into_value(), 0.into(), 1.into(), 0.into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(result, Value::from_str(&mut agent, "not-equal"));
        let args = [ta.into_value(), 1.into(), 0.into(), 0.into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(result, Value::from_str(&mut agent, "timed-out"));
        let args = [ta.into_value(), 1.into(), 0.into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
    }

    #[test]
    fn wait_async_returns_result_object() {
        let mut agent = Agent::default();
        let ta = shared_int32(&mut agent, 1);
        let args = [ta.into_value(), 0.into(), 0.into(), 0.into()];
        let result =
            AtomicsObject::wait_async(&mut agent, Value::Undefined, ArgumentsList::new(&args))
                .unwrap();
        let Value::Object(Object::Object(result)) = result else {
            panic!("expected an ordinary object");
        };
        let async_key = PropertyKey::from_small_string("async");
        let value_key = PropertyKey::from_small_string("value");
        assert_eq!(result.get(&agent, async_key), Value::Boolean(false));
        let timed_out = Value::from_str(&mut agent, "timed-out");
        assert_eq!(result.get(&agent, value_key), timed_out);
    }

    #[test]
    fn wait_validation_order() {
        let mut agent = Agent::default();
        // Wrong kind before anything else.
        let uint8 = TypedArray::new(&mut agent, TypedArrayKind::Uint8, 4);
        let args = [uint8.into_value(), (-1).into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
        // Non-shared buffer before the index.
        let buffer = ArrayBuffer::new(&mut agent, 4);
        let unshared =
            TypedArray::from_buffer(&mut agent, TypedArrayKind::Int32, buffer.into(), 0, None)
                .unwrap();
        let args = [unshared.into_value(), (-1).into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
        // Index before the value.
        let ta = shared_int32(&mut agent, 1);
        let args = [ta.into_value(), 1.into(), Value::Null];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::RangeError));
    }

    #[test]
    fn big_int64_waits_coerce_value_to_big_int() {
        let mut agent = Agent::default();
        let buffer = SharedArrayBuffer::new(&mut agent, 8);
        let ta =
            TypedArray::from_buffer(&mut agent, TypedArrayKind::BigInt64, buffer.into(), 0, None)
                .unwrap();
        let args = [ta.into_value(), 0.into(), 0.into(), 0.into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
        let zero = Value::from_str(&mut agent, "0");
        let args = [ta.into_value(), 0.into(), zero, 0.into()];
        let result = AtomicsObject::wait(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(result, Value::from_str(&mut agent, "timed-out"));
    }

    #[test]
    fn load_and_store() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, TypedArrayKind::Int16, 2);
        let args = [ta.into_value(), 1.into(), 70000.5.into()];
        let stored = AtomicsObject::store(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(stored, Value::from(70000.0));
        let args = [ta.into_value(), 1.into()];
        let loaded = AtomicsObject::load(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(loaded, Value::from(4464.0));
        let float = TypedArray::new(&mut agent, TypedArrayKind::Float64, 1);
        let args = [float.into_value(), 0.into()];
        let result = AtomicsObject::load(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
    }

    #[test]
    fn notify_wakes_nobody() {
        let mut agent = Agent::default();
        let ta = TypedArray::new(&mut agent, TypedArrayKind::Int32, 1);
        let args = [ta.into_value(), 0.into()];
        let woken = AtomicsObject::notify(&mut agent, Value::Undefined, ArgumentsList::new(&args))
            .unwrap();
        assert_eq!(woken, Value::from(0));
        let uint32 = TypedArray::new(&mut agent, TypedArrayKind::Uint32, 1);
        let args = [uint32.into_value(), 0.into()];
        let result = AtomicsObject::notify(&mut agent, Value::Undefined, ArgumentsList::new(&args));
        assert_eq!(error_kind(&agent, result), Some(ExceptionType::TypeError));
    }
}
