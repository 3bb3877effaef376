// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [21.3 The Math Object](https://tc39.es/ecma262/#sec-math-object)

pub mod precise_sum;

use crate::ecmascript::{builders::ordinary_object_builder::OrdinaryObjectBuilder, execution::Agent};
#[cfg(feature = "proposal-math-sum")]
use crate::ecmascript::{
    abstract_operations::operations_on_iterator_objects::get_iterator,
    builtins::{ArgumentsList, Behaviour, Builtin},
    execution::{ExceptionType, JsResult},
    types::Value,
};
#[cfg(feature = "proposal-math-sum")]
use precise_sum::PreciseSum;

pub struct MathObject;

#[cfg(feature = "proposal-math-sum")]
struct MathObjectSumPrecise;
#[cfg(feature = "proposal-math-sum")]
impl Builtin for MathObjectSumPrecise {
    const NAME: &'static str = "sumPrecise";

    const LENGTH: u8 = 1;

    const BEHAVIOUR: Behaviour = Behaviour::Regular(MathObject::sum_precise);
}

impl MathObject {
    /// ### [2 Math.sumPrecise ( items )](https://tc39.es/proposal-math-sum/#sec-math.sumprecise)
    ///
    /// Given an iterable of Numbers, returns their sum rounded once to the
    /// nearest Number. Elements are never coerced: anything other than a
    /// Number is a TypeError.
    #[cfg(feature = "proposal-math-sum")]
    pub fn sum_precise(
        agent: &mut Agent,
        _this_value: Value,
        arguments: ArgumentsList,
    ) -> JsResult<Value> {
        let items = arguments.get(0);
        // 1. Perform ? RequireObjectCoercible(items).
        if items.is_undefined() || items.is_null() {
            return Err(agent.throw_exception_with_static_message(
                ExceptionType::TypeError,
                "Math.sumPrecise called on null or undefined",
            ));
        }
        // 2. Let iteratorRecord be ? GetIterator(items, sync).
        let mut iterator = get_iterator(agent, items)?;
        // 3. Let state be minus-zero.
        // 4. Let sum be 0.
        let mut sum = PreciseSum::new();
        // 5. Let count be 0.
        let mut count: u64 = 0;
        // 6. Let next be not-started.
        // 7. Repeat, while next is not done,
        // a. Set next to ? IteratorStepValue(iteratorRecord).
        // b. If next is not done, then
        while let Some(value) = iterator.step_value(agent) {
            // i. Set count to count + 1.
            count += 1;
            // ii. If count ≥ 2**53, then
            if count >= 1 << 53 {
                // 1. Let error be ThrowCompletion(a newly created RangeError object).
                // 2. Return ? IteratorClose(iteratorRecord, error).
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::RangeError,
                    "Too many values to sum",
                ));
            }
            // iii. NOTE: The above case is not expected to be reached in
            //      practice and is included only so that implementations may
            //      rely on inputs being "reasonably sized" without violating
            //      this specification.
            // iv. If next is not a Number, then
            let Value::Number(n) = value else {
                // 1. Let error be ThrowCompletion(a newly created TypeError object).
                // 2. Return ? IteratorClose(iteratorRecord, error).
                return Err(agent.throw_exception_with_static_message(
                    ExceptionType::TypeError,
                    "Math.sumPrecise requires all values to be Numbers",
                ));
            };
            // v. Let n be next.
            // vi. If state is not not-a-number, then
            // 1-3. Update state and sum.
            sum.add(n);
        }
        if agent.options.print_internals && sum.overflowed() {
            eprintln!(
                "Math.sumPrecise: intermediate sum overflowed, {} partials over {} values",
                sum.partials_len(),
                count
            );
        }
        // 8-11. Return the sum or the special value given by state.
        Ok(Value::from(sum.finish()))
    }

    pub(crate) fn create_intrinsic(agent: &mut Agent) {
        let intrinsics = agent.current_realm().intrinsics();
        let object_prototype = intrinsics.object_prototype();
        let this = intrinsics.math();

        let builder = OrdinaryObjectBuilder::new_intrinsic_object(agent, this)
            .with_prototype(Some(object_prototype));
        #[cfg(feature = "proposal-math-sum")]
        let builder = builder
            .with_property_capacity(1)
            .with_builtin_function_property::<MathObjectSumPrecise>();
        builder.build();
    }
}

#[cfg(all(test, feature = "proposal-math-sum"))]
mod test {
    use super::*;
    use crate::ecmascript::{
        abstract_operations::operations_on_objects::{call, get},
        builtins::Array,
        types::PropertyKey,
    };

    fn sum_precise(agent: &mut Agent, items: Value) -> JsResult<Value> {
        let math = agent.current_realm().intrinsics().math();
        let key = PropertyKey::from_str(agent, "sumPrecise");
        let function = get(agent, math.into(), key)?;
        call(
            agent,
            function,
            math.into(),
            Some(ArgumentsList::new(&[items])),
        )
    }

    #[test]
    fn sums_array_elements() {
        let mut agent = Agent::default();
        let items = Array::from_slice(&mut agent, &[1e20.into(), 0.1.into(), (-1e20).into()]);
        let result = sum_precise(&mut agent, items.into_value()).unwrap();
        assert_eq!(result, Value::from(0.1));
        let empty = Array::from_slice(&mut agent, &[]);
        let result = sum_precise(&mut agent, empty.into_value()).unwrap();
        assert!(result.is_neg_zero());
    }

    #[test]
    fn rejects_non_numbers_and_non_iterables() {
        let mut agent = Agent::default();
        let text = Value::from_str(&mut agent, "1");
        let items = Array::from_slice(&mut agent, &[1.0.into(), text]);
        let error = sum_precise(&mut agent, items.into_value()).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
        for items in [Value::Undefined, Value::from(1.0)] {
            let error = sum_precise(&mut agent, items).unwrap_err();
            assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
        }
    }

    #[test]
    fn non_number_after_nan_still_throws() {
        let mut agent = Agent::default();
        let items = Array::from_slice(&mut agent, &[f64::NAN.into(), Value::Null]);
        let error = sum_precise(&mut agent, items.into_value()).unwrap_err();
        assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
    }
}
