// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use kestrel_vm::ecmascript::{
    builtins::{
        Array, ArgumentsList,
        numbers_and_dates::math_object::{MathObject, precise_sum::sum_precise},
    },
    execution::{Agent, ExceptionType, Options},
    types::Value,
};

#[test]
fn cancellation_over_flattened_arrays() {
    let mut agent = Agent::new(Options::default());
    let triple = [Value::from(1e20), Value::from(0.1), Value::from(-1e20)];
    let nested = (0..1000)
        .map(|_| Array::from_slice(&mut agent, &triple).into_value())
        .collect::<Vec<_>>();
    let nested = Array::from_slice(&mut agent, &nested);
    let flat = nested.flat(&mut agent, Value::Undefined).unwrap();
    assert_eq!(flat.len(&agent), 3000);

    let result = MathObject::sum_precise(
        &mut agent,
        Value::Undefined,
        ArgumentsList::new(&[flat.into_value()]),
    )
    .unwrap();
    assert_eq!(result, Value::from(100.0));

    let naive = flat.as_slice(&agent).iter().fold(0.0, |sum, value| match value {
        Value::Number(n) => sum + n,
        _ => unreachable!(),
    });
    assert_ne!(naive, 100.0);
}

#[test]
fn empty_sum_is_negative_zero() {
    let mut agent = Agent::new(Options::default());
    let empty = Array::from_slice(&mut agent, &[]);
    let result =
        MathObject::sum_precise(&mut agent, Value::Undefined, ArgumentsList::new(&[empty.into_value()]))
            .unwrap();
    assert_eq!(result, Value::from(0.0));
    assert!(result.is_neg_zero());
    assert!(sum_precise([0.0f64; 0]).is_sign_negative());
}

#[test]
fn summation_is_all_or_nothing() {
    let mut agent = Agent::new(Options::default());
    let one = Value::from_str(&mut agent, "1");
    let items = Array::from_slice(&mut agent, &[Value::from(1e308), Value::from(1e308), one]);
    let error =
        MathObject::sum_precise(&mut agent, Value::Undefined, ArgumentsList::new(&[items.into_value()]))
            .unwrap_err();
    assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
    let error = MathObject::sum_precise(&mut agent, Value::Undefined, ArgumentsList::new(&[]))
        .unwrap_err();
    assert_eq!(error.kind(&agent), Some(ExceptionType::TypeError));
}

#[test]
fn results_are_deterministic() {
    let values = (1..=200)
        .map(|i| (i as f64).powi(7) * if i % 3 == 0 { -1.1 } else { 0.7 })
        .collect::<Vec<_>>();
    let first = sum_precise(values.iter().copied());
    let second = sum_precise(values.iter().copied());
    let reversed = sum_precise(values.iter().rev().copied());
    assert_eq!(first.to_bits(), second.to_bits());
    assert_eq!(first.to_bits(), reversed.to_bits());
}
