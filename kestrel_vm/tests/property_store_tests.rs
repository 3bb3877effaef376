// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::cell::Cell;

use kestrel_vm::ecmascript::{
    abstract_operations::operations_on_objects::{compare_equals, enumerate_object_properties},
    builtins::{
        ArgumentsList, Behaviour, BuiltinFunctionArgs, create_builtin_function,
        ordinary::type_feedback::CompareSite,
    },
    execution::{Agent, JsResult, Options},
    types::{OrdinaryObject, PropertyKey, Value, ValueTypeTag},
};

thread_local! {
    static REWRITE_TARGET: Cell<Option<OrdinaryObject>> = const { Cell::new(None) };
}

/// Sets `f` to 2 and adds `g` on REWRITE_TARGET, then converts to 1.
fn rewriting_value_of(agent: &mut Agent, _: Value, _: ArgumentsList) -> JsResult<Value> {
    let object = REWRITE_TARGET.with(Cell::get).unwrap();
    object.set(agent, PropertyKey::from_small_string("f"), Value::from(2.0));
    object.set(agent, PropertyKey::from_small_string("g"), Value::Null);
    Ok(Value::from(1.0))
}

#[track_caller]
fn assert_keys(agent: &Agent, keys: &[PropertyKey], expected: &[&str]) {
    assert_eq!(keys.len(), expected.len());
    for (key, expected) in keys.iter().zip(expected) {
        assert!(key.equals_str(agent, expected), "expected key {expected}");
    }
}

#[test]
fn enumeration_is_idempotent() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    for name in ["$", "test", "hey"] {
        let key = PropertyKey::from_str(&mut agent, name);
        object.set(&mut agent, key, Value::from(1.0));
    }

    let mut iterator = enumerate_object_properties(object.into());
    let mut count = 0;
    for _ in 0..2 {
        let keys = iterator.iter(&agent).collect::<Vec<_>>();
        assert_keys(&agent, &keys, &["$", "test", "hey"]);
        count += keys.len();
        iterator.reset();
    }
    assert_eq!(count, 6);

    // A fresh enumeration sees the same sequence.
    let keys = object.enumerate_keys().iter(&agent).collect::<Vec<_>>();
    assert_keys(&agent, &keys, &["$", "test", "hey"]);
}

#[test]
fn integer_keys_enumerate_first() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    for name in ["b", "10", "a", "2", "4294967295"] {
        let key = PropertyKey::from_str(&mut agent, name);
        object.set(&mut agent, key, Value::Null);
    }
    let keys = object.enumerate_keys().iter(&agent).collect::<Vec<_>>();
    assert_keys(&agent, &keys, &["2", "10", "b", "a", "4294967295"]);
}

#[test]
fn tag_history_does_not_decide_comparisons() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    let f = PropertyKey::from_small_string("f");
    let hello = Value::from_str(&mut agent, "hello");

    let mut site = CompareSite::new(&mut agent, f);
    for _ in 0..5 {
        object.set(&mut agent, f, Value::Null);
        assert!(!site.compare_equals(&mut agent, object.into(), hello).unwrap());
        assert!(!compare_equals(&mut agent, object.into(), f, hello).unwrap());
    }
    assert_eq!(object.property_type_tag(&agent, f), Some(ValueTypeTag::Null));

    object.set(&mut agent, f, hello);
    assert_eq!(object.property_type_tag(&agent, f), Some(ValueTypeTag::String));
    assert!(site.compare_equals(&mut agent, object.into(), hello).unwrap());
    assert!(compare_equals(&mut agent, object.into(), f, hello).unwrap());

    // Loose equality still applies across types.
    object.set(&mut agent, f, Value::from(1.0));
    let one = Value::from_str(&mut agent, "1");
    assert!(site.compare_equals(&mut agent, object.into(), one).unwrap());
}

#[test]
fn absent_reads_leave_object_intact() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    let a = PropertyKey::from_small_string("a");
    let b = PropertyKey::from_small_string("b");
    let missing = PropertyKey::from_str(&mut agent, "notThereAtAll");
    object.set(&mut agent, a, Value::from(1.0));
    object.set(&mut agent, b, Value::from(2.0));
    let shape_peer = OrdinaryObject::create_empty_object(&mut agent);
    shape_peer.set(&mut agent, a, Value::Null);
    shape_peer.set(&mut agent, b, Value::Null);

    for _ in 0..3 {
        assert_eq!(object.get(&agent, missing), Value::Undefined);
        assert_eq!(object.get_own(&agent, missing), None);
        assert!(!compare_equals(&mut agent, object.into(), missing, Value::from(0.0)).unwrap());
    }
    assert_eq!(object.len(&agent), 2);
    assert_eq!(object.own_property_keys(&agent), [a, b]);
    assert!(object.has_same_shape(&agent, shape_peer));
    assert!(!object.is_dictionary(&agent));
}

#[test]
fn deletion_moves_to_dictionary_mode() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    let keys = ["x", "y", "z"].map(PropertyKey::from_small_string);
    for (i, key) in keys.iter().enumerate() {
        object.set(&mut agent, *key, Value::from(i as f64));
    }
    assert!(object.delete(&mut agent, keys[1]));
    assert!(object.is_dictionary(&agent));
    assert_eq!(object.own_property_keys(&agent), [keys[0], keys[2]]);
    assert_eq!(object.get(&agent, keys[2]), Value::from(2.0));
    object.set(&mut agent, keys[1], Value::Null);
    assert_eq!(object.own_property_keys(&agent), [keys[0], keys[2], keys[1]]);
}

#[test]
fn shaped_property_limit_is_configurable() {
    let mut agent = Agent::new(Options {
        max_shaped_properties: 2,
        ..Default::default()
    });
    let object = OrdinaryObject::create_empty_object(&mut agent);
    let keys = ["p", "q", "r"].map(PropertyKey::from_small_string);
    object.set(&mut agent, keys[0], Value::Null);
    object.set(&mut agent, keys[1], Value::Null);
    assert!(!object.is_dictionary(&agent));
    object.set(&mut agent, keys[2], Value::Null);
    assert!(object.is_dictionary(&agent));
    assert_eq!(object.own_property_keys(&agent), keys);
}

#[test]
fn writes_from_coercion_during_comparison_stay_consistent() {
    let mut agent = Agent::new(Options::default());
    let object = OrdinaryObject::create_empty_object(&mut agent);
    let f = PropertyKey::from_small_string("f");
    let g = PropertyKey::from_small_string("g");
    object.set(&mut agent, f, Value::from(1.0));
    REWRITE_TARGET.with(|target| target.set(Some(object)));

    let value_of = create_builtin_function(
        &mut agent,
        Behaviour::Regular(rewriting_value_of),
        BuiltinFunctionArgs::new(0, "valueOf"),
    );
    let literal = OrdinaryObject::create_empty_object(&mut agent);
    let value_of_key = PropertyKey::from_small_string("valueOf");
    literal.set(&mut agent, value_of_key, value_of.into_value());
    let literal = Value::from(literal);

    let mut site = CompareSite::new(&mut agent, f);
    // The property is read before the literal is converted.
    assert!(site.compare_equals(&mut agent, object.into(), literal).unwrap());
    assert_eq!(object.get(&agent, f), Value::from(2.0));
    assert_eq!(object.own_property_keys(&agent), [f, g]);
    assert!(!object.is_dictionary(&agent));

    // Later comparisons see the rewritten object.
    assert!(!site.compare_equals(&mut agent, object.into(), literal).unwrap());
    assert!(!compare_equals(&mut agent, object.into(), f, literal).unwrap());
    object.set(&mut agent, f, Value::from(1.0));
    assert!(site.compare_equals(&mut agent, object.into(), literal).unwrap());
    assert_eq!(site.generic_comparisons(), 3);
}
