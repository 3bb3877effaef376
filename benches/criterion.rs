// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use kestrel_vm::ecmascript::{
    builtins::{
        ordinary::type_feedback::CompareSite,
        numbers_and_dates::math_object::precise_sum::sum_precise,
    },
    execution::{Agent, Options},
    types::{OrdinaryObject, PropertyKey, Value},
};

const PROPERTY_NAMES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

fn bench_summation(c: &mut Criterion) {
    let values = (0..10_000)
        .flat_map(|i| [1e20, 0.1 * i as f64, -1e20])
        .collect::<Vec<f64>>();

    c.bench_function("sum_precise (30000 values)", |b| {
        b.iter(|| sum_precise(black_box(&values).iter().copied()))
    });
    c.bench_function("naive sum (30000 values)", |b| {
        b.iter(|| black_box(&values).iter().fold(0.0, |sum, value| sum + value))
    });
}

fn populated_object(agent: &mut Agent, keys: &[PropertyKey]) -> OrdinaryObject {
    let object = OrdinaryObject::create_empty_object(agent);
    for (i, key) in keys.iter().enumerate() {
        object.set(agent, *key, Value::from(i as f64));
    }
    object
}

fn bench_property_access(c: &mut Criterion) {
    let keys = PROPERTY_NAMES.map(PropertyKey::from_small_string);

    c.bench_function("shaped object creation", |b| {
        b.iter_batched(
            || Agent::new(Options::default()),
            |mut agent| populated_object(&mut agent, &keys),
            BatchSize::SmallInput,
        )
    });

    let mut agent = Agent::new(Options::default());
    let shaped = populated_object(&mut agent, &keys);
    let dictionary = populated_object(&mut agent, &keys);
    dictionary.delete(&mut agent, keys[0]);
    dictionary.set(&mut agent, keys[0], Value::from(0.0));
    assert!(dictionary.is_dictionary(&agent));

    for (name, object) in [("shaped", shaped), ("dictionary", dictionary)] {
        c.bench_function(&format!("{name} object get"), |b| {
            b.iter(|| {
                for key in keys {
                    black_box(object.get(&agent, key));
                }
            })
        });
    }
}

fn bench_compare_site(c: &mut Criterion) {
    let mut agent = Agent::new(Options::default());
    let keys = PROPERTY_NAMES.map(PropertyKey::from_small_string);
    let object = populated_object(&mut agent, &keys);
    let key = keys[5];
    let mut site = CompareSite::new(&mut agent, key);

    c.bench_function("compare site (same type)", |b| {
        b.iter(|| site.compare_equals(&mut agent, object.into(), Value::from(5.0)))
    });

    let literal = Value::from_str(&mut agent, "5");
    c.bench_function("compare site (mixed types)", |b| {
        b.iter(|| site.compare_equals(&mut agent, object.into(), literal))
    });
}

criterion_group!(
    benches,
    bench_summation,
    bench_property_access,
    bench_compare_site
);
criterion_main!(benches);
