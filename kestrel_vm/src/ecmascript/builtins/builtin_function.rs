// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use core::ops::Deref;

use crate::{
    ecmascript::{
        execution::{Agent, JsResult},
        types::{InternalMethods, String, Value},
    },
    heap::{CreateHeapData, indexes::BuiltinFunctionIndex},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct ArgumentsList<'a>(pub(crate) &'a [Value]);

impl<'a> ArgumentsList<'a> {
    pub fn new(arguments: &'a [Value]) -> Self {
        Self(arguments)
    }
}

impl<'a> Deref for ArgumentsList<'a> {
    type Target = &'a [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ArgumentsList<'_> {
    #[inline]
    pub fn get(&self, index: usize) -> Value {
        *self.0.get(index).unwrap_or(&Value::Undefined)
    }
}

pub type RegularFn = fn(&mut Agent, Value, ArgumentsList<'_>) -> JsResult<Value>;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Regular(RegularFn),
}

pub trait Builtin {
    const NAME: &'static str;
    const LENGTH: u8;
    const BEHAVIOUR: Behaviour;
}

#[derive(Debug, Default)]
pub struct BuiltinFunctionArgs {
    pub length: u32,
    pub name: &'static str,
}

impl BuiltinFunctionArgs {
    pub fn new(length: u32, name: &'static str) -> Self {
        Self { length, name }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BuiltinFunction(pub(crate) BuiltinFunctionIndex);

impl BuiltinFunction {
    pub fn name(self, agent: &Agent) -> &str {
        agent.heap[self].initial_name.as_str(agent)
    }

    pub fn length(self, agent: &Agent) -> u32 {
        agent.heap[self].length
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.into())
    }

    /// ### [10.3.1 \[\[Call\]\] ( thisArgument, argumentsList )](https://tc39.es/ecma262/#sec-built-in-function-objects-call-thisargument-argumentslist)
    ///
    /// The \[\[Call]] internal method of a built-in function object F takes
    /// arguments thisArgument (an ECMAScript language value) and
    /// argumentsList (a List of ECMAScript language values) and returns
    /// either a normal completion containing an ECMAScript language value or
    /// a throw completion.
    pub fn call(
        self,
        agent: &mut Agent,
        this_argument: Value,
        arguments_list: ArgumentsList,
    ) -> JsResult<Value> {
        // 1. Return ? BuiltinCallOrConstruct(F, thisArgument, argumentsList, undefined).
        // NOTE: There is no execution context stack to push onto, so the
        // behaviour is called directly.
        let Behaviour::Regular(func) = agent.heap[self].behaviour;
        func(agent, this_argument, arguments_list)
    }
}

/// Built-in functions expose neither `length` nor `name` as properties.
impl InternalMethods for BuiltinFunction {}

#[derive(Debug, Clone)]
pub struct BuiltinFunctionHeapData {
    pub(crate) behaviour: Behaviour,
    pub(crate) length: u32,
    pub(crate) initial_name: String,
}

/// ### [10.3.4 CreateBuiltinFunction ( behaviour, length, name, additionalInternalSlotsList \[ , realm \[ , prototype \[ , prefix \] \] \] )](https://tc39.es/ecma262/#sec-createbuiltinfunction)
///
/// The abstract operation CreateBuiltinFunction takes arguments behaviour (an
/// Abstract Closure, a set of algorithm steps, or some other definition of a
/// function's behaviour provided in this specification), length (a
/// non-negative integer or +∞), name (a property key or a Private Name), and
/// additionalInternalSlotsList (a List of names of internal slots) and
/// returns a function object. This operation creates a built-in function
/// object.
pub fn create_builtin_function(
    agent: &mut Agent,
    behaviour: Behaviour,
    args: BuiltinFunctionArgs,
) -> BuiltinFunction {
    // 9. Set func.[[InitialName]] to null.
    // 11. If prefix is not present, then
    // a. Perform SetFunctionName(func, name).
    let initial_name = String::from_str(agent, args.name);
    // 5. Let func be a new built-in function object that, when called,
    //    performs the action described by behaviour using the provided
    //    arguments as the values of the corresponding parameters specified by
    //    behaviour.
    // 10. Perform SetFunctionLength(func, length).
    agent.heap.create(BuiltinFunctionHeapData {
        behaviour,
        length: args.length,
        initial_name,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::abstract_operations::operations_on_objects::call;

    fn first_argument(_: &mut Agent, _: Value, arguments: ArgumentsList) -> JsResult<Value> {
        Ok(arguments.get(0))
    }

    #[test]
    fn calls_behaviour_with_arguments() {
        let mut agent = Agent::default();
        let function = create_builtin_function(
            &mut agent,
            Behaviour::Regular(first_argument),
            BuiltinFunctionArgs::new(1, "firstArgument"),
        );
        assert_eq!(function.name(&agent), "firstArgument");
        assert_eq!(function.length(&agent), 1);
        let result = call(
            &mut agent,
            function.into_value(),
            Value::Undefined,
            Some(ArgumentsList::new(&[Value::Null])),
        )
        .unwrap();
        assert_eq!(result, Value::Null);
        let result = call(&mut agent, function.into_value(), Value::Undefined, None).unwrap();
        assert_eq!(result, Value::Undefined);
    }
}
