// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::ecmascript::{
    builtins::{Builtin, BuiltinFunctionArgs, create_builtin_function},
    execution::Agent,
    types::{OrdinaryObject, PropertyKey, Value},
};

#[derive(Default, Clone, Copy)]
pub struct NoPrototype;

#[derive(Clone, Copy)]
pub struct CreatorPrototype(Option<OrdinaryObject>);

#[derive(Default, Clone, Copy)]
pub struct NoProperties;

#[derive(Clone)]
pub struct CreatorProperties(Vec<(PropertyKey, Value)>);

pub struct OrdinaryObjectBuilder<'agent, P, Pr> {
    pub(crate) agent: &'agent mut Agent,
    this: OrdinaryObject,
    prototype: P,
    properties: Pr,
}

impl<'agent> OrdinaryObjectBuilder<'agent, NoPrototype, NoProperties> {
    #[must_use]
    pub fn new(agent: &'agent mut Agent) -> Self {
        let this = OrdinaryObject::create_empty_object(agent);
        Self {
            agent,
            this,
            prototype: NoPrototype,
            properties: NoProperties,
        }
    }

    #[must_use]
    pub(crate) fn new_intrinsic_object(agent: &'agent mut Agent, this: OrdinaryObject) -> Self {
        Self {
            agent,
            this,
            prototype: NoPrototype,
            properties: NoProperties,
        }
    }
}

impl<'agent, Pr> OrdinaryObjectBuilder<'agent, NoPrototype, Pr> {
    #[must_use]
    pub fn with_prototype(
        self,
        prototype: Option<OrdinaryObject>,
    ) -> OrdinaryObjectBuilder<'agent, CreatorPrototype, Pr> {
        OrdinaryObjectBuilder {
            agent: self.agent,
            this: self.this,
            prototype: CreatorPrototype(prototype),
            properties: self.properties,
        }
    }
}

impl<'agent, P> OrdinaryObjectBuilder<'agent, P, NoProperties> {
    #[must_use]
    pub fn with_property_capacity(
        self,
        cap: usize,
    ) -> OrdinaryObjectBuilder<'agent, P, CreatorProperties> {
        OrdinaryObjectBuilder {
            agent: self.agent,
            this: self.this,
            prototype: self.prototype,
            properties: CreatorProperties(Vec::with_capacity(cap)),
        }
    }
}

impl<P> OrdinaryObjectBuilder<'_, P, CreatorProperties> {
    #[must_use]
    pub fn with_data_property(mut self, key: PropertyKey, value: Value) -> Self {
        self.properties.0.push((key, value));
        self
    }

    #[must_use]
    pub fn with_builtin_function_property<T: Builtin>(mut self) -> Self {
        let function = create_builtin_function(
            self.agent,
            T::BEHAVIOUR,
            BuiltinFunctionArgs::new(T::LENGTH.into(), T::NAME),
        );
        let key = PropertyKey::from_str(self.agent, T::NAME);
        self.properties.0.push((key, function.into_value()));
        self
    }
}

trait ApplyPrototype {
    fn apply(self, agent: &mut Agent, this: OrdinaryObject);
}

impl ApplyPrototype for NoPrototype {
    fn apply(self, _: &mut Agent, _: OrdinaryObject) {}
}

impl ApplyPrototype for CreatorPrototype {
    fn apply(self, agent: &mut Agent, this: OrdinaryObject) {
        this.set_prototype_of(agent, self.0);
    }
}

#[allow(private_bounds)]
impl<P: ApplyPrototype> OrdinaryObjectBuilder<'_, P, NoProperties> {
    pub fn build(self) -> OrdinaryObject {
        self.prototype.apply(self.agent, self.this);
        self.this
    }
}

#[allow(private_bounds)]
impl<P: ApplyPrototype> OrdinaryObjectBuilder<'_, P, CreatorProperties> {
    pub fn build(self) -> OrdinaryObject {
        self.prototype.apply(self.agent, self.this);
        let properties = self.properties.0;
        debug_assert!(
            properties
                .iter()
                .enumerate()
                .all(|(i, (key, _))| properties[..i].iter().all(|(other, _)| other != key)),
            "Duplicate properties found"
        );
        for (key, value) in properties {
            self.this.set(self.agent, key, value);
        }
        self.this
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_object_in_insertion_order() {
        let mut agent = Agent::default();
        let a = PropertyKey::from_small_string("a");
        let b = PropertyKey::from_small_string("b");
        let object = OrdinaryObjectBuilder::new(&mut agent)
            .with_prototype(None)
            .with_property_capacity(2)
            .with_data_property(b, Value::from(2.0))
            .with_data_property(a, Value::from(1.0))
            .build();
        assert_eq!(object.own_property_keys(&agent), [b, a]);
        assert_eq!(object.get(&agent, a), Value::from(1.0));
        assert_eq!(object.get_prototype_of(&agent), None);
    }
}
