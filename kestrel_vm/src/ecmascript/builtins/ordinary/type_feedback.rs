// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::caches::PropertyLookupCache;
use crate::ecmascript::{
    abstract_operations::testing_and_comparison::{is_loosely_equal, is_strictly_equal},
    execution::{Agent, JsResult},
    types::{InternalMethods, Object, PropertyKey, Value, ValueTypeTag},
};

/// A guarded `object[key] == literal` comparison site.
///
/// The site reads the property through a [PropertyLookupCache] and consults
/// the slot's type feedback tag. When the tag matches the literal's type, the
/// comparison is done as a same-type comparison after verifying the value's
/// actual type; otherwise the generic loose equality is used. The result
/// always reflects the current value of the property.
#[derive(Debug, Clone, Copy)]
pub struct CompareSite {
    key: PropertyKey,
    cache: PropertyLookupCache,
    /// Tag observed on the previous comparison.
    observed: Option<ValueTypeTag>,
    fast_comparisons: u32,
    generic_comparisons: u32,
}

impl CompareSite {
    pub fn new(agent: &mut Agent, key: PropertyKey) -> Self {
        Self {
            key,
            cache: PropertyLookupCache::new(agent, key),
            observed: None,
            fast_comparisons: 0,
            generic_comparisons: 0,
        }
    }

    pub fn key(&self) -> PropertyKey {
        self.key
    }

    /// Type feedback tag seen by the last comparison, if any.
    pub fn observed_tag(&self) -> Option<ValueTypeTag> {
        self.observed
    }

    /// Number of comparisons that took the same-type path.
    pub fn fast_comparisons(&self) -> u32 {
        self.fast_comparisons
    }

    /// Number of comparisons that took the generic path.
    pub fn generic_comparisons(&self) -> u32 {
        self.generic_comparisons
    }

    /// Evaluate `object[key] == literal`.
    ///
    /// An absent property compares as `undefined`.
    pub fn compare_equals(
        &mut self,
        agent: &mut Agent,
        object: Object,
        literal: Value,
    ) -> JsResult<bool> {
        let (value, tag) = match object {
            Object::Object(object) => self.cache.get(agent, object, self.key),
            _ => (
                object.internal_get(agent, self.key, object.into_value())?,
                None,
            ),
        };
        let tag = tag.unwrap_or_else(|| value.type_tag());
        self.observed = Some(tag);
        let literal_tag = literal.type_tag();
        // The tag is a hint: confirm the value really has the literal's type.
        if tag == literal_tag && value.type_tag() == literal_tag {
            self.fast_comparisons += 1;
            return Ok(is_strictly_equal(agent, value, literal));
        }
        self.generic_comparisons += 1;
        is_loosely_equal(agent, value, literal)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ecmascript::{execution::Options, types::OrdinaryObject};

    #[test]
    fn tag_history_never_decides_the_result() {
        let mut agent = Agent::new(Options::default());
        let f = PropertyKey::from_small_string("f");
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let hello = Value::from_str(&mut agent, "hello");
        let mut site = CompareSite::new(&mut agent, f);
        for _ in 0..5 {
            object.set(&mut agent, f, Value::Null);
            assert!(!site.compare_equals(&mut agent, object.into(), hello).unwrap());
            assert_eq!(site.observed_tag(), Some(ValueTypeTag::Null));
        }
        assert_eq!(site.generic_comparisons(), 5);
        object.set(&mut agent, f, hello);
        assert!(site.compare_equals(&mut agent, object.into(), hello).unwrap());
        assert_eq!(site.observed_tag(), Some(ValueTypeTag::String));
        assert_eq!(site.fast_comparisons(), 1);
    }

    #[test]
    fn absent_property_compares_as_undefined() {
        let mut agent = Agent::new(Options::default());
        let missing = PropertyKey::from_small_string("missing");
        let object = OrdinaryObject::create_empty_object(&mut agent);
        let mut site = CompareSite::new(&mut agent, missing);
        assert!(site.compare_equals(&mut agent, object.into(), Value::Null).unwrap());
        assert!(site.compare_equals(&mut agent, object.into(), Value::Undefined).unwrap());
        assert!(!site.compare_equals(&mut agent, object.into(), Value::from(0.0)).unwrap());
        assert!(!object.has_own_property(&agent, missing));
        assert!(object.is_empty(&agent));
    }
}
