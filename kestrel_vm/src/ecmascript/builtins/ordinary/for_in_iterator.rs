// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [14.7.5.9 EnumerateObjectProperties ( O )](https://tc39.es/ecma262/#sec-enumerate-object-properties)

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::ecmascript::{
    execution::Agent,
    types::{InternalMethods, Object, PropertyKey},
};

/// Iterator over the enumerable string keys of an object and its prototype
/// chain, as visited by a `for-in` loop.
///
/// Keys of each object are visited in \[\[OwnPropertyKeys]] order. A key is
/// visited at most once: keys shadowed by an object closer to the receiver
/// are skipped, as are keys deleted after the iteration started. The
/// iterator can be restarted with [ForInIterator::reset].
#[derive(Debug, Clone)]
pub struct ForInIterator {
    receiver: Object,
    object: Option<Object>,
    object_was_visited: bool,
    visited_keys: AHashSet<PropertyKey>,
    remaining_keys: VecDeque<PropertyKey>,
}

impl ForInIterator {
    pub fn new(object: Object) -> Self {
        Self {
            receiver: object,
            object: Some(object),
            object_was_visited: false,
            visited_keys: Default::default(),
            remaining_keys: Default::default(),
        }
    }

    /// Restart the enumeration from the receiver.
    pub fn reset(&mut self) {
        self.object = Some(self.receiver);
        self.object_was_visited = false;
        self.visited_keys.clear();
        self.remaining_keys.clear();
    }

    pub fn next(&mut self, agent: &Agent) -> Option<PropertyKey> {
        loop {
            let object = self.object?;
            if !self.object_was_visited {
                self.remaining_keys
                    .extend(object.internal_own_property_keys(agent));
                self.object_was_visited = true;
            }
            while let Some(r) = self.remaining_keys.pop_front() {
                if self.visited_keys.contains(&r) {
                    continue;
                }
                let desc = object.internal_get_own_property(agent, r);
                if let Some(desc) = desc {
                    self.visited_keys.insert(r);
                    if desc.enumerable {
                        return Some(r);
                    }
                }
            }
            self.object = object.internal_get_prototype_of(agent).map(Object::Object);
            self.object_was_visited = false;
        }
    }

    /// Iterate over the remaining keys.
    pub fn iter<'a>(&'a mut self, agent: &'a Agent) -> impl Iterator<Item = PropertyKey> + 'a {
        core::iter::from_fn(move || self.next(agent))
    }
}
