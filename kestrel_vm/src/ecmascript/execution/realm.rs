// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[cfg(feature = "math")]
use crate::ecmascript::builtins::numbers_and_dates::math_object::MathObject;
#[cfg(feature = "atomics")]
use crate::ecmascript::builtins::structured_data::atomics_object::AtomicsObject;
use crate::{
    ecmascript::{builtins::ordinary::ordinary_object_create_with_heap, types::OrdinaryObject},
    heap::Heap,
};

use super::Agent;

/// ### [9.3 Realms](https://tc39.es/ecma262/#sec-code-realms)
#[derive(Debug)]
pub struct Realm {
    intrinsics: Intrinsics,
}

impl Realm {
    pub(crate) fn new(intrinsics: Intrinsics) -> Self {
        Self { intrinsics }
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    /// ### [9.3.2 CreateIntrinsics ( realmRec )](https://tc39.es/ecma262/#sec-createintrinsics)
    ///
    /// The intrinsic objects are allocated up front by
    /// [Intrinsics::allocate]; this fills in their properties.
    pub(crate) fn initialize_intrinsics(agent: &mut Agent) {
        #[cfg(feature = "math")]
        MathObject::create_intrinsic(agent);
        #[cfg(feature = "atomics")]
        AtomicsObject::create_intrinsic(agent);
        #[cfg(not(any(feature = "math", feature = "atomics")))]
        let _ = agent;
    }
}

/// Well-known intrinsic objects of a realm.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    object_prototype: OrdinaryObject,
    #[cfg(feature = "math")]
    math: OrdinaryObject,
    #[cfg(feature = "atomics")]
    atomics: OrdinaryObject,
}

impl Intrinsics {
    /// Allocate the intrinsic objects without any properties.
    pub(crate) fn allocate(heap: &mut Heap) -> Self {
        let object_prototype = ordinary_object_create_with_heap(heap, None);
        Self {
            object_prototype,
            #[cfg(feature = "math")]
            math: ordinary_object_create_with_heap(heap, Some(object_prototype)),
            #[cfg(feature = "atomics")]
            atomics: ordinary_object_create_with_heap(heap, Some(object_prototype)),
        }
    }

    /// %Object.prototype%
    pub fn object_prototype(&self) -> OrdinaryObject {
        self.object_prototype
    }

    /// %Math%
    #[cfg(feature = "math")]
    pub fn math(&self) -> OrdinaryObject {
        self.math
    }

    /// %Atomics%
    #[cfg(feature = "atomics")]
    pub fn atomics(&self) -> OrdinaryObject {
        self.atomics
    }
}
