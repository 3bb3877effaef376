// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod number;
mod object;
mod string;
mod value;

pub use number::Number;
pub(crate) use object::{DictionaryLayout, ObjectLayout};
pub use object::{
    InternalMethods, Object, ObjectHeapData, OrdinaryObject, PropertyDescriptor, PropertyKey,
};
pub use string::{HeapString, String, StringHeapData};
pub use value::{Value, ValueTypeTag};
