// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # [10 Ordinary and Exotic Objects Behaviours](https://tc39.es/ecma262/#sec-ordinary-and-exotic-objects-behaviours)
//!
//! Plain objects are the only objects in Kestrel that carry arbitrary
//! properties: they are defined in [ordinary]. All other objects are
//! "exotic" in the sense that they hold their own internal slots on the heap
//! and expose a fixed set of properties, if any, through their internal
//! methods.

pub mod array;
#[cfg(feature = "array-buffer")]
pub mod array_buffer;
pub mod builtin_function;
pub mod error;
pub mod numbers_and_dates;
pub mod ordinary;
#[cfg(feature = "shared-array-buffer")]
pub mod shared_array_buffer;
pub mod structured_data;
#[cfg(feature = "array-buffer")]
pub mod typed_array;

pub use array::Array;
#[cfg(feature = "array-buffer")]
pub use array_buffer::ArrayBuffer;
pub use builtin_function::{
    ArgumentsList, Behaviour, Builtin, BuiltinFunction, BuiltinFunctionArgs, RegularFn,
    create_builtin_function,
};
pub use error::Error;
#[cfg(feature = "shared-array-buffer")]
pub use shared_array_buffer::SharedArrayBuffer;
#[cfg(feature = "array-buffer")]
pub use typed_array::{TypedArray, TypedArrayKind};
