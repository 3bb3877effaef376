// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Kestrel runtime core.
//!
//! Shaped property storage with inline caches and type feedback, precise
//! floating point summation and typed array wait validation, all operating
//! on an [Agent](ecmascript::execution::Agent) owned heap.

pub mod ecmascript;
pub mod heap;

pub use small_string::SmallString;
