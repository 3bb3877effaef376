// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ## [21 Numbers and Dates](https://tc39.es/ecma262/#sec-numbers-and-dates)

#[cfg(feature = "math")]
pub mod math_object;
