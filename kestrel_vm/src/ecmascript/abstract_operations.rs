// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub mod operations_on_iterator_objects;
pub mod operations_on_objects;
pub mod testing_and_comparison;
pub mod type_conversion;
