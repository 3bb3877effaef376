// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ### [6.1.6.1 The Number Type](https://tc39.es/ecma262/#sec-ecmascript-language-types-number-type)

use super::Value;

/// An IEEE 754-2019 binary64 value with the ECMAScript Number operations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Number(f64);

impl Number {
    pub const NAN: Self = Self(f64::NAN);
    pub const POS_ZERO: Self = Self(0.0);
    pub const NEG_ZERO: Self = Self(-0.0);
    pub const POS_INF: Self = Self(f64::INFINITY);
    pub const NEG_INF: Self = Self(f64::NEG_INFINITY);

    pub const fn from_f64(value: f64) -> Self {
        Self(value)
    }

    pub const fn into_f64(self) -> f64 {
        self.0
    }

    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }

    pub fn is_pos_zero(self) -> bool {
        self.0 == 0.0 && self.0.is_sign_positive()
    }

    pub fn is_neg_zero(self) -> bool {
        self.0 == 0.0 && self.0.is_sign_negative()
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// ### [6.1.6.1.13 Number::equal ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-number-equal)
    pub fn equal(self, y: Self) -> bool {
        // 1. If x is NaN, return false.
        // 2. If y is NaN, return false.
        // 3. If x is y, return true.
        // 4. If x is +0𝔽 and y is -0𝔽, return true.
        // 5. If x is -0𝔽 and y is +0𝔽, return true.
        // 6. Return false.
        self.0 == y.0
    }

    /// ### [6.1.6.1.14 Number::sameValue ( x, y )](https://tc39.es/ecma262/#sec-numeric-types-number-sameValue)
    pub fn same_value(self, y: Self) -> bool {
        // 1. If x is NaN and y is NaN, return true.
        if self.is_nan() && y.is_nan() {
            return true;
        }
        // 2. If x is +0𝔽 and y is -0𝔽, return false.
        // 3. If x is -0𝔽 and y is +0𝔽, return false.
        // 4. If x is y, return true.
        // 5. Return false.
        self.0.to_bits() == y.0.to_bits()
    }

    /// ### [6.1.6.1.20 Number::toString ( x, radix )](https://tc39.es/ecma262/#sec-numeric-types-number-tostring)
    ///
    /// Radix 10 only.
    pub fn to_string_radix_10(self) -> std::string::String {
        if self.0 == 0.0 {
            // Both zeroes print as "0".
            return "0".to_string();
        }
        let mut buffer = ryu_js::Buffer::new();
        buffer.format(self.0).to_string()
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Number> for f64 {
    fn from(value: Number) -> Self {
        value.0
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Value::Number(value.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn number_to_string() {
        assert_eq!(Number::from_f64(100.0).to_string_radix_10(), "100");
        assert_eq!(Number::NEG_ZERO.to_string_radix_10(), "0");
        assert_eq!(Number::from_f64(0.1).to_string_radix_10(), "0.1");
        assert_eq!(Number::from_f64(1e21).to_string_radix_10(), "1e+21");
        assert_eq!(Number::NAN.to_string_radix_10(), "NaN");
        assert_eq!(Number::NEG_INF.to_string_radix_10(), "-Infinity");
    }

    #[test]
    fn same_value_distinguishes_zeroes() {
        assert!(Number::POS_ZERO.equal(Number::NEG_ZERO));
        assert!(!Number::POS_ZERO.same_value(Number::NEG_ZERO));
        assert!(Number::NAN.same_value(Number::NAN));
        assert!(!Number::NAN.equal(Number::NAN));
    }
}
