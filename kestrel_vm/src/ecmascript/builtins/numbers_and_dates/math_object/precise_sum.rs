// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Correctly rounded summation of doubles.
//!
//! Values are accumulated into a list of non-overlapping partials using the
//! error-free two-sum transformation (Shewchuk, "Adaptive Precision
//! Floating-Point Arithmetic and Fast Robust Geometric Predicates"). Sums
//! that leave the double range are kept finite by subtracting multiples of
//! 2**1024 and counting them separately. The partials are rounded once when
//! the sum is finished.

/// 2**1023
const TWO_POW_1023: f64 = f64::from_bits(0x7FE0_0000_0000_0000);
/// Unit in the last place of `f64::MAX`, 2**971.
const MAX_ULP: f64 = f64::from_bits(0x7CA0_0000_0000_0000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SumState {
    MinusZero,
    Finite,
    PlusInfinity,
    MinusInfinity,
    NotANumber,
}

/// Exact accumulator for [`sum_precise`].
#[derive(Debug, Clone)]
pub struct PreciseSum {
    partials: Vec<f64>,
    overflow: i64,
    overflowed: bool,
    state: SumState,
}

impl Default for PreciseSum {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn two_sum(x: f64, y: f64) -> (f64, f64) {
    let hi = x + y;
    let lo = y - (hi - x);
    (hi, lo)
}

impl PreciseSum {
    pub fn new() -> Self {
        Self {
            partials: Vec::new(),
            overflow: 0,
            overflowed: false,
            state: SumState::MinusZero,
        }
    }

    /// Returns true if an intermediate sum left the double range at any
    /// point.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Number of partials currently held.
    pub fn partials_len(&self) -> usize {
        self.partials.len()
    }

    pub fn add(&mut self, x: f64) {
        if x.is_nan() {
            self.state = SumState::NotANumber;
            return;
        }
        if x.is_infinite() {
            let infinity = if x > 0.0 {
                SumState::PlusInfinity
            } else {
                SumState::MinusInfinity
            };
            self.state = match self.state {
                SumState::NotANumber => SumState::NotANumber,
                state @ (SumState::PlusInfinity | SumState::MinusInfinity)
                    if state != infinity =>
                {
                    SumState::NotANumber
                }
                _ => infinity,
            };
            return;
        }
        if x == 0.0 && x.is_sign_negative() {
            return;
        }
        if self.state == SumState::MinusZero {
            self.state = SumState::Finite;
        }
        if self.state != SumState::Finite || x == 0.0 {
            return;
        }
        self.add_finite(x);
    }

    fn add_finite(&mut self, mut x: f64) {
        let mut used = 0;
        for i in 0..self.partials.len() {
            let mut y = self.partials[i];
            if x.abs() < y.abs() {
                core::mem::swap(&mut x, &mut y);
            }
            let (mut hi, mut lo) = two_sum(x, y);
            if hi.is_infinite() {
                let sign = if hi > 0.0 { 1.0 } else { -1.0 };
                self.overflow += sign as i64;
                self.overflowed = true;
                x = (x - sign * TWO_POW_1023) - sign * TWO_POW_1023;
                if x.abs() < y.abs() {
                    core::mem::swap(&mut x, &mut y);
                }
                (hi, lo) = two_sum(x, y);
            }
            if lo != 0.0 {
                self.partials[used] = lo;
                used += 1;
            }
            x = hi;
        }
        self.partials.truncate(used);
        if x != 0.0 {
            self.partials.push(x);
        }
    }

    /// Round the accumulated partials to the nearest double, ties to even.
    pub fn finish(self) -> f64 {
        match self.state {
            SumState::NotANumber => return f64::NAN,
            SumState::PlusInfinity => return f64::INFINITY,
            SumState::MinusInfinity => return f64::NEG_INFINITY,
            SumState::MinusZero => return -0.0,
            SumState::Finite => {}
        }
        let mut partials = self.partials;
        // Number of partials not yet folded into hi; they are consumed from
        // the largest down.
        let mut n = partials.len();
        let mut hi = 0.0;
        let mut lo = 0.0;

        if self.overflow != 0 {
            let next = match n.checked_sub(1) {
                Some(i) => {
                    n = i;
                    partials[i]
                }
                None => 0.0,
            };
            if self.overflow.abs() > 1
                || (self.overflow > 0 && next > 0.0)
                || (self.overflow < 0 && next < 0.0)
            {
                return if self.overflow > 0 {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                };
            }
            // Halve everything so the arithmetic stays in range.
            (hi, lo) = two_sum(self.overflow as f64 * TWO_POW_1023, next / 2.0);
            lo *= 2.0;
            if (2.0 * hi).is_infinite() {
                // The only finite result left is f64::MAX: 2**1024 minus
                // half an ulp ties away from it unless the remaining
                // partials pull the sum below the midpoint.
                let below_midpoint = |toward_zero: fn(f64) -> bool| {
                    n > 0 && toward_zero(partials[n - 1])
                };
                return if hi > 0.0 {
                    if hi == TWO_POW_1023
                        && lo == -(MAX_ULP / 2.0)
                        && below_midpoint(|p| p < 0.0)
                    {
                        f64::MAX
                    } else {
                        f64::INFINITY
                    }
                } else if hi == -TWO_POW_1023
                    && lo == MAX_ULP / 2.0
                    && below_midpoint(|p| p > 0.0)
                {
                    f64::MIN
                } else {
                    f64::NEG_INFINITY
                };
            }
            if lo != 0.0 {
                partials.truncate(n);
                partials.push(lo);
                n += 1;
            }
            hi *= 2.0;
        }

        while n > 0 {
            n -= 1;
            (hi, lo) = two_sum(hi, partials[n]);
            if lo != 0.0 {
                break;
            }
        }

        // When the rounding error is exactly half an ulp of the result the
        // next partial decides the direction.
        if n > 0 && ((lo < 0.0 && partials[n - 1] < 0.0) || (lo > 0.0 && partials[n - 1] > 0.0)) {
            let y = lo * 2.0;
            let x = hi + y;
            if x - hi == y {
                hi = x;
            }
        }
        hi
    }
}

/// Correctly rounded sum of all values.
///
/// An empty input sums to -0. Any NaN, or infinities of both signs, give
/// NaN.
pub fn sum_precise(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = PreciseSum::new();
    for value in values {
        sum.add(value);
    }
    sum.finish()
}
