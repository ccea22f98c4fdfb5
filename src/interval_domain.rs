// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp;

use num::Signed;
use serde::{Deserialize, Serialize};

/// One end of a value range. A missing bound is represented explicitly rather than
/// with an extreme sentinel value, so that bound arithmetic stays total and free of
/// signed overflow. Which infinity `Unbounded` denotes depends on which end of the
/// range the bound sits at.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueBound<T> {
    Unbounded,
    Inclusive(T),
}

impl<T> ValueBound<T> {
    /// Applies f to the bound value, if there is one.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValueBound<U> {
        match self {
            ValueBound::Unbounded => ValueBound::Unbounded,
            ValueBound::Inclusive(v) => ValueBound::Inclusive(f(v)),
        }
    }

    /// Converts from &ValueBound<T> to ValueBound<&T>.
    pub fn as_ref(&self) -> ValueBound<&T> {
        match self {
            ValueBound::Unbounded => ValueBound::Unbounded,
            ValueBound::Inclusive(v) => ValueBound::Inclusive(v),
        }
    }

    /// Combines two bounds under a binary operator. If either side is missing
    /// the result is missing.
    pub fn combine(self, other: ValueBound<T>, op: impl FnOnce(T, T) -> T) -> ValueBound<T> {
        match (self, other) {
            (ValueBound::Inclusive(a), ValueBound::Inclusive(b)) => ValueBound::Inclusive(op(a, b)),
            _ => ValueBound::Unbounded,
        }
    }
}

impl<'a, T: Clone> ValueBound<&'a T> {
    /// Maps ValueBound<&T> to ValueBound<T> by cloning the bound value.
    pub fn cloned(self) -> ValueBound<T> {
        self.map(Clone::clone)
    }
}

/// An element of the interval domain is either a single value or a range of values
/// denoted by a lower and an upper bound, either of which may be missing.
/// Range elements are constructed on demand from expressions the simulator
/// encounters. They are most useful for checking if an index is within bounds.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValueRange<T> {
    /// A range containing exactly one value.
    Single(T),
    /// All values between lower and upper, inclusive. When both bounds are present
    /// lower <= upper, and the two ends are distinct (the constructor collapses a
    /// degenerate range to Single).
    Multi {
        lower: ValueBound<T>,
        upper: ValueBound<T>,
    },
}

impl<T: Ord + Clone> ValueRange<T> {
    /// Constructs a range from two bounds, normalizing a degenerate range to Single
    /// so that ranges with the same denotation compare equal.
    pub fn multi(lower: ValueBound<T>, upper: ValueBound<T>) -> ValueRange<T> {
        if let (ValueBound::Inclusive(l), ValueBound::Inclusive(u)) = (&lower, &upper) {
            debug_assert!(l <= u);
            if l == u {
                return ValueRange::Single(l.clone());
            }
        }
        ValueRange::Multi { lower, upper }
    }

    /// The range [lower...upper] with both ends present.
    pub fn concrete(lower: T, upper: T) -> ValueRange<T> {
        ValueRange::multi(ValueBound::Inclusive(lower), ValueBound::Inclusive(upper))
    }

    /// The range containing every value of the ordered carrier.
    pub fn unbounded() -> ValueRange<T> {
        ValueRange::Multi {
            lower: ValueBound::Unbounded,
            upper: ValueBound::Unbounded,
        }
    }

    /// The lower bound of this range. A Single value bounds itself.
    pub fn lower_bound(&self) -> ValueBound<&T> {
        match self {
            ValueRange::Single(v) => ValueBound::Inclusive(v),
            ValueRange::Multi { lower, .. } => lower.as_ref(),
        }
    }

    /// The upper bound of this range. A Single value bounds itself.
    pub fn upper_bound(&self) -> ValueBound<&T> {
        match self {
            ValueRange::Single(v) => ValueBound::Inclusive(v),
            ValueRange::Multi { upper, .. } => upper.as_ref(),
        }
    }

    /// True if value lies within this range.
    pub fn contains(&self, value: &T) -> bool {
        let above_lower = match self.lower_bound() {
            ValueBound::Unbounded => true,
            ValueBound::Inclusive(l) => l <= value,
        };
        let below_upper = match self.upper_bound() {
            ValueBound::Unbounded => true,
            ValueBound::Inclusive(u) => value <= u,
        };
        above_lower && below_upper
    }

    /// Returns the least range containing both self and other. Equal singletons stay
    /// a singleton; everything else widens to the pointwise min/max of the bounds,
    /// where a missing bound on either side stays missing.
    pub fn join(&self, other: &Self) -> Self {
        if let (ValueRange::Single(x), ValueRange::Single(y)) = (self, other) {
            if x == y {
                return ValueRange::Single(x.clone());
            }
        }
        let lower = match (self.lower_bound(), other.lower_bound()) {
            (ValueBound::Inclusive(a), ValueBound::Inclusive(b)) => {
                ValueBound::Inclusive(cmp::min(a, b).clone())
            }
            _ => ValueBound::Unbounded,
        };
        let upper = match (self.upper_bound(), other.upper_bound()) {
            (ValueBound::Inclusive(a), ValueBound::Inclusive(b)) => {
                ValueBound::Inclusive(cmp::max(a, b).clone())
            }
            _ => ValueBound::Unbounded,
        };
        ValueRange::multi(lower, upper)
    }

    /// True if no concrete value lies in both self and other. A missing bound on the
    /// relevant side never separates the ranges.
    pub fn is_disjoint_from(&self, other: &Self) -> bool {
        let separated = |upper: ValueBound<&T>, lower: ValueBound<&T>| {
            matches!((upper, lower),
                (ValueBound::Inclusive(u), ValueBound::Inclusive(l)) if u < l)
        };
        separated(self.upper_bound(), other.lower_bound())
            || separated(other.upper_bound(), self.lower_bound())
    }

    /// True if self and other share at least one concrete value.
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_disjoint_from(other)
    }

    /// Decides x == y for x in self and y in other, when the ranges determine it.
    pub fn check_eq(&self, other: &Self) -> Option<bool> {
        match (self, other) {
            (ValueRange::Single(x), ValueRange::Single(y)) => Some(x == y),
            _ if self.is_disjoint_from(other) => Some(false),
            _ => None,
        }
    }

    // [x...y] <= [a...b] = y <= a
    // !([x...y] <= [a...b]) = [a...b] < [x...y] = b < x
    pub fn check_le(&self, other: &Self) -> Option<bool> {
        if let (ValueBound::Inclusive(u), ValueBound::Inclusive(l)) =
            (self.upper_bound(), other.lower_bound())
        {
            if u <= l {
                return Some(true);
            }
        }
        if let (ValueBound::Inclusive(u), ValueBound::Inclusive(l)) =
            (other.upper_bound(), self.lower_bound())
        {
            if u < l {
                return Some(false);
            }
        }
        None
    }

    // [x...y] < [a...b] = y < a
    // !([x...y] < [a...b]) = [a...b] <= [x...y] = b <= x
    pub fn check_lt(&self, other: &Self) -> Option<bool> {
        if let (ValueBound::Inclusive(u), ValueBound::Inclusive(l)) =
            (self.upper_bound(), other.lower_bound())
        {
            if u < l {
                return Some(true);
            }
        }
        if let (ValueBound::Inclusive(u), ValueBound::Inclusive(l)) =
            (other.upper_bound(), self.lower_bound())
        {
            if u <= l {
                return Some(false);
            }
        }
        None
    }
}

/// Transfer functions over the numeric carriers.
impl<T: Signed + Ord + Clone> ValueRange<T> {
    // [x...y] + [a...b] = [x+a...y+b]
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (ValueRange::Single(x), ValueRange::Single(y)) => {
                ValueRange::Single(x.clone() + y.clone())
            }
            (ValueRange::Single(c), ValueRange::Multi { lower, upper })
            | (ValueRange::Multi { lower, upper }, ValueRange::Single(c)) => ValueRange::multi(
                lower.as_ref().map(|v| v.clone() + c.clone()),
                upper.as_ref().map(|v| v.clone() + c.clone()),
            ),
            (
                ValueRange::Multi {
                    lower: lx,
                    upper: ux,
                },
                ValueRange::Multi {
                    lower: ly,
                    upper: uy,
                },
            ) => ValueRange::multi(
                lx.clone().combine(ly.clone(), |a, b| a + b),
                ux.clone().combine(uy.clone(), |a, b| a + b),
            ),
        }
    }

    // -[x...y] = [-y...-x]
    pub fn neg(&self) -> Self {
        match self {
            ValueRange::Single(x) => ValueRange::Single(-x.clone()),
            ValueRange::Multi { lower, upper } => ValueRange::multi(
                upper.as_ref().map(|v| -v.clone()),
                lower.as_ref().map(|v| -v.clone()),
            ),
        }
    }

    // [x...y] - [a...b] = [x-b...y-a]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies every value of the range by a known scalar. A zero scalar collapses
    /// the range to zero even when a bound is missing; a negative scalar flips the
    /// ends so that lower remains the minimum.
    pub fn scalar_mul(&self, scalar: &T) -> Self {
        if scalar.is_zero() {
            return ValueRange::Single(T::zero());
        }
        let scale = |bound: &ValueBound<T>| bound.as_ref().map(|v| scalar.clone() * v.clone());
        match self {
            ValueRange::Single(x) => ValueRange::Single(scalar.clone() * x.clone()),
            ValueRange::Multi { lower, upper } => {
                if scalar.is_positive() {
                    ValueRange::multi(scale(lower), scale(upper))
                } else {
                    ValueRange::multi(scale(upper), scale(lower))
                }
            }
        }
    }

    /// Multiplies two ranges. When one side is a singleton this goes through
    /// scalar_mul, which keeps 0 * [unbounded] at zero. Otherwise the bounds of the
    /// product are picked by how far each operand reaches past zero: x_neg/x_pos
    /// record whether the operand may take a non-positive/non-negative value.
    pub fn mul(&self, other: &Self) -> Self {
        let (lx, ux, ly, uy) = match (self, other) {
            (ValueRange::Single(x), _) => return other.scalar_mul(x),
            (_, ValueRange::Single(y)) => return self.scalar_mul(y),
            (
                ValueRange::Multi {
                    lower: lx,
                    upper: ux,
                },
                ValueRange::Multi {
                    lower: ly,
                    upper: uy,
                },
            ) => (lx, ux, ly, uy),
        };
        let zero = T::zero();
        let reaches_down = |bound: &ValueBound<T>| match bound {
            ValueBound::Unbounded => true,
            ValueBound::Inclusive(v) => *v <= zero,
        };
        let reaches_up = |bound: &ValueBound<T>| match bound {
            ValueBound::Unbounded => true,
            ValueBound::Inclusive(v) => *v >= zero,
        };
        let x_neg = reaches_down(lx);
        let x_pos = reaches_up(ux);
        let y_neg = reaches_down(ly);
        let y_pos = reaches_up(uy);
        let mul = |a: &ValueBound<T>, b: &ValueBound<T>| {
            a.clone().combine(b.clone(), |x, y| x * y)
        };
        let min_bound = |a: ValueBound<T>, b: ValueBound<T>| match (a, b) {
            (ValueBound::Inclusive(x), ValueBound::Inclusive(y)) => {
                ValueBound::Inclusive(cmp::min(x, y))
            }
            _ => ValueBound::Unbounded,
        };
        let max_bound = |a: ValueBound<T>, b: ValueBound<T>| match (a, b) {
            (ValueBound::Inclusive(x), ValueBound::Inclusive(y)) => {
                ValueBound::Inclusive(cmp::max(x, y))
            }
            _ => ValueBound::Unbounded,
        };
        let lower = if x_neg && y_pos && x_pos && y_neg {
            min_bound(mul(lx, uy), mul(ux, ly))
        } else if x_neg && y_pos {
            mul(lx, uy)
        } else if x_pos && y_neg {
            mul(ux, ly)
        } else if x_neg && y_neg {
            mul(ux, uy)
        } else {
            mul(lx, ly)
        };
        let upper = if x_neg && y_pos && x_pos && y_neg {
            max_bound(mul(lx, ly), mul(ux, uy))
        } else if x_neg && y_neg {
            mul(lx, ly)
        } else if x_pos && y_pos {
            mul(ux, uy)
        } else if x_pos && y_neg {
            mul(lx, uy)
        } else {
            mul(ux, ly)
        };
        ValueRange::multi(lower, upper)
    }
}
