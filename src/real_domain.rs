// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use num::{BigRational, One};
use serde::{Deserialize, Serialize};

use crate::bool_domain::BoolDomain;
use crate::interval_domain::{ValueBound, ValueRange};

/// Classifies a rational range by whether the values it denotes are integers,
/// judging from the range alone. A singleton is decided exactly. A bounded range
/// that fits strictly between two consecutive integers and touches neither is
/// known to contain no integer at all. Anything else stays Top.
pub fn range_is_integer(range: &ValueRange<BigRational>) -> BoolDomain {
    match range {
        ValueRange::Single(q) => q.is_integer().into(),
        ValueRange::Multi {
            lower: ValueBound::Inclusive(l),
            upper: ValueBound::Inclusive(u),
        } => {
            if !l.is_integer() && !u.is_integer() && l.floor() + BigRational::one() >= u.ceil() {
                BoolDomain::False
            } else {
                BoolDomain::Top
            }
        }
        _ => BoolDomain::Top,
    }
}

/// An abstraction of a real value: a rational range together with a tri-state
/// recording whether the value is an integer. The integrality bit carries
/// information the range cannot, e.g. that the sum of two integer-valued
/// unknowns is an integer no matter how wide the range gets.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RealAbstractValue {
    pub range: ValueRange<BigRational>,
    pub is_integer: BoolDomain,
}

impl RealAbstractValue {
    /// The abstraction of every real value.
    pub fn top() -> RealAbstractValue {
        RealAbstractValue {
            range: ValueRange::unbounded(),
            is_integer: BoolDomain::Top,
        }
    }

    /// The abstraction containing just the given rational.
    pub fn single(value: BigRational) -> RealAbstractValue {
        let is_integer = value.is_integer().into();
        RealAbstractValue {
            range: ValueRange::Single(value),
            is_integer,
        }
    }

    /// The abstraction of a value bounded by two known rationals. Integer endpoints
    /// mark the value as integer valued; otherwise integrality is judged from the
    /// range.
    pub fn concrete_range(lower: BigRational, upper: BigRational) -> RealAbstractValue {
        let endpoints_integral = lower.is_integer() && upper.is_integer();
        let range = ValueRange::concrete(lower, upper);
        let is_integer = if endpoints_integral {
            BoolDomain::True
        } else {
            range_is_integer(&range)
        };
        RealAbstractValue { range, is_integer }
    }

    /// Returns the least upper bound of self and other.
    pub fn join(&self, other: &Self) -> Self {
        RealAbstractValue {
            range: self.range.join(&other.range),
            is_integer: self.is_integer.join(other.is_integer),
        }
    }

    /// Returns an abstraction of "self + other". The sum of two integers is an
    /// integer; in every other case integrality is recomputed from the sum range.
    pub fn add(&self, other: &Self) -> Self {
        let range = self.range.add(&other.range);
        let is_integer = propagate_integrality(self.is_integer, other.is_integer, &range);
        RealAbstractValue { range, is_integer }
    }

    /// Returns an abstraction of "self * other".
    pub fn mul(&self, other: &Self) -> Self {
        let range = self.range.mul(&other.range);
        let is_integer = propagate_integrality(self.is_integer, other.is_integer, &range);
        RealAbstractValue { range, is_integer }
    }

    /// Returns an abstraction of "scalar * self" for a known rational scalar.
    pub fn scalar_mul(&self, scalar: &BigRational) -> Self {
        let range = self.range.scalar_mul(scalar);
        let is_integer = if self.is_integer == BoolDomain::True && scalar.is_integer() {
            BoolDomain::True
        } else {
            range_is_integer(&range)
        };
        RealAbstractValue { range, is_integer }
    }

    /// Returns an abstraction of "-self". Negation preserves integrality.
    pub fn neg(&self) -> Self {
        RealAbstractValue {
            range: self.range.neg(),
            is_integer: self.is_integer,
        }
    }

    /// True if value lies within the range of this abstraction.
    pub fn contains(&self, value: &BigRational) -> bool {
        self.range.contains(value)
    }

    /// True if self and other could describe the same real value.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.range.overlaps(&other.range)
    }
}

fn propagate_integrality(
    x: BoolDomain,
    y: BoolDomain,
    result: &ValueRange<BigRational>,
) -> BoolDomain {
    if x == BoolDomain::True && y == BoolDomain::True {
        BoolDomain::True
    } else {
        range_is_integer(result)
    }
}
