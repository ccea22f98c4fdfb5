// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use num::{BigInt, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::interval_domain::{ValueBound, ValueRange};

/// A range of natural numbers. Mirrors the integer ranges of the interval domain,
/// except that the lower end is always present and never below zero.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NatValueRange {
    /// A range containing exactly one natural number.
    Single(BigInt),
    /// All naturals between lower and upper, inclusive. lower >= 0, and when the
    /// upper bound is present it is not below lower.
    Multi {
        lower: BigInt,
        upper: ValueBound<BigInt>,
    },
}

impl NatValueRange {
    /// The range containing just the given natural number.
    pub fn single(value: BigInt) -> NatValueRange {
        debug_assert!(!value.is_negative());
        NatValueRange::Single(value)
    }

    /// Constructs a range from a natural lower bound and an optional upper bound,
    /// normalizing a degenerate range to Single.
    pub fn multi(lower: BigInt, upper: ValueBound<BigInt>) -> NatValueRange {
        debug_assert!(!lower.is_negative());
        if let ValueBound::Inclusive(u) = &upper {
            debug_assert!(*u >= lower);
            if *u == lower {
                return NatValueRange::Single(lower);
            }
        }
        NatValueRange::Multi { lower, upper }
    }

    /// The range containing every natural number.
    pub fn top() -> NatValueRange {
        NatValueRange::Multi {
            lower: BigInt::zero(),
            upper: ValueBound::Unbounded,
        }
    }

    /// Views this natural range as an integer range.
    pub fn to_range(&self) -> ValueRange<BigInt> {
        match self {
            NatValueRange::Single(v) => ValueRange::Single(v.clone()),
            NatValueRange::Multi { lower, upper } => {
                ValueRange::multi(ValueBound::Inclusive(lower.clone()), upper.clone())
            }
        }
    }

    /// Re-enters the natural range from an integer range, clamping the lower end
    /// at zero. Used on the results of operations that are closed over naturals.
    fn from_range(range: ValueRange<BigInt>) -> NatValueRange {
        match range {
            ValueRange::Single(v) => {
                if v.is_negative() {
                    NatValueRange::Single(BigInt::zero())
                } else {
                    NatValueRange::Single(v)
                }
            }
            ValueRange::Multi { lower, upper } => {
                let lower = match lower {
                    ValueBound::Inclusive(v) if !v.is_negative() => v,
                    _ => BigInt::zero(),
                };
                NatValueRange::multi(lower, upper)
            }
        }
    }

    /// Returns the least natural range containing both self and other. The result
    /// is a singleton iff both sides are the same singleton.
    pub fn join(&self, other: &Self) -> Self {
        Self::from_range(self.to_range().join(&other.to_range()))
    }

    /// Pointwise addition of the two ranges.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_range(self.to_range().add(&other.to_range()))
    }

    /// Multiplies every value of the range by a known natural scalar.
    pub fn scalar_mul(&self, scalar: &BigInt) -> Self {
        debug_assert!(!scalar.is_negative());
        Self::from_range(self.to_range().scalar_mul(scalar))
    }

    /// Multiplies the two ranges.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_range(self.to_range().mul(&other.to_range()))
    }

    /// True if value lies within this range.
    pub fn contains(&self, value: &BigInt) -> bool {
        self.to_range().contains(value)
    }

    /// True if self and other share at least one natural number.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.to_range().overlaps(&other.to_range())
    }

    /// Decides x == y for x in self and y in other, when the ranges determine it.
    pub fn check_eq(&self, other: &Self) -> Option<bool> {
        self.to_range().check_eq(&other.to_range())
    }

    /// Decides x <= y for x in self and y in other, when the ranges determine it.
    pub fn check_le(&self, other: &Self) -> Option<bool> {
        self.to_range().check_le(&other.to_range())
    }
}
