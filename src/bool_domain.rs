// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use log_derive::logfn_inputs;
use serde::{Deserialize, Serialize};

/// A standard set-based abstraction for Booleans. `False` and `True` represent the
/// singleton sets {false} and {true}, respectively, and `Top` represents {false, true}.
/// This domain doubles as the tri-state used elsewhere in the value domains, for
/// example to track whether a real value is known to be an integer.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
pub enum BoolDomain {
    False,
    True,
    Top,
}

impl From<bool> for BoolDomain {
    #[logfn_inputs(TRACE)]
    fn from(b: bool) -> BoolDomain {
        if b {
            BoolDomain::True
        } else {
            BoolDomain::False
        }
    }
}

impl BoolDomain {
    /// Returns an element that is "self && other".
    /// False short-circuits, True passes the other operand through.
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (BoolDomain::False, _) | (_, BoolDomain::False) => BoolDomain::False,
            (BoolDomain::True, other) => other,
            (this, BoolDomain::True) => this,
            _ => BoolDomain::Top,
        }
    }

    /// Returns Some(true) for True, Some(false) for False and None for Top.
    pub fn as_bool_if_known(self) -> Option<bool> {
        match self {
            BoolDomain::True => Some(true),
            BoolDomain::False => Some(false),
            BoolDomain::Top => None,
        }
    }

    /// Returns the least upper bound of self and other.
    pub fn join(self, other: Self) -> Self {
        if self == other {
            self
        } else {
            BoolDomain::Top
        }
    }

    /// Returns an element that is "!self".
    pub fn negate(self) -> Self {
        match self {
            BoolDomain::False => BoolDomain::True,
            BoolDomain::True => BoolDomain::False,
            BoolDomain::Top => BoolDomain::Top,
        }
    }

    /// Returns an element that is "self || other".
    /// True short-circuits, False passes the other operand through.
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (BoolDomain::True, _) | (_, BoolDomain::True) => BoolDomain::True,
            (BoolDomain::False, other) => other,
            (this, BoolDomain::False) => this,
            _ => BoolDomain::Top,
        }
    }

    /// True if the sets denoted by self and other share at least one concrete value.
    pub fn overlaps(self, other: Self) -> bool {
        self == BoolDomain::Top || other == BoolDomain::Top || self == other
    }
}
