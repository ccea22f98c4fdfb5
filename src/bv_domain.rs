// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Debug;

use num::{BigUint, One};
use serde::{Deserialize, Serialize};

/// Tuning parameters threaded through bit-vector domain operations. The domain
/// implementation decides how to interpret them; this crate only carries them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BvDomainParams {
    /// Upper limit on the number of distinct ranges or values an implementation
    /// tracks before widening.
    pub range_size_limit: usize,
}

impl Default for BvDomainParams {
    fn default() -> BvDomainParams {
        BvDomainParams {
            range_size_limit: 16,
        }
    }
}

/// The functionality that a fixed-width bit-vector domain must expose in order for
/// the abstract value algebra to use it. The domain itself lives downstream; the
/// algebra treats its elements as opaque.
pub trait BvDomain: Clone + Debug + PartialEq {
    /// The domain element containing every value of the given width.
    fn any(width: u32) -> Self;

    /// The domain element containing just the given value, truncated to the width.
    fn singleton(width: u32, value: BigUint) -> Self;

    /// An upper bound of a and b in the domain's lattice.
    fn union(params: &BvDomainParams, width: u32, a: &Self, b: &Self) -> Self;

    /// True if a and b share at least one concrete bit-vector value.
    fn domains_overlap(a: &Self, b: &Self) -> bool;
}

/// A dummy implementation of BvDomain to use in configurations where a real
/// bit-vector domain is not available or required. It tracks only exact values,
/// widening to the full width on any disagreement.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum StubDomain {
    /// Every value of the given width.
    Any { width: u32 },
    /// Exactly one value of the given width.
    Singleton { width: u32, value: BigUint },
}

impl BvDomain for StubDomain {
    fn any(width: u32) -> StubDomain {
        StubDomain::Any { width }
    }

    fn singleton(width: u32, value: BigUint) -> StubDomain {
        let value = value % (BigUint::one() << width as usize);
        StubDomain::Singleton { width, value }
    }

    fn union(_params: &BvDomainParams, width: u32, a: &StubDomain, b: &StubDomain) -> StubDomain {
        if a == b {
            a.clone()
        } else {
            StubDomain::Any { width }
        }
    }

    fn domains_overlap(a: &StubDomain, b: &StubDomain) -> bool {
        match (a, b) {
            (StubDomain::Any { .. }, _) | (_, StubDomain::Any { .. }) => true,
            (StubDomain::Singleton { value: x, .. }, StubDomain::Singleton { value: y, .. }) => {
                x == y
            }
        }
    }
}
