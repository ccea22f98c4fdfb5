// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use num::{BigInt, BigRational, BigUint};
use serde::{Deserialize, Serialize};

use crate::bool_domain::BoolDomain;
use crate::bv_domain::{BvDomain, BvDomainParams};
use crate::interval_domain::ValueRange;
use crate::nat_domain::NatValueRange;
use crate::real_domain::RealAbstractValue;

/// A representative of one of the base sorts the simulator computes over. Sorts
/// index the abstract value family: every operation of the algebra dispatches on a
/// sort to pick the per-sort lattice it works in.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Sort {
    Bool,
    Nat,
    Int,
    Real,
    /// Fixed-width bit-vectors of the given width in bits.
    BitVec(u32),
    Complex,
    /// Arrays indexed by the first sort with elements of the second. The index sort
    /// plays no role in the abstraction, which tracks one abstract element value.
    Array(Box<Sort>, Box<Sort>),
    /// Structs with the given field sorts.
    Struct(Vec<Sort>),
}

/// A set of possible concrete values for a given sort; an element of the
/// sort-specific lattice. The type is generic over the bit-vector domain
/// implementation the surrounding simulator links in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum AbstractValue<B> {
    Bool(BoolDomain),
    Nat(NatValueRange),
    Int(ValueRange<BigInt>),
    Real(RealAbstractValue),
    BitVec(B),
    /// Real and imaginary parts, abstracted independently.
    Complex(RealAbstractValue, RealAbstractValue),
    /// The abstraction of every element of the array.
    Array(Box<AbstractValue<B>>),
    /// One abstraction per field.
    Struct(Vec<AbstractValue<B>>),
}

/// A concrete value for a given sort. Arrays carry no concrete payload at this
/// layer; the simulator represents them through the memory model instead.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConcreteValue {
    Bool(bool),
    Nat(BigInt),
    Int(BigInt),
    Real(BigRational),
    BitVec(BigUint),
    Complex(BigRational, BigRational),
    Unit,
    Struct(Vec<ConcreteValue>),
}

impl Sort {
    /// The greatest abstract value of this sort: the one denoting every concrete
    /// value the sort has.
    pub fn top<B: BvDomain>(&self) -> AbstractValue<B> {
        match self {
            Sort::Bool => AbstractValue::Bool(BoolDomain::Top),
            Sort::Nat => AbstractValue::Nat(NatValueRange::top()),
            Sort::Int => AbstractValue::Int(ValueRange::unbounded()),
            Sort::Real => AbstractValue::Real(RealAbstractValue::top()),
            Sort::BitVec(width) => AbstractValue::BitVec(B::any(*width)),
            Sort::Complex => {
                AbstractValue::Complex(RealAbstractValue::top(), RealAbstractValue::top())
            }
            Sort::Array(_, elem) => AbstractValue::Array(Box::new(elem.top())),
            Sort::Struct(fields) => {
                AbstractValue::Struct(fields.iter().map(Sort::top).collect())
            }
        }
    }

    /// The least abstract value of this sort containing the given concrete value.
    pub fn single<B: BvDomain>(&self, value: &ConcreteValue) -> AbstractValue<B> {
        match (self, value) {
            (Sort::Bool, ConcreteValue::Bool(b)) => AbstractValue::Bool((*b).into()),
            (Sort::Nat, ConcreteValue::Nat(n)) => {
                AbstractValue::Nat(NatValueRange::single(n.clone()))
            }
            (Sort::Int, ConcreteValue::Int(i)) => {
                AbstractValue::Int(ValueRange::Single(i.clone()))
            }
            (Sort::Real, ConcreteValue::Real(q)) => {
                AbstractValue::Real(RealAbstractValue::single(q.clone()))
            }
            (Sort::BitVec(width), ConcreteValue::BitVec(v)) => {
                AbstractValue::BitVec(B::singleton(*width, v.clone()))
            }
            (Sort::Complex, ConcreteValue::Complex(re, im)) => AbstractValue::Complex(
                RealAbstractValue::single(re.clone()),
                RealAbstractValue::single(im.clone()),
            ),
            // There is no concrete array payload to narrow with, so the element
            // stays unconstrained.
            (Sort::Array(_, elem), ConcreteValue::Unit) => {
                AbstractValue::Array(Box::new(elem.top()))
            }
            (Sort::Struct(fields), ConcreteValue::Struct(values)) => {
                debug_assert_eq!(fields.len(), values.len());
                AbstractValue::Struct(
                    fields
                        .iter()
                        .zip(values.iter())
                        .map(|(sort, value)| sort.single(value))
                        .collect(),
                )
            }
            _ => unreachable!("concrete value {:?} does not have sort {:?}", value, self),
        }
    }

    /// The least upper bound of x and y in the lattice of this sort.
    pub fn join<B: BvDomain>(
        &self,
        params: &BvDomainParams,
        x: &AbstractValue<B>,
        y: &AbstractValue<B>,
    ) -> AbstractValue<B> {
        match (self, x, y) {
            (Sort::Bool, AbstractValue::Bool(a), AbstractValue::Bool(b)) => {
                AbstractValue::Bool(a.join(*b))
            }
            (Sort::Nat, AbstractValue::Nat(a), AbstractValue::Nat(b)) => {
                AbstractValue::Nat(a.join(b))
            }
            (Sort::Int, AbstractValue::Int(a), AbstractValue::Int(b)) => {
                AbstractValue::Int(a.join(b))
            }
            (Sort::Real, AbstractValue::Real(a), AbstractValue::Real(b)) => {
                AbstractValue::Real(a.join(b))
            }
            (Sort::BitVec(width), AbstractValue::BitVec(a), AbstractValue::BitVec(b)) => {
                AbstractValue::BitVec(B::union(params, *width, a, b))
            }
            (
                Sort::Complex,
                AbstractValue::Complex(xre, xim),
                AbstractValue::Complex(yre, yim),
            ) => AbstractValue::Complex(xre.join(yre), xim.join(yim)),
            (Sort::Array(_, elem), AbstractValue::Array(a), AbstractValue::Array(b)) => {
                AbstractValue::Array(Box::new(elem.join(params, a, b)))
            }
            (Sort::Struct(fields), AbstractValue::Struct(a), AbstractValue::Struct(b)) => {
                debug_assert_eq!(fields.len(), a.len());
                debug_assert_eq!(fields.len(), b.len());
                AbstractValue::Struct(
                    fields
                        .iter()
                        .zip(a.iter().zip(b.iter()))
                        .map(|(sort, (av, bv))| sort.join(params, av, bv))
                        .collect(),
                )
            }
            _ => unreachable!("abstract values {:?} and {:?} do not have sort {:?}", x, y, self),
        }
    }

    /// True if x and y could describe the same concrete value of this sort.
    pub fn overlap<B: BvDomain>(&self, x: &AbstractValue<B>, y: &AbstractValue<B>) -> bool {
        match (self, x, y) {
            (Sort::Bool, AbstractValue::Bool(a), AbstractValue::Bool(b)) => a.overlaps(*b),
            (Sort::Nat, AbstractValue::Nat(a), AbstractValue::Nat(b)) => a.overlaps(b),
            (Sort::Int, AbstractValue::Int(a), AbstractValue::Int(b)) => a.overlaps(b),
            (Sort::Real, AbstractValue::Real(a), AbstractValue::Real(b)) => a.overlaps(b),
            (Sort::BitVec(_), AbstractValue::BitVec(a), AbstractValue::BitVec(b)) => {
                B::domains_overlap(a, b)
            }
            (
                Sort::Complex,
                AbstractValue::Complex(xre, xim),
                AbstractValue::Complex(yre, yim),
            ) => xre.overlaps(yre) && xim.overlaps(yim),
            (Sort::Array(_, elem), AbstractValue::Array(a), AbstractValue::Array(b)) => {
                elem.overlap(a, b)
            }
            (Sort::Struct(fields), AbstractValue::Struct(a), AbstractValue::Struct(b)) => fields
                .iter()
                .zip(a.iter().zip(b.iter()))
                .all(|(sort, (av, bv))| sort.overlap(av, bv)),
            _ => unreachable!("abstract values {:?} and {:?} do not have sort {:?}", x, y, self),
        }
    }

    /// True if the given abstract value admits the given concrete value. Equivalent
    /// to overlapping with the singleton abstraction of the value; the Boolean case
    /// is decided directly since Top admits everything.
    pub fn contains<B: BvDomain>(
        &self,
        value: &ConcreteValue,
        abstract_value: &AbstractValue<B>,
    ) -> bool {
        if let (Sort::Bool, AbstractValue::Bool(b)) = (self, abstract_value) {
            return match value {
                ConcreteValue::Bool(v) => *b == BoolDomain::Top || *b == BoolDomain::from(*v),
                _ => unreachable!("concrete value {:?} does not have sort {:?}", value, self),
            };
        }
        self.overlap(&self.single(value), abstract_value)
    }
}
