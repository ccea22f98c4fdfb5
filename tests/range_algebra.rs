// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use num::{BigInt, BigRational};

use mirage::bool_domain::BoolDomain;
use mirage::interval_domain::{ValueBound, ValueRange};
use mirage::nat_domain::NatValueRange;
use mirage::real_domain::{range_is_integer, RealAbstractValue};

fn int(n: i64) -> BigInt {
    BigInt::from(n)
}

fn single(n: i64) -> ValueRange<BigInt> {
    ValueRange::Single(int(n))
}

fn range(lo: i64, hi: i64) -> ValueRange<BigInt> {
    ValueRange::concrete(int(lo), int(hi))
}

fn rat(numer: i64, denom: i64) -> BigRational {
    BigRational::new(int(numer), int(denom))
}

/// All ranges with small bounds, plus half-open and fully unbounded ones.
fn sample_ranges() -> Vec<ValueRange<BigInt>> {
    let mut samples = Vec::new();
    for lo in -2..=2i64 {
        for hi in lo..=2i64 {
            samples.push(range(lo, hi));
        }
        samples.push(ValueRange::multi(
            ValueBound::Inclusive(int(lo)),
            ValueBound::Unbounded,
        ));
        samples.push(ValueRange::multi(
            ValueBound::Unbounded,
            ValueBound::Inclusive(int(lo)),
        ));
    }
    samples.push(ValueRange::unbounded());
    samples
}

/// The members of a sample range that fall in [-2, 2], enough to witness
/// soundness of the transfer functions.
fn small_members(r: &ValueRange<BigInt>) -> Vec<BigInt> {
    (-2..=2i64).map(int).filter(|v| r.contains(v)).collect()
}

#[test]
fn multi_constructor_normalizes_degenerate_ranges() {
    assert_eq!(
        ValueRange::multi(ValueBound::Inclusive(int(7)), ValueBound::Inclusive(int(7))),
        single(7)
    );
    assert_eq!(range(7, 7), single(7));
}

#[test]
fn join_of_equal_singletons_is_a_singleton() {
    assert_eq!(single(3).join(&single(3)), single(3));
}

#[test]
fn join_widens_to_the_enclosing_range() {
    assert_eq!(single(1).join(&single(4)), range(1, 4));
    assert_eq!(range(0, 2).join(&range(5, 9)), range(0, 9));
    assert_eq!(
        range(0, 2).join(&ValueRange::unbounded()),
        ValueRange::unbounded()
    );
}

#[test]
fn join_is_idempotent_and_commutative_and_sound() {
    for r in sample_ranges() {
        assert_eq!(r.join(&r), r);
        for s in sample_ranges() {
            assert_eq!(r.join(&s), s.join(&r));
            for v in small_members(&r) {
                assert!(r.join(&s).contains(&v));
            }
        }
    }
}

#[test]
fn add_shifts_bounds_pointwise() {
    assert_eq!(single(2).add(&single(3)), single(5));
    assert_eq!(range(1, 2).add(&single(5)), range(6, 7));
    assert_eq!(range(1, 2).add(&range(10, 20)), range(11, 22));
    let nonneg = ValueRange::multi(ValueBound::Inclusive(int(0)), ValueBound::Unbounded);
    assert_eq!(
        nonneg.add(&range(1, 2)),
        ValueRange::multi(ValueBound::Inclusive(int(1)), ValueBound::Unbounded)
    );
}

#[test]
fn add_and_mul_are_commutative_and_sound() {
    for r in sample_ranges() {
        for s in sample_ranges() {
            assert_eq!(r.add(&s), s.add(&r));
            assert_eq!(r.mul(&s), s.mul(&r));
            for x in small_members(&r) {
                for y in small_members(&s) {
                    assert!(r.add(&s).contains(&(&x + &y)));
                    assert!(r.mul(&s).contains(&(&x * &y)));
                }
            }
        }
    }
}

#[test]
fn neg_flips_the_range() {
    assert_eq!(range(1, 4).neg(), range(-4, -1));
    assert_eq!(
        ValueRange::multi(ValueBound::Inclusive(int(0)), ValueBound::Unbounded).neg(),
        ValueRange::multi(ValueBound::Unbounded, ValueBound::Inclusive(int(0)))
    );
}

#[test]
fn sub_is_add_of_the_negation() {
    assert_eq!(range(5, 9).sub(&range(1, 2)), range(3, 8));
    assert_eq!(single(3).sub(&single(10)), single(-7));
}

#[test]
fn scalar_mul_by_zero_collapses_even_unbounded_ranges() {
    assert_eq!(ValueRange::unbounded().scalar_mul(&int(0)), single(0));
}

#[test]
fn scalar_mul_flips_bounds_for_negative_scalars() {
    assert_eq!(range(1, 2).scalar_mul(&int(3)), range(3, 6));
    assert_eq!(range(1, 2).scalar_mul(&int(-3)), range(-6, -3));
    assert_eq!(
        ValueRange::multi(ValueBound::Inclusive(int(1)), ValueBound::Unbounded)
            .scalar_mul(&int(-2)),
        ValueRange::multi(ValueBound::Unbounded, ValueBound::Inclusive(int(-2)))
    );
}

#[test]
fn mul_of_ranges_straddling_zero() {
    assert_eq!(range(-2, 3).mul(&range(-4, 5)), range(-12, 15));
}

#[test]
fn mul_sign_cases() {
    assert_eq!(range(-3, -2).mul(&range(-5, -4)), range(8, 15));
    assert_eq!(range(-3, -2).mul(&range(4, 5)), range(-15, -8));
    assert_eq!(range(2, 3).mul(&range(-5, -4)), range(-15, -8));
    assert_eq!(range(2, 3).mul(&range(4, 5)), range(8, 15));
    assert_eq!(range(-3, -2).mul(&range(-4, 5)), range(-15, 12));
    assert_eq!(range(2, 3).mul(&range(-4, 5)), range(-12, 15));
}

#[test]
fn mul_with_unbounded_operands() {
    let below_minus_one = ValueRange::multi(ValueBound::Unbounded, ValueBound::Inclusive(int(-1)));
    assert_eq!(
        below_minus_one.mul(&range(2, 3)),
        ValueRange::multi(ValueBound::Unbounded, ValueBound::Inclusive(int(-2)))
    );
    assert_eq!(
        ValueRange::unbounded().mul(&range(2, 3)),
        ValueRange::unbounded()
    );
}

#[test]
fn contains_respects_bounds() {
    assert!(range(1, 3).contains(&int(2)));
    assert!(!range(1, 3).contains(&int(4)));
    assert!(ValueRange::unbounded().contains(&int(1_000_000)));
}

#[test]
fn overlap_requires_a_shared_value() {
    assert!(range(1, 3).overlaps(&range(3, 5)));
    assert!(!range(1, 3).overlaps(&range(4, 5)));
    let nonneg = ValueRange::multi(ValueBound::Inclusive(int(0)), ValueBound::Unbounded);
    assert!(nonneg.overlaps(&range(100, 200)));
}

#[test]
fn check_eq_decides_only_what_the_ranges_determine() {
    assert_eq!(single(4).check_eq(&single(4)), Some(true));
    assert_eq!(single(4).check_eq(&single(5)), Some(false));
    assert_eq!(range(0, 3).check_eq(&range(7, 9)), Some(false));
    assert_eq!(range(0, 3).check_eq(&range(2, 9)), None);
}

#[test]
fn check_le_and_check_lt() {
    assert_eq!(range(0, 3).check_le(&range(3, 9)), Some(true));
    assert_eq!(range(4, 6).check_le(&range(0, 3)), Some(false));
    assert_eq!(range(0, 5).check_le(&range(3, 9)), None);
    assert_eq!(range(0, 3).check_lt(&range(3, 9)), None);
    assert_eq!(range(0, 2).check_lt(&range(3, 9)), Some(true));
    assert_eq!(range(3, 6).check_lt(&range(0, 3)), Some(false));
}

#[test]
fn nat_join_collapses_only_equal_singletons() {
    let three = NatValueRange::single(int(3));
    assert_eq!(three.join(&three), NatValueRange::single(int(3)));
    assert_eq!(
        NatValueRange::single(int(0)).join(&NatValueRange::single(int(5))),
        NatValueRange::multi(int(0), ValueBound::Inclusive(int(5)))
    );
}

#[test]
fn nat_arithmetic_mirrors_integer_ranges() {
    let a = NatValueRange::multi(int(1), ValueBound::Inclusive(int(2)));
    let b = NatValueRange::multi(int(10), ValueBound::Unbounded);
    assert_eq!(
        a.add(&b),
        NatValueRange::multi(int(11), ValueBound::Unbounded)
    );
    assert_eq!(
        a.mul(&NatValueRange::multi(int(3), ValueBound::Inclusive(int(4)))),
        NatValueRange::multi(int(3), ValueBound::Inclusive(int(8)))
    );
    assert_eq!(
        a.scalar_mul(&int(0)),
        NatValueRange::single(int(0))
    );
}

#[test]
fn nat_top_contains_everything() {
    assert!(NatValueRange::top().contains(&int(0)));
    assert!(NatValueRange::top().contains(&int(1_000_000)));
    assert_eq!(
        NatValueRange::top().check_le(&NatValueRange::single(int(3))),
        None
    );
}

#[test]
fn bool_and_or_tables() {
    use BoolDomain::*;
    assert_eq!(False.and(Top), False);
    assert_eq!(Top.and(False), False);
    assert_eq!(True.and(Top), Top);
    assert_eq!(True.and(True), True);
    assert_eq!(Top.and(Top), Top);
    assert_eq!(True.or(Top), True);
    assert_eq!(Top.or(True), True);
    assert_eq!(False.or(Top), Top);
    assert_eq!(False.or(False), False);
}

#[test]
fn bool_negate_join_and_queries() {
    use BoolDomain::*;
    assert_eq!(True.negate(), False);
    assert_eq!(Top.negate(), Top);
    assert_eq!(True.join(True), True);
    assert_eq!(True.join(False), Top);
    assert_eq!(Top.as_bool_if_known(), None);
    assert_eq!(False.as_bool_if_known(), Some(false));
    assert!(Top.overlaps(False));
    assert!(!True.overlaps(False));
}

#[test]
fn rav_single_integrality_matches_the_rational() {
    assert_eq!(
        RealAbstractValue::single(rat(4, 2)).is_integer,
        BoolDomain::True
    );
    assert_eq!(
        RealAbstractValue::single(rat(1, 2)).is_integer,
        BoolDomain::False
    );
}

#[test]
fn rav_add_recovers_integrality_from_the_sum() {
    let half = RealAbstractValue::single(rat(1, 2));
    let sum = half.add(&half);
    assert_eq!(sum.range, ValueRange::Single(rat(1, 1)));
    assert_eq!(sum.is_integer, BoolDomain::True);
}

#[test]
fn rav_mul_of_two_halves_is_not_an_integer() {
    let half = RealAbstractValue::single(rat(1, 2));
    let product = half.mul(&half);
    assert_eq!(product.range, ValueRange::Single(rat(1, 4)));
    assert_eq!(product.is_integer, BoolDomain::False);
}

#[test]
fn rav_mul_propagates_integrality_through_ranges() {
    let three = RealAbstractValue::single(rat(3, 1));
    let one_to_two = RealAbstractValue::concrete_range(rat(1, 1), rat(2, 1));
    assert_eq!(one_to_two.is_integer, BoolDomain::True);
    assert_eq!(three.mul(&one_to_two).is_integer, BoolDomain::True);
}

#[test]
fn rav_scalar_mul_integrality() {
    let one_to_two = RealAbstractValue::concrete_range(rat(1, 1), rat(2, 1));
    assert_eq!(one_to_two.scalar_mul(&rat(5, 1)).is_integer, BoolDomain::True);
    assert_eq!(one_to_two.scalar_mul(&rat(1, 2)).is_integer, BoolDomain::Top);
}

#[test]
fn rav_join_meets_integrality() {
    let a = RealAbstractValue::single(rat(1, 1));
    let b = RealAbstractValue::single(rat(2, 1));
    let c = RealAbstractValue::single(rat(1, 2));
    assert_eq!(a.join(&b).is_integer, BoolDomain::True);
    assert_eq!(a.join(&c).is_integer, BoolDomain::Top);
}

#[test]
fn rav_neg_preserves_integrality_and_flips_the_range() {
    let one_to_two = RealAbstractValue::concrete_range(rat(1, 1), rat(2, 1));
    let negated = one_to_two.neg();
    assert_eq!(negated.range, ValueRange::concrete(rat(-2, 1), rat(-1, 1)));
    assert_eq!(negated.is_integer, BoolDomain::True);
}

#[test]
fn range_is_integer_classifies_narrow_ranges() {
    // Fits strictly between two consecutive integers and touches neither.
    let narrow = ValueRange::concrete(rat(1, 3), rat(2, 3));
    assert_eq!(range_is_integer(&narrow), BoolDomain::False);
    // Spans an integer.
    let wide = ValueRange::concrete(rat(1, 3), rat(3, 2));
    assert_eq!(range_is_integer(&wide), BoolDomain::Top);
    // Integral endpoint means the range may denote that integer.
    let touching = ValueRange::concrete(rat(1, 1), rat(3, 2));
    assert_eq!(range_is_integer(&touching), BoolDomain::Top);
    assert_eq!(range_is_integer(&ValueRange::unbounded()), BoolDomain::Top);
}

#[test]
fn rav_contains_and_overlap_use_the_range() {
    let one_to_two = RealAbstractValue::concrete_range(rat(1, 1), rat(2, 1));
    assert!(one_to_two.contains(&rat(3, 2)));
    assert!(!one_to_two.contains(&rat(5, 2)));
    assert!(one_to_two.overlaps(&RealAbstractValue::single(rat(2, 1))));
    assert!(!one_to_two.overlaps(&RealAbstractValue::single(rat(5, 2))));
}
