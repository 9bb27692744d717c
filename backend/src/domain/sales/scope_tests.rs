//! Coverage for the role-scoped predicate and date parsing.

use rstest::rstest;
use rust_decimal_macros::dec;

use super::*;
use crate::domain::sales::fixtures::{at, card_fields, credit_fields, view};
use crate::domain::test_support::{admin_user, advisor_user};
use crate::domain::{ErrorCode, Role};

#[test]
fn advisor_is_pinned_to_own_sales_even_when_asking_for_others() {
    let advisor = advisor_user("Ana");
    let caller = Caller::new(advisor.id, Role::Advisor);
    let filter = SaleFilter {
        creator_user_id: Some(UserId::random()),
        ..SaleFilter::default()
    };
    let scoped = ScopedSaleFilter::for_caller(&caller, filter).expect("valid filter");
    assert_eq!(scoped.creator_user_id(), Some(&advisor.id));
}

#[test]
fn admin_is_unconstrained_unless_narrowing() {
    let admin = admin_user("Root");
    let caller = Caller::new(admin.id, Role::Admin);
    let open = ScopedSaleFilter::for_caller(&caller, SaleFilter::default()).expect("valid");
    assert_eq!(open.creator_user_id(), None);

    let target = UserId::random();
    let narrowed = ScopedSaleFilter::for_caller(
        &caller,
        SaleFilter {
            creator_user_id: Some(target),
            ..SaleFilter::default()
        },
    )
    .expect("valid");
    assert_eq!(narrowed.creator_user_id(), Some(&target));
}

#[test]
fn inverted_date_range_is_a_validation_failure() {
    let caller = Caller::new(UserId::random(), Role::Admin);
    let filter = SaleFilter {
        created_from: Some(at(2024, 3, 2, 0)),
        created_to: Some(at(2024, 3, 1, 0)),
        ..SaleFilter::default()
    };
    let err = ScopedSaleFilter::for_caller(&caller, filter).expect_err("inverted range");
    assert_eq!(err.code(), ErrorCode::ValidationFailure);
}

#[test]
fn filters_are_anded_with_ownership() {
    let ana = advisor_user("Ana");
    let ben = advisor_user("Ben");
    let caller = Caller::new(ana.id, Role::Advisor);
    let filter = SaleFilter {
        product_id: Some(ProductId(3)),
        status: Some(SaleStatus::Open),
        created_from: Some(at(2024, 1, 1, 0)),
        created_to: Some(at(2024, 1, 31, 0)),
        ..SaleFilter::default()
    };
    let scoped = ScopedSaleFilter::for_caller(&caller, filter).expect("valid");

    let hit = view(card_fields(dec!(10)), SaleStatus::Open, &ana, at(2024, 1, 10, 9));
    assert!(scoped.matches(&hit));

    let other_owner = view(card_fields(dec!(10)), SaleStatus::Open, &ben, at(2024, 1, 10, 9));
    let other_product = view(
        credit_fields(dec!(10), dec!(5)),
        SaleStatus::Open,
        &ana,
        at(2024, 1, 10, 9),
    );
    let other_status = view(
        card_fields(dec!(10)),
        SaleStatus::Finished,
        &ana,
        at(2024, 1, 10, 9),
    );
    let too_late = view(card_fields(dec!(10)), SaleStatus::Open, &ana, at(2024, 2, 1, 9));
    for miss in [other_owner, other_product, other_status, too_late] {
        assert!(!scoped.matches(&miss));
    }
}

#[test]
fn bounds_are_inclusive() {
    let ana = advisor_user("Ana");
    let caller = Caller::new(ana.id, Role::Advisor);
    let instant = at(2024, 5, 5, 12);
    let filter = SaleFilter {
        created_from: Some(instant),
        created_to: Some(instant),
        ..SaleFilter::default()
    };
    let scoped = ScopedSaleFilter::for_caller(&caller, filter).expect("valid");
    assert!(scoped.matches(&view(card_fields(dec!(1)), SaleStatus::Open, &ana, instant)));
}

#[rstest]
#[case("2024-03-01", BoundSide::Start, "2024-03-01T00:00:00+00:00")]
#[case("2024-03-01", BoundSide::End, "2024-03-01T23:59:59.999999+00:00")]
#[case("2024-03-01T10:15:00Z", BoundSide::End, "2024-03-01T10:15:00+00:00")]
#[case("2024-03-01T10:15:00+02:00", BoundSide::Start, "2024-03-01T08:15:00+00:00")]
fn parses_dates_and_timestamps(
    #[case] raw: &str,
    #[case] side: BoundSide,
    #[case] expected: &str,
) {
    let parsed = parse_date_bound(raw, side).expect("valid bound");
    assert_eq!(parsed.to_rfc3339(), expected);
}

#[rstest]
#[case("yesterday")]
#[case("2024-13-01")]
#[case("01/03/2024")]
fn rejects_unparseable_dates(#[case] raw: &str) {
    assert!(parse_date_bound(raw, BoundSide::Start).is_err());
}
