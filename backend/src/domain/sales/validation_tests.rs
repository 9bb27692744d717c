//! Rule table coverage for sale field validation.

use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::domain::ErrorCode;

const CONSUMER: ProductId = ProductId(1);
const PAYROLL: ProductId = ProductId(2);
const CARD: ProductId = ProductId(3);
const VISA: FranchiseId = FranchiseId(2);

#[fixture]
fn catalog() -> Catalog {
    Catalog::seeded()
}

fn fields(
    product_id: ProductId,
    franchise_id: Option<FranchiseId>,
    rate: Option<Decimal>,
) -> SaleFields {
    SaleFields {
        product_id,
        requested_amount: dec!(1000000),
        franchise_id,
        rate,
    }
}

#[rstest]
#[case(fields(CARD, Some(VISA), None))]
#[case(fields(CONSUMER, None, Some(dec!(12.5))))]
#[case(fields(PAYROLL, None, Some(dec!(0))))]
#[case(fields(PAYROLL, None, Some(dec!(100))))]
#[case(fields(CONSUMER, None, Some(dec!(100.00))))]
fn accepts_valid_combinations(catalog: Catalog, #[case] input: SaleFields) {
    assert_eq!(validate_sale_fields(&catalog, &input), Ok(()));
}

#[rstest]
fn card_requires_franchise(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(CARD, None, None)).expect_err("missing");
    assert!(matches!(
        err,
        SaleValidationError::MissingRequiredField {
            field: ConditionalField::FranchiseId,
            ..
        }
    ));
}

#[rstest]
fn card_forbids_rate(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(CARD, Some(VISA), Some(dec!(1))))
        .expect_err("rate forbidden");
    assert!(matches!(
        err,
        SaleValidationError::UnexpectedField {
            field: ConditionalField::Rate,
            ..
        }
    ));
}

#[rstest]
#[case(CONSUMER)]
#[case(PAYROLL)]
fn rate_products_require_rate(catalog: Catalog, #[case] product: ProductId) {
    let err = validate_sale_fields(&catalog, &fields(product, None, None)).expect_err("missing");
    assert_eq!(err.field(), "rate");
    assert!(matches!(err, SaleValidationError::MissingRequiredField { .. }));
}

#[rstest]
#[case(CONSUMER)]
#[case(PAYROLL)]
fn rate_products_forbid_franchise(catalog: Catalog, #[case] product: ProductId) {
    let err = validate_sale_fields(&catalog, &fields(product, Some(VISA), Some(dec!(10))))
        .expect_err("franchise forbidden");
    assert_eq!(err.field(), "franchiseId");
    assert!(matches!(err, SaleValidationError::UnexpectedField { .. }));
}

#[rstest]
#[case(dec!(100.01))]
#[case(dec!(-0.01))]
#[case(dec!(250))]
fn rate_outside_bounds_is_rejected(catalog: Catalog, #[case] rate: Decimal) {
    let err = validate_sale_fields(&catalog, &fields(CONSUMER, None, Some(rate)))
        .expect_err("out of range");
    assert!(matches!(
        err,
        SaleValidationError::OutOfRange { field: "rate", .. }
    ));
}

#[rstest]
#[case(dec!(0))]
#[case(dec!(-5))]
fn non_positive_amounts_are_rejected(catalog: Catalog, #[case] amount: Decimal) {
    let mut input = fields(CARD, Some(VISA), None);
    input.requested_amount = amount;
    let err = validate_sale_fields(&catalog, &input).expect_err("amount must be positive");
    assert_eq!(err.field(), "requestedAmount");
}

#[rstest]
fn rates_with_three_decimals_are_rejected(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(PAYROLL, None, Some(dec!(12.345))))
        .expect_err("too precise");
    assert!(matches!(err, SaleValidationError::TooPrecise { .. }));
}

#[rstest]
fn unknown_product_is_a_reference_error(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(ProductId(9), None, None))
        .expect_err("unknown product");
    assert_eq!(Error::from(err).code(), ErrorCode::ReferenceNotFound);
}

#[rstest]
fn unknown_franchise_is_a_reference_error(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(CARD, Some(FranchiseId(42)), None))
        .expect_err("unknown franchise");
    assert_eq!(Error::from(err).code(), ErrorCode::ReferenceNotFound);
}

#[rstest]
fn rule_violations_map_to_validation_failures(catalog: Catalog) {
    let err = validate_sale_fields(&catalog, &fields(CARD, None, None)).expect_err("missing");
    let error = Error::from(err);
    assert_eq!(error.code(), ErrorCode::ValidationFailure);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&serde_json::json!("franchiseId"))
    );
}

#[rstest]
fn a_fourth_product_is_a_data_change(mut catalog: Catalog) {
    catalog.products.push(crate::domain::Product {
        id: ProductId(4),
        name: "Mortgage".to_owned(),
        rule: crate::domain::FieldRule {
            required: Some(ConditionalField::Rate),
            forbidden: None,
        },
    });
    let input = fields(ProductId(4), Some(VISA), Some(dec!(9)));
    assert_eq!(validate_sale_fields(&catalog, &input), Ok(()));
}
