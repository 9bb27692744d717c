//! Conditional field validation for sale writes.
//!
//! The same check runs on create and on update. On update it receives the
//! merged record so the rule of the product that will hold afterwards is the
//! one applied.

use rust_decimal::Decimal;
use serde_json::json;

use super::SaleFields;
use crate::domain::Error;
use crate::domain::catalog::{Catalog, ConditionalField, FranchiseId, ProductId};

/// Inclusive lower bound for `rate`.
pub const RATE_MIN: Decimal = Decimal::ZERO;
/// Inclusive upper bound for `rate`.
pub const RATE_MAX: Decimal = Decimal::ONE_HUNDRED;
/// Decimal places stored for amounts and rates.
pub const MAX_SCALE: u32 = 2;

/// Largest amount representable by the `NUMERIC(18, 2)` column.
fn amount_max() -> Decimal {
    Decimal::new(9_999_999_999_999_999_99, MAX_SCALE)
}

/// Reasons a sale payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaleValidationError {
    /// `productId` does not name a catalog product.
    #[error("product {product_id} does not exist")]
    UnknownProduct {
        /// Offending id.
        product_id: ProductId,
    },
    /// `franchiseId` does not name a catalog franchise.
    #[error("franchise {franchise_id} does not exist")]
    UnknownFranchise {
        /// Offending id.
        franchise_id: FranchiseId,
    },
    /// The product requires a field that was not supplied.
    #[error("{field} is required for {product}")]
    MissingRequiredField {
        /// Missing field.
        field: ConditionalField,
        /// Product name.
        product: String,
    },
    /// The product forbids a field that was supplied.
    #[error("{field} is not allowed for {product}")]
    UnexpectedField {
        /// Forbidden field.
        field: ConditionalField,
        /// Product name.
        product: String,
    },
    /// A numeric field fell outside its allowed range.
    #[error("{field} must be {range}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Human readable range.
        range: &'static str,
    },
    /// A numeric field carried more decimal places than are stored.
    #[error("{field} must have at most {max_scale} decimal places")]
    TooPrecise {
        /// Field name.
        field: &'static str,
        /// Allowed decimal places.
        max_scale: u32,
    },
}

impl SaleValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownProduct { .. } => "productId",
            Self::UnknownFranchise { .. } => "franchiseId",
            Self::MissingRequiredField { field, .. } | Self::UnexpectedField { field, .. } => {
                field.as_str()
            }
            Self::OutOfRange { field, .. } | Self::TooPrecise { field, .. } => *field,
        }
    }

    fn rule(&self) -> &'static str {
        match self {
            Self::UnknownProduct { .. } | Self::UnknownFranchise { .. } => "reference",
            Self::MissingRequiredField { .. } => "required",
            Self::UnexpectedField { .. } => "forbidden",
            Self::OutOfRange { .. } => "range",
            Self::TooPrecise { .. } => "scale",
        }
    }
}

impl From<SaleValidationError> for Error {
    fn from(value: SaleValidationError) -> Self {
        let details = json!({ "field": value.field(), "rule": value.rule() });
        let error = match value {
            SaleValidationError::UnknownProduct { .. }
            | SaleValidationError::UnknownFranchise { .. } => {
                Error::reference_not_found(value.to_string())
            }
            _ => Error::validation(value.to_string()),
        };
        error.with_details(details)
    }
}

fn is_present(fields: &SaleFields, field: ConditionalField) -> bool {
    match field {
        ConditionalField::FranchiseId => fields.franchise_id.is_some(),
        ConditionalField::Rate => fields.rate.is_some(),
    }
}

fn check_scale(field: &'static str, value: Decimal) -> Result<(), SaleValidationError> {
    if value.normalize().scale() > MAX_SCALE {
        return Err(SaleValidationError::TooPrecise {
            field,
            max_scale: MAX_SCALE,
        });
    }
    Ok(())
}

/// Validate the business fields of a sale against the catalog.
///
/// Reference checks run first, then the amount, then the product's field
/// rule, then the rate range.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use salesdesk::domain::{Catalog, FranchiseId, ProductId, SaleFields};
/// use salesdesk::domain::sales::validation::validate_sale_fields;
///
/// let card = SaleFields {
///     product_id: ProductId(3),
///     requested_amount: Decimal::new(500_000, 0),
///     franchise_id: Some(FranchiseId(1)),
///     rate: None,
/// };
/// assert!(validate_sale_fields(&Catalog::seeded(), &card).is_ok());
/// ```
pub fn validate_sale_fields(
    catalog: &Catalog,
    fields: &SaleFields,
) -> Result<(), SaleValidationError> {
    let product = catalog
        .product(fields.product_id)
        .ok_or(SaleValidationError::UnknownProduct {
            product_id: fields.product_id,
        })?;
    if let Some(franchise_id) = fields.franchise_id {
        if catalog.franchise(franchise_id).is_none() {
            return Err(SaleValidationError::UnknownFranchise { franchise_id });
        }
    }

    if fields.requested_amount <= Decimal::ZERO || fields.requested_amount > amount_max() {
        return Err(SaleValidationError::OutOfRange {
            field: "requestedAmount",
            range: "greater than 0 and below 10^16",
        });
    }
    check_scale("requestedAmount", fields.requested_amount)?;

    if let Some(field) = product.rule.required.filter(|f| !is_present(fields, *f)) {
        return Err(SaleValidationError::MissingRequiredField {
            field,
            product: product.name.clone(),
        });
    }
    if let Some(field) = product.rule.forbidden.filter(|f| is_present(fields, *f)) {
        return Err(SaleValidationError::UnexpectedField {
            field,
            product: product.name.clone(),
        });
    }

    if let Some(rate) = fields.rate {
        if !(RATE_MIN..=RATE_MAX).contains(&rate) {
            return Err(SaleValidationError::OutOfRange {
                field: "rate",
                range: "between 0 and 100",
            });
        }
        check_scale("rate", rate)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
