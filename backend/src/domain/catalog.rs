//! Reference data: products, franchises and the conditional field rules.
//!
//! Which optional sale fields a product requires or forbids is carried as
//! data on the product row, so adding a product type is a data change.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::Role;

/// Identifier of a financial product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProductId(pub i32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a card franchise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct FranchiseId(pub i32);

impl fmt::Display for FranchiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Optional sale fields governed by product rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConditionalField {
    /// `franchiseId`
    FranchiseId,
    /// `rate`
    Rate,
}

impl ConditionalField {
    /// Field name as it appears in request payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FranchiseId => "franchiseId",
            Self::Rate => "rate",
        }
    }

    /// Parse the stored column value.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "franchiseId" => Some(Self::FranchiseId),
            "rate" => Some(Self::Rate),
            _ => None,
        }
    }
}

impl fmt::Display for ConditionalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field requirements attached to a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    /// Field that must be present.
    pub required: Option<ConditionalField>,
    /// Field that must be absent.
    pub forbidden: Option<ConditionalField>,
}

impl FieldRule {
    /// Rule with one required and one forbidden field.
    #[must_use]
    pub const fn new(required: ConditionalField, forbidden: ConditionalField) -> Self {
        Self {
            required: Some(required),
            forbidden: Some(forbidden),
        }
    }
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier.
    #[schema(value_type = i32, example = 3)]
    pub id: ProductId,
    /// Display name.
    #[schema(example = "Credit Card")]
    pub name: String,
    /// Conditional field rule.
    #[serde(flatten)]
    pub rule: FieldRule,
}

/// A card franchise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    /// Identifier.
    #[schema(value_type = i32, example = 2)]
    pub id: FranchiseId,
    /// Display name.
    #[schema(example = "VISA")]
    pub name: String,
}

/// Role row as exposed by the roles listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleRecord {
    /// Identifier.
    pub id: i32,
    /// Display name.
    pub name: String,
}

impl From<Role> for RoleRecord {
    fn from(role: Role) -> Self {
        Self {
            id: role.id(),
            name: role.name().to_owned(),
        }
    }
}

/// Snapshot of every reference table, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Products.
    pub products: Vec<Product>,
    /// Franchises.
    pub franchises: Vec<Franchise>,
    /// Roles.
    pub roles: Vec<RoleRecord>,
}

impl Catalog {
    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Look up a franchise by id.
    #[must_use]
    pub fn franchise(&self, id: FranchiseId) -> Option<&Franchise> {
        self.franchises.iter().find(|franchise| franchise.id == id)
    }

    /// The seeded reference data shipped with the migrations.
    ///
    /// # Examples
    /// ```
    /// use salesdesk::domain::{Catalog, ConditionalField, ProductId};
    ///
    /// let catalog = Catalog::seeded();
    /// let card = catalog.product(ProductId(3)).unwrap();
    /// assert_eq!(card.rule.required, Some(ConditionalField::FranchiseId));
    /// ```
    #[must_use]
    pub fn seeded() -> Self {
        let rate_only = FieldRule::new(ConditionalField::Rate, ConditionalField::FranchiseId);
        let franchise_only = FieldRule::new(ConditionalField::FranchiseId, ConditionalField::Rate);
        let product = |id, name: &str, rule| Product {
            id: ProductId(id),
            name: name.to_owned(),
            rule,
        };
        let franchise = |id, name: &str| Franchise {
            id: FranchiseId(id),
            name: name.to_owned(),
        };
        Self {
            products: vec![
                product(1, "Consumer Credit", rate_only),
                product(2, "Free-Investment Payroll", rate_only),
                product(3, "Credit Card", franchise_only),
            ],
            franchises: vec![
                franchise(1, "AMEX"),
                franchise(2, "VISA"),
                franchise(3, "MASTERCARD"),
            ],
            roles: Role::ALL.into_iter().map(RoleRecord::from).collect(),
        }
    }
}
