//! Sale records, their read model and the services that act on them.
//!
//! - [`validation`] enforces the per-product conditional field rules.
//! - [`scope`] turns a caller and explicit filters into the predicate every
//!   read path shares.
//! - [`service`] implements the sale lifecycle.
//! - [`stats`] aggregates over the scoped sale set.

pub mod scope;
pub mod service;
pub mod stats;
pub mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::catalog::{FranchiseId, ProductId};
use super::user::UserId;

/// Stable sale identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(Uuid);

impl SaleId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SaleId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Processing state of a sale. Any state may follow any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Newly registered.
    #[default]
    Open,
    /// Being processed by the bank.
    InProcess,
    /// Closed.
    Finished,
}

impl SaleStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SaleStatus; 3] = [Self::Open, Self::InProcess, Self::Finished];

    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProcess => "in_process",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sale status `{0}`; expected open, in_process or finished")]
pub struct UnknownSaleStatus(pub String);

impl FromStr for SaleStatus {
    type Err = UnknownSaleStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownSaleStatus(s.to_owned()))
    }
}

/// The fields subject to conditional validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleFields {
    /// Product sold.
    pub product_id: ProductId,
    /// Requested amount; must be positive.
    pub requested_amount: Decimal,
    /// Card franchise, credit cards only.
    pub franchise_id: Option<FranchiseId>,
    /// Interest rate percentage, credit and payroll products only.
    pub rate: Option<Decimal>,
}

/// Persisted sale record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    /// Identifier.
    pub id: SaleId,
    /// Validated business fields.
    pub fields: SaleFields,
    /// Processing state.
    pub status: SaleStatus,
    /// User who registered the sale; never changes.
    pub creator_user_id: UserId,
    /// User who last wrote the sale.
    pub updater_user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Read model of a sale with denormalised reference names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    /// Identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: SaleId,
    /// Product sold.
    #[schema(value_type = i32)]
    pub product_id: ProductId,
    /// Product display name.
    pub product_name: String,
    /// Requested amount.
    #[schema(value_type = String, example = "1500000.00")]
    pub requested_amount: Decimal,
    /// Card franchise, when applicable.
    #[schema(value_type = Option<i32>)]
    pub franchise_id: Option<FranchiseId>,
    /// Franchise display name, when applicable.
    pub franchise_name: Option<String>,
    /// Interest rate percentage, when applicable.
    #[schema(value_type = Option<String>, example = "12.5")]
    pub rate: Option<Decimal>,
    /// Processing state.
    pub status: SaleStatus,
    /// Creator identifier.
    #[schema(value_type = String, format = Uuid)]
    pub creator_user_id: UserId,
    /// Creator display name.
    pub creator_name: String,
    /// Last writer identifier.
    #[schema(value_type = String, format = Uuid)]
    pub updater_user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleDraft {
    /// Business fields.
    pub fields: SaleFields,
    /// Initial status; `open` when omitted.
    pub status: Option<SaleStatus>,
}

/// Partial update of a sale.
///
/// For nullable fields the outer `Option` says whether the field was sent and
/// the inner one whether it was cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalePatch {
    /// New product.
    pub product_id: Option<ProductId>,
    /// New amount.
    pub requested_amount: Option<Decimal>,
    /// New franchise or `Some(None)` to clear it.
    pub franchise_id: Option<Option<FranchiseId>>,
    /// New rate or `Some(None)` to clear it.
    pub rate: Option<Option<Decimal>>,
    /// New status.
    pub status: Option<SaleStatus>,
}

impl SalePatch {
    /// Overlay the patch onto existing fields.
    #[must_use]
    pub fn merge(&self, current: SaleFields) -> SaleFields {
        SaleFields {
            product_id: self.product_id.unwrap_or(current.product_id),
            requested_amount: self.requested_amount.unwrap_or(current.requested_amount),
            franchise_id: self.franchise_id.unwrap_or(current.franchise_id),
            rate: self.rate.unwrap_or(current.rate),
        }
    }
}
