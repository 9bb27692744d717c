//! Runtime settings loaded via OrthoConfig.
//!
//! Every value may come from the command line, a configuration file or a
//! `SALESDESK_*` environment variable. Session cookie settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use pagination::{PageLimits, PaginationError};
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` does not parse as `host:port`.
    #[error("bind address {value:?} is not a socket address: {source}")]
    BindAddr {
        /// Raw configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// The default page size is zero or exceeds the maximum.
    #[error("invalid page limits: {0}")]
    PageLimits(#[from] PaginationError),
    /// An admin email was configured without a password.
    #[error("bootstrap admin email is set but SALESDESK_BOOTSTRAP_ADMIN_PASSWORD is not")]
    BootstrapPasswordMissing,
}

/// Application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SALESDESK")]
pub struct AppSettings {
    /// PostgreSQL connection string. Without it the in-memory store is used.
    pub database_url: Option<String>,
    /// Listen address, `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// Page size applied when a request omits `limit`.
    #[ortho_config(default = 10)]
    pub default_page_limit: u32,
    /// Largest accepted `limit`.
    #[ortho_config(default = 100)]
    pub max_page_limit: u32,
    /// bcrypt work factor for new password hashes.
    #[ortho_config(default = 12)]
    pub bcrypt_cost: u32,
    /// Email of an administrator created at startup when unknown.
    pub bootstrap_admin_email: Option<String>,
    /// Initial password for the bootstrap administrator.
    pub bootstrap_admin_password: Option<String>,
    /// Display name for the bootstrap administrator.
    pub bootstrap_admin_name: Option<String>,
}

/// Administrator account to ensure at startup.
pub struct BootstrapAdmin {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Initial password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Pagination bounds for list endpoints.
    pub fn page_limits(&self) -> Result<PageLimits, SettingsError> {
        Ok(PageLimits::new(self.default_page_limit, self.max_page_limit)?)
    }

    /// bcrypt work factor; the hasher clamps it into bcrypt's range.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// The administrator to create at startup, if one is configured.
    pub fn bootstrap_admin(&self) -> Result<Option<BootstrapAdmin>, SettingsError> {
        let Some(email) = self.bootstrap_admin_email.clone() else {
            return Ok(None);
        };
        let password = self
            .bootstrap_admin_password
            .clone()
            .ok_or(SettingsError::BootstrapPasswordMissing)?;
        Ok(Some(BootstrapAdmin {
            email,
            name: self
                .bootstrap_admin_name
                .clone()
                .unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_owned()),
            password: Zeroizing::new(password),
        }))
    }
}
