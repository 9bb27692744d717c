//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::PageLimits;

use crate::domain::ports::{
    CatalogQuery, LoginService, SalesCommand, SalesQuery, StatsQuery, UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub sales: Arc<dyn SalesCommand>,
    pub sales_query: Arc<dyn SalesQuery>,
    pub stats: Arc<dyn StatsQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub catalog: Arc<dyn CatalogQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sales: Arc<dyn SalesCommand>,
    pub sales_query: Arc<dyn SalesQuery>,
    pub stats: Arc<dyn StatsQuery>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub catalog: Arc<dyn CatalogQuery>,
    /// Bounds applied to `page`/`limit` query parameters.
    pub page_limits: PageLimits,
}

impl HttpState {
    /// Construct state from a ports bundle and pagination bounds.
    pub fn new(ports: HttpStatePorts, page_limits: PageLimits) -> Self {
        let HttpStatePorts {
            login,
            sales,
            sales_query,
            stats,
            users,
            users_query,
            catalog,
        } = ports;
        Self {
            login,
            sales,
            sales_query,
            stats,
            users,
            users_query,
            catalog,
            page_limits,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, PageLimits::default())
    }
}
