//! HTTP server configuration object.

use std::net::SocketAddr;

use pagination::PageLimits;

use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) page_limits: PageLimits,
    pub(crate) bcrypt_cost: u32,
}

impl ServerConfig {
    /// Configuration with default pagination bounds, the default bcrypt cost
    /// and no database.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            db_pool: None,
            page_limits: PageLimits::default(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server keeps all data in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_page_limits(mut self, page_limits: PageLimits) -> Self {
        self.page_limits = page_limits;
        self
    }

    #[must_use]
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether a database pool is attached.
    #[must_use]
    pub fn has_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
