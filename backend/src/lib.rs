//! Salesdesk backend: role-scoped tracking of bank product sales.
//!
//! Layout follows a hexagonal split. [`domain`] holds the model, rules and
//! ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the driven ports over PostgreSQL, memory and bcrypt.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
