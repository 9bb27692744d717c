//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use serde_json::Value;

use super::session::SessionContext;
use super::session_config::SESSION_COOKIE_NAME;
use super::state::{HttpState, HttpStatePorts};
use super::{ApiResult, configure_api};
use crate::domain::ports::{
    MockCatalogQuery, MockLoginService, MockSalesCommand, MockSalesQuery, MockStatsQuery,
    MockUsersCommand, MockUsersQuery,
};
use crate::domain::{Caller, Error, Role, UserId};

/// Session middleware with a throwaway key and the `Secure` flag off so
/// plain-HTTP test requests round-trip the cookie.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// One mock per driving port. Set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub sales: MockSalesCommand,
    pub sales_query: MockSalesQuery,
    pub stats: MockStatsQuery,
    pub users: MockUsersCommand,
    pub users_query: MockUsersQuery,
    pub catalog: MockCatalogQuery,
}

impl MockPorts {
    /// Resolve every session to `user_id` with `role`.
    pub fn signed_in_as(mut self, user_id: UserId, role: Role) -> Self {
        self.login
            .expect_resolve_caller()
            .returning(move |_| Ok(Caller::new(user_id, role)));
        self
    }

    pub fn into_state(self) -> HttpState {
        HttpState::from(HttpStatePorts {
            login: Arc::new(self.login),
            sales: Arc::new(self.sales),
            sales_query: Arc::new(self.sales_query),
            stats: Arc::new(self.stats),
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            catalog: Arc::new(self.catalog),
        })
    }
}

async fn seed_session(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = UserId::new(path.as_str()).map_err(|err| Error::validation(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Build the full `/api/v1` surface over `state`, plus a
/// `POST /api/v1/test-session/{id}` route that signs a user in.
pub async fn api_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .route("/test-session/{id}", web::post().to(seed_session))
                .configure(configure_api),
        ),
    )
    .await
}

/// Session cookie for `user_id`, obtained through the seeding route.
pub async fn session_cookie(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    user_id: &UserId,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/test-session/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "seed session: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Read a response body as JSON.
pub async fn json_body(res: ServiceResponse) -> Value {
    let bytes = test::read_body(res).await;
    serde_json::from_slice(&bytes).expect("JSON body")
}
