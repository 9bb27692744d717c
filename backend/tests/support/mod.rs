//! Shared harness for HTTP scenario tests.
//!
//! Each test builds the full application over a fresh in-memory store with a
//! bootstrap administrator, then drives it with `actix_web::test` requests.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::{Value, json};
use zeroize::Zeroizing;

use salesdesk::inbound::http::health::HealthState;
use salesdesk::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use salesdesk::server::{AppDependencies, ServerConfig, build_app, build_http_state};
use salesdesk::settings::BootstrapAdmin;

pub const ADMIN_EMAIL: &str = "admin@bank.example";
pub const ADMIN_PASSWORD: &str = "admin-password-1";
pub const ADVISOR_PASSWORD: &str = "advisor-password-1";
pub const ADVISOR_ROLE_ID: i64 = 2;

/// Build the application over a fresh in-memory store.
pub async fn spawn_app()
-> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    };
    let config = ServerConfig::new(session.clone(), "127.0.0.1:0".parse().expect("addr"))
        .with_bcrypt_cost(4);
    let admin = BootstrapAdmin {
        email: ADMIN_EMAIL.to_owned(),
        name: "Root Admin".to_owned(),
        password: Zeroizing::new(ADMIN_PASSWORD.to_owned()),
    };
    let state = build_http_state(&config, Some(&admin))
        .await
        .expect("application state");
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(state),
    };
    test::init_service(build_app(deps, session.middleware())).await
}

/// Send `req` and return the status with the decoded JSON body.
pub async fn send<S, B>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Signed-in user: session cookie plus account id.
pub struct Session {
    pub cookie: Cookie<'static>,
    pub user_id: String,
}

impl Session {
    pub fn get(&self, uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .cookie(self.cookie.clone())
    }

    pub fn post(&self, uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .cookie(self.cookie.clone())
            .set_json(body)
    }

    pub fn put(&self, uri: &str, body: Value) -> test::TestRequest {
        test::TestRequest::put()
            .uri(uri)
            .cookie(self.cookie.clone())
            .set_json(body)
    }

    pub fn delete(&self, uri: &str) -> test::TestRequest {
        test::TestRequest::delete()
            .uri(uri)
            .cookie(self.cookie.clone())
    }
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "login as {email}");
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.into_owned())
        .expect("session cookie");
    let bytes = test::read_body(res).await;
    let body: Value = serde_json::from_slice(&bytes).expect("login body");
    let user_id = body["data"]["id"].as_str().expect("user id").to_owned();
    Session { cookie, user_id }
}

pub async fn login_admin<S, B>(app: &S) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Create an advisor through the admin API and sign them in.
pub async fn create_advisor<S, B>(app: &S, admin: &Session, name: &str, email: &str) -> Session
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        admin.post(
            "/api/v1/users",
            json!({
                "name": name,
                "email": email,
                "password": ADVISOR_PASSWORD,
                "roleId": ADVISOR_ROLE_ID,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create advisor: {body}");
    login(app, email, ADVISOR_PASSWORD).await
}

/// Create a sale and return its JSON view.
pub async fn create_sale<S, B>(app: &S, owner: &Session, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(app, owner.post("/api/v1/sales", payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create sale: {body}");
    body["data"].clone()
}
