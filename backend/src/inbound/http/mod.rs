//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cache_control;
pub mod catalog;
pub mod envelope;
pub mod error;
pub mod health;
pub mod sales;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod stats;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint and the extractor error handlers.
///
/// Mount inside a scope wrapped by the session middleware. Fixed sale paths
/// are registered before `/sales/{id}` so they are not captured as ids.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(sales::sales_total)
        .service(sales::count_by_status)
        .service(sales::my_sales)
        .service(sales::list_sales)
        .service(sales::create_sale)
        .service(sales::get_sale)
        .service(sales::update_sale)
        .service(sales::delete_sale)
        .service(stats::summary)
        .service(stats::by_product)
        .service(stats::by_advisor)
        .service(stats::timeline)
        .service(stats::top_products)
        .service(stats::recent)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::change_password)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(catalog::list_products)
        .service(catalog::list_franchises)
        .service(catalog::list_roles);
}
