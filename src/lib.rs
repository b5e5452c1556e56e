use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod aggregation;
pub mod auth;
pub mod config;
pub mod constants;
pub mod database;
pub mod dates;
pub mod models;
pub mod ownership;
pub mod profile;
pub mod records;
pub mod state;
pub mod summaries;
pub mod utils;

use models::{Expense, Income};
use state::AppState;

/// Builds the API router. Session handling is layered on by the caller.
pub fn app(state: AppState, client_url: Option<HeaderValue>) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/income",
            get(records::get_records::<Income>).post(records::create_record::<Income>),
        )
        .route(
            "/api/income/{id}",
            put(records::edit_record::<Income>).delete(records::delete_record::<Income>),
        )
        .route(
            "/api/expense",
            get(records::get_records::<Expense>).post(records::create_record::<Expense>),
        )
        .route(
            "/api/expense/{id}",
            put(records::edit_record::<Expense>).delete(records::delete_record::<Expense>),
        )
        .route("/api/saving/{year}", get(summaries::get_savings))
        .route("/api/home", get(summaries::home_data))
        .route("/api/user", put(profile::update_profile))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match client_url {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        None => router,
    }
}

async fn root() -> &'static str {
    "Finance tracker API"
}
