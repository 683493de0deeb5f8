//! Contains all the routes that this application can handle.

mod api;
mod home;

// re-export errors
pub use api::subscribe::SubscribeError;

use crate::{model::SubscriberStore, AppState};
use home::home;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All the routes of the server
pub fn routes<S: SubscriberStore>(app_state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/subscribe", post(api::subscribe::<S>))
        .with_state(app_state)
        .route("/health-check", get(health_check))
}
