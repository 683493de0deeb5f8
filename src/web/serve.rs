use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request, Response},
    middleware, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{MakeSpan, OnRequest, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::{model::SubscriberStore, App, AppState};

use super::{midware, routes::routes, WebResult, REQUEST_ID_HEADER};

/// Serves the application on the `App`'s listener until the server stops.
///
/// Might return an IO error from `axum::serve`.
pub async fn serve(app: App) -> WebResult<()> {
    let App {
        app_state,
        listener,
        allowed_origins,
    } = app;

    let router = app_router(app_state, &allowed_origins);
    axum::serve(listener, router).await?;

    Ok(())
}

/// All routes wrapped in the middleware stack.
pub fn app_router<S: SubscriberStore>(app_state: AppState<S>, allowed_origins: &[String]) -> Router {
    let x_request_id: HeaderName = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(routes(app_state))
        .layer(
            ServiceBuilder::new()
                // Set UUID per request
                .layer(SetRequestIdLayer::new(
                    x_request_id.clone(),
                    MakeRequestUuid,
                ))
                .layer(build_trace_layer())
                // The response goes through the stack from the bottom up, so the mapper
                // has to sit above the propagation layer to see the request id.
                .layer(middleware::map_response(midware::response_mapper))
                // Propagate UUID to response, keep it last so it processes the response first!
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // Outermost, applied on the already boxed `axum::body::Body` responses.
        .layer(midware::cors_layer(allowed_origins))
}

/// A helper function that sets up the `tower_http::TraceLayer` - tracing configuration.
fn build_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl MakeSpan<Body> + Clone,
    impl OnRequest<Body> + Clone,
    impl OnResponse<Body> + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            let uuid = req
                .headers()
                .get(REQUEST_ID_HEADER)
                .map(|uuid| uuid.to_str().unwrap_or("").to_string());

            tracing::error_span!(
                "serve",
                id = uuid,
                method = req.method().to_string(),
                path = req.uri().path()
            )
        })
        .on_request(|req: &Request<Body>, _s: &Span| tracing::info!("START @ {}", req.uri()))
        .on_response(|res: &Response<Body>, latency: Duration, _s: &Span| {
            let st_code = res.status().as_u16();

            if (500..=599).contains(&st_code) {
                tracing::error!("END in: {:?} STATUS: {st_code}", latency)
            } else if (400..=499).contains(&st_code) {
                tracing::warn!("END in: {:?} STATUS: {st_code}", latency)
            } else {
                tracing::info!("END in: {:?} STATUS: {st_code}", latency)
            }
        })
}
