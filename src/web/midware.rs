use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tower_http::cors::{Any, CorsLayer};

use crate::web::{log, types::MessageBody, Error, REQUEST_ID_HEADER};

/// Turns a stashed `web::Error` into its client facing JSON body and logs the request.
pub async fn response_mapper(req_method: Method, uri: Uri, resp: Response) -> Response {
    // Set by `PropagateRequestIdLayer`, which runs before this mapper on the way out.
    let request_id = resp.headers().get(REQUEST_ID_HEADER).cloned();

    let web_error = resp.extensions().get::<Arc<Error>>().map(|er| &**er);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let mut err_resp =
            (*status, Json(MessageBody::new(cl_err.to_string()))).into_response();
        if let Some(request_id) = &request_id {
            err_resp
                .headers_mut()
                .insert(REQUEST_ID_HEADER, request_id.clone());
        }
        err_resp
    });

    log::log_request(
        request_id.and_then(|id| id.to_str().ok().map(String::from)),
        req_method,
        uri,
        resp.status(),
        web_error,
        client_status_and_error,
    );

    err_resp.unwrap_or(resp)
}

/// Builds the CORS layer. An empty list or a `"*"` entry allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let parsed_origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    cors.allow_origin(parsed_origins)
}
