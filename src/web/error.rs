use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

use super::{routes::SubscribeError, types::DataParsingError};

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("subscribe error: {0}")]
    Subscribe(#[from] SubscribeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::Subscribe(SubscribeError::Validation(data_er)) => match data_er {
                DataParsingError::EmailInvalid | DataParsingError::EmailTooLong => {
                    (StatusCode::BAD_REQUEST, EmailInvalid)
                }
                DataParsingError::EmailMissing | DataParsingError::MalformedBody(_) => {
                    (StatusCode::BAD_REQUEST, EmailRequired)
                }
                DataParsingError::BodyTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, BodyTooLarge),
            },
            Error::Subscribe(SubscribeError::Duplicate) => (StatusCode::CONFLICT, AlreadySubscribed),
            Error::Subscribe(SubscribeError::Storage(_) | SubscribeError::Notification(_))
            | Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// What the client gets to see, rendered as `{ "message": "<Display>" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Email is required.")]
    EmailRequired,
    #[display("Email address is not valid.")]
    EmailInvalid,
    #[display("Request body is too large.")]
    BodyTooLarge,
    #[display("You are already subscribed to the rhythms! ☕")]
    AlreadySubscribed,
    #[display("Subscription failed. Please check server logs for details.")]
    ServiceError,
}
