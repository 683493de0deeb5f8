use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::{
    email_client,
    model::{NewSubscriber, StoreError, Subscriber, SubscriberStore},
    web::{
        types::{DataParsingError, MessageBody, SubscribeBody, ValidEmail},
        WebResult,
    },
    AppState,
};

pub const SUBSCRIBE_SUCCESS_MSG: &str =
    "Subscription successful! Please check your inbox for a confirmation email. 💌";

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("invalid subscribe request: {0}")]
    Validation(#[from] DataParsingError),

    #[error("the email is already subscribed")]
    Duplicate,

    #[error("failed to store the subscriber: {0}")]
    Storage(StoreError),

    #[error("failed to send the confirmation email: {0}")]
    Notification(#[from] email_client::Error),
}

impl From<StoreError> for SubscribeError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateKey => Self::Duplicate,
            other => Self::Storage(other),
        }
    }
}

// ###################################
// ->   API
// ###################################

/// Validates the email, stores the subscriber, then sends the confirmation email.
/// The response is a success only when both the insert and the send succeeded.
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(app_state, payload),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe<S: SubscriberStore>(
    State(app_state): State<AppState<S>>,
    payload: Result<Json<SubscribeBody>, JsonRejection>,
) -> WebResult<(StatusCode, Json<MessageBody>)> {
    let Json(body) = payload
        .map_err(|rej| match rej.status() {
            StatusCode::PAYLOAD_TOO_LARGE => DataParsingError::BodyTooLarge,
            _ => DataParsingError::MalformedBody(rej.body_text()),
        })
        .map_err(SubscribeError::Validation)?;
    let email = ValidEmail::try_from(body).map_err(SubscribeError::Validation)?;
    tracing::Span::current().record("subscriber_email", tracing::field::display(&email));

    let subscriber = app_state
        .store
        .insert_unique(NewSubscriber::new(email))
        .await
        .map_err(SubscribeError::from)
        .inspect_err(|er| match er {
            SubscribeError::Duplicate => info!("subscriber already exists"),
            er => error!("failed to store the subscriber: {er}"),
        })?;
    info!("subscriber stored with id {}", subscriber.id);

    send_confirmation_email(&app_state, &subscriber)
        .await
        .inspect_err(|er| error!("failed to send the confirmation email: {er}"))
        .map_err(SubscribeError::Notification)?;

    info!("SUCCESS");
    Ok((StatusCode::OK, Json(MessageBody::new(SUBSCRIBE_SUCCESS_MSG))))
}

#[tracing::instrument(name = "Sending confirmation email", skip_all)]
async fn send_confirmation_email<S: SubscriberStore>(
    app_state: &AppState<S>,
    subscriber: &Subscriber,
) -> email_client::Result<()> {
    let email = &app_state.confirmation_email;

    app_state
        .email_client
        .send_email(
            &subscriber.email,
            &email.subject,
            &email.html_body,
            &email.text_body,
        )
        .await
}
