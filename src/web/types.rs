//! Request/response bodies of the `web` module and the validated types built from them.
//! Includes the email parsing implementation and its tests.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable subscribe request.
/// `email` is optional so that a missing field ends up as a validation error (400)
/// instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeBody {
    #[serde(default)]
    pub email: Option<String>,
}

/// Every response body of this service: `{ "message": "..." }`
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validated and normalized subscriber email.
///
/// Addresses are trimmed and lowercased, so `Jane@Example.com` and `jane@example.com`
/// are the same subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ValidEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValidEmail {
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref().trim();

        if value.is_empty() {
            return Err(DataParsingError::EmailMissing);
        }

        if value.graphemes(true).count() > 256 {
            return Err(DataParsingError::EmailTooLong);
        }

        let value = value.to_lowercase();
        if value.validate_email() {
            Ok(ValidEmail(value))
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

impl TryFrom<SubscribeBody> for ValidEmail {
    type Error = DataParsingError;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let email = body.email.ok_or(DataParsingError::EmailMissing)?;
        ValidEmail::parse(email)
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("request body is not a valid subscribe request: {0}")]
    MalformedBody(String),
    #[error("request body exceeds the size limit")]
    BodyTooLarge,

    #[error("missing email")]
    EmailMissing,
    #[error("email invalid")]
    EmailInvalid,
    #[error("email too long")]
    EmailTooLong,
}
