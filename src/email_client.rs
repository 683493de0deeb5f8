//! The mail collaborator: a Postmark-style HTTP email API client.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::web::types::ValidEmail;

const MESSAGE_STREAM: &str = "outbound";

#[derive(Debug)]
pub struct EmailClient {
    http_client: Client,
    url: reqwest::Url,
    /// Fully formatted `From` header, e.g. `"Coffee & Rhythms" <hello@coffee-rhythms.com>`
    sender: String,
    auth_token: SecretString,
}

impl EmailClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        sender: ValidEmail,
        sender_name: &str,
        auth_token: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(EmailClient {
            http_client,
            url,
            sender: format!("{} <{sender}>", quoted_display_name(sender_name)),
            auth_token,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Sends one message to `recipient`. Any non-2xx answer from the API is an error.
    pub async fn send_email(
        &self,
        recipient: &ValidEmail,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<()> {
        let url = self
            .url
            .join("email")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let email_content = EmailContent {
            from: &self.sender,
            to: recipient.as_ref(),
            subject,
            html_body: html_content,
            text_body: text_content,
            message_stream: MESSAGE_STREAM,
        };

        self.http_client
            .post(url)
            .header("X-Postmark-Server-Token", self.auth_token.expose_secret())
            .json(&email_content)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Wraps the display name in an RFC 5322 quoted-string, escaping `\` and `"`.
fn quoted_display_name(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for ch in name.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmailContent<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse the email api url: {0}")]
    UrlParsing(String),
    #[error("email api request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
}
