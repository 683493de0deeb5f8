use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, header_exists, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::TestApp;

async fn mount_email(app: &TestApp, status: u16, expected_calls: u64) {
    Mock::given(path("/email"))
        .and(method("POST"))
        .and(header_exists("X-Postmark-Server-Token"))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(&app.email_server)
        .await;
}

async fn message(res: reqwest::Response) -> Result<String> {
    let body: Value = res.json().await?;
    Ok(body["message"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn api_subscribe_ok() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 200, 1).await;

    let res = app
        .post_subscribe(&json!({ "email": "john.doe@example.com" }))
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::OK,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(
        message(res).await?,
        "Subscription successful! Please check your inbox for a confirmation email. 💌"
    );
    assert_eq!(app.subscriber_emails().await?, ["john.doe@example.com"]);

    let requests = app.email_server.received_requests().await.unwrap_or_default();
    let sent: Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(sent["To"], "john.doe@example.com");
    assert_eq!(sent["Subject"], "☕ Welcome to Coffee & Rhythms!");
    assert!(sent["HtmlBody"]
        .as_str()
        .is_some_and(|html| html.contains("Thanks for subscribing!")));

    Ok(())
}

#[tokio::test]
async fn api_subscribe_duplicate_conflict() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 200, 1).await;

    let body = json!({ "email": "b@example.com" });
    let first = app.post_subscribe(&body).await?;
    assert_eq!(first.status(), StatusCode::OK);

    let res = app.post_subscribe(&body).await?;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(
        message(res).await?,
        "You are already subscribed to the rhythms! ☕"
    );
    assert_eq!(app.subscriber_emails().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_duplicate_ignores_case() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 200, 1).await;

    app.post_subscribe(&json!({ "email": "Jane@Example.com" }))
        .await?;
    let res = app
        .post_subscribe(&json!({ "email": "jane@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(app.subscriber_emails().await?, ["jane@example.com"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let tests = [
        (json!({}), "Empty json", "Email is required."),
        (json!({ "email": "" }), "Empty email", "Email is required."),
        (json!({ "email": null }), "Null email", "Email is required."),
        (
            json!({ "email": "definitely-not-an-email" }),
            "Invalid email",
            "Email address is not valid.",
        ),
    ];

    for (json_request, params, expected_message) in tests {
        let res = app.post_subscribe(&json_request).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), Expected: ({}); for request with: {params}",
            res.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(message(res).await?, expected_message);
    }
    assert!(app.subscriber_emails().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn api_subscribe_email_failure_keeps_the_record() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 500, 1).await;

    let res = app
        .post_subscribe(&json!({ "email": "d@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        message(res).await?,
        "Subscription failed. Please check server logs for details."
    );
    assert_eq!(app.subscriber_emails().await?, ["d@example.com"]);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_database_failure() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 200, 0).await;

    // Sabotage the database
    sqlx::query("ALTER TABLE subscribers DROP COLUMN email;")
        .execute(&app.db)
        .await?;

    let res = app
        .post_subscribe(&json!({ "email": "e@example.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        message(res).await?,
        "Subscription failed. Please check server logs for details."
    );

    Ok(())
}

#[tokio::test]
async fn api_subscribe_concurrent_duplicates() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email(&app, 200, 1).await;

    let body = json!({ "email": "race@example.com" });
    let (a, b) = tokio::join!(app.post_subscribe(&body), app.post_subscribe(&body));

    let mut statuses = [a?.status().as_u16(), b?.status().as_u16()];
    statuses.sort();
    assert_eq!(statuses, [200, 409]);
    assert_eq!(app.subscriber_emails().await?, ["race@example.com"]);

    Ok(())
}

#[tokio::test]
async fn error_responses_carry_the_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.post_subscribe(&json!({})).await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().contains_key("x-request-id"));

    Ok(())
}
