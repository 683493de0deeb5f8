use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::Instrument;

use super::{NewSubscriber, StoreError, StoreResult, Subscriber, SubscriberStore};

/// `SubscriberStore` backed by the `subscribers` table.
/// The `UNIQUE` constraint on `subscribers.email` does the duplicate detection.
#[derive(Clone, Debug)]
pub struct PgSubscriberStore {
    db: PgPool,
}

impl PgSubscriberStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &PgPool {
        &self.db
    }
}

impl SubscriberStore for PgSubscriberStore {
    async fn insert_unique(&self, new_subscriber: NewSubscriber) -> StoreResult<Subscriber> {
        let q_span = tracing::info_span!("Inserting subscriber into the database");

        let query_result: Result<DateTime<Utc>, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO subscribers (id, email)
            VALUES ($1, $2)
            RETURNING subscribed_at
        "#,
        )
        .bind(new_subscriber.id)
        .bind(new_subscriber.email.as_ref())
        .fetch_one(&self.db)
        .instrument(q_span)
        .await;

        match query_result {
            Ok(subscribed_at) => Ok(Subscriber {
                id: new_subscriber.id,
                email: new_subscriber.email,
                subscribed_at,
            }),
            Err(er) if is_unique_violation(&er) => Err(StoreError::DuplicateKey),
            Err(er) => Err(StoreError::Backend(er)),
        }
    }
}

// ###################################
// ->   HELPERS
// ###################################

/// Checks for SQLSTATE 23505 (`unique_violation`).
fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(er) => er.is_unique_violation(),
        _ => false,
    }
}
