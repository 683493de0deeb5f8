//! The storage collaborator: subscriber records and the stores that persist them.
//!
//! Uniqueness of `Subscriber::email` is owned by the store, `insert_unique` is the only write
//! and has to decide atomically whether the email is already taken.

#[cfg(test)]
mod memory;
mod postgres;

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::web::types::ValidEmail;

#[cfg(test)]
pub use memory::InMemorySubscriberStore;
pub use postgres::PgSubscriberStore;

// ###################################
// ->   STRUCTS
// ###################################
/// A subscriber that was not persisted yet.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub id: Uuid,
    pub email: ValidEmail,
}

impl NewSubscriber {
    pub fn new(email: ValidEmail) -> Self {
        NewSubscriber {
            id: Uuid::new_v4(),
            email,
        }
    }
}

/// A persisted subscriber. Created once, never updated.
#[derive(Debug, Clone)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: ValidEmail,
    pub subscribed_at: DateTime<Utc>,
}

// ###################################
// ->   STORE
// ###################################
pub trait SubscriberStore: Send + Sync + 'static {
    /// Persists `new_subscriber`, or fails with `StoreError::DuplicateKey` if a subscriber with
    /// the same email already exists. Two concurrent calls with the same email must never
    /// both succeed.
    fn insert_unique(
        &self,
        new_subscriber: NewSubscriber,
    ) -> impl Future<Output = StoreResult<Subscriber>> + Send;
}

// ###################################
// ->   ERROR
// ###################################
pub type StoreResult<T> = core::result::Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a subscriber with this email already exists")]
    DuplicateKey,
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}
