use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use chrono::Utc;

use super::{NewSubscriber, StoreError, StoreResult, Subscriber, SubscriberStore};

/// A `SubscriberStore` for tests. The map entry is checked and filled under one lock,
/// which gives the same exactly-one-wins behavior as the database constraint.
#[derive(Debug, Default)]
pub struct InMemorySubscriberStore {
    subscribers: Mutex<HashMap<String, Subscriber>>,
    unavailable: AtomicBool,
    insert_calls: AtomicUsize,
}

impl InMemorySubscriberStore {
    /// Makes every following insert fail with a backend error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `insert_unique` calls, failed ones included.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().expect("store lock poisoned").len()
    }

    pub fn get(&self, email: &str) -> Option<Subscriber> {
        self.subscribers
            .lock()
            .expect("store lock poisoned")
            .get(email)
            .cloned()
    }
}

impl SubscriberStore for InMemorySubscriberStore {
    async fn insert_unique(&self, new_subscriber: NewSubscriber) -> StoreResult<Subscriber> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(sqlx::Error::PoolTimedOut));
        }

        let mut subscribers = self.subscribers.lock().expect("store lock poisoned");
        match subscribers.entry(new_subscriber.email.as_ref().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey),
            Entry::Vacant(entry) => {
                let subscriber = Subscriber {
                    id: new_subscriber.id,
                    email: new_subscriber.email,
                    subscribed_at: Utc::now(),
                };
                entry.insert(subscriber.clone());
                Ok(subscriber)
            }
        }
    }
}
