//! Users.
//!
//! Passwords are hashed on the way into the store unless they already are,
//! so re-saving a loaded user never double-hashes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::app::models::StoreError;
use crate::app::password;
use crate::routing::UrlResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// bcrypt hash.
    pub password: String,
}

impl User {
    pub fn link(&self, urls: &UrlResolver) -> String {
        urls.name_to_url("users.show", &["id", &self.id.to_string()])
    }

    pub async fn compare_password(&self, plaintext: &str) -> bool {
        password::check(plaintext, &self.password).await
    }
}

/// Thread-safe user table with unique name and email indexes.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<DashMap<u64, User>>,
    names: Arc<DashMap<String, u64>>,
    emails: Arc<DashMap<String, u64>>,
    next_id: Arc<AtomicU64>,
    hash_cost: u32,
}

impl UserStore {
    pub fn new(hash_cost: u32) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            names: Arc::new(DashMap::new()),
            emails: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            hash_cost,
        }
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        plaintext: &str,
    ) -> Result<User, StoreError> {
        let password = if password::is_hashed(plaintext) {
            plaintext.to_string()
        } else {
            password::hash(plaintext, self.hash_cost).await?
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Duplicate {
                    field: "name",
                    value: name.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => {
                self.names.remove(name);
                return Err(StoreError::Duplicate {
                    field: "email",
                    value: email.to_string(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password,
        };
        self.inner.insert(id, user.clone());
        tracing::info!(user_id = id, name = %name, "User registered");
        Ok(user)
    }

    pub fn get(&self, id: u64) -> Result<User, StoreError> {
        self.inner
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound { kind: "user", id })
    }

    pub fn by_email(&self, email: &str) -> Option<User> {
        let id = *self.emails.get(email)?;
        self.get(id).ok()
    }

    pub fn name_taken(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.emails.contains_key(email)
    }

    pub fn all(&self) -> Vec<User> {
        let mut users: Vec<User> = self.inner.iter().map(|e| e.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        users
    }
}
