//! In-memory repositories for the blog's records.
//!
//! # Design Decisions
//! - `DashMap` per table, shared behind `Arc`, so handlers clone a store
//!   handle instead of locking a global
//! - Ids come from an atomic counter starting at 1 and are never reused
//! - Lookups return owned clones; no map guard outlives a call

pub mod article;
pub mod user;

pub use article::{Article, ArticleStore};
pub use user::{User, UserStore};

/// Repository failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("{field} '{value}' is already taken")]
    Duplicate { field: &'static str, value: String },

    #[error("failed to hash password: {0}")]
    Hash(#[from] crate::app::password::PasswordError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
