//! Articles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::app::models::StoreError;
use crate::routing::UrlResolver;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub body: String,
    /// Author, when the article was written by a logged-in user.
    pub user_id: Option<u64>,
}

impl Article {
    /// Link to this article's page.
    pub fn link(&self, urls: &UrlResolver) -> String {
        urls.name_to_url("articles.show", &["id", &self.id.to_string()])
    }
}

/// Thread-safe article table.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    inner: Arc<DashMap<u64, Article>>,
    next_id: Arc<AtomicU64>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn create(&self, title: &str, body: &str, user_id: Option<u64>) -> Article {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let article = Article {
            id,
            title: title.to_string(),
            body: body.to_string(),
            user_id,
        };
        self.inner.insert(id, article.clone());
        tracing::info!(article_id = id, "Article created");
        article
    }

    pub fn get(&self, id: u64) -> Result<Article, StoreError> {
        self.inner
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound { kind: "article", id })
    }

    /// All articles, oldest first.
    pub fn all(&self) -> Vec<Article> {
        let mut articles: Vec<Article> = self.inner.iter().map(|e| e.value().clone()).collect();
        articles.sort_by_key(|a| a.id);
        articles
    }

    pub fn by_user(&self, user_id: u64) -> Vec<Article> {
        let mut articles: Vec<Article> = self
            .inner
            .iter()
            .filter(|e| e.value().user_id == Some(user_id))
            .map(|e| e.value().clone())
            .collect();
        articles.sort_by_key(|a| a.id);
        articles
    }

    pub fn update(&self, id: u64, title: &str, body: &str) -> Result<Article, StoreError> {
        let mut entry = self
            .inner
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind: "article", id })?;
        entry.title = title.to_string();
        entry.body = body.to_string();
        tracing::info!(article_id = id, "Article updated");
        Ok(entry.value().clone())
    }

    pub fn delete(&self, id: u64) -> Result<Article, StoreError> {
        let (_, article) = self
            .inner
            .remove(&id)
            .ok_or(StoreError::NotFound { kind: "article", id })?;
        tracing::info!(article_id = id, "Article deleted");
        Ok(article)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ArticleStore {
    fn default() -> Self {
        Self::new()
    }
}
