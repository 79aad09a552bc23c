//! Upstream article sources and the per-language client cache

use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::language::Language;

/// Errors reported by an article source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No article with the requested title
    #[error("page not found")]
    NotFound,
    /// The upstream request failed
    #[error("upstream request failed: {0}")]
    Upstream(String),
    /// The upstream answered with something that could not be decoded
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

/// Client for one language's article API
///
/// Implementations perform the network I/O; the gateway only sequences
/// calls and renders results.
pub trait ArticleSource: Send + Sync {
    /// Raw source of the article named `title`
    fn page_source(&self, title: &str) -> Result<String, FetchError>;

    /// Titles matching `query`, best match first
    fn search(&self, query: &str) -> Result<Vec<String>, FetchError>;
}

type Factory<S> = Box<dyn Fn(&Language) -> Result<S, FetchError> + Send + Sync>;

/// Lazily built, shared article sources keyed by language
///
/// Clients are created on first use through the factory and reused for
/// every later request in that language.
pub struct ClientCache<S> {
    clients: DashMap<Language, Arc<S>>,
    factory: Factory<S>,
}

impl<S> ClientCache<S> {
    /// Create an empty cache building clients with `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&Language) -> Result<S, FetchError> + Send + Sync + 'static,
    {
        Self {
            clients: DashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Client for `language`, creating it on first use
    ///
    /// A factory failure is returned as-is and nothing is cached, so the
    /// next request retries.
    pub fn get(&self, language: &Language) -> Result<Arc<S>, FetchError> {
        if let Some(client) = self.clients.get(language) {
            return Ok(Arc::clone(client.value()));
        }

        debug!(%language, "creating article client");
        let client = Arc::new((self.factory)(language)?);
        let entry = self.clients.entry(language.clone()).or_insert(client);
        Ok(Arc::clone(entry.value()))
    }

    /// Number of cached clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client has been created yet
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::language::DEFAULT_LANGUAGES;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Endpoint(String);

    fn language(code: &str) -> Language {
        Language::parse(code, DEFAULT_LANGUAGES).expect("supported language")
    }

    #[test]
    fn test_clients_are_reused_per_language() {
        let built = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&built);
        let cache = ClientCache::new(move |lang: &Language| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Endpoint(lang.code().to_string()))
        });

        let first = cache.get(&language("en")).expect("client");
        let second = cache.get(&language("en")).expect("client");
        let other = cache.get(&language("fr")).expect("client");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(other.0, "fr");
        assert_eq!(built.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_factory_failures_are_not_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let cache = ClientCache::new(move |_: &Language| -> Result<Endpoint, FetchError> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(FetchError::Upstream("connection refused".into()))
        });

        assert!(cache.get(&language("en")).is_err());
        assert!(cache.get(&language("en")).is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }
}
