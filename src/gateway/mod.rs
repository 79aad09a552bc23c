//! Request-level operations of the article gateway
//!
//! The gateway sequences one request: validate the language, pick the
//! cached client, fetch, convert, wrap the result in a page template.
//! Routing, TLS and protocol framing belong to the server embedding it; the
//! error variants here are what that server maps to protocol status codes.
//!
//! ```rust
//! use gemini_wiki_converter::gateway::{ArticleSource, ClientCache, FetchError, Gateway, GatewayConfig};
//! use gemini_wiki_converter::parser::HtmlSourceParser;
//!
//! struct Fixed;
//!
//! impl ArticleSource for Fixed {
//!     fn page_source(&self, _title: &str) -> Result<String, FetchError> {
//!         Ok("<p>Capital of Italy.</p>".to_string())
//!     }
//!     fn search(&self, _query: &str) -> Result<Vec<String>, FetchError> {
//!         Ok(vec!["Rome".to_string()])
//!     }
//! }
//!
//! let gateway = Gateway::new(
//!     GatewayConfig::default(),
//!     ClientCache::new(|_| Ok(Fixed)),
//!     HtmlSourceParser::new(),
//! );
//! let page = gateway.show("en", "Rome").expect("article");
//! assert!(page.starts_with("# Rome\n"));
//! assert!(page.contains("Capital of Italy."));
//! ```

pub mod client;
pub mod language;
pub mod pages;
pub mod search;

use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::converter::GemtextConverter;
use crate::parser::SourceParser;

pub use client::{ArticleSource, ClientCache, FetchError};
pub use language::{DEFAULT_LANGUAGES, Language};
pub use search::SearchResult;

/// Errors surfaced to the embedding server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The language code is not served
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    /// A search was requested without a query
    #[error("Enter search query")]
    EmptyQuery,
    /// The requested article does not exist
    #[error("page not found")]
    NotFound,
    /// The upstream failed or answered with garbage
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl From<FetchError> for GatewayError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => Self::NotFound,
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Gateway settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Language codes served, in home page order
    pub languages: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            languages: DEFAULT_LANGUAGES.iter().map(|lang| lang.to_string()).collect(),
        }
    }
}

impl GatewayConfig {
    /// Validate a language code against the served set
    pub fn language(&self, code: &str) -> Result<Language, GatewayError> {
        Language::parse(code, self.languages.as_slice())
    }
}

/// Fetch-convert-render pipeline shared by all requests
pub struct Gateway<S, P> {
    config: GatewayConfig,
    clients: ClientCache<S>,
    parser: P,
    converter: GemtextConverter,
}

impl<S, P> Gateway<S, P>
where
    S: ArticleSource,
    P: SourceParser,
{
    /// Create a gateway with a default converter
    pub fn new(config: GatewayConfig, clients: ClientCache<S>, parser: P) -> Self {
        Self {
            config,
            clients,
            parser,
            converter: GemtextConverter::new(),
        }
    }

    /// Replace the converter
    pub fn with_converter(mut self, converter: GemtextConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Gateway settings
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Landing page
    pub fn home(&self) -> String {
        pages::home_page(self.config.languages.as_slice())
    }

    /// robots.txt body
    pub fn robots(&self) -> String {
        pages::robots_txt(self.config.languages.as_slice())
    }

    /// Render the article `name` from the `lang` wiki
    ///
    /// Conversion problems never fail the request; they show up as the
    /// converter's fallback text inside the page.
    #[instrument(skip(self))]
    pub fn show(&self, lang: &str, name: &str) -> Result<String, GatewayError> {
        let language = self.config.language(lang)?;
        let client = self.clients.get(&language)?;
        let source = client.page_source(name)?;

        let started = Instant::now();
        let body = self.converter.convert(&self.parser, &source);
        debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            source_bytes = source.len(),
            body_bytes = body.len(),
            "converted article"
        );

        Ok(pages::article_page(&language, name, &body))
    }

    /// Search the `lang` wiki for `query`
    #[instrument(skip(self))]
    pub fn search(&self, lang: &str, query: &str) -> Result<String, GatewayError> {
        let language = self.config.language(lang)?;
        if query.trim().is_empty() {
            return Err(GatewayError::EmptyQuery);
        }

        let client = self.clients.get(&language)?;
        let results = client
            .search(query)?
            .into_iter()
            .map(SearchResult::from_title)
            .collect::<Vec<_>>();
        info!(hits = results.len(), "search finished");

        Ok(pages::search_page(&language, query, &results))
    }
}
