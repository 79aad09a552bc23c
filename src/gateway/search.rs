//! Search results

use serde_json::Value;

use super::client::FetchError;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Title as shown to readers
    pub name: String,
    /// Title as used in article paths, spaces replaced with `_`
    pub path: String,
}

impl SearchResult {
    /// Build a result from an article title
    pub fn from_title(title: impl Into<String>) -> Self {
        let name = title.into();
        let path = name.replace(' ', "_");
        Self { name, path }
    }
}

/// Titles from an OpenSearch response
///
/// The response is a JSON array whose second element lists the matching
/// titles: `["query", ["Title 1", "Title 2"], [...descriptions], [...urls]]`.
pub fn parse_opensearch(body: &[u8]) -> Result<Vec<String>, FetchError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::InvalidResponse(format!("opensearch body is not JSON: {err}")))?;

    let titles = value
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::InvalidResponse("opensearch body has no title list".into()))?;

    titles
        .iter()
        .map(|title| {
            title.as_str().map(str::to_string).ok_or_else(|| {
                FetchError::InvalidResponse(format!("opensearch title is not a string: {title}"))
            })
        })
        .collect()
}
