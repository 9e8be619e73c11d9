pub mod client;
#[cfg(test)]
pub mod stub;

pub use client::MediaWikiClient;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Ordered MediaWiki API parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiParams {
    pairs: Vec<(String, String)>,
}

impl ApiParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an existing value in place
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key.to_string(), value)),
        }
        self
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for ApiParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&joined)
    }
}

/// The one capability the core needs from the wiki: send a GET to the API
/// endpoint and hand back the parsed JSON document.
#[async_trait]
pub trait WikiApi: Send + Sync {
    async fn get(&self, params: &ApiParams) -> Result<Value>;
}
