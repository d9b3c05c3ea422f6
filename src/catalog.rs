//! Client for the third-party movie/TV catalog API. Responses are
//! tagged into [`MediaItem`]s right here at the boundary.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::MediaItem;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w780";

/// Resolves an opaque backdrop/poster path from the catalog into a
/// fetchable image URL.
pub fn image_url(path: &str) -> String {
    format!("{}/{}", IMAGE_BASE_URL, path.trim_start_matches('/'))
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog error ({status}): {body}")]
    Api { status: u16, body: String },
}

pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .tcp_nodelay(true)
            .user_agent("ReelBrowse/1.0")
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(CatalogClient {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Points the client at a different catalog host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn trending_movies(&self) -> Result<Vec<MediaItem>, CatalogError> {
        self.fetch_list("trending/movie/week", &[]).await
    }

    pub async fn trending_tv(&self) -> Result<Vec<MediaItem>, CatalogError> {
        self.fetch_list("trending/tv/week", &[]).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<MediaItem>, CatalogError> {
        self.fetch_list("search/multi", &[("query", query)]).await
    }

    async fn fetch_list(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<MediaItem>, CatalogError> {
        let mut url = format!(
            "{}/{}?api_key={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(value)));
        }

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api { status, body });
        }

        let payload = resp.json::<Value>().await?;
        let mut items = Vec::new();
        if let Some(results) = payload["results"].as_array() {
            for raw in results {
                // Records the feed mixes in without usable fields
                // (people, malformed entries) are skipped.
                if let Some(item) = MediaItem::from_catalog(raw) {
                    items.push(item);
                }
            }
        }
        debug!(path, count = items.len(), "catalog list fetched");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_joins_base_and_path() {
        assert_eq!(
            image_url("/xyz.jpg"),
            "https://image.tmdb.org/t/p/w780/xyz.jpg"
        );
        assert_eq!(
            image_url("xyz.jpg"),
            "https://image.tmdb.org/t/p/w780/xyz.jpg"
        );
    }
}
