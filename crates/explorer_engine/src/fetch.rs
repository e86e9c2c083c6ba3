use std::time::Duration;

use explorer_logging::{explorer_debug, explorer_trace};
use futures_util::future::try_join_all;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::catalog::{
    country_page, joke_item, parse_url, pokemon_detail_item, pokemon_item, Country, Joke,
    PokemonDetail, PokemonListing,
};
use crate::{Catalog, CatalogItem, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 8 * 1024 * 1024,
            allowed_content_types: vec!["application/json".to_string()],
        }
    }
}

/// A paged remote collection. One call yields the items of one page, in the
/// order the remote returned them.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, FetchError>;
}

/// `PageSource` for one of the public catalogs, over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    catalog: Catalog,
    base_url: String,
    settings: FetchSettings,
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(
        catalog: Catalog,
        base_url: impl Into<String>,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            catalog,
            base_url: base_url.into(),
            settings,
            client,
        })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        explorer_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        if let Some(ct) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
        {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn get_json<D: DeserializeOwned>(&self, url: Url) -> Result<D, FetchError> {
        let bytes = self.get_bytes(url).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }
}

#[async_trait::async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<CatalogItem>, FetchError> {
        let url = self.catalog.page_url(&self.base_url, offset, limit)?;
        let items = match self.catalog {
            Catalog::Pokemon { details: false } => {
                let listing: PokemonListing = self.get_json(url).await?;
                listing.results.into_iter().map(pokemon_item).collect()
            }
            Catalog::Pokemon { details: true } => {
                let listing: PokemonListing = self.get_json(url).await?;
                let lookups = listing
                    .results
                    .into_iter()
                    .map(|entry| async move {
                        let detail: PokemonDetail = self.get_json(parse_url(&entry.url)?).await?;
                        Ok::<_, FetchError>(pokemon_detail_item(detail))
                    });
                try_join_all(lookups).await?
            }
            Catalog::Countries => {
                let all: Vec<Country> = self.get_json(url).await?;
                country_page(all, offset, limit)
            }
            Catalog::Jokes => {
                let jokes: Vec<Joke> = self.get_json(url).await?;
                jokes.into_iter().map(joke_item).collect()
            }
        };
        explorer_debug!(
            "{:?} page at offset {} yielded {} item(s)",
            self.catalog,
            offset,
            items.len()
        );
        Ok(items)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
