use std::time::Duration;

use anyhow::Context;
use market_types::domain::{Entity, RowId};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

#[derive(Clone)]
pub struct MarketClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Typed client for the marketplace HTTP API.
///
/// Every operation is generic over the entity, e.g. `client.list::<User>()`.
/// Mutations return the server's plain-text confirmation.
#[derive(Clone)]
pub struct MarketClient {
    base: Url,
    client: reqwest::Client,
}

impl MarketClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<MarketClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(MarketClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn list<E: Entity>(&self) -> anyhow::Result<Vec<E>> {
        let res = self
            .client
            .get(self.url(&format!("{}/", E::COLLECTION))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn get<E: Entity>(&self, id: RowId) -> anyhow::Result<E> {
        let res = self
            .client
            .get(self.url(&format!("{}/{id}/", E::COLLECTION))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn create<E: Entity>(&self) -> anyhow::Result<String> {
        let res = self
            .client
            .post(self.url(&format!("{}/create/", E::COLLECTION))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.text().await?)
    }

    pub async fn update<E: Entity>(&self, id: RowId) -> anyhow::Result<String> {
        let res = self
            .client
            .put(self.url(&format!("{}/{id}/update/", E::COLLECTION))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.text().await?)
    }

    pub async fn delete<E: Entity>(&self, id: RowId) -> anyhow::Result<String> {
        let res = self
            .client
            .delete(self.url(&format!("{}/{id}/delete/", E::COLLECTION))?)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.text().await?)
    }
}

impl MarketClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<MarketClient> {
        if let Some(client) = self.client {
            return Ok(MarketClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(MarketClient {
            base: self.base,
            client,
        })
    }
}
