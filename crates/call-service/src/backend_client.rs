//! Client for the J-Navi REST backend

use anyhow::Context;
use async_trait::async_trait;
use jnavi_common::{
    CatalogRequest, CatalogSource, Error, ImageCallTag, PersistedSelection, Result,
    SubmissionRecord, WireCatalogEntry,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Everything the service needs from the persistence backend
#[async_trait]
pub trait StoreBackend: CatalogSource {
    /// Calls already registered for a shop
    async fn fetch_store_calls(&self, store_id: &str) -> Result<Vec<PersistedSelection>>;

    /// Replace a shop's registered calls
    async fn update_store_calls(&self, store_id: &str, records: &[SubmissionRecord]) -> Result<()>;

    /// Attach a menu photo to some of the shop's calls
    async fn tag_image(&self, store_id: &str, payload: &ImageTagPayload) -> Result<()>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Body of `POST /stores/:id/images`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTagPayload {
    pub image_url: String,
    pub topping_calls: Vec<ImageCallTag>,
}

/// Body of `PUT /stores/:id/toppings`
#[derive(Debug, Serialize)]
struct StoreCallsPayload<'a> {
    topping_calls: &'a [SubmissionRecord],
}

/// Store calls response wrapper
#[derive(Debug, Deserialize)]
struct StoreCallsResponse {
    #[serde(default)]
    topping_selections: Vec<PersistedSelection>,
}

/// HTTP implementation of [`StoreBackend`]
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(backend_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: backend_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn catalog_url(&self, request: &CatalogRequest) -> String {
        match &request.store_id {
            Some(store_id) => format!(
                "{}/stores/{}/toppings/calloptions?timing={}",
                self.base_url, store_id, request.timing
            ),
            None => format!("{}/toppings/calloptions?timing={}", self.base_url, request.timing),
        }
    }
}

fn backend_error(err: reqwest::Error) -> Error {
    Error::Backend(err.to_string())
}

#[async_trait]
impl CatalogSource for BackendClient {
    async fn fetch_catalog(&self, request: &CatalogRequest) -> Result<Vec<WireCatalogEntry>> {
        let url = self.catalog_url(request);

        debug!("Fetching topping catalog: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::CatalogUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            if let Some(store_id) = &request.store_id {
                return Err(Error::StoreNotFound(store_id.clone()));
            }
        }

        if !response.status().is_success() {
            return Err(Error::CatalogUnavailable(format!(
                "backend returned {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            Error::CatalogUnavailable(format!("Failed to parse catalog response: {}", e))
        })
    }
}

#[async_trait]
impl StoreBackend for BackendClient {
    async fn fetch_store_calls(&self, store_id: &str) -> Result<Vec<PersistedSelection>> {
        let url = format!("{}/stores/{}/toppings", self.base_url, store_id);

        debug!("Fetching store calls: {}", url);

        let response = self.client.get(&url).send().await.map_err(backend_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::StoreNotFound(store_id.to_string()));
        }

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Failed to fetch store calls: {}",
                response.status()
            )));
        }

        let calls: StoreCallsResponse = response.json().await.map_err(backend_error)?;

        Ok(calls.topping_selections)
    }

    async fn update_store_calls(&self, store_id: &str, records: &[SubmissionRecord]) -> Result<()> {
        let url = format!("{}/stores/{}/toppings", self.base_url, store_id);

        debug!("Updating {} store calls: {}", records.len(), url);

        let response = self
            .client
            .put(&url)
            .json(&StoreCallsPayload {
                topping_calls: records,
            })
            .send()
            .await
            .map_err(backend_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::StoreNotFound(store_id.to_string()));
        }

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Failed to update store calls: {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn tag_image(&self, store_id: &str, payload: &ImageTagPayload) -> Result<()> {
        let url = format!("{}/stores/{}/images", self.base_url, store_id);

        debug!("Tagging image for store {}: {}", store_id, url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(backend_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::StoreNotFound(store_id.to_string()));
        }

        if !response.status().is_success() {
            return Err(Error::Backend(format!("Failed to tag image: {}", response.status())));
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(backend_error)?;
        Ok(response.status().is_success())
    }
}
