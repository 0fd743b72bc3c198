//! Catalog loading
//!
//! `CatalogSource` is the seam to whatever serves topping catalogs (the REST
//! backend in production, `StaticCatalogSource` in tests). The loader does not
//! retry; that is the source's business.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::catalog::{Catalog, TimingFilter, WireCatalogEntry};
use crate::error::{Error, Result};
use crate::policy::CallPolicy;

/// What catalog to load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    /// Shop identifier, `None` for the global catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,

    #[serde(default)]
    pub timing: TimingFilter,
}

impl CatalogRequest {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn for_store(store_id: impl Into<String>, timing: TimingFilter) -> Self {
        Self {
            store_id: Some(store_id.into()),
            timing,
        }
    }
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch raw catalog rows.
    ///
    /// Unknown shops should fail with `Error::StoreNotFound`, transport
    /// failures with `Error::CatalogUnavailable`.
    async fn fetch_catalog(&self, request: &CatalogRequest) -> Result<Vec<WireCatalogEntry>>;
}

/// Fetch and normalise a catalog
pub async fn load_catalog<S>(
    source: &S,
    request: &CatalogRequest,
    policy: &CallPolicy,
) -> Result<Catalog>
where
    S: CatalogSource + ?Sized,
{
    let rows = source.fetch_catalog(request).await?;
    let catalog = Catalog::from_wire(rows, request.timing, policy);

    debug!(
        "Loaded catalog for {} ({}): {} toppings",
        request.store_id.as_deref().unwrap_or("global"),
        request.timing,
        catalog.len()
    );

    Ok(catalog)
}

/// In-memory catalog source
#[derive(Debug, Clone, Default)]
pub struct StaticCatalogSource {
    global: Vec<WireCatalogEntry>,
    stores: HashMap<String, Vec<WireCatalogEntry>>,
}

impl StaticCatalogSource {
    pub fn new(global: Vec<WireCatalogEntry>) -> Self {
        Self {
            global,
            stores: HashMap::new(),
        }
    }

    pub fn with_store(mut self, store_id: impl Into<String>, rows: Vec<WireCatalogEntry>) -> Self {
        self.stores.insert(store_id.into(), rows);
        self
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_catalog(&self, request: &CatalogRequest) -> Result<Vec<WireCatalogEntry>> {
        match &request.store_id {
            None => Ok(self.global.clone()),
            Some(store_id) => self
                .stores
                .get(store_id)
                .cloned()
                .ok_or_else(|| Error::StoreNotFound(store_id.clone())),
        }
    }
}
