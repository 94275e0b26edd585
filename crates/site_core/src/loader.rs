use std::future::Future;

use content_client::ContentService;
use serde::Serialize;
use shared::{
    domain::{CampaignEntry, CatalogEntry, FetchState},
    error::{FetchError, FetchErrorKind},
    protocol::{CollectionQuery, RawPayload},
};
use tracing::{error, info, warn};

use crate::{
    normalizer::{normalize_campaigns, normalize_products, NormalizeError},
    view_model::state_from_normalized,
};

pub const PRODUCTS_COLLECTION: &str = "products";
pub const CAMPAIGNS_COLLECTION: &str = "campaigns";
pub const PRODUCT_MEDIA_RELATION: &str = "image";

pub const PRODUCTS_LOAD_FAILED: &str = "Failed to load products.";
pub const CAMPAIGNS_LOAD_FAILED: &str = "Failed to load campaigns.";

/// Maps one completed read to the state the shell should show.
///
/// Transport and status failures become `Error` with `failure_message`; a body
/// that is not a usable sequence becomes `Empty`.
pub fn state_from_fetch<T>(
    collection: &str,
    result: Result<RawPayload, FetchError>,
    normalize: impl FnOnce(&RawPayload) -> Result<Vec<T>, NormalizeError>,
    failure_message: &str,
) -> FetchState<T> {
    let payload = match result {
        Ok(payload) => payload,
        Err(err) if err.kind() == FetchErrorKind::MalformedPayload => {
            warn!(collection, error = %err, "content: malformed payload treated as empty");
            return FetchState::Empty;
        }
        Err(err) => {
            error!(collection, error = %err, "content: collection fetch failed");
            return FetchState::Error {
                message: failure_message.to_string(),
            };
        }
    };

    let normalized = normalize(&payload);
    if let Err(reason) = &normalized {
        warn!(collection, %reason, "content: nothing to show");
    }
    let state = state_from_normalized(normalized);
    if let FetchState::Ready { items } = &state {
        info!(collection, count = items.len(), "content: collection ready");
    }
    state
}

pub async fn load_products(service: &dyn ContentService) -> FetchState<CatalogEntry> {
    let result = service
        .fetch_collection(
            PRODUCTS_COLLECTION,
            &CollectionQuery::populate(PRODUCT_MEDIA_RELATION),
        )
        .await;
    let base_url = service.base_url();
    state_from_fetch(
        PRODUCTS_COLLECTION,
        result,
        |payload| normalize_products(payload, base_url),
        PRODUCTS_LOAD_FAILED,
    )
}

pub async fn load_campaigns(service: &dyn ContentService) -> FetchState<CampaignEntry> {
    let result = service
        .fetch_collection(CAMPAIGNS_COLLECTION, &CollectionQuery::default())
        .await;
    state_from_fetch(
        CAMPAIGNS_COLLECTION,
        result,
        normalize_campaigns,
        CAMPAIGNS_LOAD_FAILED,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomePage {
    pub products: FetchState<CatalogEntry>,
    pub campaigns: FetchState<CampaignEntry>,
}

/// Loads both collections the landing page shows; neither failure masks the other.
pub async fn load_home(service: &dyn ContentService) -> HomePage {
    let (products, campaigns) = tokio::join!(load_products(service), load_campaigns(service));
    HomePage {
        products,
        campaigns,
    }
}

/// Token for one fetch cycle of a [`CollectionView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCycle(u64);

/// Holds the visible state of one collection across re-fetches.
///
/// Each `begin` starts a new cycle and moves back to `Loading`. A result is
/// applied only if it belongs to the current cycle, the view is still loading
/// and it has not been disposed, so late answers from superseded requests are
/// dropped instead of overwriting newer state.
#[derive(Debug)]
pub struct CollectionView<T> {
    state: FetchState<T>,
    cycle: u64,
    disposed: bool,
}

impl<T> Default for CollectionView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionView<T> {
    pub fn new() -> Self {
        Self {
            state: FetchState::Loading,
            cycle: 0,
            disposed: false,
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn begin(&mut self) -> FetchCycle {
        self.cycle += 1;
        self.state = FetchState::Loading;
        FetchCycle(self.cycle)
    }

    /// Returns whether `state` was applied.
    pub fn resolve(&mut self, cycle: FetchCycle, state: FetchState<T>) -> bool {
        if self.disposed || cycle.0 != self.cycle {
            return false;
        }
        if self.state.is_terminal() || !state.is_terminal() {
            return false;
        }
        self.state = state;
        true
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Runs one full cycle: `Loading`, await `load`, apply its result.
    pub async fn refresh<F>(&mut self, load: F) -> &FetchState<T>
    where
        F: Future<Output = FetchState<T>>,
    {
        let cycle = self.begin();
        let state = load.await;
        self.resolve(cycle, state);
        &self.state
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
