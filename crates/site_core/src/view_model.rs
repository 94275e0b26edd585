use shared::domain::{CatalogEntry, FetchState, FilterSelection};
use url::Url;

use crate::normalizer::NormalizeError;

/// Entries visible under `selection`, in their original order.
pub fn build_view_model(entries: &[CatalogEntry], selection: FilterSelection) -> Vec<CatalogEntry> {
    match selection {
        FilterSelection::All => entries.to_vec(),
        FilterSelection::Category(tag) => entries
            .iter()
            .filter(|entry| entry.category.as_deref() == Some(tag.slug()))
            .cloned()
            .collect(),
    }
}

/// Absolute form of a media path served by the content service.
///
/// Relative paths are appended to `base_url`; anything that already parses as
/// an absolute URL (`https:`, `data:`, `blob:`, ...) is returned untouched so
/// it is never prefixed twice.
pub fn resolve_media_url(base_url: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if Url::parse(path).is_ok() {
        return Some(path.to_string());
    }

    let base_url = base_url.trim_end_matches('/');
    if let Some(rest) = path.strip_prefix("//") {
        let scheme = Url::parse(base_url)
            .map(|base| base.scheme().to_string())
            .unwrap_or_else(|_| "http".to_string());
        return Some(format!("{scheme}://{rest}"));
    }
    if path.starts_with('/') {
        Some(format!("{base_url}{path}"))
    } else {
        Some(format!("{base_url}/{path}"))
    }
}

/// Terminal state for a cycle whose payload was received and decoded.
pub fn state_from_normalized<T>(normalized: Result<Vec<T>, NormalizeError>) -> FetchState<T> {
    match normalized {
        Ok(items) if !items.is_empty() => FetchState::Ready { items },
        Ok(_) | Err(_) => FetchState::Empty,
    }
}

/// Applies a filter to a loaded catalog, keeping non-ready states as they are.
///
/// A filter that matches nothing still yields `Ready` with no items; the shell
/// decides how to word that.
pub fn filter_state(
    state: &FetchState<CatalogEntry>,
    selection: FilterSelection,
) -> FetchState<CatalogEntry> {
    state
        .clone()
        .map_items(|items| build_view_model(&items, selection))
}

#[cfg(test)]
#[path = "tests/view_model_tests.rs"]
mod tests;
