use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseCategoryError;

/// One product as handed to presentation. `media_url` is absolute or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignEntry {
    pub id: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryTag {
    Classic,
    ZeroSugar,
    Diet,
}

impl CategoryTag {
    pub const ALL: [CategoryTag; 3] = [Self::Classic, Self::ZeroSugar, Self::Diet];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::ZeroSugar => "zero-sugar",
            Self::Diet => "diet",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Classic => "Classic",
            Self::ZeroSugar => "Zero Sugar",
            Self::Diet => "Diet",
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Category filter chosen by the shell. `All` is the pass-through sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterSelection {
    #[default]
    All,
    Category(CategoryTag),
}

impl FilterSelection {
    /// Every selectable value in display order, sentinel first.
    pub fn options() -> impl Iterator<Item = FilterSelection> {
        std::iter::once(Self::All).chain(CategoryTag::ALL.into_iter().map(Self::Category))
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Category(tag) => tag.slug(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Category(tag) => tag.label(),
        }
    }
}

impl FromStr for FilterSelection {
    type Err = ParseCategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        CategoryTag::ALL
            .into_iter()
            .find(|tag| tag.slug().eq_ignore_ascii_case(value))
            .map(Self::Category)
            .ok_or_else(|| ParseCategoryError {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Client-visible state of one collection fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchState<T> {
    Loading,
    Empty,
    Error { message: String },
    Ready { items: Vec<T> },
}

impl<T> FetchState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Empty => "empty",
            Self::Error { .. } => "error",
            Self::Ready { .. } => "ready",
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready { items } => items,
            _ => &[],
        }
    }

    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> FetchState<U> {
        match self {
            Self::Loading => FetchState::Loading,
            Self::Empty => FetchState::Empty,
            Self::Error { message } => FetchState::Error { message },
            Self::Ready { items } => FetchState::Ready { items: f(items) },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
