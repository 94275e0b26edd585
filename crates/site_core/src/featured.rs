use shared::domain::{CatalogEntry, CategoryTag, FilterSelection};

use crate::view_model::{build_view_model, resolve_media_url};

struct FeaturedProduct {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    asset: &'static str,
    category: CategoryTag,
}

const FEATURED: [FeaturedProduct; 3] = [
    FeaturedProduct {
        id: "classic",
        name: "Coca-Cola Classic",
        description: "The original, refreshing taste that started it all.",
        asset: "/coke-classic.jpg",
        category: CategoryTag::Classic,
    },
    FeaturedProduct {
        id: "zero",
        name: "Coca-Cola Zero",
        description: "Bold flavor with zero sugar, perfect for any moment.",
        asset: "/coke-zero.jpg",
        category: CategoryTag::ZeroSugar,
    },
    FeaturedProduct {
        id: "diet",
        name: "Diet Coke",
        description: "Light, crisp, and refreshing with no calories.",
        asset: "/coke-diet.jpg",
        category: CategoryTag::Diet,
    },
];

/// Landing-page lineup bundled with the site; images live under `site_url`.
pub fn featured_products(site_url: &str) -> Vec<CatalogEntry> {
    FEATURED
        .iter()
        .map(|product| CatalogEntry {
            id: product.id.to_string(),
            name: product.name.to_string(),
            description: product.description.to_string(),
            price: None,
            category: Some(product.category.slug().to_string()),
            media_url: resolve_media_url(site_url, product.asset),
        })
        .collect()
}

pub fn featured_view(site_url: &str, selection: FilterSelection) -> Vec<CatalogEntry> {
    build_view_model(&featured_products(site_url), selection)
}
