//! Response shapes handed to the web layer.
//!
//! Pure mappings from the aggregation types. Field names are camelCase;
//! `rating` and `reviewCount` are `null` without a match and `matched` says
//! so explicitly, so "no data" never reads as a zero rating.

use chrono::NaiveDateTime;
use hangry_core::{CuisineDistribution, Degradation, MenuItem, ReviewSnippet, UnifiedRestaurant};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    pub name: String,
    pub is_open: bool,
    pub order_url: Option<String>,
    pub logo_url: Option<String>,
    pub cuisines: Vec<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub photos: Vec<String>,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<DegradedView>,
}

/// Present when the reputation side failed rather than found nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DegradedView {
    pub reason: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailView {
    #[serde(flatten)]
    pub restaurant: RestaurantView,
    pub address: Option<String>,
    pub reputation_url: Option<String>,
    pub menu: Vec<MenuItemView>,
    pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemView {
    pub name: String,
    pub description: Option<String>,
    /// Serialized as a decimal string so no consumer parses it as a float.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub rating: u8,
    pub text: String,
    pub author: Option<String>,
    pub url: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuisineCountView {
    pub category: String,
    pub count: usize,
}

#[must_use]
pub fn format_restaurant(restaurant: &UnifiedRestaurant) -> RestaurantView {
    let listing = &restaurant.listing;
    let matched = restaurant.reputation.as_matched();

    RestaurantView {
        name: listing.name.clone(),
        is_open: listing.is_open,
        order_url: listing.order_url.clone(),
        logo_url: listing.logo_url.clone(),
        cuisines: listing.cuisines.iter().cloned().collect(),
        rating: matched.map(|r| r.rating),
        review_count: matched.map(|r| r.review_count),
        photos: matched.map(|r| r.photos.clone()).unwrap_or_default(),
        matched: matched.is_some(),
        degraded: restaurant.degradation.as_ref().map(format_degradation),
    }
}

/// Detail view: the summary fields plus menu, reviews, and addresses.
#[must_use]
pub fn format_detail(restaurant: &UnifiedRestaurant) -> RestaurantDetailView {
    let listing = &restaurant.listing;
    let matched = restaurant.reputation.as_matched();
    let address = listing.location_query("");

    RestaurantDetailView {
        restaurant: format_restaurant(restaurant),
        address: (!address.is_empty()).then_some(address),
        reputation_url: matched.and_then(|r| r.url.clone()),
        menu: listing.menu.iter().map(format_menu_item).collect(),
        reviews: matched
            .map(|r| r.reviews.iter().map(format_review).collect())
            .unwrap_or_default(),
    }
}

/// Chart data, already in the distribution's deterministic order.
#[must_use]
pub fn format_distribution(distribution: &CuisineDistribution) -> Vec<CuisineCountView> {
    distribution
        .entries()
        .iter()
        .map(|e| CuisineCountView {
            category: e.category.clone(),
            count: e.count,
        })
        .collect()
}

fn format_menu_item(item: &MenuItem) -> MenuItemView {
    MenuItemView {
        name: item.name.clone(),
        description: item.description.clone(),
        price: item.price,
        category: item.category.clone(),
    }
}

fn format_review(review: &ReviewSnippet) -> ReviewView {
    ReviewView {
        rating: review.rating,
        text: review.text.clone(),
        author: review.author.clone(),
        url: review.url.clone(),
        created_at: review.created_at,
    }
}

fn format_degradation(degradation: &Degradation) -> DegradedView {
    DegradedView {
        reason: degradation.kind.to_owned(),
        message: degradation.message.clone(),
        retry_after_secs: degradation.retry_after_secs,
    }
}

#[cfg(test)]
#[path = "format_test.rs"]
mod tests;
