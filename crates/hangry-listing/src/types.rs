//! Listing provider response types.
//!
//! ## Observed shape
//!
//! ### Search
//! `GET restaurant/search` answers `{"restaurants": [...]}`. Each entry carries
//! the provider's opaque `apiKey`, which is the only identifier accepted by the
//! detail and menu endpoints. Address parts and `logoUrl` may be absent.
//!
//! ### `foodTypes`
//! Array of free-text cuisine tags, e.g. `["Thai", "Noodles"]`. May be empty
//! or contain blank strings; cleaned up during normalization.
//!
//! ### Menu
//! `GET restaurant/{apiKey}/menu` answers a bare array of sections, each with
//! a `name` and an ordered `items` array. `basePrice` is usually a JSON number
//! (`8.95`) but some restaurants send a string (`"8.95"`); both are parsed
//! straight into a [`Decimal`] from their raw JSON text, never through `f64`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;

/// Top-level response from `GET restaurant/search`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub restaurants: Vec<ApiRestaurant>,
}

/// Response from `GET restaurant/{apiKey}`.
#[derive(Debug, Deserialize)]
pub struct RestaurantResponse {
    pub restaurant: ApiRestaurant,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRestaurant {
    pub api_key: String,
    pub name: String,
    #[serde(default)]
    pub street_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub food_types: Vec<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Ordering page for the restaurant.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub open: bool,
}

/// One menu section from `GET restaurant/{apiKey}/menu`.
#[derive(Debug, Deserialize)]
pub struct ApiMenuCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ApiMenuItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMenuItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_price")]
    pub base_price: Decimal,
}

/// Parses a price from the exact JSON text the provider sent, so a number
/// keeps its digits and scale (`6.10` stays `6.10`). Quoted prices are
/// unescaped first. Exponent notation is accepted.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let json = raw.get().trim();
    let text = if json.starts_with('"') {
        serde_json::from_str::<String>(json).map_err(serde::de::Error::custom)?
    } else {
        json.to_owned()
    };
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|e| serde::de::Error::custom(format!("invalid price {text:?}: {e}")))
}
