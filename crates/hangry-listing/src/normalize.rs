//! Normalization from raw listing provider types to [`hangry_core::ListingRecord`].

use std::collections::BTreeSet;

use hangry_core::{ListingRecord, MenuItem, ProviderError};

use crate::types::{ApiMenuCategory, ApiRestaurant, SearchResponse};

/// Converts one search/detail entry into a [`ListingRecord`] with an empty menu.
#[must_use]
pub fn normalize_restaurant(restaurant: ApiRestaurant) -> ListingRecord {
    let cuisines: BTreeSet<String> = restaurant
        .food_types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect();

    ListingRecord {
        provider_id: restaurant.api_key,
        name: restaurant.name.trim().to_owned(),
        street_address: non_blank(restaurant.street_address),
        city: non_blank(restaurant.city),
        state: non_blank(restaurant.state),
        zip: non_blank(restaurant.zip),
        is_open: restaurant.open,
        order_url: non_blank(restaurant.url),
        logo_url: non_blank(restaurant.logo_url),
        cuisines,
        menu: Vec::new(),
    }
}

/// Flattens menu sections into items, keeping section order and item order.
#[must_use]
pub fn normalize_menu(categories: Vec<ApiMenuCategory>) -> Vec<MenuItem> {
    categories
        .into_iter()
        .flat_map(|category| {
            let section = category.name.trim().to_owned();
            category.items.into_iter().map(move |item| MenuItem {
                name: item.name.trim().to_owned(),
                description: non_blank(item.description),
                price: item.base_price,
                category: section.clone(),
            })
        })
        .collect()
}

/// Parses a raw search response body into listing records, preserving the
/// provider's order.
///
/// # Errors
///
/// Returns [`ProviderError::Deserialize`] if the body is not a search response.
pub fn parse_restaurants(json: &str) -> Result<Vec<ListingRecord>, ProviderError> {
    let parsed: SearchResponse =
        serde_json::from_str(json).map_err(|e| ProviderError::Deserialize {
            context: "listing search response".to_owned(),
            source: e,
        })?;
    Ok(parsed
        .restaurants
        .into_iter()
        .map(normalize_restaurant)
        .collect())
}

/// Parses a raw menu response body into menu items.
///
/// # Errors
///
/// Returns [`ProviderError::Deserialize`] if the body is not a menu response.
pub fn parse_menu(json: &str) -> Result<Vec<MenuItem>, ProviderError> {
    let parsed: Vec<ApiMenuCategory> =
        serde_json::from_str(json).map_err(|e| ProviderError::Deserialize {
            context: "listing menu response".to_owned(),
            source: e,
        })?;
    Ok(normalize_menu(parsed))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn api_restaurant(food_types: &[&str]) -> ApiRestaurant {
        ApiRestaurant {
            api_key: "90fd4587554469b1f15b4f2e73e761809f4b4bcca52eedca".to_owned(),
            name: " Lers Ros Thai ".to_owned(),
            street_address: Some("730 Larkin St".to_owned()),
            city: Some("San Francisco".to_owned()),
            state: Some("CA".to_owned()),
            zip: Some(String::new()),
            food_types: food_types.iter().map(|s| (*s).to_owned()).collect(),
            logo_url: Some("https://cdn.example.com/logo.png".to_owned()),
            url: Some("https://order.example.com/lers-ros".to_owned()),
            open: true,
        }
    }

    #[test]
    fn normalize_restaurant_trims_and_dedupes_cuisines() {
        let record = normalize_restaurant(api_restaurant(&["Thai", " Noodles", "Thai", "  "]));
        let cuisines: Vec<&str> = record.cuisines.iter().map(String::as_str).collect();
        assert_eq!(cuisines, ["Noodles", "Thai"]);
    }

    #[test]
    fn normalize_restaurant_drops_blank_fields() {
        let record = normalize_restaurant(api_restaurant(&[]));
        assert_eq!(record.name, "Lers Ros Thai");
        assert!(record.zip.is_none());
        assert!(record.is_open);
        assert!(record.menu.is_empty());
        assert_eq!(
            record.order_url.as_deref(),
            Some("https://order.example.com/lers-ros")
        );
    }

    #[test]
    fn parse_menu_keeps_section_and_item_order() {
        let json = r#"[
            {"name": "Appetizers", "items": [
                {"apiKey": "a1", "name": "Spring Rolls", "basePrice": 6.5},
                {"apiKey": "a2", "name": "Satay", "description": "", "basePrice": 8.95}
            ]},
            {"name": "Noodles", "items": [
                {"apiKey": "n1", "name": "Pad See Ew", "description": "Wide rice noodles", "basePrice": "12.00"}
            ]}
        ]"#;
        let menu = parse_menu(json).unwrap();
        let names: Vec<&str> = menu.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Spring Rolls", "Satay", "Pad See Ew"]);
        assert_eq!(menu[1].category, "Appetizers");
        assert!(menu[1].description.is_none());
        assert_eq!(menu[1].price, Decimal::new(895, 2));
        assert_eq!(menu[2].price.to_string(), "12.00");
    }

    #[test]
    fn parse_restaurants_rejects_wrong_shape() {
        let result = parse_restaurants(r#"{"restaurants": "nope"}"#);
        assert!(matches!(result, Err(ProviderError::Deserialize { .. })));
    }

    #[test]
    fn parse_restaurants_accepts_missing_list() {
        let records = parse_restaurants("{}").unwrap();
        assert!(records.is_empty());
    }
}
