//! Client for the listing provider: restaurant search, restaurant detail,
//! and menus, authenticated with a static API key.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::ListingClient;
pub use normalize::{normalize_menu, normalize_restaurant, parse_menu, parse_restaurants};
pub use types::{ApiMenuCategory, ApiMenuItem, ApiRestaurant, RestaurantResponse, SearchResponse};
