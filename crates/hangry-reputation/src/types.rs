//! Reputation provider response types.
//!
//! `rating` on a business is a float in half-star steps. Businesses with no
//! reviews have been observed with `rating: 0` or no `rating` at all; both are
//! modelled as `Option<f64>` and filtered during normalization.
//!
//! Search results carry a single `image_url`; the business detail endpoint
//! carries a `photos` array of up to three URLs.

use serde::Deserialize;

/// Response from `POST oauth2/token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds. Absent on some legacy responses.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Response from `GET v3/businesses/search`.
#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub businesses: Vec<ApiBusiness>,
}

/// A business from search (`GET v3/businesses/search`) or detail
/// (`GET v3/businesses/{id}`).
#[derive(Debug, Deserialize)]
pub struct ApiBusiness {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub location: Option<ApiLocation>,
    /// Only populated by the detail endpoint.
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiLocation {
    #[serde(default)]
    pub city: Option<String>,
}

/// Response from `GET v3/businesses/{id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewsResponse {
    #[serde(default)]
    pub reviews: Vec<ApiReview>,
}

#[derive(Debug, Deserialize)]
pub struct ApiReview {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `"YYYY-MM-DD HH:MM:SS"` in the business's local time.
    #[serde(default)]
    pub time_created: Option<String>,
    #[serde(default)]
    pub user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub name: Option<String>,
}
