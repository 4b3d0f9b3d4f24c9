//! Client for the reputation provider: OAuth2 client-credentials auth,
//! business search, reviews, and photos.

pub mod client;
pub mod normalize;
pub mod token;
pub mod types;

pub use client::{ReputationClient, ReputationClientConfig};
pub use normalize::{normalize_business, normalize_review};
pub use token::TokenCache;
