//! Normalization from reputation provider types to [`hangry_core::ReputationRecord`].

use chrono::NaiveDateTime;
use hangry_core::{ReputationRecord, ReviewSnippet};

use crate::types::{ApiBusiness, ApiReview};

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

/// Converts a business into a [`ReputationRecord`] with at most `photo_limit`
/// photos and no reviews.
///
/// Returns `None` when the rating is missing or outside `[1.0, 5.0]`.
#[must_use]
pub fn normalize_business(business: ApiBusiness, photo_limit: usize) -> Option<ReputationRecord> {
    let rating = match business.rating {
        Some(r) if (MIN_RATING..=MAX_RATING).contains(&r) => r,
        other => {
            tracing::warn!(
                business_id = %business.id,
                rating = ?other,
                "dropping reputation candidate without a valid rating"
            );
            return None;
        }
    };

    let mut photos: Vec<String> = business
        .photos
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect();
    if photos.is_empty() {
        photos.extend(business.image_url.filter(|p| !p.trim().is_empty()));
    }
    photos.truncate(photo_limit);

    Some(ReputationRecord {
        external_id: business.id,
        name: business.name,
        city: business
            .location
            .and_then(|l| l.city)
            .filter(|c| !c.trim().is_empty()),
        rating,
        review_count: business.review_count.unwrap_or(0),
        url: business.url,
        reviews: Vec::new(),
        photos,
    })
}

#[must_use]
pub fn normalize_review(review: ApiReview) -> ReviewSnippet {
    ReviewSnippet {
        rating: review.rating.clamp(1, 5),
        text: review.text.trim().to_owned(),
        author: review.user.and_then(|u| u.name),
        url: review.url,
        created_at: review
            .time_created
            .as_deref()
            .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").ok()),
    }
}
