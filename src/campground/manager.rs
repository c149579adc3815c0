use std::collections::HashMap;

use chrono::Utc;

use crate::database::Database;
use crate::error::Error;
use crate::review::Review;

use super::{Campground, CampgroundFields, CampgroundId};

#[tracing::instrument(skip(db))]
pub async fn create_campground(
    db: &dyn Database,
    fields: CampgroundFields,
) -> Result<Campground, Error> {
    let now = Utc::now();
    let campground = Campground {
        id: CampgroundId::new(),
        title: fields.title,
        price: fields.price,
        image: fields.image,
        location: fields.location,
        description: fields.description,
        reviews: vec![],
        created_at: now,
        modified_at: now,
    };

    db.campgrounds().insert_campground(&campground).await?;

    Ok(campground)
}

#[tracing::instrument(skip(db))]
pub async fn get_campgrounds(db: &dyn Database) -> Result<Vec<Campground>, Error> {
    let campgrounds = db.campgrounds().fetch_campgrounds().await?;

    Ok(campgrounds)
}

#[tracing::instrument(skip(db))]
pub async fn get_campground_by_id(
    db: &dyn Database,
    campground_id: CampgroundId,
) -> Result<Campground, Error> {
    let campground = db
        .campgrounds()
        .fetch_campground_by_id(campground_id)
        .await?
        .ok_or(Error::CampgroundNotFound { campground_id })?;

    Ok(campground)
}

/// Fetches a campground along with its reviews, in the order they were
/// attached. References to reviews that no longer exist are skipped.
#[tracing::instrument(skip(db))]
pub async fn get_campground_with_reviews(
    db: &dyn Database,
    campground_id: CampgroundId,
) -> Result<(Campground, Vec<Review>), Error> {
    let campground = get_campground_by_id(db, campground_id).await?;

    let mut reviews: HashMap<_, _> = db
        .reviews()
        .fetch_reviews_by_ids(&campground.reviews)
        .await?
        .into_iter()
        .map(|review| (review.id, review))
        .collect();

    if reviews.len() < campground.reviews.len() {
        tracing::warn!(
            %campground_id,
            expected = campground.reviews.len(),
            found = reviews.len(),
            "campground references missing reviews"
        );
    }

    let reviews = campground
        .reviews
        .iter()
        .filter_map(|review_id| reviews.remove(review_id))
        .collect();

    Ok((campground, reviews))
}

#[tracing::instrument(skip(db))]
pub async fn update_campground(
    db: &dyn Database,
    campground_id: CampgroundId,
    fields: CampgroundFields,
) -> Result<Campground, Error> {
    let campground = get_campground_by_id(db, campground_id).await?;

    db.campgrounds()
        .update_campground_fields(campground, fields)
        .await
}

/// Deletes the campground and every review attached to it.
#[tracing::instrument(skip(db))]
pub async fn delete_campground(
    db: &dyn Database,
    campground_id: CampgroundId,
) -> Result<(), Error> {
    // cascade over the references held by the document as it was removed
    let campground = db
        .campgrounds()
        .delete_campground(campground_id)
        .await?
        .ok_or(Error::CampgroundNotFound { campground_id })?;

    let deleted = db
        .reviews()
        .delete_reviews_by_ids(&campground.reviews)
        .await?;

    tracing::debug!(%campground_id, reviews = deleted, "deleted campground");

    Ok(())
}
