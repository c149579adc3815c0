use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson;

use crate::database::MongoCampgroundStore;
use crate::error::Error;
use crate::review::ReviewId;

use super::{Campground, CampgroundFields, CampgroundId};

#[async_trait]
pub trait CampgroundStore: Send + Sync {
    async fn insert_campground(&self, campground: &Campground) -> Result<(), Error>;

    async fn fetch_campgrounds(&self) -> Result<Vec<Campground>, Error>;

    async fn fetch_campground_by_id(
        &self,
        campground_id: CampgroundId,
    ) -> Result<Option<Campground>, Error>;

    async fn update_campground_fields(
        &self,
        campground: Campground,
        fields: CampgroundFields,
    ) -> Result<Campground, Error>;

    /// Returns the document as it was when removed, or None if no campground
    /// had the given id.
    async fn delete_campground(
        &self,
        campground_id: CampgroundId,
    ) -> Result<Option<Campground>, Error>;

    /// Returns false if no campground had the given id.
    async fn push_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<bool, Error>;

    /// Returns the index the reference was held at, or None unless the
    /// campground exists and held it.
    async fn pull_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<Option<usize>, Error>;

    /// Puts a pulled reference back at `position`. Does nothing and returns
    /// false if the campground is gone or already holds the reference.
    async fn restore_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
        position: usize,
    ) -> Result<bool, Error>;
}

#[async_trait]
impl CampgroundStore for MongoCampgroundStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campground(&self, campground: &Campground) -> Result<(), Error> {
        self.insert_one(campground, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campgrounds(&self) -> Result<Vec<Campground>, Error> {
        let campgrounds: Vec<Campground> = self
            .find(bson::doc! {}, None)
            .await?
            .try_collect()
            .await?;

        Ok(campgrounds)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campground_by_id(
        &self,
        campground_id: CampgroundId,
    ) -> Result<Option<Campground>, Error> {
        let campground: Option<Campground> = self
            .find_one(bson::doc! { "_id": campground_id }, None)
            .await?;

        Ok(campground)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campground_fields(
        &self,
        mut campground: Campground,
        fields: CampgroundFields,
    ) -> Result<Campground, Error> {
        let now = Utc::now();
        let mut update = bson::to_document(&fields)?;
        update.insert("modified_at", bson::DateTime::from_chrono(now));

        let result = self
            .update_one(
                bson::doc! { "_id": campground.id },
                bson::doc! { "$set": update },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(Error::CampgroundNotFound {
                campground_id: campground.id,
            });
        }

        campground.apply(fields);
        campground.modified_at = now;

        Ok(campground)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campground(
        &self,
        campground_id: CampgroundId,
    ) -> Result<Option<Campground>, Error> {
        let campground = self
            .find_one_and_delete(bson::doc! { "_id": campground_id }, None)
            .await?;

        Ok(campground)
    }

    #[tracing::instrument(skip(self))]
    async fn push_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<bool, Error> {
        let result = self
            .update_one(
                bson::doc! { "_id": campground_id },
                bson::doc! { "$push": { "reviews": review_id } },
                None,
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn pull_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> Result<Option<usize>, Error> {
        // the document is returned as it was before the pull
        let campground = self
            .find_one_and_update(
                bson::doc! { "_id": campground_id, "reviews": review_id },
                bson::doc! { "$pull": { "reviews": review_id } },
                None,
            )
            .await?;

        Ok(campground.and_then(|campground| {
            campground.reviews.iter().position(|id| *id == review_id)
        }))
    }

    #[tracing::instrument(skip(self))]
    async fn restore_review(
        &self,
        campground_id: CampgroundId,
        review_id: ReviewId,
        position: usize,
    ) -> Result<bool, Error> {
        let result = self
            .update_one(
                bson::doc! { "_id": campground_id, "reviews": { "$ne": review_id } },
                bson::doc! {
                    "$push": {
                        "reviews": { "$each": [review_id], "$position": position as i64 }
                    }
                },
                None,
            )
            .await?;

        Ok(result.modified_count > 0)
    }
}
