use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson;

use crate::database::MongoReviewStore;
use crate::error::Error;

use super::{Review, ReviewId};

#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert_review(&self, review: &Review) -> Result<(), Error>;

    /// Order of the result is unspecified.
    async fn fetch_reviews_by_ids(&self, review_ids: &[ReviewId]) -> Result<Vec<Review>, Error>;

    /// Returns false if no review had the given id.
    async fn delete_review(&self, review_id: ReviewId) -> Result<bool, Error>;

    async fn delete_reviews_by_ids(&self, review_ids: &[ReviewId]) -> Result<u64, Error>;
}

#[async_trait]
impl ReviewStore for MongoReviewStore {
    #[tracing::instrument(skip(self))]
    async fn insert_review(&self, review: &Review) -> Result<(), Error> {
        self.insert_one(review, None).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_reviews_by_ids(&self, review_ids: &[ReviewId]) -> Result<Vec<Review>, Error> {
        if review_ids.is_empty() {
            return Ok(vec![]);
        }

        let reviews: Vec<Review> = self
            .find(bson::doc! { "_id": { "$in": review_ids.to_vec() } }, None)
            .await?
            .try_collect()
            .await?;

        Ok(reviews)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_review(&self, review_id: ReviewId) -> Result<bool, Error> {
        let result = self.delete_one(bson::doc! { "_id": review_id }, None).await?;

        Ok(result.deleted_count > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_reviews_by_ids(&self, review_ids: &[ReviewId]) -> Result<u64, Error> {
        if review_ids.is_empty() {
            return Ok(0);
        }

        let result = self
            .delete_many(bson::doc! { "_id": { "$in": review_ids.to_vec() } }, None)
            .await?;

        Ok(result.deleted_count)
    }
}
