use async_trait::async_trait;
use mongodb::{bson, Collection};

use crate::campground::db::CampgroundStore;
use crate::campground::Campground;
use crate::error::Error;
use crate::review::db::ReviewStore;
use crate::review::Review;

pub type MongoCampgroundStore = Collection<Campground>;
pub type MongoReviewStore = Collection<Review>;

/// Handle to every collection the application touches. Constructed once at
/// startup and shared by all workers.
#[async_trait]
pub trait Database: Send + Sync {
    fn campgrounds(&self) -> &dyn CampgroundStore;

    fn reviews(&self) -> &dyn ReviewStore;

    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campgrounds: MongoCampgroundStore,
    reviews: MongoReviewStore,
    db: mongodb::Database,
}

impl MongoDatabase {
    #[tracing::instrument(skip(db))]
    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        // fail fast if the server is unreachable
        db.run_command(bson::doc! { "ping": 1 }, None).await?;

        Ok(MongoDatabase {
            campgrounds: db.collection("campgrounds"),
            reviews: db.collection("reviews"),
            db,
        })
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campgrounds(&self) -> &dyn CampgroundStore {
        &self.campgrounds
    }

    fn reviews(&self) -> &dyn ReviewStore {
        &self.reviews
    }

    #[tracing::instrument(skip(self))]
    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}
