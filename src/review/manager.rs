use chrono::Utc;

use crate::campground::{manager as campground_manager, CampgroundId};
use crate::database::Database;
use crate::error::Error;

use super::{Review, ReviewFields, ReviewId};

/// Stores a new review and attaches it to the campground. The review is
/// removed again if it could not be attached.
#[tracing::instrument(skip(db))]
pub async fn create_review(
    db: &dyn Database,
    campground_id: CampgroundId,
    fields: ReviewFields,
) -> Result<Review, Error> {
    let campground = campground_manager::get_campground_by_id(db, campground_id).await?;

    let review = Review {
        id: ReviewId::new(),
        body: fields.body,
        rating: fields.rating,
        created_at: Utc::now(),
    };

    db.reviews().insert_review(&review).await?;

    let error = match db.campgrounds().push_review(campground.id, review.id).await {
        Ok(true) => return Ok(review),
        Ok(false) => Error::CampgroundNotFound { campground_id },
        Err(err) => err,
    };

    if let Err(err) = db.reviews().delete_review(review.id).await {
        tracing::error!(review_id = %review.id, error = %err, "failed to remove unattached review");
    }

    Err(error)
}

/// Detaches the review from the campground, then deletes it. The reference is
/// restored to its old place if the review could not be deleted.
#[tracing::instrument(skip(db))]
pub async fn delete_review(
    db: &dyn Database,
    campground_id: CampgroundId,
    review_id: ReviewId,
) -> Result<(), Error> {
    let campground = campground_manager::get_campground_by_id(db, campground_id).await?;

    let position = db
        .campgrounds()
        .pull_review(campground.id, review_id)
        .await?
        .ok_or(Error::ReviewNotFoundInCampground {
            campground_id,
            review_id,
        })?;

    match db.reviews().delete_review(review_id).await {
        Ok(true) => Ok(()),
        Ok(false) => {
            // the reference was dangling, dropping it is all there was to do
            tracing::warn!(%campground_id, %review_id, "removed reference to missing review");
            Ok(())
        }
        Err(err) => {
            let restored = db
                .campgrounds()
                .restore_review(campground_id, review_id, position)
                .await;
            if let Err(restore_err) = restored {
                tracing::error!(
                    %campground_id,
                    %review_id,
                    error = %restore_err,
                    "failed to restore review reference"
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campground::Campground;
    use crate::database::test::MockDatabase;
    use std::io::ErrorKind;
    use std::sync::{Arc, Mutex};

    fn existing(campground_id: CampgroundId, reviews: Vec<ReviewId>) -> Campground {
        let now = Utc::now();
        Campground {
            id: campground_id,
            title: "Lakeview".into(),
            price: 20.0,
            image: "http://x".into(),
            location: "NY".into(),
            description: "nice".into(),
            reviews,
            created_at: now,
            modified_at: now,
        }
    }

    fn great() -> ReviewFields {
        ReviewFields {
            body: "great".into(),
            rating: 5.0,
        }
    }

    #[tokio::test]
    async fn create_review_attaches_exactly_one_reference() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        let inserted = Arc::new(Mutex::new(vec![]));
        let inserted_clone = Arc::clone(&inserted);
        let pushed = Arc::new(Mutex::new(vec![]));
        let pushed_clone = Arc::clone(&pushed);
        db.campgrounds.on_fetch_campground_by_id =
            Box::new(move |campground_id| Ok(Some(existing(campground_id, vec![]))));
        db.reviews.on_insert_review = Box::new(move |review| {
            inserted_clone.lock().unwrap().push(review.id);
            Ok(())
        });
        db.campgrounds.on_push_review = Box::new(move |(campground_id, review_id)| {
            assert_eq!(campground_id, test_campground_id);
            pushed_clone.lock().unwrap().push(review_id);
            Ok(true)
        });

        let review = create_review(&db, test_campground_id, great()).await.unwrap();

        assert_eq!(review.body, "great".to_string());
        assert_eq!(*inserted.lock().unwrap(), vec![review.id]);
        assert_eq!(*pushed.lock().unwrap(), vec![review.id]);
    }

    #[tokio::test]
    async fn create_review_does_not_insert_without_campground() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        db.campgrounds.on_fetch_campground_by_id = Box::new(move |_| Ok(None));

        let result = create_review(&db, test_campground_id, great()).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampgroundNotFound {
                campground_id: test_campground_id
            }
        );
    }

    #[tokio::test]
    async fn create_review_removes_review_if_attaching_fails() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        let inserted = Arc::new(Mutex::new(None));
        let inserted_clone = Arc::clone(&inserted);
        let deleted = Arc::new(Mutex::new(None));
        let deleted_clone = Arc::clone(&deleted);
        db.campgrounds.on_fetch_campground_by_id =
            Box::new(move |campground_id| Ok(Some(existing(campground_id, vec![]))));
        db.reviews.on_insert_review = Box::new(move |review| {
            *inserted_clone.lock().unwrap() = Some(review.id);
            Ok(())
        });
        // deleted between the fetch and the push
        db.campgrounds.on_push_review = Box::new(move |_| Ok(false));
        db.reviews.on_delete_review = Box::new(move |review_id| {
            *deleted_clone.lock().unwrap() = Some(review_id);
            Ok(true)
        });

        let result = create_review(&db, test_campground_id, great()).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampgroundNotFound {
                campground_id: test_campground_id
            }
        );
        assert!(inserted.lock().unwrap().is_some());
        assert_eq!(*deleted.lock().unwrap(), *inserted.lock().unwrap());
    }

    #[tokio::test]
    async fn delete_review_pulls_reference_before_deleting() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        let test_review_id = ReviewId::new();
        let calls = Arc::new(Mutex::new(vec![]));
        let pull_calls = Arc::clone(&calls);
        let delete_calls = Arc::clone(&calls);
        db.campgrounds.on_fetch_campground_by_id = Box::new(move |campground_id| {
            Ok(Some(existing(campground_id, vec![test_review_id])))
        });
        db.campgrounds.on_pull_review = Box::new(move |(campground_id, review_id)| {
            assert_eq!(campground_id, test_campground_id);
            assert_eq!(review_id, test_review_id);
            pull_calls.lock().unwrap().push("pull");
            Ok(Some(0))
        });
        db.reviews.on_delete_review = Box::new(move |review_id| {
            assert_eq!(review_id, test_review_id);
            delete_calls.lock().unwrap().push("delete");
            Ok(true)
        });

        delete_review(&db, test_campground_id, test_review_id)
            .await
            .unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["pull", "delete"]);
    }

    #[tokio::test]
    async fn delete_review_returns_error_if_not_in_campground() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        let test_review_id = ReviewId::new();
        db.campgrounds.on_fetch_campground_by_id =
            Box::new(move |campground_id| Ok(Some(existing(campground_id, vec![]))));
        db.campgrounds.on_pull_review = Box::new(move |_| Ok(None));

        let result = delete_review(&db, test_campground_id, test_review_id).await;

        assert_eq!(
            result.unwrap_err(),
            Error::ReviewNotFoundInCampground {
                campground_id: test_campground_id,
                review_id: test_review_id,
            }
        );
    }

    #[tokio::test]
    async fn delete_review_restores_reference_in_place_if_delete_fails() {
        let mut db = MockDatabase::new();
        let test_campground_id = CampgroundId::new();
        let test_review_id = ReviewId::new();
        let restored = Arc::new(Mutex::new(None));
        let restored_clone = Arc::clone(&restored);
        db.campgrounds.on_fetch_campground_by_id = Box::new(move |campground_id| {
            Ok(Some(existing(
                campground_id,
                vec![ReviewId::new(), test_review_id, ReviewId::new()],
            )))
        });
        db.campgrounds.on_pull_review = Box::new(move |_| Ok(Some(1)));
        db.reviews.on_delete_review =
            Box::new(move |_| Err(Error::IoError(ErrorKind::ConnectionReset.into())));
        db.campgrounds.on_restore_review =
            Box::new(move |(campground_id, review_id, position)| {
                assert_eq!(campground_id, test_campground_id);
                assert_eq!(review_id, test_review_id);
                *restored_clone.lock().unwrap() = Some(position);
                Ok(true)
            });

        let result = delete_review(&db, test_campground_id, test_review_id).await;

        assert!(matches!(result.unwrap_err(), Error::IoError(_)));
        assert_eq!(
            *restored.lock().unwrap(),
            Some(1),
            "db.restore_review was not called with the original position"
        );
    }
}
