use actix_web::web::{Data, Path};
use actix_web::{delete, post, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::campground::CampgroundId;
use crate::database::Database;
use crate::error::Error;
use crate::submission::Submission;
use crate::views;

use super::{manager, Review, ReviewFields, ReviewId};

#[derive(Clone, Debug, Serialize)]
pub struct ReviewBody {
    pub id: ReviewId,
    pub body: String,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
}

impl ReviewBody {
    pub fn render(review: Review) -> ReviewBody {
        ReviewBody {
            id: review.id,
            body: review.body,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

#[post("/campgrounds/{campground_id}/reviews")]
#[tracing::instrument(skip(db))]
pub async fn create_review_in_campground(
    db: Data<Box<dyn Database>>,
    params: Path<CampgroundId>,
    body: Submission<ReviewFields>,
) -> Result<HttpResponse, Error> {
    let campground_id = params.into_inner();
    manager::create_review(&***db, campground_id, body.into_inner()).await?;

    Ok(views::redirect(&format!("/campgrounds/{}", campground_id)))
}

#[delete("/campgrounds/{campground_id}/reviews/{review_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_review_in_campground(
    db: Data<Box<dyn Database>>,
    params: Path<(CampgroundId, ReviewId)>,
) -> Result<HttpResponse, Error> {
    let (campground_id, review_id) = params.into_inner();
    manager::delete_review(&***db, campground_id, review_id).await?;

    Ok(views::redirect(&format!("/campgrounds/{}", campground_id)))
}
