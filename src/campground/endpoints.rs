use actix_web::web::{Data, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::database::Database;
use crate::error::Error;
use crate::review::{Review, ReviewBody};
use crate::submission::Submission;
use crate::views;

use super::{manager, Campground, CampgroundFields, CampgroundId};

#[derive(Clone, Debug, Serialize)]
pub struct CampgroundBody {
    pub id: CampgroundId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub location: String,
    pub description: String,
    pub reviews: Vec<ReviewBody>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl CampgroundBody {
    pub fn render(campground: Campground, reviews: Vec<Review>) -> CampgroundBody {
        CampgroundBody {
            id: campground.id,
            title: campground.title,
            price: campground.price,
            image: campground.image,
            location: campground.location,
            description: campground.description,
            reviews: reviews.into_iter().map(ReviewBody::render).collect(),
            created_at: campground.created_at,
            modified_at: campground.modified_at,
        }
    }
}

#[derive(Serialize)]
struct CampgroundsPage {
    campgrounds: Vec<CampgroundBody>,
}

#[derive(Serialize)]
struct CampgroundPage {
    campground: CampgroundBody,
}

#[derive(Serialize)]
struct EmptyPage {}

fn campground_url(campground_id: CampgroundId) -> String {
    format!("/campgrounds/{}", campground_id)
}

#[get("/")]
#[tracing::instrument]
pub async fn home() -> Result<HttpResponse, Error> {
    views::render("home.html", &EmptyPage {})
}

#[get("/campgrounds")]
#[tracing::instrument(skip(db))]
pub async fn get_campgrounds(db: Data<Box<dyn Database>>) -> Result<HttpResponse, Error> {
    let campgrounds = manager::get_campgrounds(&***db).await?;

    let page = CampgroundsPage {
        campgrounds: campgrounds
            .into_iter()
            .map(|campground| CampgroundBody::render(campground, vec![]))
            .collect(),
    };

    views::render("campgrounds/index.html", &page)
}

#[get("/campgrounds/new")]
#[tracing::instrument]
pub async fn new_campground_form() -> Result<HttpResponse, Error> {
    views::render("campgrounds/new.html", &EmptyPage {})
}

#[post("/campgrounds")]
#[tracing::instrument(skip(db))]
pub async fn create_campground(
    db: Data<Box<dyn Database>>,
    body: Submission<CampgroundFields>,
) -> Result<HttpResponse, Error> {
    let campground = manager::create_campground(&***db, body.into_inner()).await?;

    Ok(views::redirect(&campground_url(campground.id)))
}

#[get("/campgrounds/{campground_id}/edit")]
#[tracing::instrument(skip(db))]
pub async fn edit_campground_form(
    db: Data<Box<dyn Database>>,
    params: Path<CampgroundId>,
) -> Result<HttpResponse, Error> {
    let campground_id = params.into_inner();
    let campground = manager::get_campground_by_id(&***db, campground_id).await?;

    let page = CampgroundPage {
        campground: CampgroundBody::render(campground, vec![]),
    };

    views::render("campgrounds/edit.html", &page)
}

#[put("/campgrounds/{campground_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campground(
    db: Data<Box<dyn Database>>,
    params: Path<CampgroundId>,
    body: Submission<CampgroundFields>,
) -> Result<HttpResponse, Error> {
    let campground_id = params.into_inner();
    let campground = manager::update_campground(&***db, campground_id, body.into_inner()).await?;

    Ok(views::redirect(&campground_url(campground.id)))
}

#[delete("/campgrounds/{campground_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campground(
    db: Data<Box<dyn Database>>,
    params: Path<CampgroundId>,
) -> Result<HttpResponse, Error> {
    let campground_id = params.into_inner();
    manager::delete_campground(&***db, campground_id).await?;

    Ok(views::redirect("/campgrounds"))
}

#[get("/campgrounds/{campground_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campground_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampgroundId>,
) -> Result<HttpResponse, Error> {
    let campground_id = params.into_inner();
    let (campground, reviews) = manager::get_campground_with_reviews(&***db, campground_id).await?;

    let page = CampgroundPage {
        campground: CampgroundBody::render(campground, reviews),
    };

    views::render("campgrounds/show.html", &page)
}
