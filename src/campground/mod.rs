use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use validator::Validate;

use crate::review::ReviewId;
use crate::submission::{self, Submittable};
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type CampgroundId = TypedId<Campground>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Campground {
    #[serde(rename = "_id")]
    pub id: CampgroundId,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub location: String,
    pub description: String,
    pub reviews: Vec<ReviewId>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub modified_at: DateTime<Utc>,
}

impl Campground {
    pub fn apply(&mut self, fields: CampgroundFields) {
        self.title = fields.title;
        self.price = fields.price;
        self.image = fields.image;
        self.location = fields.location;
        self.description = fields.description;
    }
}

impl TypedIdMarker for Campground {
    fn tag() -> &'static str {
        "CMP"
    }
}

/// The user editable part of a campground, replaced as a whole on update.
/// Missing text fields deserialize as empty so they are reported alongside
/// every other rule violation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CampgroundFields {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub title: String,
    #[serde(deserialize_with = "submission::number")]
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub image: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub location: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub description: String,
}

impl Submittable for CampgroundFields {
    const ROOT: &'static str = "campground";
}
