use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use validator::Validate;

use crate::submission::{self, Submittable};
use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

pub type ReviewId = TypedId<Review>;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub body: String,
    pub rating: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl TypedIdMarker for Review {
    fn tag() -> &'static str {
        "REV"
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ReviewFields {
    #[serde(default)]
    #[validate(length(min = 1, message = "is required"))]
    pub body: String,
    #[serde(deserialize_with = "submission::number")]
    #[validate(range(min = 1.0, max = 5.0))]
    pub rating: f64,
}

impl Submittable for ReviewFields {
    const ROOT: &'static str = "review";
}
