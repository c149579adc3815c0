use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::body::BoxBody;
use actix_web::error::{PathError, QueryPayloadError};
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::Serialize;
use serde_json::Error as JsonError;
use tera::Error as TemplateError;

use crate::campground::CampgroundId;
use crate::review::ReviewId;
use crate::validation::FieldError;
use crate::views;

#[derive(Debug, Derivative)]
#[derivative(PartialEq)]
pub enum Error {
    // 400
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonError),
    InvalidForm(#[derivative(PartialEq = "ignore")] serde_urlencoded::de::Error),
    InvalidPayload(String),
    ValidationFailed {
        errors: Vec<FieldError>,
    },

    // 404
    PathNotFound,
    CampgroundNotFound {
        campground_id: CampgroundId,
    },
    ReviewNotFoundInCampground {
        campground_id: CampgroundId,
        review_id: ReviewId,
    },

    // 500
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    FailedToRenderView(#[derivative(PartialEq = "ignore")] TemplateError),
    IoError(#[derivative(PartialEq = "ignore")] IoError),
    InvalidConfiguration {
        name: &'static str,
        value: String,
    },
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidPath(_) => "E4001000",
            Error::InvalidQuery(_) => "E4001001",
            Error::InvalidJson(_) => "E4001002",
            Error::InvalidForm(_) => "E4001003",
            Error::InvalidPayload(_) => "E4001004",
            Error::ValidationFailed { .. } => "E4001005",
            Error::PathNotFound => "E4041000",
            Error::CampgroundNotFound { .. } => "E4041001",
            Error::ReviewNotFoundInCampground { .. } => "E4041002",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::FailedToSerializeToBson(_) => "E5001001",
            Error::FailedToRenderView(_) => "E5001002",
            Error::IoError(_) => "E5001003",
            Error::InvalidConfiguration { .. } => "E5001004",
        }
    }

    /// The message shown to the user on the error page. Server-side failures
    /// share a generic message, the cause only goes to the log.
    pub fn error_message(&self) -> String {
        match self {
            Error::InvalidPath(_) => "The given path could not be parsed".into(),
            Error::InvalidQuery(_) => "The given query could not be parsed".into(),
            Error::InvalidJson(_) => "The given json could not be parsed".into(),
            Error::InvalidForm(_) => "The given form could not be parsed".into(),
            Error::InvalidPayload(_) => "The request body could not be read".into(),
            Error::ValidationFailed { errors } => errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join(","),
            Error::PathNotFound => "Page not found".into(),
            Error::CampgroundNotFound { .. } => "The requested campground was not found".into(),
            Error::ReviewNotFoundInCampground { .. } => {
                "The requested review was not found in the campground".into()
            }
            Error::FailedDatabaseCall(_)
            | Error::FailedToSerializeToBson(_)
            | Error::FailedToRenderView(_)
            | Error::IoError(_)
            | Error::InvalidConfiguration { .. } => "Something went wrong!".into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: u16,
    error_code: &'static str,
    error_message: &'a str,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Error::InvalidForm(_) => StatusCode::BAD_REQUEST,
            Error::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Error::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampgroundNotFound { .. } => StatusCode::NOT_FOUND,
            Error::ReviewNotFoundInCampground { .. } => StatusCode::NOT_FOUND,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToSerializeToBson(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::FailedToRenderView(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::InvalidConfiguration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let message = self.error_message();
        let body = ErrorBody {
            status: status.as_u16(),
            error_code: self.error_code(),
            error_message: &message,
        };

        match views::render_to_string("error.html", &body) {
            Ok(html) => HttpResponse::build(status)
                .content_type(ContentType::html())
                .body(html),
            Err(err) => {
                tracing::error!(error = %err, "failed to render error view");
                HttpResponse::build(status)
                    .content_type(ContentType::plaintext())
                    .body(message)
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<TemplateError> for Error {
    fn from(error: TemplateError) -> Error {
        Error::FailedToRenderView(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::InvalidJson(err) => Some(err),
            Error::InvalidForm(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::FailedToRenderView(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::*;

    #[test]
    fn validation_messages_are_joined_with_commas() {
        let error = Error::ValidationFailed {
            errors: vec![
                FieldError::new("campground.title", "\"campground.title\" is required"),
                FieldError::new(
                    "campground.price",
                    "\"campground.price\" must be greater than or equal to 0",
                ),
            ],
        };

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            error.error_message(),
            "\"campground.title\" is required,\"campground.price\" must be greater than or equal to 0"
        );
    }

    #[test]
    fn server_errors_hide_their_cause() {
        let error = Error::IoError(IoError::new(ErrorKind::Other, "disk on fire"));

        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error_message(), "Something went wrong!");
    }

    #[test]
    fn unknown_path_is_page_not_found() {
        let error = Error::PathNotFound;

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_message(), "Page not found");
    }
}
