use actix_web::http::header::{ContentType, LOCATION};
use actix_web::HttpResponse;
use lazy_static::lazy_static;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::Error;

const TEMPLATES: &[(&str, &str)] = &[
    (
        "layouts/boilerplate.html",
        include_str!("../templates/layouts/boilerplate.html"),
    ),
    ("home.html", include_str!("../templates/home.html")),
    (
        "campgrounds/index.html",
        include_str!("../templates/campgrounds/index.html"),
    ),
    (
        "campgrounds/new.html",
        include_str!("../templates/campgrounds/new.html"),
    ),
    (
        "campgrounds/edit.html",
        include_str!("../templates/campgrounds/edit.html"),
    ),
    (
        "campgrounds/show.html",
        include_str!("../templates/campgrounds/show.html"),
    ),
    ("error.html", include_str!("../templates/error.html")),
];

lazy_static! {
    static ref VIEWS: Result<Tera, tera::Error> = load_views();
}

fn load_views() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(tera)
}

pub fn render_to_string<T: Serialize>(template: &str, data: &T) -> Result<String, Error> {
    let views = VIEWS.as_ref().map_err(|err| {
        Error::FailedToRenderView(tera::Error::msg(format!("templates failed to load: {}", err)))
    })?;
    let context = Context::from_serialize(data)?;

    Ok(views.render(template, &context)?)
}

#[tracing::instrument(skip(data))]
pub fn render<T: Serialize>(template: &str, data: &T) -> Result<HttpResponse, Error> {
    let html = render_to_string(template, data)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}
