use actix_web::middleware::from_fn;
use actix_web::web::{self, Data, PathConfig, QueryConfig, ServiceConfig};
use actix_web::{App, HttpResponse, HttpServer};
use mongodb::Client;
use tracing::info;
use tracing_actix_web::TracingLogger;

#[cfg(test)]
macro_rules! test_app {
    ($db:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(
                    Box::new($db) as Box<dyn crate::database::Database>
                ))
                .wrap(actix_web::middleware::from_fn(
                    crate::method_override::method_override,
                ))
                .configure(crate::configure),
        )
    };
}

pub mod campground;
pub mod config;
pub mod database;
pub mod error;
pub mod method_override;
pub mod review;
pub mod seed;
pub mod submission;
pub mod typedid;
pub mod validation;
pub mod views;

pub use config::Config;
pub use database::{Database, MongoDatabase};
pub use error::Error;
pub use method_override::method_override;

/// Registers every route along with the extractor error handlers. Routes that
/// share a prefix are ordered so `/campgrounds/new` is never read as an id.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.app_data(PathConfig::default().error_handler(|err, _req| {
        // format path errors with custom format
        Error::InvalidPath(err).into()
    }))
    .app_data(QueryConfig::default().error_handler(|err, _req| {
        // format query errors with custom format
        Error::InvalidQuery(err).into()
    }))
    .service(campground::endpoints::home)
    .service(campground::endpoints::get_campgrounds)
    .service(campground::endpoints::new_campground_form)
    .service(campground::endpoints::create_campground)
    .service(campground::endpoints::edit_campground_form)
    .service(campground::endpoints::update_campground)
    .service(campground::endpoints::delete_campground)
    .service(review::endpoints::create_review_in_campground)
    .service(review::endpoints::delete_review_in_campground)
    .service(campground::endpoints::get_campground_by_id)
    .default_service(web::to(path_not_found));
}

async fn path_not_found() -> Result<HttpResponse, Error> {
    Err(Error::PathNotFound)
}

/// Connects to the database and serves until the server is shut down.
pub async fn run(config: Config) -> Result<(), Error> {
    info!("connecting to db: {}", config.database_uri);
    let client = Client::with_uri_str(&config.database_uri).await?;
    let db = MongoDatabase::initialize(client.database(&config.database_name)).await?;

    if config.seed {
        seed::seed(&db).await?;
    }

    info!("serving on {}", config.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(Box::new(db.clone()) as Box<dyn Database>))
            .wrap(from_fn(method_override))
            .wrap(TracingLogger::default())
            .configure(configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    info!("server stopped, closing db connections");
    drop(client);

    Ok(())
}
