//! End to end checks against a real MongoDB. Run with
//! `cargo test -- --ignored` while a server listens on localhost:27017.

use actix_web::dev::ServiceResponse;
use actix_web::http::header::LOCATION;
use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::test::{self, TestRequest};
use actix_web::web::Data;
use actix_web::App;
use mongodb::Client;
use yelpcamp::campground::db::CampgroundStore;
use yelpcamp::review::db::ReviewStore;
use yelpcamp::{config, method_override, Database, MongoDatabase};

async fn database(name: &str) -> MongoDatabase {
    let client = Client::with_uri_str(config::DEFAULT_DATABASE_URI).await.unwrap();
    let db = MongoDatabase::initialize(client.database(name)).await.unwrap();
    db.drop().await.unwrap();
    db
}

macro_rules! app {
    ($db:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new(Box::new($db.clone()) as Box<dyn Database>))
                .wrap(from_fn(method_override))
                .configure(yelpcamp::configure),
        )
        .await
    };
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn lakeview_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("campground[title]", "Lakeview"),
        ("campground[price]", "20"),
        ("campground[image]", "http://x"),
        ("campground[location]", "NY"),
        ("campground[description]", "nice"),
    ]
}

#[actix_rt::test]
#[ignore = "requires a running mongodb"]
async fn campground_lifecycle() {
    let db = database("yelp-camp-test-lifecycle").await;
    let app = app!(db);

    let req = TestRequest::post()
        .uri("/campgrounds")
        .set_form(lakeview_form())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    let campground_url = location(&resp);

    let req = TestRequest::get().uri(&campground_url).to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Lakeview"));

    let req = TestRequest::post()
        .uri(&format!("{}/reviews", campground_url))
        .set_form(vec![("review[body]", "loved the lake"), ("review[rating]", "5")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), campground_url);

    let campground_id = campground_url.trim_start_matches("/campgrounds/").parse().unwrap();
    let campground = db
        .campgrounds()
        .fetch_campground_by_id(campground_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campground.reviews.len(), 1);
    let review_id = campground.reviews[0];

    let req = TestRequest::get().uri(&campground_url).to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("loved the lake"));

    let req = TestRequest::post()
        .uri(&format!("{}?_method=DELETE", campground_url))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/campgrounds");

    let req = TestRequest::get().uri(&campground_url).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let remaining = db.reviews().fetch_reviews_by_ids(&[review_id]).await.unwrap();
    assert!(remaining.is_empty(), "reviews outlived their campground");
}

#[actix_rt::test]
#[ignore = "requires a running mongodb"]
async fn deleting_review_prunes_reference() {
    let db = database("yelp-camp-test-reviews").await;
    let app = app!(db);

    let req = TestRequest::post()
        .uri("/campgrounds")
        .set_form(lakeview_form())
        .to_request();
    let campground_url = location(&test::call_service(&app, req).await);
    let campground_id = campground_url.trim_start_matches("/campgrounds/").parse().unwrap();

    for body in ["first", "second"] {
        let req = TestRequest::post()
            .uri(&format!("{}/reviews", campground_url))
            .set_form(vec![("review[body]", body), ("review[rating]", "3")])
            .to_request();
        test::call_service(&app, req).await;
    }

    let campground = db
        .campgrounds()
        .fetch_campground_by_id(campground_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campground.reviews.len(), 2);
    let (first, second) = (campground.reviews[0], campground.reviews[1]);

    let req = TestRequest::post()
        .uri(&format!("{}/reviews/{}?_method=DELETE", campground_url, first))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let campground = db
        .campgrounds()
        .fetch_campground_by_id(campground_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campground.reviews, vec![second]);
    let remaining = db.reviews().fetch_reviews_by_ids(&[first]).await.unwrap();
    assert!(remaining.is_empty());
}
