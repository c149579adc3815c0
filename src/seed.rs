use crate::campground::{manager, CampgroundFields};
use crate::database::Database;
use crate::error::Error;

const SAMPLES: &[(&str, &str, f64)] = &[
    ("Misty Bay", "Anchorage, Alaska", 18.0),
    ("Petrified Creek", "Tucson, Arizona", 12.5),
    ("Silent Pines", "Flagstaff, Arizona", 25.0),
    ("Bayside Hollow", "Portland, Maine", 30.0),
    ("Cedar Flats", "Boise, Idaho", 0.0),
    ("Granite Ridge", "Denver, Colorado", 22.0),
];

fn sample_image(title: &str) -> String {
    let slug = title.to_lowercase().replace(' ', "-");
    format!("https://picsum.photos/seed/{}/640/480", slug)
}

/// Replaces everything in the database with a handful of sample campgrounds.
#[tracing::instrument(skip(db))]
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop().await?;

    for (title, location, price) in SAMPLES {
        let fields = CampgroundFields {
            title: title.to_string(),
            price: *price,
            image: sample_image(title),
            location: location.to_string(),
            description: format!("A quiet place to pitch a tent near {}.", location),
        };
        manager::create_campground(db, fields).await?;
    }

    tracing::info!(count = SAMPLES.len(), "seeded campgrounds");

    Ok(())
}
