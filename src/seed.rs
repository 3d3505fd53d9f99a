//! Demo rows for a fresh database.

use crate::error::AppError;
use crate::model::NewPlanet;
use crate::service::{Body, EntityStore};
use serde_json::{json, Value};
use sqlx::SqlitePool;

const SCIENTISTS: &[(&str, &str)] = &[
    ("Mel T. Valent", "xenobiology"),
    ("P. Legrange", "orbital mechanics"),
    ("Ada Quill", "robotics"),
];

const PLANETS: &[(&str, i64, &str)] = &[
    ("TauCeti F", 12, "Tau Ceti"),
    ("Maxxes-III", 109, "Canus Minor"),
    ("Proxima b", 4, "Proxima Centauri"),
];

/// Insert demo scientists, planets and a mission per scientist. Returns false
/// without touching anything when scientists already exist.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<bool, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scientists")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(existing, "seed skipped, scientists present");
        return Ok(false);
    }

    let mut scientist_ids = Vec::with_capacity(SCIENTISTS.len());
    for (name, field) in SCIENTISTS {
        let created = EntityStore::create_scientist(
            pool,
            Some(&object(json!({"name": name, "field_of_study": field}))),
        )
        .await?;
        scientist_ids.push(id_of(&created)?);
    }

    let mut planet_ids = Vec::with_capacity(PLANETS.len());
    for (name, distance, star) in PLANETS {
        let created = EntityStore::create_planet(
            pool,
            &NewPlanet {
                name: (*name).into(),
                distance_from_earth: *distance,
                nearest_star: (*star).into(),
            },
        )
        .await?;
        planet_ids.push(id_of(&created)?);
    }

    for (i, (scientist_id, planet_id)) in scientist_ids.iter().zip(planet_ids.iter()).enumerate() {
        EntityStore::create_mission(
            pool,
            Some(&object(json!({
                "name": format!("Survey {}", i + 1),
                "scientist_id": scientist_id,
                "planet_id": planet_id
            }))),
        )
        .await?;
    }

    tracing::info!(
        scientists = scientist_ids.len(),
        planets = planet_ids.len(),
        "demo data seeded"
    );
    Ok(true)
}

fn object(v: Value) -> Body {
    match v {
        Value::Object(m) => m,
        _ => Body::new(),
    }
}

fn id_of(entity: &Value) -> Result<i64, AppError> {
    entity["id"]
        .as_i64()
        .ok_or_else(|| AppError::Validation("created row has no id".into()))
}
