//! Entity store: reads, creates, patches and cascading deletes against SQLite.
//!
//! Every mutation runs in one transaction. Failures inside the guarded part are
//! collapsed into validation errors; the not-found check runs before it.

use crate::error::AppError;
use crate::model::{Graph, Mission, NewMission, NewPlanet, NewScientist, Planet, Scientist};
use crate::serializer::{serialize, serialize_many, PlanetRule, ScientistRule};
use crate::service::validation::{Body, RequestValidator};
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use std::future::Future;

const SCIENTIST_COLUMNS: &str = "id, name, field_of_study";
const PLANET_COLUMNS: &str = "id, name, distance_from_earth, nearest_star";
const MISSION_COLUMNS: &str = "id, name, scientist_id, planet_id";

pub struct EntityStore;

impl EntityStore {
    /// All scientists, without their missions.
    pub async fn list_scientists(pool: &SqlitePool) -> Result<Value, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = format!("SELECT {} FROM scientists ORDER BY id", SCIENTIST_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<Scientist> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;
        let mut graph = Graph::new();
        rows.into_iter().for_each(|s| graph.insert_scientist(s));
        Ok(serialize_many(graph.scientists(), &graph, &[ScientistRule::Missions]))
    }

    pub async fn create_scientist(pool: &SqlitePool, body: Option<&Body>) -> Result<Value, AppError> {
        guarded(async {
            let new = RequestValidator::new_scientist(body)?;
            let mut tx = pool.begin().await?;
            let id = insert_scientist(&mut tx, &new).await?;
            let graph = scientist_graph(&mut tx, id).await?;
            tx.commit().await?;
            tracing::info!(id, "scientist created");
            render_scientist(&graph, id)
        })
        .await
    }

    pub async fn get_scientist(pool: &SqlitePool, id: i64) -> Result<Value, AppError> {
        let graph = Self::scientist_graph(pool, id).await?;
        render_scientist(&graph, id)
    }

    /// The scientist with its missions and the planets those missions visit.
    pub async fn scientist_graph(pool: &SqlitePool, id: i64) -> Result<Graph, AppError> {
        let mut conn = pool.acquire().await?;
        let graph = scientist_graph(&mut conn, id).await?;
        if graph.scientist(id).is_none() {
            return Err(AppError::NotFound("Scientist"));
        }
        Ok(graph)
    }

    /// Merge-patch `name` / `field_of_study`. Unknown keys are refused by name.
    pub async fn patch_scientist(
        pool: &SqlitePool,
        id: i64,
        body: Option<&Body>,
    ) -> Result<Value, AppError> {
        let mut tx = pool.begin().await?;
        let mut scientist = fetch_scientist(&mut tx, id)
            .await?
            .ok_or(AppError::NotFound("Scientist"))?;
        guarded(async move {
            let patch = RequestValidator::scientist_patch(body)?;
            patch.apply(&mut scientist);
            RequestValidator::scientist(&scientist)?;
            let sql = "UPDATE scientists SET name = ?, field_of_study = ? WHERE id = ?";
            tracing::debug!(sql = %sql, id, "query");
            sqlx::query(sql)
                .bind(&scientist.name)
                .bind(&scientist.field_of_study)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            let graph = scientist_graph(&mut tx, id).await?;
            tx.commit().await?;
            tracing::info!(id, "scientist updated");
            render_scientist(&graph, id)
        })
        .await
    }

    /// Delete a scientist and every mission it owns, atomically.
    pub async fn delete_scientist(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;
        if fetch_scientist(&mut tx, id).await?.is_none() {
            return Err(AppError::NotFound("Scientist"));
        }
        guarded(async move {
            let missions = sqlx::query("DELETE FROM missions WHERE scientist_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();
            sqlx::query("DELETE FROM scientists WHERE id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            tracing::info!(id, missions, "scientist deleted");
            Ok::<(), AppError>(())
        })
        .await
    }

    /// All planets, without their missions.
    pub async fn list_planets(pool: &SqlitePool) -> Result<Value, AppError> {
        let mut conn = pool.acquire().await?;
        let sql = format!("SELECT {} FROM planets ORDER BY id", PLANET_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<Planet> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;
        let mut graph = Graph::new();
        rows.into_iter().for_each(|p| graph.insert_planet(p));
        Ok(serialize_many(graph.planets(), &graph, &[PlanetRule::Missions]))
    }

    /// Planets have no HTTP create route; used for seeding.
    pub async fn create_planet(pool: &SqlitePool, new: &NewPlanet) -> Result<Value, AppError> {
        guarded(async {
            RequestValidator::new_planet(new)?;
            let mut tx = pool.begin().await?;
            let id = sqlx::query(
                "INSERT INTO planets (name, distance_from_earth, nearest_star) VALUES (?, ?, ?)",
            )
            .bind(&new.name)
            .bind(new.distance_from_earth)
            .bind(&new.nearest_star)
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
            let graph = planet_graph(&mut tx, id).await?;
            tx.commit().await?;
            tracing::info!(id, "planet created");
            render_planet(&graph, id)
        })
        .await
    }

    pub async fn get_planet(pool: &SqlitePool, id: i64) -> Result<Value, AppError> {
        let graph = Self::planet_graph(pool, id).await?;
        render_planet(&graph, id)
    }

    /// The planet with its missions and the scientists who flew them.
    pub async fn planet_graph(pool: &SqlitePool, id: i64) -> Result<Graph, AppError> {
        let mut conn = pool.acquire().await?;
        let graph = planet_graph(&mut conn, id).await?;
        if graph.planet(id).is_none() {
            return Err(AppError::NotFound("Planet"));
        }
        Ok(graph)
    }

    /// Unknown scientist or planet ids surface as an integrity error from the store.
    pub async fn create_mission(pool: &SqlitePool, body: Option<&Body>) -> Result<Value, AppError> {
        guarded(async {
            let new = RequestValidator::new_mission(body)?;
            let mut tx = pool.begin().await?;
            let id = insert_mission(&mut tx, &new).await?;
            let graph = mission_graph(&mut tx, id).await?;
            tx.commit().await?;
            tracing::info!(id, scientist_id = new.scientist_id, planet_id = new.planet_id, "mission created");
            render_mission(&graph, id)
        })
        .await
    }

    pub async fn get_mission(pool: &SqlitePool, id: i64) -> Result<Value, AppError> {
        let mut conn = pool.acquire().await?;
        let graph = mission_graph(&mut conn, id).await?;
        render_mission(&graph, id)
    }
}

async fn guarded<T, F>(op: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    op.await.map_err(AppError::into_rejection)
}

fn render_scientist(graph: &Graph, id: i64) -> Result<Value, AppError> {
    let scientist = graph.scientist(id).ok_or(AppError::NotFound("Scientist"))?;
    Ok(serialize(scientist, graph, []))
}

fn render_planet(graph: &Graph, id: i64) -> Result<Value, AppError> {
    let planet = graph.planet(id).ok_or(AppError::NotFound("Planet"))?;
    Ok(serialize(planet, graph, []))
}

fn render_mission(graph: &Graph, id: i64) -> Result<Value, AppError> {
    let mission = graph.mission(id).ok_or(AppError::NotFound("Mission"))?;
    Ok(serialize(mission, graph, []))
}

async fn insert_scientist(conn: &mut SqliteConnection, new: &NewScientist) -> Result<i64, AppError> {
    let id = sqlx::query("INSERT INTO scientists (name, field_of_study) VALUES (?, ?)")
        .bind(&new.name)
        .bind(&new.field_of_study)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn insert_mission(conn: &mut SqliteConnection, new: &NewMission) -> Result<i64, AppError> {
    let id = sqlx::query("INSERT INTO missions (name, scientist_id, planet_id) VALUES (?, ?, ?)")
        .bind(&new.name)
        .bind(new.scientist_id)
        .bind(new.planet_id)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    Ok(id)
}

async fn fetch_scientist(conn: &mut SqliteConnection, id: i64) -> Result<Option<Scientist>, AppError> {
    let sql = format!("SELECT {} FROM scientists WHERE id = ?", SCIENTIST_COLUMNS);
    tracing::debug!(sql = %sql, id, "query");
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?)
}

async fn fetch_planet(conn: &mut SqliteConnection, id: i64) -> Result<Option<Planet>, AppError> {
    let sql = format!("SELECT {} FROM planets WHERE id = ?", PLANET_COLUMNS);
    tracing::debug!(sql = %sql, id, "query");
    Ok(sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?)
}

/// Empty graph when the scientist does not exist.
async fn scientist_graph(conn: &mut SqliteConnection, id: i64) -> Result<Graph, AppError> {
    let mut graph = Graph::new();
    let Some(scientist) = fetch_scientist(conn, id).await? else {
        return Ok(graph);
    };
    graph.insert_scientist(scientist);

    let sql = format!("SELECT {} FROM missions WHERE scientist_id = ? ORDER BY id", MISSION_COLUMNS);
    tracing::debug!(sql = %sql, id, "query");
    let missions: Vec<Mission> = sqlx::query_as(&sql).bind(id).fetch_all(&mut *conn).await?;
    missions.into_iter().for_each(|m| graph.insert_mission(m));

    let sql = format!(
        "SELECT {} FROM planets WHERE id IN (SELECT planet_id FROM missions WHERE scientist_id = ?) ORDER BY id",
        PLANET_COLUMNS
    );
    tracing::debug!(sql = %sql, id, "query");
    let planets: Vec<Planet> = sqlx::query_as(&sql).bind(id).fetch_all(&mut *conn).await?;
    planets.into_iter().for_each(|p| graph.insert_planet(p));
    Ok(graph)
}

/// Empty graph when the planet does not exist.
async fn planet_graph(conn: &mut SqliteConnection, id: i64) -> Result<Graph, AppError> {
    let mut graph = Graph::new();
    let Some(planet) = fetch_planet(conn, id).await? else {
        return Ok(graph);
    };
    graph.insert_planet(planet);

    let sql = format!("SELECT {} FROM missions WHERE planet_id = ? ORDER BY id", MISSION_COLUMNS);
    tracing::debug!(sql = %sql, id, "query");
    let missions: Vec<Mission> = sqlx::query_as(&sql).bind(id).fetch_all(&mut *conn).await?;
    missions.into_iter().for_each(|m| graph.insert_mission(m));

    let sql = format!(
        "SELECT {} FROM scientists WHERE id IN (SELECT scientist_id FROM missions WHERE planet_id = ?) ORDER BY id",
        SCIENTIST_COLUMNS
    );
    tracing::debug!(sql = %sql, id, "query");
    let scientists: Vec<Scientist> = sqlx::query_as(&sql).bind(id).fetch_all(&mut *conn).await?;
    scientists.into_iter().for_each(|s| graph.insert_scientist(s));
    Ok(graph)
}

/// The mission with both of its parents.
async fn mission_graph(conn: &mut SqliteConnection, id: i64) -> Result<Graph, AppError> {
    let mut graph = Graph::new();
    let sql = format!("SELECT {} FROM missions WHERE id = ?", MISSION_COLUMNS);
    tracing::debug!(sql = %sql, id, "query");
    let mission: Option<Mission> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
    let Some(mission) = mission else {
        return Ok(graph);
    };
    if let Some(s) = fetch_scientist(conn, mission.scientist_id).await? {
        graph.insert_scientist(s);
    }
    if let Some(p) = fetch_planet(conn, mission.planet_id).await? {
        graph.insert_planet(p);
    }
    graph.insert_mission(mission);
    Ok(graph)
}
