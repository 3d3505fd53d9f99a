//! Schema DDL for scientists, planets and missions. Idempotent.
//!
//! Constraint names follow `pk_<table>` and `fk_<table>_<column>_<referred table>`.

use crate::error::AppError;
use sqlx::SqlitePool;

const TABLES: &[(&str, &str)] = &[
    (
        "scientists",
        r#"
        CREATE TABLE IF NOT EXISTS scientists (
            id INTEGER NOT NULL,
            name TEXT NOT NULL,
            field_of_study TEXT NOT NULL,
            CONSTRAINT pk_scientists PRIMARY KEY (id)
        )
        "#,
    ),
    (
        "planets",
        r#"
        CREATE TABLE IF NOT EXISTS planets (
            id INTEGER NOT NULL,
            name TEXT NOT NULL,
            distance_from_earth INTEGER NOT NULL,
            nearest_star TEXT NOT NULL,
            CONSTRAINT pk_planets PRIMARY KEY (id)
        )
        "#,
    ),
    (
        "missions",
        r#"
        CREATE TABLE IF NOT EXISTS missions (
            id INTEGER NOT NULL,
            name TEXT NOT NULL,
            scientist_id INTEGER NOT NULL,
            planet_id INTEGER NOT NULL,
            CONSTRAINT pk_missions PRIMARY KEY (id),
            CONSTRAINT fk_missions_scientist_id_scientists
                FOREIGN KEY (scientist_id) REFERENCES scientists (id) ON DELETE CASCADE,
            CONSTRAINT fk_missions_planet_id_planets
                FOREIGN KEY (planet_id) REFERENCES planets (id) ON DELETE CASCADE
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ix_missions_scientist_id ON missions (scientist_id)",
    "CREATE INDEX IF NOT EXISTS ix_missions_planet_id ON missions (planet_id)",
];

/// Create tables (parents before missions) and the foreign-key indexes.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (table, ddl) in TABLES {
        tracing::debug!(table = %table, "ensure table");
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}
