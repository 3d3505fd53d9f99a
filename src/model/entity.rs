//! Row types for the three tables and the payloads that create or change them.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Scientist {
    pub id: i64,
    pub name: String,
    pub field_of_study: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub distance_from_earth: i64,
    pub nearest_star: String,
}

/// Joins one scientist to one planet. Lives only as long as both parents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Mission {
    pub id: i64,
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewScientist {
    pub name: String,
    pub field_of_study: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPlanet {
    pub name: String,
    pub distance_from_earth: i64,
    pub nearest_star: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMission {
    pub name: String,
    pub scientist_id: i64,
    pub planet_id: i64,
}

/// Fields a PATCH on a scientist may touch. Absent fields stay as they are.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScientistPatch {
    pub name: Option<String>,
    pub field_of_study: Option<String>,
}

impl ScientistPatch {
    pub const FIELDS: &'static [&'static str] = &["name", "field_of_study"];

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.field_of_study.is_none()
    }

    /// Merge onto an existing row; only present fields are replaced.
    pub fn apply(self, scientist: &mut Scientist) {
        if let Some(name) = self.name {
            scientist.name = name;
        }
        if let Some(field_of_study) = self.field_of_study {
            scientist.field_of_study = field_of_study;
        }
    }
}
