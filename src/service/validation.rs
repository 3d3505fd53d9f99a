//! Request validation: turn JSON bodies into typed payloads, rejecting blank or mistyped fields.

use crate::error::AppError;
use crate::model::{NewMission, NewPlanet, NewScientist, Scientist, ScientistPatch};
use serde_json::{Map, Value};

pub type Body = Map<String, Value>;

pub struct RequestValidator;

impl RequestValidator {
    pub fn new_scientist(body: Option<&Body>) -> Result<NewScientist, AppError> {
        let body = require_object(body)?;
        Ok(NewScientist {
            name: required_text(body, "name")?,
            field_of_study: required_text(body, "field_of_study")?,
        })
    }

    pub fn new_mission(body: Option<&Body>) -> Result<NewMission, AppError> {
        let body = require_object(body)?;
        Ok(NewMission {
            name: required_text(body, "name")?,
            scientist_id: required_id(body, "scientist_id")?,
            planet_id: required_id(body, "planet_id")?,
        })
    }

    /// Keys outside the allowlist are reported by name before any field is checked.
    pub fn scientist_patch(body: Option<&Body>) -> Result<ScientistPatch, AppError> {
        let body = require_object(body)?;
        if let Some(key) = body.keys().find(|k| !ScientistPatch::FIELDS.contains(&k.as_str())) {
            return Err(AppError::UnknownField(key.clone()));
        }
        let mut patch = ScientistPatch::default();
        if body.contains_key("name") {
            patch.name = Some(required_text(body, "name")?);
        }
        if body.contains_key("field_of_study") {
            patch.field_of_study = Some(required_text(body, "field_of_study")?);
        }
        Ok(patch)
    }

    /// Re-check a row after a patch was merged onto it.
    pub fn scientist(scientist: &Scientist) -> Result<(), AppError> {
        non_blank("name", &scientist.name)?;
        non_blank("field_of_study", &scientist.field_of_study)
    }

    pub fn new_planet(planet: &NewPlanet) -> Result<(), AppError> {
        non_blank("name", &planet.name)?;
        non_blank("nearest_star", &planet.nearest_star)
    }
}

fn require_object(body: Option<&Body>) -> Result<&Body, AppError> {
    body.ok_or_else(|| AppError::Validation("body must be a JSON object".into()))
}

fn required_text(body: &Body, key: &str) -> Result<String, AppError> {
    match body.get(key) {
        Some(Value::String(s)) => {
            non_blank(key, s)?;
            Ok(s.clone())
        }
        Some(Value::Null) | None => Err(AppError::Validation(format!("{} is required", key))),
        Some(_) => Err(AppError::Validation(format!("{} must be a string", key))),
    }
}

fn required_id(body: &Body, key: &str) -> Result<i64, AppError> {
    match body.get(key) {
        Some(v) => match v.as_i64() {
            Some(0) => Err(AppError::Validation(format!("{} must be non-zero", key))),
            Some(id) => Ok(id),
            None if v.is_null() => Err(AppError::Validation(format!("{} is required", key))),
            None => Err(AppError::Validation(format!("{} must be an integer", key))),
        },
        None => Err(AppError::Validation(format!("{} is required", key))),
    }
}

fn non_blank(key: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must be provided and non-empty", key)));
    }
    Ok(())
}
