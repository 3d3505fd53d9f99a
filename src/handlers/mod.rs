//! HTTP handlers for scientists, planets and missions.

pub mod mission;
pub mod planet;
pub mod scientist;
