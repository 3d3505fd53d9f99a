//! Rows loaded for one response, with relationship navigation between them.
//!
//! Relationships are resolved by key lookup over the loaded rows, so a
//! scientist -> mission -> scientist walk never needs owned back-pointers.

use crate::model::{Mission, Planet, Scientist};
use std::collections::{BTreeMap, HashSet};

#[derive(Clone, Debug, Default)]
pub struct Graph {
    scientists: BTreeMap<i64, Scientist>,
    planets: BTreeMap<i64, Planet>,
    missions: BTreeMap<i64, Mission>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_scientist(&mut self, scientist: Scientist) {
        self.scientists.insert(scientist.id, scientist);
    }

    pub fn insert_planet(&mut self, planet: Planet) {
        self.planets.insert(planet.id, planet);
    }

    pub fn insert_mission(&mut self, mission: Mission) {
        self.missions.insert(mission.id, mission);
    }

    pub fn scientist(&self, id: i64) -> Option<&Scientist> {
        self.scientists.get(&id)
    }

    pub fn planet(&self, id: i64) -> Option<&Planet> {
        self.planets.get(&id)
    }

    pub fn mission(&self, id: i64) -> Option<&Mission> {
        self.missions.get(&id)
    }

    /// All loaded scientists, ordered by id.
    pub fn scientists(&self) -> impl Iterator<Item = &Scientist> {
        self.scientists.values()
    }

    /// All loaded planets, ordered by id.
    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    pub fn missions_of_scientist(&self, scientist_id: i64) -> impl Iterator<Item = &Mission> {
        self.missions
            .values()
            .filter(move |m| m.scientist_id == scientist_id)
    }

    pub fn missions_of_planet(&self, planet_id: i64) -> impl Iterator<Item = &Mission> {
        self.missions.values().filter(move |m| m.planet_id == planet_id)
    }

    /// Planets a scientist has visited, projected through missions. First visit wins the order.
    pub fn planets_of_scientist(&self, scientist_id: i64) -> Vec<&Planet> {
        let mut seen = HashSet::new();
        self.missions_of_scientist(scientist_id)
            .filter(|m| seen.insert(m.planet_id))
            .filter_map(|m| self.planet(m.planet_id))
            .collect()
    }

    /// Scientists who have visited a planet, projected through missions.
    pub fn scientists_of_planet(&self, planet_id: i64) -> Vec<&Scientist> {
        let mut seen = HashSet::new();
        self.missions_of_planet(planet_id)
            .filter(|m| seen.insert(m.scientist_id))
            .filter_map(|m| self.scientist(m.scientist_id))
            .collect()
    }
}
