//! Renders entities to JSON objects: columns first, then relationships not excluded.
//!
//! Every entity type carries default rules that cut the scientist/mission/planet
//! cycle; callers can only add exclusions on top of them.

mod rules;

pub use rules::{MissionRule, PlanetRule, Rule, Rules, ScientistRule};

use crate::model::{Graph, Mission, Planet, Scientist};
use serde_json::{json, Map, Value};

pub trait Render {
    type Rule: rules::Rule;

    /// Always applied, whatever the caller passes.
    const DEFAULT_RULES: &'static [Self::Rule];

    fn render(&self, graph: &Graph, rules: &Rules<Self::Rule>) -> Map<String, Value>;
}

/// Serialize one entity with its default rules plus `extra`.
pub fn serialize<T, I>(entity: &T, graph: &Graph, extra: I) -> Value
where
    T: Render,
    I: IntoIterator<Item = T::Rule>,
{
    let rules = Rules::new()
        .with(T::DEFAULT_RULES.iter().copied())
        .with(extra);
    tracing::debug!(rules = %rules, "serialize");
    Value::Object(entity.render(graph, &rules))
}

/// Serialize each entity with the same rules.
pub fn serialize_many<'a, T, E>(entities: E, graph: &Graph, extra: &[T::Rule]) -> Value
where
    T: Render + 'a,
    E: IntoIterator<Item = &'a T>,
{
    Value::Array(
        entities
            .into_iter()
            .map(|e| serialize(e, graph, extra.iter().copied()))
            .collect(),
    )
}

impl Render for Scientist {
    type Rule = ScientistRule;

    const DEFAULT_RULES: &'static [ScientistRule] = &[ScientistRule::MissionsScientist];

    fn render(&self, graph: &Graph, rules: &Rules<ScientistRule>) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".into(), json!(self.id));
        out.insert("name".into(), json!(self.name));
        out.insert("field_of_study".into(), json!(self.field_of_study));
        if !rules.excludes(ScientistRule::Missions) {
            let below: Vec<MissionRule> = rules.iter().filter_map(ScientistRule::below_missions).collect();
            let missions = graph
                .missions_of_scientist(self.id)
                .map(|m| serialize(m, graph, below.iter().copied()))
                .collect();
            out.insert("missions".into(), Value::Array(missions));
        }
        out
    }
}

impl Render for Planet {
    type Rule = PlanetRule;

    const DEFAULT_RULES: &'static [PlanetRule] = &[PlanetRule::MissionsPlanet];

    fn render(&self, graph: &Graph, rules: &Rules<PlanetRule>) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".into(), json!(self.id));
        out.insert("name".into(), json!(self.name));
        out.insert("distance_from_earth".into(), json!(self.distance_from_earth));
        out.insert("nearest_star".into(), json!(self.nearest_star));
        if !rules.excludes(PlanetRule::Missions) {
            let below: Vec<MissionRule> = rules.iter().filter_map(PlanetRule::below_missions).collect();
            let missions = graph
                .missions_of_planet(self.id)
                .map(|m| serialize(m, graph, below.iter().copied()))
                .collect();
            out.insert("missions".into(), Value::Array(missions));
        }
        out
    }
}

impl Render for Mission {
    type Rule = MissionRule;

    const DEFAULT_RULES: &'static [MissionRule] =
        &[MissionRule::ScientistMissions, MissionRule::PlanetMissions];

    fn render(&self, graph: &Graph, rules: &Rules<MissionRule>) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("id".into(), json!(self.id));
        out.insert("name".into(), json!(self.name));
        out.insert("scientist_id".into(), json!(self.scientist_id));
        out.insert("planet_id".into(), json!(self.planet_id));
        if !rules.excludes(MissionRule::Scientist) {
            // Unloaded parents render as null.
            let scientist = graph
                .scientist(self.scientist_id)
                .map(|s| serialize(s, graph, rules.iter().filter_map(MissionRule::below_scientist)))
                .unwrap_or(Value::Null);
            out.insert("scientist".into(), scientist);
        }
        if !rules.excludes(MissionRule::Planet) {
            let planet = graph
                .planet(self.planet_id)
                .map(|p| serialize(p, graph, rules.iter().filter_map(MissionRule::below_planet)))
                .unwrap_or(Value::Null);
            out.insert("planet".into(), planet);
        }
        out
    }
}
