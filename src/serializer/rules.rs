//! Exclusion rules: which relationship paths to drop when rendering an entity.
//!
//! Each entity type has its own closed set of paths. When rendering descends into
//! a relationship, rules that start with that relationship are re-rooted onto the
//! related entity's rule type; the rest do not apply below this level.

use std::collections::BTreeSet;
use std::fmt;

pub trait Rule: Copy + Ord + fmt::Display + fmt::Debug + 'static {}

/// Paths to drop when rendering a scientist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScientistRule {
    Missions,
    MissionsScientist,
    MissionsPlanet,
}

/// Paths to drop when rendering a planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanetRule {
    Missions,
    MissionsPlanet,
    MissionsScientist,
}

/// Paths to drop when rendering a mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissionRule {
    Scientist,
    Planet,
    ScientistMissions,
    PlanetMissions,
}

impl Rule for ScientistRule {}
impl Rule for PlanetRule {}
impl Rule for MissionRule {}

impl ScientistRule {
    /// Re-root onto a mission reached through `missions`.
    pub fn below_missions(self) -> Option<MissionRule> {
        match self {
            ScientistRule::Missions => None,
            ScientistRule::MissionsScientist => Some(MissionRule::Scientist),
            ScientistRule::MissionsPlanet => Some(MissionRule::Planet),
        }
    }
}

impl PlanetRule {
    /// Re-root onto a mission reached through `missions`.
    pub fn below_missions(self) -> Option<MissionRule> {
        match self {
            PlanetRule::Missions => None,
            PlanetRule::MissionsPlanet => Some(MissionRule::Planet),
            PlanetRule::MissionsScientist => Some(MissionRule::Scientist),
        }
    }
}

impl MissionRule {
    /// Re-root onto the scientist reached through `scientist`.
    pub fn below_scientist(self) -> Option<ScientistRule> {
        match self {
            MissionRule::ScientistMissions => Some(ScientistRule::Missions),
            _ => None,
        }
    }

    /// Re-root onto the planet reached through `planet`.
    pub fn below_planet(self) -> Option<PlanetRule> {
        match self {
            MissionRule::PlanetMissions => Some(PlanetRule::Missions),
            _ => None,
        }
    }
}

impl fmt::Display for ScientistRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScientistRule::Missions => "-missions",
            ScientistRule::MissionsScientist => "-missions.scientist",
            ScientistRule::MissionsPlanet => "-missions.planet",
        })
    }
}

impl fmt::Display for PlanetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanetRule::Missions => "-missions",
            PlanetRule::MissionsPlanet => "-missions.planet",
            PlanetRule::MissionsScientist => "-missions.scientist",
        })
    }
}

impl fmt::Display for MissionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissionRule::Scientist => "-scientist",
            MissionRule::Planet => "-planet",
            MissionRule::ScientistMissions => "-scientist.missions",
            MissionRule::PlanetMissions => "-planet.missions",
        })
    }
}

/// A set of exclusion rules. Only ever grows: defaults and caller rules are unioned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules<R: Rule> {
    set: BTreeSet<R>,
}

impl<R: Rule> Default for Rules<R> {
    fn default() -> Self {
        Rules { set: BTreeSet::new() }
    }
}

impl<R: Rule> Rules<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I: IntoIterator<Item = R>>(mut self, rules: I) -> Self {
        self.set.extend(rules);
        self
    }

    pub fn excludes(&self, rule: R) -> bool {
        self.set.contains(&rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        self.set.iter().copied()
    }

}

impl<R: Rule> fmt::Display for Rules<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.set.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
