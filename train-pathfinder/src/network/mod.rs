//! Read-only model of the corridor's track sections.
//!
//! The network maps each `(section, direction)` pair to its directional
//! traversal and each direction to its ordered route. It is built once,
//! validated up front, and then only queried by the search.

mod demo;
mod error;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Direction, SectionId, TrackSection};

pub use error::NetworkError;

/// Ordered section lists, one per direction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routes {
    #[serde(default)]
    pub up: Vec<SectionId>,
    #[serde(default)]
    pub down: Vec<SectionId>,
}

impl Routes {
    /// Returns the route for a direction.
    pub fn get(&self, direction: Direction) -> &[SectionId] {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }
}

/// Serialized form of a network, as stored in fixture files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkFixture {
    pub sections: Vec<TrackSection>,
    pub routes: Routes,
}

/// Immutable section lookup for the corridor.
#[derive(Debug, Clone)]
pub struct Network {
    sections: HashMap<(SectionId, Direction), TrackSection>,
    routes: Routes,
}

impl Network {
    /// Build a network, validating every section and route.
    ///
    /// Fails on duplicate or physically impossible sections, on route entries
    /// that don't resolve to a section for that direction, and on routes that
    /// visit a section twice.
    pub fn new(sections: Vec<TrackSection>, routes: Routes) -> Result<Self, NetworkError> {
        let mut by_key = HashMap::with_capacity(sections.len());

        for section in sections {
            validate_section(&section)?;
            let key = (section.id.clone(), section.direction);
            if by_key.contains_key(&key) {
                return Err(NetworkError::DuplicateSection {
                    section: key.0,
                    direction: key.1,
                });
            }
            by_key.insert(key, section);
        }

        for direction in Direction::ALL {
            let mut seen = HashSet::new();
            for id in routes.get(direction) {
                if !by_key.contains_key(&(id.clone(), direction)) {
                    return Err(NetworkError::UnknownSection {
                        section: id.clone(),
                        direction,
                    });
                }
                if !seen.insert(id) {
                    return Err(NetworkError::RepeatedInRoute {
                        section: id.clone(),
                        direction,
                    });
                }
            }
        }

        Ok(Self {
            sections: by_key,
            routes,
        })
    }

    /// Parse a network from fixture JSON.
    pub fn from_json_str(json: &str) -> Result<Self, NetworkError> {
        let fixture: NetworkFixture =
            serde_json::from_str(json).map_err(|e| NetworkError::Parse {
                message: e.to_string(),
            })?;
        Self::new(fixture.sections, fixture.routes)
    }

    /// Load a network from a fixture file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| NetworkError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Look up the traversal of a section in a direction.
    pub fn section(
        &self,
        id: &SectionId,
        direction: Direction,
    ) -> Result<&TrackSection, NetworkError> {
        self.sections
            .get(&(id.clone(), direction))
            .ok_or_else(|| NetworkError::UnknownSection {
                section: id.clone(),
                direction,
            })
    }

    /// The ordered sections a train in this direction traverses.
    pub fn route(&self, direction: Direction) -> Result<&[SectionId], NetworkError> {
        let route = self.routes.get(direction);
        if route.is_empty() {
            return Err(NetworkError::NoRoute(direction));
        }
        Ok(route)
    }

    /// All directional sections, in no particular order.
    pub fn sections(&self) -> impl Iterator<Item = &TrackSection> {
        self.sections.values()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Serializable form of this network, sections in route order.
    pub fn to_fixture(&self) -> NetworkFixture {
        let mut sections: Vec<TrackSection> = self.sections.values().cloned().collect();
        sections.sort_by_key(|s| {
            (
                s.direction == Direction::Down,
                self.route_position(s),
                s.id.clone(),
            )
        });

        NetworkFixture {
            sections,
            routes: self.routes.clone(),
        }
    }

    fn route_position(&self, section: &TrackSection) -> usize {
        self.routes
            .get(section.direction)
            .iter()
            .position(|id| *id == section.id)
            .unwrap_or(usize::MAX)
    }
}

fn validate_section(section: &TrackSection) -> Result<(), NetworkError> {
    let invalid = |reason| NetworkError::InvalidSection {
        section: section.id.clone(),
        reason,
    };

    if !(section.length_km.is_finite() && section.length_km > 0.0) {
        return Err(invalid("length must be positive"));
    }
    if !(section.max_speed_kmh.is_finite() && section.max_speed_kmh > 0.0) {
        return Err(invalid("max speed must be positive"));
    }
    if !(section.min_dwell_mins.is_finite() && section.min_dwell_mins >= 0.0) {
        return Err(invalid("min dwell must be non-negative"));
    }

    Ok(())
}
