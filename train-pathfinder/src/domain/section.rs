//! Track section types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Direction;

/// Error returned when parsing an invalid section identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid section id: {reason}")]
pub struct InvalidSectionId {
    reason: &'static str,
}

/// Identifier of a *physical* track section.
///
/// Both directional traversals of a section share the same id; the
/// direction is carried separately, never encoded in the id.
///
/// # Examples
///
/// ```
/// use train_pathfinder::domain::SectionId;
///
/// let id = SectionId::parse("SEC1").unwrap();
/// assert_eq!(id.as_str(), "SEC1");
///
/// assert!(SectionId::parse("").is_err());
/// assert!(SectionId::parse("SEC 1").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Parse a section id.
    ///
    /// Ids must be non-empty and contain no whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidSectionId> {
        if s.is_empty() {
            return Err(InvalidSectionId {
                reason: "must not be empty",
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(InvalidSectionId {
                reason: "must not contain whitespace",
            });
        }
        Ok(SectionId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = InvalidSectionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a section has one shared track or one track per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Single,
    Double,
}

/// One directional traversal of a physical track section.
///
/// Lengths are in kilometres, speeds in km/h, dwell times in minutes.
/// Sections are immutable once loaded into a [`Network`](crate::network::Network).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSection {
    /// Physical section this traversal belongs to.
    pub id: SectionId,

    /// Direction of this traversal.
    pub direction: Direction,

    pub length_km: f64,

    pub max_speed_kmh: f64,

    /// Location name at the entry end.
    pub start_point: String,

    /// Location name at the exit end.
    pub end_point: String,

    pub track_type: TrackType,

    #[serde(default)]
    pub has_passing_loop: bool,

    /// Signal positions, in km from the entry end.
    #[serde(default)]
    pub signals: Vec<f64>,

    /// Platform identifiers, in preference order.
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Minimum dwell floor for stops in this section.
    #[serde(default)]
    pub min_dwell_mins: f64,
}

impl TrackSection {
    /// Returns true if trains can stop in this section.
    pub fn has_platforms(&self) -> bool {
        !self.platforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(platforms: &[&str]) -> TrackSection {
        TrackSection {
            id: SectionId::parse("SEC1").unwrap(),
            direction: Direction::Up,
            length_km: 10.0,
            max_speed_kmh: 120.0,
            start_point: "A".to_string(),
            end_point: "B".to_string(),
            track_type: TrackType::Double,
            has_passing_loop: false,
            signals: vec![],
            platforms: platforms.iter().map(|p| p.to_string()).collect(),
            min_dwell_mins: 0.0,
        }
    }

    #[test]
    fn parse_valid_ids() {
        assert!(SectionId::parse("SEC1").is_ok());
        assert!(SectionId::parse("x").is_ok());
        assert!(SectionId::parse("north-loop_2").is_ok());
    }

    #[test]
    fn reject_invalid_ids() {
        assert!(SectionId::parse("").is_err());
        assert!(SectionId::parse(" ").is_err());
        assert!(SectionId::parse("SEC\t1").is_err());
    }

    #[test]
    fn debug_and_display() {
        let id = SectionId::parse("SEC2").unwrap();
        assert_eq!(format!("{id}"), "SEC2");
        assert_eq!(format!("{id:?}"), "SectionId(SEC2)");
    }

    #[test]
    fn serde_validates_id() {
        let id: SectionId = serde_json::from_str("\"SEC3\"").unwrap();
        assert_eq!(id.as_str(), "SEC3");
        assert!(serde_json::from_str::<SectionId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"SEC3\"");
    }

    #[test]
    fn has_platforms_follows_platform_list() {
        assert!(section(&["A1"]).has_platforms());
        assert!(!section(&[]).has_platforms());
    }

    #[test]
    fn optional_fields_default() {
        let json = r#"{
            "id": "SEC9",
            "direction": "down",
            "length_km": 4.5,
            "max_speed_kmh": 80.0,
            "start_point": "X",
            "end_point": "Y",
            "track_type": "single"
        }"#;
        let section: TrackSection = serde_json::from_str(json).unwrap();
        assert_eq!(section.direction, Direction::Down);
        assert_eq!(section.track_type, TrackType::Single);
        assert!(!section.has_platforms());
        assert!(section.signals.is_empty());
        assert_eq!(section.min_dwell_mins, 0.0);
    }
}
