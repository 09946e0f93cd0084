//! Network model error types.

use crate::domain::{Direction, SectionId};

/// Errors from building, loading or querying the network model.
///
/// All of these indicate a configuration problem rather than a runtime
/// condition: a search cannot proceed over a network that produces them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// No section with this id exists for the given direction
    #[error("unknown section {section} ({direction})")]
    UnknownSection {
        section: SectionId,
        direction: Direction,
    },

    /// The direction has no route through the corridor
    #[error("no route defined for direction {0}")]
    NoRoute(Direction),

    /// The same directional section was defined twice
    #[error("section {section} ({direction}) is defined more than once")]
    DuplicateSection {
        section: SectionId,
        direction: Direction,
    },

    /// A route visits the same section twice
    #[error("route {direction} visits section {section} more than once")]
    RepeatedInRoute {
        section: SectionId,
        direction: Direction,
    },

    /// A section has physically impossible parameters
    #[error("invalid section {section}: {reason}")]
    InvalidSection {
        section: SectionId,
        reason: &'static str,
    },

    /// Failed to read a fixture file
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// Fixture JSON was malformed
    #[error("failed to parse network: {message}")]
    Parse { message: String },
}
