//! Domain types for the path search.
//!
//! This module contains the model types that describe the corridor, the
//! trains running on it and their timed paths. Types that carry invariants
//! enforce them at construction time, so code that receives these types can
//! trust their validity.

mod direction;
mod error;
mod path;
mod section;
mod time;
mod train;

pub use direction::Direction;
pub use error::DomainError;
pub use path::{Leg, ScheduleEntry, TrainPath};
pub use section::{InvalidSectionId, SectionId, TrackSection, TrackType};
pub use time::{add_minutes, as_minutes, try_minutes};
pub use train::{TrainCategory, TrainService};
