//! Conflict-free path planner.
//!
//! This module answers: "given the trains already in the corridor, when
//! and how fast can this new train run without getting in anyone's way?"
//!
//! Candidates are drawn at random within the train's and the sections'
//! limits, filtered by the crossing and headway checks, and ranked by a
//! success predictor.

mod config;
mod conflict;
mod crossing;
mod generate;
mod rank;
mod search;


pub use config::SearchConfig;
pub use conflict::{ConflictChecker, ConflictKind, ConflictRecord};
pub use crossing::{Crossing, crosses, find_crossing, find_crossings, paths_cross};
pub use generate::{CandidateGenerator, GenerationOutcome};
pub use rank::{NEUTRAL_SCORE, ScoredPath, Selection, score_path, select_best};
pub use search::{Planner, SearchError, SearchRequest, SearchResult};
