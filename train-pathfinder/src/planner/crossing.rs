//! Detection of opposite-direction crossings.
//!
//! Opposite-direction trains share the corridor's physical sections but
//! traverse them in reverse order. No passing loops are modelled, so two
//! such trains may never occupy the same section at the same time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::{Leg, SectionId, TrainPath};

/// Where and when two opposite-direction paths would meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crossing {
    pub section: SectionId,
    pub train: String,
    pub other_train: String,
    /// Start of the shared occupancy.
    pub from: NaiveDateTime,
    /// End of the shared occupancy.
    pub until: NaiveDateTime,
}

/// Returns true if the candidate crosses any of the existing paths.
pub fn crosses(candidate: &TrainPath, existing: &[TrainPath]) -> bool {
    existing
        .iter()
        .any(|other| find_crossing(candidate, other).is_some())
}

/// Returns true if two paths cross. Symmetric in its arguments.
pub fn paths_cross(a: &TrainPath, b: &TrainPath) -> bool {
    find_crossing(a, b).is_some()
}

/// Find the first crossing between two paths, in `a`'s schedule order.
///
/// Same-direction paths never cross; see the headway checker for those.
pub fn find_crossing(a: &TrainPath, b: &TrainPath) -> Option<Crossing> {
    if a.direction() == b.direction() {
        return None;
    }

    a.legs().find_map(|leg_a| {
        b.legs()
            .filter(|leg_b| leg_b.section == leg_a.section)
            .find_map(|leg_b| shared_occupancy(&leg_a, &leg_b))
            .map(|(from, until)| Crossing {
                section: leg_a.section.clone(),
                train: a.train().id.clone(),
                other_train: b.train().id.clone(),
                from,
                until,
            })
    })
}

/// All crossings between a candidate and a set of paths.
pub fn find_crossings(candidate: &TrainPath, existing: &[TrainPath]) -> Vec<Crossing> {
    existing
        .iter()
        .filter(|other| other.direction() != candidate.direction())
        .flat_map(|other| {
            candidate.legs().flat_map(move |leg_a| {
                other
                    .legs()
                    .filter(move |leg_b| leg_b.section == leg_a.section)
                    .filter_map(move |leg_b| {
                        shared_occupancy(&leg_a, &leg_b).map(|(from, until)| Crossing {
                            section: leg_a.section.clone(),
                            train: candidate.train().id.clone(),
                            other_train: other.train().id.clone(),
                            from,
                            until,
                        })
                    })
            })
        })
        .collect()
}

/// The interval both legs occupy, if it has positive length.
fn shared_occupancy(a: &Leg<'_>, b: &Leg<'_>) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let from = a.entry.max(b.entry);
    let until = a.exit.min(b.exit);
    (until > from).then_some((from, until))
}
