//! Same-direction headway conflict detection.
//!
//! Two trains running the same way through a section must keep at least
//! the minimum headway between their occupancy windows. A window runs from
//! entry into the section to the end of the dwell there.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::{Leg, SectionId, TrainPath, as_minutes, try_minutes};

/// Kind of conflict found between two paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    HeadwayViolation,
}

/// A headway violation between a candidate and one existing path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub section: SectionId,

    /// The candidate's train.
    pub train: String,

    /// The existing path's train.
    pub other_train: String,

    /// Candidate's entry time into the section.
    pub time: NaiveDateTime,

    /// Candidate's dwell in the section (minutes).
    pub dwell_mins: f64,

    pub kind: ConflictKind,

    /// How far short of the minimum headway the separation falls (minutes).
    pub violation_mins: f64,
}

/// Checks candidates against existing same-direction paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictChecker {
    min_headway: Duration,
}

impl ConflictChecker {
    /// Create a checker enforcing `min_headway_mins` between trains.
    ///
    /// Negative headways are treated as zero; headways too long to
    /// represent conflict with everything.
    pub fn new(min_headway_mins: f64) -> Self {
        Self {
            min_headway: try_minutes(min_headway_mins.max(0.0)).unwrap_or(Duration::MAX),
        }
    }

    /// All headway violations between the candidate and the existing paths.
    ///
    /// Opposite-direction paths are skipped; they are the crossing check's
    /// concern. An empty result means the candidate is headway-safe.
    pub fn check_conflicts(
        &self,
        candidate: &TrainPath,
        existing: &[TrainPath],
    ) -> Vec<ConflictRecord> {
        existing
            .iter()
            .filter(|other| other.direction() == candidate.direction())
            .flat_map(|other| self.conflicts_between(candidate, other))
            .collect()
    }

    /// Returns true if the candidate violates headway against any path.
    pub fn has_conflicts(&self, candidate: &TrainPath, existing: &[TrainPath]) -> bool {
        existing
            .iter()
            .filter(|other| other.direction() == candidate.direction())
            .any(|other| {
                candidate.legs().any(|leg| {
                    other
                        .legs()
                        .filter(|o| o.section == leg.section)
                        .any(|o| self.shortfall(&leg, &o).is_some())
                })
            })
    }

    /// Violations between two same-direction paths, in candidate order.
    pub fn conflicts_between(
        &self,
        candidate: &TrainPath,
        other: &TrainPath,
    ) -> Vec<ConflictRecord> {
        if candidate.direction() != other.direction() {
            return Vec::new();
        }

        let mut conflicts = Vec::new();
        for leg in candidate.legs() {
            for other_leg in other.legs().filter(|o| o.section == leg.section) {
                if let Some(shortfall) = self.shortfall(&leg, &other_leg) {
                    trace!(
                        section = %leg.section,
                        train = %candidate.train().id,
                        other = %other.train().id,
                        shortfall_mins = as_minutes(shortfall),
                        "headway violation"
                    );
                    conflicts.push(ConflictRecord {
                        section: leg.section.clone(),
                        train: candidate.train().id.clone(),
                        other_train: other.train().id.clone(),
                        time: leg.entry,
                        dwell_mins: leg.dwell_mins,
                        kind: ConflictKind::HeadwayViolation,
                        violation_mins: as_minutes(shortfall),
                    });
                }
            }
        }
        conflicts
    }

    /// How far the gap between two windows falls short of the headway.
    ///
    /// `None` if the windows are at least a headway apart. Overlapping
    /// windows have a gap of zero.
    fn shortfall(&self, a: &Leg<'_>, b: &Leg<'_>) -> Option<Duration> {
        let gap = (a.entry.max(b.entry) - a.departure.min(b.departure)).max(Duration::zero());
        (gap <= self.min_headway).then(|| self.min_headway - gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, ScheduleEntry, TrainService};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn make_path(
        train: TrainService,
        entries: &[(&str, u32, u32, f64)], // (section, HH, MM, dwell)
    ) -> TrainPath {
        let schedule: Vec<ScheduleEntry> = entries
            .iter()
            .map(|(s, h, m, d)| ScheduleEntry::new(SectionId::parse(s).unwrap(), at(*h, *m), *d))
            .collect();
        let n = schedule.len();
        TrainPath::new(Arc::new(train), schedule, vec![100.0; n], vec![None; n]).unwrap()
    }

    fn up_train(id: &str) -> TrainService {
        let mut train = TrainService::freight(Direction::Up);
        train.id = id.to_string();
        train
    }

    #[test]
    fn three_minutes_apart_violates_five_minute_headway() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 3, 0.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);

        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(conflict.section.as_str(), "SEC1");
        assert_eq!(conflict.train, "C1");
        assert_eq!(conflict.other_train, "E1");
        assert_eq!(conflict.time, at(8, 3));
        assert_eq!(conflict.kind, ConflictKind::HeadwayViolation);
        assert_eq!(conflict.violation_mins, 2.0);
    }

    #[test]
    fn ten_minutes_apart_is_safe() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 10, 0.0)]);

        let checker = ConflictChecker::new(5.0);
        assert!(checker.check_conflicts(&candidate, &[existing.clone()]).is_empty());
        assert!(!checker.has_conflicts(&candidate, &[existing]));
    }

    #[test]
    fn unrepresentable_headway_conflicts_with_everything() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 20, 0, 0.0)]);

        for headway in [1e300, f64::INFINITY] {
            let checker = ConflictChecker::new(headway);
            assert!(checker.has_conflicts(&candidate, &[existing.clone()]));
        }
    }

    #[test]
    fn order_does_not_matter() {
        // Candidate runs ahead of the existing train
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 3, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 0, 0.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].violation_mins, 2.0);
    }

    #[test]
    fn dwell_extends_the_window() {
        // Existing dwells 08:00-08:04; candidate enters 08:07: gap 3
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 4.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 7, 0.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].violation_mins, 2.0);
    }

    #[test]
    fn overlapping_windows_breach_by_full_headway() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 4.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 2, 1.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].violation_mins, 5.0);
        assert_eq!(conflicts[0].dwell_mins, 1.0);
    }

    #[test]
    fn gap_equal_to_headway_is_a_violation_of_zero() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 5, 0.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].violation_mins, 0.0);
    }

    #[test]
    fn opposite_direction_is_ignored() {
        let existing = make_path(TrainService::freight(Direction::Down), &[("SEC1", 8, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 1, 0.0)]);

        let checker = ConflictChecker::new(5.0);
        assert!(checker.check_conflicts(&candidate, &[existing.clone()]).is_empty());
        assert!(checker.conflicts_between(&candidate, &existing).is_empty());
    }

    #[test]
    fn one_record_per_violating_section() {
        let existing = make_path(
            up_train("E1"),
            &[("SEC1", 8, 0, 0.0), ("SEC2", 8, 10, 0.0), ("SEC3", 8, 40, 0.0)],
        );
        let candidate = make_path(
            up_train("C1"),
            &[("SEC1", 8, 2, 0.0), ("SEC2", 8, 20, 0.0), ("SEC3", 8, 41, 0.0)],
        );

        // SEC2 is 10 minutes apart; SEC1 and SEC3 are too close
        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[existing]);
        let sections: Vec<&str> = conflicts.iter().map(|c| c.section.as_str()).collect();
        assert_eq!(sections, ["SEC1", "SEC3"]);
        assert_eq!(conflicts[0].violation_mins, 3.0);
        assert_eq!(conflicts[1].violation_mins, 4.0);
    }

    #[test]
    fn zero_headway_flags_only_overlaps_and_touches() {
        let existing = make_path(up_train("E1"), &[("SEC1", 8, 0, 2.0)]);
        let touching = make_path(up_train("C1"), &[("SEC1", 8, 2, 0.0)]);
        let clear = make_path(up_train("C2"), &[("SEC1", 8, 3, 0.0)]);

        let checker = ConflictChecker::new(0.0);
        assert_eq!(checker.check_conflicts(&touching, &[existing.clone()]).len(), 1);
        assert!(checker.check_conflicts(&clear, &[existing]).is_empty());
    }

    #[test]
    fn conflicts_against_several_paths() {
        let e1 = make_path(up_train("E1"), &[("SEC1", 8, 0, 0.0)]);
        let e2 = make_path(up_train("E2"), &[("SEC1", 8, 8, 0.0)]);
        let e3 = make_path(up_train("E3"), &[("SEC1", 9, 0, 0.0)]);
        let candidate = make_path(up_train("C1"), &[("SEC1", 8, 4, 0.0)]);

        let conflicts = ConflictChecker::new(5.0).check_conflicts(&candidate, &[e1, e2, e3]);
        let others: Vec<&str> = conflicts.iter().map(|c| c.other_train.as_str()).collect();
        assert_eq!(others, ["E1", "E2"]);
    }
}
