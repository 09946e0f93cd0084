//! Train paths: a train's complete timed traversal of the corridor.
//!
//! A `TrainPath` is built whole and never edited. Every constructor,
//! including deserialization, checks the structural invariants, so code
//! that holds a `TrainPath` can rely on them.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::time::{add_minutes, as_minutes};
use super::{Direction, DomainError, SectionId, TrainService};

/// One section of a train's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub section: SectionId,

    /// Time the train enters the section.
    pub time: NaiveDateTime,

    /// Time spent stopped in the section (minutes).
    pub dwell_mins: f64,
}

impl ScheduleEntry {
    /// Create a new schedule entry.
    pub fn new(section: SectionId, time: NaiveDateTime, dwell_mins: f64) -> Self {
        Self {
            section,
            time,
            dwell_mins,
        }
    }

    /// Time the train finishes dwelling in this section, or `None` if
    /// the dwell runs past the end of representable time.
    pub fn try_departure(&self) -> Option<NaiveDateTime> {
        add_minutes(self.time, self.dwell_mins)
    }

    /// Time the train finishes dwelling in this section.
    ///
    /// Saturates at `NaiveDateTime::MAX`; entries inside a `TrainPath`
    /// never do.
    pub fn departure(&self) -> NaiveDateTime {
        self.try_departure().unwrap_or(NaiveDateTime::MAX)
    }
}

/// A train's occupancy of one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg<'a> {
    /// Position of this leg in the schedule.
    pub index: usize,

    pub section: &'a SectionId,

    /// Entry into the section.
    pub entry: NaiveDateTime,

    /// End of the dwell (`entry + dwell`).
    pub departure: NaiveDateTime,

    /// Entry into the next section, or `departure` for the final leg.
    pub exit: NaiveDateTime,

    pub dwell_mins: f64,
}

/// Raw path data, validated on the way into a `TrainPath`.
#[derive(Deserialize)]
struct RawTrainPath {
    train: Arc<TrainService>,
    schedule: Vec<ScheduleEntry>,
    speeds: Vec<f64>,
    platforms: Vec<Option<String>>,
}

impl TryFrom<RawTrainPath> for TrainPath {
    type Error = DomainError;

    fn try_from(raw: RawTrainPath) -> Result<Self, Self::Error> {
        TrainPath::new(raw.train, raw.schedule, raw.speeds, raw.platforms)
    }
}

/// A complete, timed traversal of the corridor by one train.
///
/// `schedule`, `speeds` and `platforms` run in parallel: entry `i` of each
/// describes the train's `i`-th section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrainPath")]
pub struct TrainPath {
    train: Arc<TrainService>,
    schedule: Vec<ScheduleEntry>,
    speeds: Vec<f64>,
    platforms: Vec<Option<String>>,
}

impl TrainPath {
    /// Create a path, checking its invariants.
    ///
    /// Fails if the three sequences differ in length, the schedule is empty,
    /// a dwell is negative or runs past representable time, or a train would leave a section after it is due
    /// to enter the next one.
    pub fn new(
        train: Arc<TrainService>,
        schedule: Vec<ScheduleEntry>,
        speeds: Vec<f64>,
        platforms: Vec<Option<String>>,
    ) -> Result<Self, DomainError> {
        if schedule.is_empty() {
            return Err(DomainError::MalformedPath("schedule is empty".to_string()));
        }

        if schedule.len() != speeds.len() || schedule.len() != platforms.len() {
            return Err(DomainError::MalformedPath(format!(
                "{} schedule entries, {} speeds, {} platforms",
                schedule.len(),
                speeds.len(),
                platforms.len()
            )));
        }

        for entry in &schedule {
            if !(entry.dwell_mins.is_finite() && entry.dwell_mins >= 0.0) {
                return Err(DomainError::MalformedPath(format!(
                    "dwell in {} must be non-negative",
                    entry.section
                )));
            }
            if entry.try_departure().is_none() {
                return Err(DomainError::MalformedPath(format!(
                    "dwell of {} minutes in {} is out of range",
                    entry.dwell_mins, entry.section
                )));
            }
        }

        for pair in schedule.windows(2) {
            if pair[0].departure() > pair[1].time {
                return Err(DomainError::MalformedPath(format!(
                    "departs {} after entering {}",
                    pair[0].section, pair[1].section
                )));
            }
        }

        Ok(Self {
            train,
            schedule,
            speeds,
            platforms,
        })
    }

    pub fn train(&self) -> &Arc<TrainService> {
        &self.train
    }

    pub fn direction(&self) -> Direction {
        self.train.direction
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    /// Achieved speed per section (km/h).
    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    /// Platform assignment per section; `None` where the train does not stop.
    pub fn platforms(&self) -> &[Option<String>] {
        &self.platforms
    }

    /// Entry time into the first section.
    pub fn start_time(&self) -> NaiveDateTime {
        self.schedule[0].time
    }

    /// Departure time from the last section.
    pub fn end_time(&self) -> NaiveDateTime {
        self.schedule[self.schedule.len() - 1].departure()
    }

    /// Time from first entry to last departure.
    pub fn journey_time(&self) -> Duration {
        self.end_time() - self.start_time()
    }

    /// Journey time in minutes.
    pub fn journey_mins(&self) -> f64 {
        as_minutes(self.journey_time())
    }

    /// Sum of all dwell times (minutes).
    pub fn total_dwell_mins(&self) -> f64 {
        self.schedule.iter().map(|e| e.dwell_mins).sum()
    }

    /// Iterate over the legs of this path in schedule order.
    pub fn legs(&self) -> impl Iterator<Item = Leg<'_>> + '_ {
        self.schedule.iter().enumerate().map(move |(index, entry)| {
            let departure = entry.departure();
            let exit = self
                .schedule
                .get(index + 1)
                .map_or(departure, |next| next.time);

            Leg {
                index,
                section: &entry.section,
                entry: entry.time,
                departure,
                exit,
                dwell_mins: entry.dwell_mins,
            }
        })
    }
}
