//! Built-in demonstration corridor.

use crate::domain::{Direction, SectionId, TrackSection, TrackType};

use super::{Network, NetworkError, Routes};

struct DemoSection {
    id: &'static str,
    length_km: f64,
    max_speed_kmh: f64,
    points: (&'static str, &'static str),
    has_passing_loop: bool,
    signals: [f64; 2],
    up_platforms: &'static [&'static str],
    down_platforms: &'static [&'static str],
    min_dwell_mins: f64,
}

const DEMO_SECTIONS: [DemoSection; 3] = [
    DemoSection {
        id: "SEC1",
        length_km: 10.0,
        max_speed_kmh: 120.0,
        points: ("A", "B"),
        has_passing_loop: true,
        signals: [2.5, 7.5],
        up_platforms: &["A1", "B1"],
        down_platforms: &["B2", "A2"],
        min_dwell_mins: 2.0,
    },
    DemoSection {
        id: "SEC2",
        length_km: 15.0,
        max_speed_kmh: 100.0,
        points: ("B", "C"),
        has_passing_loop: false,
        signals: [5.0, 10.0],
        up_platforms: &["B1", "C1"],
        down_platforms: &["C2", "B2"],
        min_dwell_mins: 1.5,
    },
    DemoSection {
        id: "SEC3",
        length_km: 12.0,
        max_speed_kmh: 90.0,
        points: ("C", "C"),
        has_passing_loop: true,
        signals: [3.0, 9.0],
        up_platforms: &["C1"],
        down_platforms: &["C2"],
        min_dwell_mins: 2.0,
    },
];

fn traversal(demo: &DemoSection, id: &SectionId, direction: Direction) -> TrackSection {
    let (start, end, platforms) = match direction {
        Direction::Up => (demo.points.0, demo.points.1, demo.up_platforms),
        Direction::Down => (demo.points.1, demo.points.0, demo.down_platforms),
    };

    TrackSection {
        id: id.clone(),
        direction,
        length_km: demo.length_km,
        max_speed_kmh: demo.max_speed_kmh,
        start_point: start.to_string(),
        end_point: end.to_string(),
        track_type: TrackType::Double,
        has_passing_loop: demo.has_passing_loop,
        signals: demo.signals.to_vec(),
        platforms: platforms.iter().map(|p| p.to_string()).collect(),
        min_dwell_mins: demo.min_dwell_mins,
    }
}

impl Network {
    /// A three-section double-track corridor, A to C.
    ///
    /// `Up` trains run SEC1, SEC2, SEC3; `Down` trains run the reverse.
    pub fn demo_corridor() -> Result<Self, NetworkError> {
        let mut sections = Vec::with_capacity(DEMO_SECTIONS.len() * 2);
        let mut up = Vec::with_capacity(DEMO_SECTIONS.len());

        for demo in &DEMO_SECTIONS {
            let id = SectionId::parse(demo.id).map_err(|e| NetworkError::Parse {
                message: e.to_string(),
            })?;
            for direction in Direction::ALL {
                sections.push(traversal(demo, &id, direction));
            }
            up.push(id);
        }

        let down = up.iter().rev().cloned().collect();
        Network::new(sections, Routes { up, down })
    }
}
