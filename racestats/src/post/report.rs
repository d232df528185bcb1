use crate::core::entrant::{Best, Incidents, Lap, PenaltyRecord};
use crate::core::positions::PositionSample;
use crate::core::session::{ChatMessage, HostFlags, Overtake, SessionKind, Weather};
use crate::interfaces::records::WorldRecord;
use helpers::general::format_laptime;
use serde::Serialize;
use std::fmt;

/// * `Finished` -> on the lead lap
/// * `Lapped` -> laps down, but still running at the end of the session
/// * `Dnf` -> retired
/// * `Dsq` -> disqualified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Finished,
    Lapped,
    Dnf,
    Dsq,
}

/// SessionSummary is a copy of the session context at the end of the session with the session
/// length resolved from its sources.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    pub track_name: String,
    pub track_layout: String,
    pub session_kind: SessionKind,
    pub weather: Weather,
    pub host_flags: HostFlags,
    pub qualify_minutes: Option<u32>,
    pub race_laps: Option<u32>,
    pub chat: Vec<ChatMessage>,
    pub overtakes: Vec<Overtake>,
}

/// Stint is a contiguous run of laps driven by one driver, laps are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stint {
    pub driver: String,
    pub from_lap: u32,
    pub to_lap: u32,
}

/// * `lap` - Lap in which the pit stop was made
/// * `duration` - (s) Standstill duration, e.g. "25.300"
/// * `reason` - Work performed during the stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitStopResult {
    pub lap: u32,
    pub duration: String,
    pub reason: Vec<&'static str>,
}

/// EntrantResult contains everything that is reported about a classified entrant.
#[derive(Debug, Clone, Serialize)]
pub struct EntrantResult {
    pub position: u32,
    pub user_name: String,
    pub driver_name: String,
    pub car_name: String,
    pub grid_position: u32,
    pub laps: u32,
    pub total_time: u64,
    pub gap: String,
    pub status: Status,
    pub best_lap: Option<Best<u32>>,
    pub best_sectors: Vec<Option<Best<u32>>>,
    pub theoretical_best: Option<u64>,
    pub top_speed: Option<Best<f32>>,
    pub average_laptime: Option<f64>,
    pub consistency: Option<f64>,
    pub laps_led: u32,
    pub stints: Vec<Stint>,
    pub pit_stops: Vec<PitStopResult>,
    pub pit_time: String,
    /// number of stops as counted by the feed (also covers stops without a completion event)
    pub stop_count: u32,
    pub penalties: Vec<PenaltyRecord>,
    pub penalty_annotations: Vec<String>,
    pub incidents: Incidents,
    pub assists: u32,
    pub lap_history: Vec<Lap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub position: u32,
    pub user_name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingBoard {
    pub category: String,
    pub entries: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionHistory {
    pub user_name: String,
    pub samples: Vec<PositionSample>,
}

impl PositionHistory {
    pub fn positions(&self) -> Vec<u32> {
        crate::core::positions::positions(&self.samples).collect()
    }
}

/// Report contains all session information that is handed to the export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub session: SessionSummary,
    pub results: Vec<EntrantResult>,
    pub rankings: Vec<RankingBoard>,
    pub positions: Vec<PositionHistory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub world_records: Vec<WorldRecord>,
}

impl Report {
    pub fn ranking(&self, category: &str) -> Option<&RankingBoard> {
        self.rankings.iter().find(|board| board.category == category)
    }

    pub fn result(&self, user_name: &str) -> Option<&EntrantResult> {
        self.results.iter().find(|res| res.user_name == user_name)
    }
}

/// The display implementation prints the classification as a table, e.g. for the console output.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "RESULT: {} ({:?})",
            self.session.track_name, self.session.session_kind
        )?;
        writeln!(
            f,
            "{:>3}, {:<20}, {:>4}, {:>4}, {:>12}, {:>10}, {:>10}, {:>8}",
            "pos", "driver", "grid", "laps", "gap", "best lap", "status", "stops"
        )?;

        for res in self.results.iter() {
            let best_lap = res
                .best_lap
                .map(|best| format_laptime(best.value as u64))
                .unwrap_or_else(|| String::from("-"));

            writeln!(
                f,
                "{:>3}, {:<20}, {:>4}, {:>4}, {:>12}, {:>10}, {:>10}, {:>8}",
                res.position,
                res.driver_name,
                res.grid_position,
                res.laps,
                res.gap,
                best_lap,
                format!("{:?}", res.status),
                res.pit_stops.len()
            )?;
        }

        Ok(())
    }
}
