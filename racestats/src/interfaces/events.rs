use crate::core::entrant::{FlagKind, PenaltyKind, PitData, ResultCode, GRID_SENTINEL};
use crate::core::session::{HostFlags, SessionKind, Weather};
use serde::Deserialize;

fn default_grid_position() -> u32 {
    GRID_SENTINEL
}

/// SessionEvent is a typed event as delivered by the protocol layer. Entrants are referenced by
/// their stable identity (user name), all times are given in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    // SESSION -------------------------------------------------------------------------------------
    SessionInfo {
        track_name: String,
        #[serde(default)]
        track_layout: String,
        #[serde(default)]
        session_kind: SessionKind,
        #[serde(default)]
        weather: Weather,
        #[serde(default)]
        host_flags: HostFlags,
        qualify_minutes: Option<u32>,
        race_laps: Option<u32>,
    },
    LengthConfirmed {
        qualify_minutes: Option<u32>,
        race_laps: Option<u32>,
    },
    Chat {
        nickname: String,
        text: String,
    },
    Overtake {
        overtaker: String,
        overtaken: String,
        lap: u32,
        gap_ms: i32,
        elapsed_ms: u32,
    },

    // ENTRANT -------------------------------------------------------------------------------------
    Join {
        entrant: String,
        connection_id: u32,
        slot_id: u32,
        #[serde(default)]
        car_name: String,
        #[serde(default = "default_grid_position")]
        grid_position: u32,
    },
    Disconnect {
        entrant: String,
    },
    Split {
        entrant: String,
        split_index: u8,
        split_time_ms: u32,
        elapsed_ms: u32,
    },
    Lap {
        entrant: String,
        lap_time_ms: u32,
        stop_count: u32,
        laps_done: u32,
        final_split_index: u8,
        elapsed_ms: u32,
    },
    Penalty {
        entrant: String,
        old_penalty: PenaltyKind,
        new_penalty: PenaltyKind,
        #[serde(default)]
        reason: String,
    },
    SpeedSample {
        entrant: String,
        speed: f32,
    },
    PitStart {
        entrant: String,
        #[serde(default)]
        pit_data: PitData,
    },
    PitComplete {
        entrant: String,
        duration_ms: u32,
    },
    DriverChange {
        entrant: String,
        old_identity: String,
        new_identity: String,
    },
    Result {
        entrant: String,
        total_time_ms: u64,
        result_code: ResultCode,
        #[serde(default)]
        car_name: String,
        #[serde(default)]
        confirmation_flags: u32,
        stop_count: u32,
    },
    Flag {
        entrant: String,
        flag: FlagKind,
    },
    Assists {
        entrant: String,
        mask: u32,
    },
}

impl SessionEvent {
    /// entrant returns the identity the event refers to (None for session wide events).
    pub fn entrant(&self) -> Option<&str> {
        match self {
            SessionEvent::SessionInfo { .. }
            | SessionEvent::LengthConfirmed { .. }
            | SessionEvent::Chat { .. }
            | SessionEvent::Overtake { .. } => None,
            SessionEvent::Join { entrant, .. }
            | SessionEvent::Disconnect { entrant }
            | SessionEvent::Split { entrant, .. }
            | SessionEvent::Lap { entrant, .. }
            | SessionEvent::Penalty { entrant, .. }
            | SessionEvent::SpeedSample { entrant, .. }
            | SessionEvent::PitStart { entrant, .. }
            | SessionEvent::PitComplete { entrant, .. }
            | SessionEvent::DriverChange { entrant, .. }
            | SessionEvent::Result { entrant, .. }
            | SessionEvent::Flag { entrant, .. }
            | SessionEvent::Assists { entrant, .. } => Some(entrant),
        }
    }
}
