use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Practice,
    Qualify,
    Warmup,
    Race,
}

impl Default for SessionKind {
    fn default() -> Self {
        SessionKind::Race
    }
}

/// * `ambient_temp` - (°C) Air temperature
/// * `track_temp` - (°C) Track surface temperature
/// * `rain` - Rain intensity in the range [0.0, 1.0]
/// * `wind_speed` - (m/s) Wind speed
/// * `wind_direction` - (deg) Direction the wind is coming from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub ambient_temp: f32,
    pub track_temp: f32,
    pub rain: f32,
    pub wind_speed: f32,
    pub wind_direction: f32,
}

/// Host settings that influence how comparable the results are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFlags {
    pub fixed_setups: bool,
    pub damage: bool,
    pub fuel_usage: bool,
    pub tire_wear: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub nickname: String,
    pub text: String,
}

/// * `overtaker` - Identity of the entrant that made the pass
/// * `overtaken` - Identity of the entrant that lost the position
/// * `lap` - Lap of the overtaker in which the pass happened
/// * `gap` - (ms) Time gap between both entrants when the pass was detected
/// * `elapsed` - (ms) Session time at which the pass was detected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overtake {
    pub overtaker: String,
    pub overtaken: String,
    pub lap: u32,
    pub gap: i32,
    pub elapsed: u32,
}

/// SessionContext collects the session wide facts. It is owned by the session handling and cloned
/// for post-processing, such that the report never sees a session that is still being modified.
///
/// The configured session length is reported twice by the feed: provisionally when the session is
/// announced and reliably once the server confirms it. The reliable values always take precedence.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub track_name: String,
    pub track_layout: String,
    pub session_kind: SessionKind,
    pub weather: Weather,
    pub host_flags: HostFlags,
    qualify_minutes: Option<u32>,
    qualify_minutes_reliable: Option<u32>,
    race_laps: Option<u32>,
    race_laps_reliable: Option<u32>,
    chat: Vec<ChatMessage>,
    overtakes: Vec<Overtake>,
}

impl SessionContext {
    pub fn new(track_name: &str, session_kind: SessionKind) -> SessionContext {
        SessionContext {
            track_name: track_name.to_owned(),
            session_kind,
            ..Default::default()
        }
    }

    /// set_provisional_length stores the session length as announced with the session info.
    pub fn set_provisional_length(&mut self, qualify_minutes: Option<u32>, race_laps: Option<u32>) {
        if qualify_minutes.is_some() {
            self.qualify_minutes = qualify_minutes;
        }
        if race_laps.is_some() {
            self.race_laps = race_laps;
        }
    }

    /// set_reliable_length stores the session length as confirmed by the server.
    pub fn set_reliable_length(&mut self, qualify_minutes: Option<u32>, race_laps: Option<u32>) {
        if qualify_minutes.is_some() {
            self.qualify_minutes_reliable = qualify_minutes;
        }
        if race_laps.is_some() {
            self.race_laps_reliable = race_laps;
        }
    }

    pub fn qualify_minutes(&self) -> Option<u32> {
        self.qualify_minutes_reliable.or(self.qualify_minutes)
    }

    pub fn race_laps(&self) -> Option<u32> {
        self.race_laps_reliable.or(self.race_laps)
    }

    pub fn add_chat(&mut self, nickname: &str, text: &str) {
        self.chat.push(ChatMessage {
            nickname: nickname.to_owned(),
            text: text.to_owned(),
        })
    }

    pub fn add_overtake(&mut self, overtake: Overtake) {
        self.overtakes.push(overtake)
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn overtakes(&self) -> &[Overtake] {
        &self.overtakes
    }
}
