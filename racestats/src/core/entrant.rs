use crate::core::errors::FeedError;
use serde::{Deserialize, Serialize};

/// Grid position reported for entrants that joined the session after the start.
pub const GRID_SENTINEL: u32 = 999;

// pit stop work bitmask (as delivered by the pit start event)
pub const PIT_WORK_STOP: u8 = 0x01;
pub const PIT_WORK_DAMAGE: u8 = 0x02;
pub const PIT_WORK_TIRES: u8 = 0x04;
pub const PIT_WORK_REFUEL: u8 = 0x08;
pub const PIT_WORK_SETUP: u8 = 0x10;

// result confirmation flags (as delivered by the result event)
pub const CONFIRM_DSQ: u32 = 0x01;
pub const CONFIRM_PLUS_30S: u32 = 0x02;
pub const CONFIRM_PLUS_45S: u32 = 0x04;

/// * `NotFinished` -> no result confirmation was received (default)
/// * `Finished` -> result confirmed
/// * `Dnf` -> result confirmed, but the entrant retired
/// * `Penalized` -> result confirmed, but the entrant was disqualified and is classified last
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    NotFinished,
    Finished,
    Dnf,
    Penalized,
}

impl Default for ResultCode {
    fn default() -> Self {
        ResultCode::NotFinished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    None,
    DriveThrough,
    StopAndGo,
    SlowDown,
    Disqualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagKind {
    YellowOn,
    YellowOff,
    BlueOn,
    BlueOff,
    Contact,
    OffTrack,
}

/// * `lap_no` - Number of the completed lap (starting at 1)
/// * `sectors` - (ms) Sector times of the lap, 0 if a sector was not timed
/// * `laptime` - (ms) Lap time
/// * `racetime` - (ms) Cumulated lap times up to and including this lap
/// * `elapsed` - (ms) Session time at which the lap was completed (0 if unknown)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lap {
    pub lap_no: u32,
    pub sectors: Vec<u32>,
    pub laptime: u32,
    pub racetime: u64,
    pub elapsed: u32,
}

/// TimingEvent stores the session time at which an entrant passed a timing point. `split` 0 is the
/// finish line, i.e. the completion of lap `lap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingEvent {
    pub lap: u32,
    pub split: u8,
    pub elapsed: u32,
}

/// Best is used to store a best value together with the lap it was achieved in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Best<T> {
    pub value: T,
    pub lap: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitData {
    #[serde(default)]
    pub work: u8,
}

/// PitState is the two-phase pit stop statemachine. A stop becomes pending when the car reaches
/// its pit box and is committed when the completion notification arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum PitState {
    Idle,
    Pending { lap: u32, data: PitData },
}

/// PitTransition reports what a pit completion did to the statemachine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitTransition {
    Committed,
    NoPendingStop,
    Frozen,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitStop {
    pub lap: u32,
    pub work: u8,
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyRecord {
    pub lap: u32,
    pub old_penalty: PenaltyKind,
    pub new_penalty: PenaltyKind,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverChange {
    pub old_identity: String,
    pub new_identity: String,
    pub lap: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Incidents {
    pub yellow_flags: u32,
    pub blue_flags: u32,
    pub contacts: u32,
    pub off_tracks: u32,
}

/// EntrantState accumulates everything that is known about one entrant of a session. It is
/// mutated by the event feed and read by the post-processing once the session is over.
///
/// As soon as the result of the entrant is confirmed (`finalize`), the state is frozen and all
/// further updates are ignored, i.e. late or duplicate events never change a confirmed result.
#[derive(Debug, Clone)]
pub struct EntrantState {
    // identity
    user_name: String,
    driver_name: String,
    connection_id: u32,
    slot_id: u32,
    car_name: String,
    connected: bool,
    // parameters
    max_splits: usize,
    // progress
    laps_done: u32,
    laps: Vec<Lap>,
    timing_events: Vec<TimingEvent>,
    cur_sectors: Vec<u32>,
    last_split: u32,
    racetime: u64,
    sector_count: usize, // number of sectors seen so far (final split index + 1)
    // bests
    best_lap: Option<Best<u32>>,
    best_sectors: Vec<Option<Best<u32>>>,
    best_speed: Option<Best<f32>>,
    // pit stops
    pit_state: PitState,
    pit_stops: Vec<PitStop>,
    pit_time: u64,
    stop_count: u32,
    // penalties and driver changes
    penalties: Vec<PenaltyRecord>,
    penalty_count: u32,
    driver_changes: Vec<DriverChange>,
    // flags
    incidents: Incidents,
    in_yellow: bool,
    in_blue: bool,
    assists: u32,
    // classification
    result_code: ResultCode,
    total_time: u64,
    grid_position: u32,
    penalty_annotations: Vec<String>,
    finished: bool,
}

impl EntrantState {
    pub fn new(user_name: &str, max_splits: usize) -> EntrantState {
        EntrantState {
            user_name: user_name.to_owned(),
            driver_name: user_name.to_owned(),
            connection_id: 0,
            slot_id: 0,
            car_name: String::new(),
            connected: true,
            max_splits,
            laps_done: 0,
            laps: Vec::new(),
            timing_events: Vec::new(),
            cur_sectors: vec![0; max_splits + 1],
            last_split: 0,
            racetime: 0,
            sector_count: 0,
            best_lap: None,
            best_sectors: vec![None; max_splits + 1],
            best_speed: None,
            pit_state: PitState::Idle,
            pit_stops: Vec::new(),
            pit_time: 0,
            stop_count: 0,
            penalties: Vec::new(),
            penalty_count: 0,
            driver_changes: Vec::new(),
            incidents: Incidents::default(),
            in_yellow: false,
            in_blue: false,
            assists: 0,
            result_code: ResultCode::NotFinished,
            total_time: 0,
            grid_position: GRID_SENTINEL,
            penalty_annotations: Vec::new(),
            finished: false,
        }
    }

    // ---------------------------------------------------------------------------------------------
    // UPDATES -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// update_split handles an intermediate split of the current lap. `split_time` is measured from
    /// the start of the lap, `elapsed` from the start of the session (0 if unknown). Split indices
    /// start at 1, index 0 is reserved for the finish line.
    pub fn update_split(&mut self, split: u8, split_time: u32, elapsed: u32) -> Result<(), FeedError> {
        if self.finished {
            return Ok(());
        }

        if split == 0 || split as usize > self.max_splits {
            return Err(FeedError::SplitIndexOutOfRange {
                user_name: self.user_name.to_owned(),
                index: split,
                max_splits: self.max_splits,
            });
        }

        let cur_lap = self.laps_done + 1;

        if elapsed > 0 {
            self.timing_events.push(TimingEvent {
                lap: cur_lap,
                split,
                elapsed,
            });
        }

        // a split that is not behind the previous one cannot be turned into a sector time
        if split_time > self.last_split {
            let sector_idx = split as usize - 1;
            let sector_time = split_time - self.last_split;
            self.cur_sectors[sector_idx] = sector_time;
            self.fold_best_sector(sector_idx, sector_time, cur_lap);
        }

        self.last_split = split_time;
        Ok(())
    }

    /// update_lap handles a lap completion. The final sector is the part of the lap behind the last
    /// intermediate split, its index is `final_split`.
    pub fn update_lap(
        &mut self,
        laptime: u32,
        stop_count: u32,
        laps_done: u32,
        final_split: u8,
        elapsed: u32,
    ) -> Result<(), FeedError> {
        if self.finished {
            return Ok(());
        }

        if final_split as usize > self.max_splits {
            return Err(FeedError::FinalSplitOutOfRange {
                user_name: self.user_name.to_owned(),
                index: final_split,
                max_splits: self.max_splits,
            });
        }

        // best lap (strictly better only, the first occurrence is kept on equal times)
        if self.best_lap.map_or(true, |best| laptime < best.value) {
            self.best_lap = Some(Best {
                value: laptime,
                lap: laps_done,
            });
        }

        // final sector
        let final_idx = final_split as usize;

        if laptime > self.last_split {
            let sector_time = laptime - self.last_split;
            self.cur_sectors[final_idx] = sector_time;
            self.fold_best_sector(final_idx, sector_time, laps_done);
        }

        self.sector_count = self.sector_count.max(final_idx + 1);

        // lap record
        self.racetime += laptime as u64;
        self.laps.push(Lap {
            lap_no: laps_done,
            sectors: self.cur_sectors[..=final_idx].to_vec(),
            laptime,
            racetime: self.racetime,
            elapsed,
        });

        if elapsed > 0 {
            self.timing_events.push(TimingEvent {
                lap: laps_done,
                split: 0,
                elapsed,
            });
        }

        self.laps_done = laps_done;
        self.stop_count = stop_count;

        // reset split baseline for the next lap
        self.last_split = 0;
        self.cur_sectors.iter_mut().for_each(|t| *t = 0);

        Ok(())
    }

    /// update_penalty logs a penalty state change. Only changes to an actual penalty are counted.
    pub fn update_penalty(&mut self, old_penalty: PenaltyKind, new_penalty: PenaltyKind, reason: &str) {
        if self.finished {
            return;
        }

        self.penalties.push(PenaltyRecord {
            lap: self.laps_done + 1,
            old_penalty,
            new_penalty,
            reason: reason.to_owned(),
        });

        if new_penalty != PenaltyKind::None {
            self.penalty_count += 1;
        }
    }

    pub fn update_speed_sample(&mut self, speed: f32) {
        if self.finished {
            return;
        }

        if self.best_speed.map_or(true, |best| speed > best.value) {
            self.best_speed = Some(Best {
                value: speed,
                lap: self.laps_done + 1,
            });
        }
    }

    /// begin_pit_stop sets a pit stop pending. A pending stop that was never completed is replaced.
    pub fn begin_pit_stop(&mut self, data: PitData) {
        if self.finished {
            return;
        }

        self.pit_state = PitState::Pending {
            lap: self.laps_done + 1,
            data,
        };
    }

    /// complete_pit_stop commits the pending pit stop with the given standstill duration.
    pub fn complete_pit_stop(&mut self, duration: u32) -> PitTransition {
        if self.finished {
            return PitTransition::Frozen;
        }

        match std::mem::replace(&mut self.pit_state, PitState::Idle) {
            PitState::Pending { lap, data } => {
                self.pit_stops.push(PitStop {
                    lap,
                    work: data.work,
                    duration,
                });
                self.pit_time += duration as u64;
                PitTransition::Committed
            }
            PitState::Idle => PitTransition::NoPendingStop,
        }
    }

    /// record_driver_change stores a stint boundary. The new driver starts with the next lap.
    pub fn record_driver_change(&mut self, old_identity: &str, new_identity: &str) {
        if self.finished {
            return;
        }

        self.driver_changes.push(DriverChange {
            old_identity: old_identity.to_owned(),
            new_identity: new_identity.to_owned(),
            lap: self.laps_done + 1,
        });
        self.driver_name = new_identity.to_owned();
    }

    /// record_flag updates the incident counters. Yellow and blue flags are counted once per flag
    /// phase, i.e. on the transition into the flag.
    pub fn record_flag(&mut self, flag: FlagKind) {
        if self.finished {
            return;
        }

        match flag {
            FlagKind::YellowOn => {
                if !self.in_yellow {
                    self.incidents.yellow_flags += 1;
                    self.in_yellow = true;
                }
            }
            FlagKind::YellowOff => self.in_yellow = false,
            FlagKind::BlueOn => {
                if !self.in_blue {
                    self.incidents.blue_flags += 1;
                    self.in_blue = true;
                }
            }
            FlagKind::BlueOff => self.in_blue = false,
            FlagKind::Contact => self.incidents.contacts += 1,
            FlagKind::OffTrack => self.incidents.off_tracks += 1,
        }
    }

    pub fn record_assists(&mut self, mask: u32) {
        if self.finished {
            return;
        }
        self.assists |= mask;
    }

    /// join updates the connection related fields if the entrant (re)connects to the session.
    pub fn join(&mut self, connection_id: u32, slot_id: u32, car_name: &str, grid_position: u32) {
        self.connection_id = connection_id;
        self.slot_id = slot_id;
        self.connected = true;

        if self.finished {
            return;
        }

        if !car_name.is_empty() {
            self.car_name = car_name.to_owned();
        }

        // a real grid position always wins over the sentinel of a mid-session join
        if grid_position != GRID_SENTINEL || self.grid_position == GRID_SENTINEL {
            self.grid_position = grid_position;
        }
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// finalize sets the confirmed result and freezes the state. A disqualification flag overrides
    /// the result code, time penalties are only annotated.
    pub fn finalize(
        &mut self,
        total_time: u64,
        result_code: ResultCode,
        car_name: &str,
        confirmation_flags: u32,
        stop_count: u32,
    ) {
        if self.finished {
            return;
        }

        self.total_time = total_time;
        self.result_code = result_code;
        self.stop_count = stop_count;

        if !car_name.is_empty() {
            self.car_name = car_name.to_owned();
        }

        if confirmation_flags & CONFIRM_DSQ != 0 {
            self.result_code = ResultCode::Penalized;
            self.penalty_annotations.push(String::from("dsq"));
        }
        if confirmation_flags & CONFIRM_PLUS_30S != 0 {
            self.penalty_annotations.push(String::from("+30s"));
        }
        if confirmation_flags & CONFIRM_PLUS_45S != 0 {
            self.penalty_annotations.push(String::from("+45s"));
        }

        self.finished = true;
    }

    fn fold_best_sector(&mut self, sector_idx: usize, sector_time: u32, lap: u32) {
        let best = &mut self.best_sectors[sector_idx];

        if best.map_or(true, |b| sector_time < b.value) {
            *best = Some(Best {
                value: sector_time,
                lap,
            });
        }
    }

    // ---------------------------------------------------------------------------------------------
    // GETTERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    pub fn connection_id(&self) -> u32 {
        self.connection_id
    }

    pub fn slot_id(&self) -> u32 {
        self.slot_id
    }

    pub fn car_name(&self) -> &str {
        &self.car_name
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn laps_done(&self) -> u32 {
        self.laps_done
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn timing_events(&self) -> &[TimingEvent] {
        &self.timing_events
    }

    pub fn racetime(&self) -> u64 {
        self.racetime
    }

    pub fn best_lap(&self) -> Option<Best<u32>> {
        self.best_lap
    }

    /// best_sectors returns the best sector times of all sectors that were driven so far.
    pub fn best_sectors(&self) -> &[Option<Best<u32>>] {
        &self.best_sectors[..self.sector_count]
    }

    pub fn best_speed(&self) -> Option<Best<f32>> {
        self.best_speed
    }

    pub fn pit_state(&self) -> &PitState {
        &self.pit_state
    }

    pub fn pit_stops(&self) -> &[PitStop] {
        &self.pit_stops
    }

    pub fn pit_time(&self) -> u64 {
        self.pit_time
    }

    pub fn stop_count(&self) -> u32 {
        self.stop_count
    }

    pub fn penalties(&self) -> &[PenaltyRecord] {
        &self.penalties
    }

    pub fn penalty_count(&self) -> u32 {
        self.penalty_count
    }

    pub fn driver_changes(&self) -> &[DriverChange] {
        &self.driver_changes
    }

    pub fn incidents(&self) -> Incidents {
        self.incidents
    }

    pub fn in_yellow(&self) -> bool {
        self.in_yellow
    }

    pub fn in_blue(&self) -> bool {
        self.in_blue
    }

    pub fn assists(&self) -> u32 {
        self.assists
    }

    pub fn result_code(&self) -> ResultCode {
        self.result_code
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    pub fn grid_position(&self) -> u32 {
        self.grid_position
    }

    pub fn penalty_annotations(&self) -> &[String] {
        &self.penalty_annotations
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    // ---------------------------------------------------------------------------------------------
    // DERIVED VALUES ------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// classification_time returns the confirmed total time if a result was received and the sum of
    /// the driven lap times otherwise.
    pub fn classification_time(&self) -> u64 {
        if self.result_code == ResultCode::NotFinished {
            self.racetime
        } else {
            self.total_time
        }
    }

    pub fn first_laptime(&self) -> Option<u32> {
        self.laps.first().map(|lap| lap.laptime)
    }

    pub fn laptimes(&self) -> Vec<u32> {
        self.laps.iter().map(|lap| lap.laptime).collect()
    }

    pub fn average_laptime(&self) -> Option<f64> {
        helpers::general::mean(&self.laptimes())
    }

    /// theoretical_best returns the sum of the best sector times. It is only available if every
    /// sector that was driven has a best time.
    pub fn theoretical_best(&self) -> Option<u64> {
        if self.sector_count == 0 {
            return None;
        }

        self.best_sectors()
            .iter()
            .map(|best| best.map(|b| b.value as u64))
            .sum()
    }
}
