use crate::core::classifier::classify;
use crate::core::entrant::{
    EntrantState, ResultCode, GRID_SENTINEL, PIT_WORK_DAMAGE, PIT_WORK_REFUEL, PIT_WORK_SETUP,
    PIT_WORK_STOP, PIT_WORK_TIRES,
};
use crate::core::positions::{laps_led, reconstruct_positions};
use crate::core::ranking::{Ranking, Standing};
use crate::core::session::SessionContext;
use crate::interfaces::records::{RecordLookup, WorldRecord};
use crate::post::report::{
    EntrantResult, PitStopResult, PositionHistory, RankingBoard, RankingEntry, Report,
    SessionSummary, Status, Stint,
};
use helpers::general::{format_millis, max, std_dev};

/// (ms) An entrant that is not on the lead lap counts as lapped (i.e. still running) if its total
/// time is closer than this to the total time of the leader, and as retired otherwise.
pub const LAPPED_CUTOFF_MS: u64 = 200_000;

/// assemble_report creates the report of a finished session. Execution order:
/// 1. Remove entrants without a completed lap.
/// 2. Sort the remaining entrants into the classification order.
/// 3. Assign grid positions to entrants that joined during the session.
/// 4. Reconstruct the running order at every timing point.
/// 5. Determine status, gap, stints, and pit stops of every entrant.
/// 6. Create the leaderboards.
/// 7. Look up world records for the cars in the session.
pub fn assemble_report(
    context: &SessionContext,
    entrants: &[EntrantState],
    lapped_cutoff: u64,
    records: &dyn RecordLookup,
) -> Report {
    // classify entrants that contributed to the session
    let mut classified: Vec<EntrantState> = entrants
        .iter()
        .filter(|entrant| entrant.laps_done() > 0)
        .cloned()
        .collect();
    classify(&mut classified);

    let grid_positions = resolve_grid_positions(&classified);
    let histories = reconstruct_positions(&classified);

    let standings: Vec<Standing> = classified
        .iter()
        .enumerate()
        .map(|(i, entrant)| Standing {
            entrant,
            result_pos: i as u32 + 1,
            grid_pos: grid_positions[i],
            laps_led: laps_led(&histories[i]),
            consistency: std_dev(&entrant.laptimes()),
        })
        .collect();

    // RESULTS -------------------------------------------------------------------------------------
    let results: Vec<EntrantResult> = match classified.first() {
        Some(leader) => standings
            .iter()
            .map(|standing| create_entrant_result(standing, leader, lapped_cutoff))
            .collect(),
        None => Vec::new(),
    };

    // RANKINGS ------------------------------------------------------------------------------------
    let no_sectors = classified
        .iter()
        .map(|entrant| entrant.best_sectors().len())
        .max()
        .unwrap_or(0);

    let rankings = Ranking::all(no_sectors)
        .iter()
        .map(|ranking| {
            let mut tmp_standings = standings.to_owned();
            ranking.sort(&mut tmp_standings);

            RankingBoard {
                category: ranking.name(),
                entries: tmp_standings
                    .iter()
                    .enumerate()
                    .map(|(i, standing)| RankingEntry {
                        position: i as u32 + 1,
                        user_name: standing.entrant.user_name().to_owned(),
                        value: ranking.value(standing),
                    })
                    .collect(),
            }
        })
        .collect();

    // POSITIONS -----------------------------------------------------------------------------------
    let positions = classified
        .iter()
        .zip(histories.into_iter())
        .map(|(entrant, samples)| PositionHistory {
            user_name: entrant.user_name().to_owned(),
            samples,
        })
        .collect();

    Report {
        session: summarize_session(context),
        results,
        rankings,
        positions,
        world_records: lookup_world_records(context, &classified, records),
    }
}

/// resolve_grid_positions replaces the grid sentinel of entrants that joined during the session by
/// the positions behind the last real grid position (assigned in classification order).
pub fn resolve_grid_positions(classified: &[EntrantState]) -> Vec<u32> {
    let real_grid_positions: Vec<u32> = classified
        .iter()
        .map(|entrant| entrant.grid_position())
        .filter(|&pos| pos != GRID_SENTINEL)
        .collect();

    // saturating for corrupt grid positions delivered by the feed
    let mut next_pos = max(&real_grid_positions).unwrap_or(0).saturating_add(1);

    classified
        .iter()
        .map(|entrant| {
            if entrant.grid_position() == GRID_SENTINEL {
                let pos = next_pos;
                next_pos = next_pos.saturating_add(1);
                pos
            } else {
                entrant.grid_position()
            }
        })
        .collect()
}

/// entrant_status determines the status of an entrant relative to the classification leader.
pub fn entrant_status(entrant: &EntrantState, leader: &EntrantState, lapped_cutoff: u64) -> Status {
    if entrant.result_code() == ResultCode::Penalized {
        return Status::Dsq;
    }

    if entrant.laps_done() == leader.laps_done() {
        return Status::Finished;
    }

    let delta_t = if entrant.classification_time() > leader.classification_time() {
        entrant.classification_time() - leader.classification_time()
    } else {
        leader.classification_time() - entrant.classification_time()
    };

    if delta_t < lapped_cutoff {
        Status::Lapped
    } else {
        Status::Dnf
    }
}

/// format_gap returns the displayed gap to the leader, e.g. "+5.000" or "+2 laps".
pub fn format_gap(entrant: &EntrantState, leader: &EntrantState, status: Status, result_pos: u32) -> String {
    if result_pos == 1 {
        return String::new();
    }

    match status {
        Status::Finished => format!(
            "+{}",
            format_millis(
                entrant
                    .classification_time()
                    .saturating_sub(leader.classification_time())
            )
        ),
        Status::Lapped => {
            let laps_down = leader.laps_done().saturating_sub(entrant.laps_done());

            if laps_down == 1 {
                String::from("+1 lap")
            } else {
                format!("+{} laps", laps_down)
            }
        }
        Status::Dnf => String::from("DNF"),
        Status::Dsq => String::from("DSQ"),
    }
}

/// reconstruct_stints splits the laps of an entrant into stints at the recorded driver changes. A
/// driver change recorded for lap n means that the new driver drives lap n. Stints without a lap
/// (e.g. a driver change before the first lap) are omitted.
pub fn reconstruct_stints(entrant: &EntrantState) -> Vec<Stint> {
    let mut stints = Vec::with_capacity(entrant.driver_changes().len() + 1);

    let mut driver = entrant
        .driver_changes()
        .first()
        .map(|change| change.old_identity.to_owned())
        .unwrap_or_else(|| entrant.driver_name().to_owned());
    let mut from_lap = 1;

    for change in entrant.driver_changes().iter() {
        let to_lap = change.lap.saturating_sub(1);

        if to_lap >= from_lap {
            stints.push(Stint {
                driver,
                from_lap,
                to_lap,
            });
        }

        driver = change.new_identity.to_owned();
        from_lap = change.lap;
    }

    if entrant.laps_done() >= from_lap {
        stints.push(Stint {
            driver,
            from_lap,
            to_lap: entrant.laps_done(),
        });
    }

    stints
}

/// pit_stop_reasons decodes the work bitmask of a pit stop. Several reasons can apply to one stop.
pub fn pit_stop_reasons(work: u8) -> Vec<&'static str> {
    [
        (PIT_WORK_STOP, "stop"),
        (PIT_WORK_DAMAGE, "damage"),
        (PIT_WORK_TIRES, "tires"),
        (PIT_WORK_REFUEL, "refuel"),
        (PIT_WORK_SETUP, "setup"),
    ]
    .iter()
    .filter(|(bit, _)| work & bit != 0)
    .map(|&(_, reason)| reason)
    .collect()
}

fn create_entrant_result(standing: &Standing, leader: &EntrantState, lapped_cutoff: u64) -> EntrantResult {
    let entrant = standing.entrant;
    let status = entrant_status(entrant, leader, lapped_cutoff);

    EntrantResult {
        position: standing.result_pos,
        user_name: entrant.user_name().to_owned(),
        driver_name: entrant.driver_name().to_owned(),
        car_name: entrant.car_name().to_owned(),
        grid_position: standing.grid_pos,
        laps: entrant.laps_done(),
        total_time: entrant.classification_time(),
        gap: format_gap(entrant, leader, status, standing.result_pos),
        status,
        best_lap: entrant.best_lap(),
        best_sectors: entrant.best_sectors().to_vec(),
        theoretical_best: entrant.theoretical_best(),
        top_speed: entrant.best_speed(),
        average_laptime: entrant.average_laptime(),
        consistency: standing.consistency,
        laps_led: standing.laps_led,
        stints: reconstruct_stints(entrant),
        pit_stops: entrant
            .pit_stops()
            .iter()
            .map(|stop| PitStopResult {
                lap: stop.lap,
                duration: format_millis(stop.duration as u64),
                reason: pit_stop_reasons(stop.work),
            })
            .collect(),
        pit_time: format_millis(entrant.pit_time()),
        stop_count: entrant.stop_count(),
        penalties: entrant.penalties().to_vec(),
        penalty_annotations: entrant.penalty_annotations().to_vec(),
        incidents: entrant.incidents(),
        assists: entrant.assists(),
        lap_history: entrant.laps().to_vec(),
    }
}

fn summarize_session(context: &SessionContext) -> SessionSummary {
    SessionSummary {
        track_name: context.track_name.to_owned(),
        track_layout: context.track_layout.to_owned(),
        session_kind: context.session_kind,
        weather: context.weather,
        host_flags: context.host_flags,
        qualify_minutes: context.qualify_minutes(),
        race_laps: context.race_laps(),
        chat: context.chat().to_vec(),
        overtakes: context.overtakes().to_vec(),
    }
}

/// lookup_world_records queries the record of every car in the session once. Failing lookups are
/// logged and the record is omitted.
fn lookup_world_records(
    context: &SessionContext,
    classified: &[EntrantState],
    records: &dyn RecordLookup,
) -> Vec<WorldRecord> {
    let mut cars: Vec<&str> = Vec::new();

    for entrant in classified.iter() {
        if !entrant.car_name().is_empty() && !cars.contains(&entrant.car_name()) {
            cars.push(entrant.car_name());
        }
    }

    cars.iter()
        .filter_map(|car| match records.lookup(&context.track_name, car) {
            Ok(record) => record,
            Err(err) => {
                log::warn!(
                    "World record lookup for {} on {} failed, omitting it: {:#}",
                    car,
                    context.track_name,
                    err
                );
                None
            }
        })
        .collect()
}
