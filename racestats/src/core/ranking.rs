use crate::core::entrant::EntrantState;
use helpers::general::{format_laptime, format_millis};
use std::cmp::Ordering;

/// Standing bundles an entrant with the values the leaderboards need but which are not part of
/// the entrant state itself because they depend on the whole field.
///
/// * `result_pos` - Position in the official classification (starting at 1), used as final
/// tie-break of every leaderboard
/// * `grid_pos` - Grid position after replacing the mid-session join sentinel
/// * `laps_led` - Number of laps completed in the lead
/// * `consistency` - (ms) Standard deviation of the lap times
#[derive(Debug, Clone, Copy)]
pub struct Standing<'a> {
    pub entrant: &'a EntrantState,
    pub result_pos: u32,
    pub grid_pos: u32,
    pub laps_led: u32,
    pub consistency: Option<f64>,
}

/// Ranking selects the sort key of a leaderboard. Smaller is better unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    GridPosition,
    PositionsGained, // result position minus grid position
    LapsLed,         // more is better
    FirstLap,
    AverageLap,
    BestLap,
    BestSector(usize),
    TheoreticalBest,
    Consistency,
    TopSpeed,    // higher is better
    BlueFlags,   // most first
    YellowFlags, // most first
    Contacts,    // most first
    OffTracks,   // most first
    PitStops,    // number of stops, then total pit time
    Penalties,
}

impl Ranking {
    /// all returns every leaderboard of a session in which `no_sectors` sectors were timed.
    pub fn all(no_sectors: usize) -> Vec<Ranking> {
        let mut rankings = vec![
            Ranking::GridPosition,
            Ranking::PositionsGained,
            Ranking::LapsLed,
            Ranking::FirstLap,
            Ranking::AverageLap,
            Ranking::BestLap,
        ];
        rankings.extend((0..no_sectors).map(Ranking::BestSector));
        rankings.extend_from_slice(&[
            Ranking::TheoreticalBest,
            Ranking::Consistency,
            Ranking::TopSpeed,
            Ranking::BlueFlags,
            Ranking::YellowFlags,
            Ranking::Contacts,
            Ranking::OffTracks,
            Ranking::PitStops,
            Ranking::Penalties,
        ]);
        rankings
    }

    pub fn name(&self) -> String {
        match self {
            Ranking::GridPosition => String::from("grid_position"),
            Ranking::PositionsGained => String::from("positions_gained"),
            Ranking::LapsLed => String::from("laps_led"),
            Ranking::FirstLap => String::from("first_lap"),
            Ranking::AverageLap => String::from("average_lap"),
            Ranking::BestLap => String::from("best_lap"),
            Ranking::BestSector(idx) => format!("best_sector_{}", idx + 1),
            Ranking::TheoreticalBest => String::from("theoretical_best"),
            Ranking::Consistency => String::from("consistency"),
            Ranking::TopSpeed => String::from("top_speed"),
            Ranking::BlueFlags => String::from("blue_flags"),
            Ranking::YellowFlags => String::from("yellow_flags"),
            Ranking::Contacts => String::from("contacts"),
            Ranking::OffTracks => String::from("off_tracks"),
            Ranking::PitStops => String::from("pit_stops"),
            Ranking::Penalties => String::from("penalties"),
        }
    }

    /// compare orders two standings according to the selected key. Remaining ties are broken by
    /// the classification, such that the order does not depend on the input order.
    pub fn compare(&self, a: &Standing, b: &Standing) -> Ordering {
        let (ea, eb) = (a.entrant, b.entrant);

        let ord = match self {
            Ranking::GridPosition => a.grid_pos.cmp(&b.grid_pos),
            Ranking::PositionsGained => positions_gained(a).cmp(&positions_gained(b)),
            Ranking::LapsLed => b.laps_led.cmp(&a.laps_led),
            Ranking::FirstLap => cmp_asc(ea.first_laptime(), eb.first_laptime()),
            Ranking::AverageLap => cmp_asc(ea.average_laptime(), eb.average_laptime()),
            Ranking::BestLap => cmp_asc(
                ea.best_lap().map(|best| best.value),
                eb.best_lap().map(|best| best.value),
            ),
            Ranking::BestSector(idx) => cmp_asc(best_sector(ea, *idx), best_sector(eb, *idx)),
            Ranking::TheoreticalBest => cmp_asc(ea.theoretical_best(), eb.theoretical_best()),
            Ranking::Consistency => cmp_asc(a.consistency, b.consistency),
            Ranking::TopSpeed => cmp_desc(
                ea.best_speed().map(|best| best.value),
                eb.best_speed().map(|best| best.value),
            ),
            Ranking::BlueFlags => eb.incidents().blue_flags.cmp(&ea.incidents().blue_flags),
            Ranking::YellowFlags => eb.incidents().yellow_flags.cmp(&ea.incidents().yellow_flags),
            Ranking::Contacts => eb.incidents().contacts.cmp(&ea.incidents().contacts),
            Ranking::OffTracks => eb.incidents().off_tracks.cmp(&ea.incidents().off_tracks),
            Ranking::PitStops => ea
                .pit_stops()
                .len()
                .cmp(&eb.pit_stops().len())
                .then_with(|| ea.pit_time().cmp(&eb.pit_time())),
            Ranking::Penalties => ea.penalty_count().cmp(&eb.penalty_count()),
        };

        ord.then_with(|| a.result_pos.cmp(&b.result_pos))
    }

    /// sort sorts the standings by the selected key. The sort is stable.
    pub fn sort(&self, standings: &mut [Standing]) {
        standings.sort_by(|a, b| self.compare(a, b));
    }

    /// value returns the displayed value of a standing on this leaderboard (None if the entrant has
    /// no value, e.g. no speed sample).
    pub fn value(&self, s: &Standing) -> Option<String> {
        let e = s.entrant;

        match self {
            Ranking::GridPosition => Some(s.grid_pos.to_string()),
            Ranking::PositionsGained => Some(format!("{:+}", -positions_gained(s))),
            Ranking::LapsLed => Some(s.laps_led.to_string()),
            Ranking::FirstLap => e.first_laptime().map(|t| format_laptime(t as u64)),
            Ranking::AverageLap => e
                .average_laptime()
                .map(|t| format_laptime(t.round() as u64)),
            Ranking::BestLap => e.best_lap().map(|best| format_laptime(best.value as u64)),
            Ranking::BestSector(idx) => best_sector(e, *idx).map(|t| format_millis(t as u64)),
            Ranking::TheoreticalBest => e.theoretical_best().map(format_laptime),
            Ranking::Consistency => s.consistency.map(|t| format_millis(t.round() as u64)),
            Ranking::TopSpeed => e.best_speed().map(|best| format!("{:.1}", best.value)),
            Ranking::BlueFlags => Some(e.incidents().blue_flags.to_string()),
            Ranking::YellowFlags => Some(e.incidents().yellow_flags.to_string()),
            Ranking::Contacts => Some(e.incidents().contacts.to_string()),
            Ranking::OffTracks => Some(e.incidents().off_tracks.to_string()),
            Ranking::PitStops => Some(format!(
                "{} ({})",
                e.pit_stops().len(),
                format_millis(e.pit_time())
            )),
            Ranking::Penalties => Some(e.penalty_count().to_string()),
        }
    }
}

fn positions_gained(s: &Standing) -> i64 {
    s.result_pos as i64 - s.grid_pos as i64
}

fn best_sector(e: &EntrantState, idx: usize) -> Option<u32> {
    e.best_sectors()
        .get(idx)
        .copied()
        .flatten()
        .map(|best| best.value)
}

/// cmp_asc sorts smaller values first and missing values last.
fn cmp_asc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// cmp_desc sorts bigger values first and missing values last.
fn cmp_desc<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
