use crate::core::classifier::finishing_order_idxs;
use crate::core::entrant::EntrantState;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// TimingPoint is a (lap, split) pair. Within a lap the intermediate splits come first in
/// ascending order, the finish line (split 0) comes last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingPoint {
    pub lap: u32,
    pub split: u8,
}

impl TimingPoint {
    fn split_key(&self) -> u16 {
        if self.split == 0 {
            u16::MAX
        } else {
            self.split as u16
        }
    }
}

impl Ord for TimingPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lap
            .cmp(&other.lap)
            .then_with(|| self.split_key().cmp(&other.split_key()))
    }
}

impl PartialOrd for TimingPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PositionSample {
    pub lap: u32,
    pub split: u8,
    pub position: u32,
}

/// reconstruct_positions derives the running order at every timing point that was passed by any
/// entrant. The method returns one history per entrant (same order as the inserted slice):
/// 1. Collect all distinct timing points and sort them chronologically.
/// 2. For every timing point, sort the entrants that passed it by the session time at which they
/// passed it. Exact ties are broken by the classification order.
/// 3. Assign positions 1..k in that order.
///
/// Entrants that did not pass a timing point (e.g. retired earlier) do not get a position there,
/// i.e. the histories have different lengths. If an entrant passed a timing point more than once
/// (duplicate delivery), the first sample is used.
pub fn reconstruct_positions(entrants: &[EntrantState]) -> Vec<Vec<PositionSample>> {
    let finish_idxs = finishing_order_idxs(entrants);

    // session times at which the entrants passed the timing points
    let passings: Vec<HashMap<TimingPoint, u32>> = entrants
        .iter()
        .map(|entrant| {
            let mut tmp_passings = HashMap::with_capacity(entrant.timing_events().len());

            for event in entrant.timing_events().iter() {
                tmp_passings
                    .entry(TimingPoint {
                        lap: event.lap,
                        split: event.split,
                    })
                    .or_insert(event.elapsed);
            }

            tmp_passings
        })
        .collect();

    let timing_points: BTreeSet<TimingPoint> = passings
        .iter()
        .flat_map(|tmp_passings| tmp_passings.keys().copied())
        .collect();

    let mut histories: Vec<Vec<PositionSample>> = vec![Vec::new(); entrants.len()];
    let mut group: Vec<(u32, usize)> = Vec::with_capacity(entrants.len());

    for timing_point in timing_points.iter() {
        group.clear();
        group.extend(
            passings
                .iter()
                .enumerate()
                .filter_map(|(i, tmp_passings)| tmp_passings.get(timing_point).map(|&t| (t, i))),
        );

        group.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then_with(|| finish_idxs[a.1].cmp(&finish_idxs[b.1]))
        });

        for (rank, &(_, i)) in group.iter().enumerate() {
            histories[i].push(PositionSample {
                lap: timing_point.lap,
                split: timing_point.split,
                position: rank as u32 + 1,
            });
        }
    }

    histories
}

/// positions returns the plain position sequence of a history.
pub fn positions(history: &[PositionSample]) -> impl Iterator<Item = u32> + '_ {
    history.iter().map(|sample| sample.position)
}

/// laps_led returns the number of laps an entrant completed in first position.
pub fn laps_led(history: &[PositionSample]) -> u32 {
    history
        .iter()
        .filter(|sample| sample.split == 0 && sample.position == 1)
        .count() as u32
}
