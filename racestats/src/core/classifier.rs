use crate::core::entrant::{EntrantState, ResultCode};
use std::cmp::Ordering;

/// compare_result is the official classification order. The finishing position reported by the
/// feed is not reliable after reconnects, therefore the order is derived from the confirmation
/// state, the number of completed laps, and the total time:
/// 1. entrants without a result confirmation behind all confirmed entrants
/// 2. disqualified entrants behind all other confirmed entrants
/// 3. more completed laps in front
/// 4. lower total time in front
///
/// Entrants that are equal in all criteria compare as equal, i.e. a stable sort keeps their input
/// order.
pub fn compare_result(a: &EntrantState, b: &EntrantState) -> Ordering {
    let unconfirmed = |e: &EntrantState| e.result_code() == ResultCode::NotFinished;
    let penalized = |e: &EntrantState| e.result_code() == ResultCode::Penalized;

    unconfirmed(a)
        .cmp(&unconfirmed(b))
        .then_with(|| penalized(a).cmp(&penalized(b)))
        .then_with(|| b.laps_done().cmp(&a.laps_done()))
        .then_with(|| a.classification_time().cmp(&b.classification_time()))
}

/// classify sorts the entrants into the official classification order (stable sort).
pub fn classify(entrants: &mut [EntrantState]) {
    entrants.sort_by(compare_result);
}

/// finishing_order_idxs returns for every entrant its 0-based position in the classification
/// order without reordering the inserted slice.
pub fn finishing_order_idxs(entrants: &[EntrantState]) -> Vec<usize> {
    let mut idxs: Vec<usize> = (0..entrants.len()).collect();
    idxs.sort_by(|&a, &b| compare_result(&entrants[a], &entrants[b]));

    let mut ranks = vec![0; entrants.len()];

    for (rank, &idx) in idxs.iter().enumerate() {
        ranks[idx] = rank;
    }

    ranks
}
