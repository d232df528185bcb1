use std::error::Error;
use std::fmt;

/// InputValueError is used if some report option or session parameter does not fulfill the posed
/// requirements, e.g., by allowing more splits per lap than the feed can deliver.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

/// max returns the maximum value in the array x or None if x is empty.
pub fn max<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> Option<T> {
    let first = x.first()?;
    let &max_val = x.iter().fold(
        first,
        |val_max, val| {
            if val_max > val {
                val_max
            } else {
                val
            }
        },
    );
    Some(max_val)
}

/// mean returns the arithmetic mean of the values in x or None if x is empty.
pub fn mean<T: Into<f64> + std::marker::Copy>(x: &[T]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    let sum: f64 = x.iter().map(|&val| val.into()).sum();
    Some(sum / x.len() as f64)
}

/// std_dev returns the population standard deviation of the values in x. At least two values are
/// required to get a meaningful spread, otherwise None is returned.
pub fn std_dev<T: Into<f64> + std::marker::Copy>(x: &[T]) -> Option<f64> {
    if x.len() < 2 {
        return None;
    }
    let avg = mean(x)?;
    let var = x
        .iter()
        .map(|&val| {
            let diff = val.into() - avg;
            diff * diff
        })
        .sum::<f64>()
        / x.len() as f64;
    Some(var.sqrt())
}

/// format_millis converts a duration in milliseconds into seconds with millisecond resolution,
/// e.g. 25300 -> "25.300".
pub fn format_millis(ms: u64) -> String {
    format!("{}.{:03}", ms / 1000, ms % 1000)
}

/// format_laptime converts a lap time in milliseconds into the usual m:ss.mmm notation, e.g.
/// 83456 -> "1:23.456". Lap times below one minute are printed without the minute part.
pub fn format_laptime(ms: u64) -> String {
    let minutes = ms / 60_000;
    let rest = ms % 60_000;

    if minutes == 0 {
        format_millis(rest)
    } else {
        format!("{}:{:02}.{:03}", minutes, rest / 1000, rest % 1000)
    }
}
