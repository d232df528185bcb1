use crate::post::assemble::LAPPED_CUTOFF_MS;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

fn default_max_splits() -> usize {
    2
}

fn default_lapped_cutoff_ms() -> u64 {
    LAPPED_CUTOFF_MS
}

/// * `max_splits` - Maximum number of intermediate splits per lap the feed may deliver (a lap then
/// consists of max_splits + 1 sectors)
/// * `lapped_cutoff_ms` - (ms) Entrants that are not on the lead lap are classified as lapped if
/// their total time is closer than this to that of the leader, otherwise as DNF
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SessionPars {
    #[serde(default = "default_max_splits")]
    pub max_splits: usize,
    #[serde(default = "default_lapped_cutoff_ms")]
    pub lapped_cutoff_ms: u64,
}

impl Default for SessionPars {
    fn default() -> Self {
        SessionPars {
            max_splits: default_max_splits(),
            lapped_cutoff_ms: default_lapped_cutoff_ms(),
        }
    }
}

/// read_session_pars reads the JSON file and decodes the JSON string into the session parameters
/// struct.
pub fn read_session_pars(filepath: &Path) -> anyhow::Result<SessionPars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}
