use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::Path;

/// * `track` - Track name
/// * `car` - Car name
/// * `laptime` - (ms) Record lap time
/// * `holder` - Name of the record holder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    pub track: String,
    pub car: String,
    pub laptime: u32,
    pub holder: String,
}

/// RecordLookup is the interface to a world record service. A failing lookup must never abort the
/// report generation, the caller simply omits the record in that case.
pub trait RecordLookup: Sync {
    fn lookup(&self, track: &str, car: &str) -> anyhow::Result<Option<WorldRecord>>;
}

/// NoRecords is used if no world record source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecords;

impl RecordLookup for NoRecords {
    fn lookup(&self, _track: &str, _car: &str) -> anyhow::Result<Option<WorldRecord>> {
        Ok(None)
    }
}

/// RecordTable is a world record source that is read from a JSON file containing a list of
/// records.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    records: Vec<WorldRecord>,
}

impl RecordTable {
    pub fn new(records: Vec<WorldRecord>) -> RecordTable {
        RecordTable { records }
    }

    pub fn from_file(filepath: &Path) -> anyhow::Result<RecordTable> {
        let fh = OpenOptions::new()
            .read(true)
            .open(filepath)
            .context(format!(
                "Failed to open world record file {}!",
                filepath.display()
            ))?;

        let records: Vec<WorldRecord> = serde_json::from_reader(&fh).context(format!(
            "Failed to parse world record file {}!",
            filepath.display()
        ))?;
        Ok(RecordTable { records })
    }
}

impl RecordLookup for RecordTable {
    fn lookup(&self, track: &str, car: &str) -> anyhow::Result<Option<WorldRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.track == track && record.car == car)
            .min_by_key(|record| record.laptime)
            .cloned())
    }
}
