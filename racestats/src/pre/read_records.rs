use crate::interfaces::records::{NoRecords, RecordLookup, RecordTable};
use std::path::Path;

/// read_records sets up the world record source. A record file that cannot be opened or parsed
/// does not stop the report generation, it is logged and the reports are created without world
/// records.
pub fn read_records(records_path: Option<&Path>) -> Box<dyn RecordLookup> {
    let records_path = match records_path {
        Some(records_path) => records_path,
        None => return Box::new(NoRecords),
    };

    match RecordTable::from_file(records_path) {
        Ok(records) => {
            log::debug!("Read world records from {}", records_path.display());
            Box::new(records)
        }
        Err(err) => {
            log::warn!("Continuing without world records: {:#}", err);
            Box::new(NoRecords)
        }
    }
}
