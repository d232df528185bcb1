use crate::post::report::Report;
use anyhow::Context;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// write_report writes the report as JSON into the output directory. The report is written to a
/// temporary file next to the target first and then renamed, such that a failure never leaves a
/// partially written report behind. The method returns the path of the written report.
pub fn write_report(report: &Report, output_dir: &Path, file_name: &str) -> anyhow::Result<PathBuf> {
    let target = output_dir.join(file_name);

    let mut tmp_file = NamedTempFile::new_in(output_dir).context(format!(
        "Failed to create temporary report file in {}!",
        output_dir.display()
    ))?;

    {
        let mut writer = BufWriter::new(tmp_file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, report).context("Failed to serialize report!")?;
        writer.flush().context("Failed to write report!")?;
    }

    tmp_file
        .as_file()
        .sync_all()
        .context("Failed to write report!")?;
    tmp_file
        .persist(&target)
        .context(format!("Failed to move report to {}!", target.display()))?;

    Ok(target)
}

/// report_file_name returns the report file name belonging to an event log, e.g.
/// race_1.jsonl -> race_1_result.json.
pub fn report_file_name(eventfile_path: &Path) -> String {
    let stem = eventfile_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("session"));
    format!("{}_result.json", stem)
}
