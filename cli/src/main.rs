use clap::Parser;
use racestats::core::handle_session::handle_session_file;
use racestats::interfaces::records::RecordLookup;
use racestats::post::assemble::assemble_report;
use racestats::post::report::Report;
use racestats::post::write_report::{report_file_name, write_report};
use racestats::pre::check_opts_pars::check_report_opts_pars;
use racestats::pre::read_records::read_records;
use racestats::pre::read_session_pars::{read_session_pars, SessionPars};
use racestats::pre::report_opts::ReportOpts;
use rayon::prelude::*;
use std::cmp::min;
use std::path::Path;
use std::time::Instant;

// set maximum number of concurrently processed event logs in case of more than a single log
const MAX_NO_CONCURRENT_JOBS: usize = 200;

/// process_event_log runs the whole chain for a single event log: event handling, report assembly,
/// and export. It returns the assembled report.
fn process_event_log(
    eventfile_path: &Path,
    report_opts: &ReportOpts,
    session_pars: &SessionPars,
    records: &dyn RecordLookup,
) -> anyhow::Result<Report> {
    let session_run = handle_session_file(session_pars, eventfile_path)?;

    // the report works on a snapshot, such that it never sees a state that is still modified
    let report = assemble_report(
        &session_run.context,
        &session_run.store.snapshot(),
        session_pars.lapped_cutoff_ms,
        records,
    );

    let report_path = write_report(
        &report,
        report_opts.output_dir.as_path(),
        &report_file_name(eventfile_path),
    )?;
    log::info!(
        "Wrote report of {} entrants to {}",
        report.results.len(),
        report_path.display()
    );

    Ok(report)
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get report options from the command line arguments and read session parameters
    let report_opts: ReportOpts = ReportOpts::parse();

    env_logger::Builder::new()
        .filter_level(if report_opts.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let session_pars = match report_opts.parfile_path {
        Some(ref parfile_path) => read_session_pars(parfile_path.as_path())?,
        None => SessionPars::default(),
    };

    // check report options and session parameters
    check_report_opts_pars(&report_opts, &session_pars)?;

    // set up world record source
    let records = read_records(report_opts.records_path.as_deref());

    log::info!(
        "Processing {} event log(s) with up to {} splits per lap",
        report_opts.eventfile_paths.len(),
        session_pars.max_splits
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();
    let mut reports: Vec<Report> = Vec::with_capacity(report_opts.eventfile_paths.len());

    if report_opts.eventfile_paths.len() == 1 {
        // SINGLE THREAD ---------------------------------------------------------------------------
        reports.push(process_event_log(
            report_opts.eventfile_paths[0].as_path(),
            &report_opts,
            &session_pars,
            records.as_ref(),
        )?);
    } else {
        // MULTIPLE THREADS ------------------------------------------------------------------------
        let mut no_logs_done = 0;

        while no_logs_done < report_opts.eventfile_paths.len() {
            // calculate number of event logs to process in current loop
            let tmp_no_logs = min(
                report_opts.eventfile_paths.len() - no_logs_done,
                MAX_NO_CONCURRENT_JOBS,
            );

            // process the event logs and save the reports
            let tmp_reports: Vec<Report> = report_opts.eventfile_paths
                [no_logs_done..no_logs_done + tmp_no_logs]
                .par_iter()
                .map(|eventfile_path| {
                    process_event_log(
                        eventfile_path.as_path(),
                        &report_opts,
                        &session_pars,
                        records.as_ref(),
                    )
                })
                .collect::<anyhow::Result<Vec<Report>>>()?;
            reports.extend(tmp_reports);

            no_logs_done += tmp_no_logs;
        }
    }

    log::info!(
        "Execution time (total): {}ms",
        t_start.elapsed().as_millis()
    );

    // POST-PROCESSING -----------------------------------------------------------------------------
    // print classification
    if report_opts.print_classification {
        if reports.len() == 1 {
            println!("{}", reports[0]);
        } else {
            log::warn!("Classification is only printed if a single event log is processed");
        }
    }

    Ok(())
}
