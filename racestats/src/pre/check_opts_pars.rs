use crate::pre::read_session_pars::SessionPars;
use crate::pre::report_opts::ReportOpts;
use anyhow::Context;
use helpers::general::InputValueError;

/// Upper limit for the number of intermediate splits per lap.
pub const MAX_SPLITS_LIMIT: usize = 16;

/// check_report_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_report_opts_pars(report_opts: &ReportOpts, session_pars: &SessionPars) -> anyhow::Result<()> {
    // PART 1: REPORT OPTIONS
    for path in report_opts.eventfile_paths.iter() {
        if !path.is_file() {
            return Err(InputValueError).context(format!(
                "Event log {} does not exist or is not a file!",
                path.display()
            ));
        }
    }

    if !report_opts.output_dir.is_dir() {
        return Err(InputValueError).context(format!(
            "Output directory {} does not exist!",
            report_opts.output_dir.display()
        ));
    }

    // PART 2: SESSION PARAMETERS
    check_session_pars(session_pars)
}

/// check_session_pars checks the session parameters on their own, e.g. before they are used
/// without report options.
pub fn check_session_pars(session_pars: &SessionPars) -> anyhow::Result<()> {
    if !(1..=MAX_SPLITS_LIMIT).contains(&session_pars.max_splits) {
        return Err(InputValueError).context(format!(
            "max_splits is {}, which is not within the reasonable range of [1, {}]!",
            session_pars.max_splits, MAX_SPLITS_LIMIT
        ));
    }

    if session_pars.lapped_cutoff_ms == 0 {
        return Err(InputValueError).context("lapped_cutoff_ms must be greater than zero!");
    }

    Ok(())
}
