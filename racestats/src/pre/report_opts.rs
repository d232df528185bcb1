use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "RS-RES",
    about = "Classification and statistics for racing session event logs"
)]
pub struct ReportOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug logging
    #[clap(short, long)]
    pub debug: bool,

    /// Print the classification to the console (only if a single event log is processed)
    #[clap(short = 'c', long)]
    pub print_classification: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path(s) to the session event log(s), multiple logs are processed in parallel
    #[clap(short, long, value_parser, required = true)]
    pub eventfile_paths: Vec<PathBuf>,

    /// Set path to the session parameter file (defaults are used if not set)
    #[clap(short, long, value_parser)]
    pub parfile_path: Option<PathBuf>,

    /// Set path to the world record file (records are omitted if not set)
    #[clap(short, long, value_parser)]
    pub records_path: Option<PathBuf>,

    /// Set directory the reports are written to
    #[clap(short, long, value_parser, default_value = ".")]
    pub output_dir: PathBuf,
}
