use std::path::PathBuf;

use arg::{parse_args, Args};

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Info
};

// -------------------------------------------------------------------------------------------------

/// Default program arguments for grainsmith demo applications.
#[derive(Args, Debug, Default)]
#[allow(unused)]
pub struct Arguments {
    #[arg(short = "o", long = "output")]
    /// Directory rendered wav files get written to. By default the current directory.
    pub output_dir: Option<PathBuf>,
    #[arg(short = "s", long = "sources")]
    /// Directory to resolve grain source files in. By default, synthetic in-memory sources
    /// are used.
    pub source_dir: Option<PathBuf>,
    #[arg(short = "c", long = "candidates")]
    /// Number of candidates to render in parallel. By default 3.
    pub candidates: Option<usize>,
    #[arg(long = "seed")]
    /// Base seed for the candidates' random generators. By default 0.
    pub seed: Option<u64>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level to \"debug\", \"info\", \"warn\" or \"error\".
    /// By default \"debug\" in dev builds and \"info\" in release builds.
    pub log_level: Option<log::Level>,
}

/// Parse common demo arguments and apply the log-level arg to the logger
#[allow(unused)]
pub fn parse() -> Arguments {
    let args = parse_args::<Arguments>();

    create_logger(args.log_level);
    args
}

// -------------------------------------------------------------------------------------------------

/// Create default logger from arguments. Invoked from `parse`.
#[allow(unused)]
pub fn create_logger(log_level: Option<log::Level>) {
    simple_logger::SimpleLogger::new()
        // use default or arg level by default
        .with_level(log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        // disable logging in chatty modules
        .with_module_level("symphonia_core", log::LevelFilter::Warn)
        .with_module_level("symphonia_format", log::LevelFilter::Warn)
        .with_module_level("symphonia_bundle_mp3", log::LevelFilter::Warn)
        .init()
        .expect("Failed to set logger");
}
