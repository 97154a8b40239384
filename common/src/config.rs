use std::time::Duration;

const DEFAULT_BATCH_SIZE: usize = 1000;
const DEFAULT_COMMIT_INTERVAL: Duration = Duration::from_secs(30);

/// Tuning knobs for the import transaction coordinator.
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Import")]
#[group(id = "import")]
pub struct Import {
    /// Number of top-level records per transaction.
    #[arg(
        id = "batch-size",
        long,
        env = "NVDSYNC_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE
    )]
    pub batch_size: usize,

    /// Commit at least this often during large dictionary imports.
    #[arg(
        id = "commit-interval",
        long,
        env = "NVDSYNC_COMMIT_INTERVAL",
        value_parser = humantime::parse_duration,
        default_value = humantime::format_duration(DEFAULT_COMMIT_INTERVAL).to_string()
    )]
    pub commit_interval: Duration,
}

impl Default for Import {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            commit_interval: DEFAULT_COMMIT_INTERVAL,
        }
    }
}
