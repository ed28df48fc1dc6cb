use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reqstat",
    about = "Aggregate a request export into daily statistics and serve range totals over TCP",
    version,
    long_about = None
)]
pub struct Args {
    /// Spreadsheet with the request export
    #[arg(short, long, default_value = "testing_data.xlsx")]
    pub source: PathBuf,

    /// SQLite database file, recreated on every start
    #[arg(short, long, default_value = "db.sqlite3")]
    pub database: PathBuf,

    /// Custom schema file (defaults to the embedded schema)
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Host the query server binds to or the client connects to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port of the query server
    #[arg(short, long, default_value_t = 8866)]
    pub port: u16,

    /// Number of range answers kept in memory
    #[arg(long, default_value_t = 100)]
    pub cache_capacity: usize,

    /// Per-connection read/write timeout in seconds
    #[arg(long)]
    pub read_timeout_secs: Option<u64>,

    /// Ask a running server for global metadata and print it
    #[arg(long, conflicts_with = "range")]
    pub meta: bool,

    /// Ask a running server for totals between two YYYY-MM-DD dates and print them
    #[arg(long, num_args = 2, value_names = ["MIN_DATE", "MAX_DATE"])]
    pub range: Option<Vec<String>>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn is_client(&self) -> bool {
        self.meta || self.range.is_some()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
