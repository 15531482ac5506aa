use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the order statistics crates.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A date field is not a strict `YYYY-MM-DD` calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A monetary field could not be parsed as a decimal number.
    #[error("Invalid amount in field '{field}': {value}")]
    InvalidAmount { field: String, value: String },

    /// A field required to build a record is absent.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// An order identifier was added twice to the same month.
    #[error("Duplicate order {order_id} in {month}")]
    DuplicateOrder { order_id: String, month: String },

    /// A record was routed to the ledger of another year.
    #[error("Record dated {found} does not belong to year {expected}")]
    YearMismatch { expected: String, found: String },

    /// A second ledger was registered under an existing year label.
    #[error("Duplicate year: {0}")]
    DuplicateYear(String),

    /// A record was added to a ledger that has already been trimmed.
    #[error("Ledger for year {0} is closed")]
    LedgerClosed(String),

    /// Extrema requested on a ledger without retained months.
    #[error("Ledger for year {0} has no months with orders")]
    EmptyLedger(String),

    /// Statistics requested on a dataset without data.
    #[error("Dataset contains no data")]
    EmptyDataset,

    /// Order statistics requested on an empty sequence.
    #[error("Empty input sequence")]
    EmptyInput,

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A single CSV row was rejected while loading a year file.
    #[error("{path}:{line}: {source}")]
    Row {
        path: PathBuf,
        line: u64,
        #[source]
        source: Box<StatsError>,
    },

    /// The data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No year files were found in the data directory.
    #[error("No order reports found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StatsError {
    /// `true` for errors raised while turning one raw row into a record.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            StatsError::InvalidDate(_)
                | StatsError::InvalidAmount { .. }
                | StatsError::MissingField(_)
        )
    }
}

/// Convenience alias used throughout the stats crates.
pub type Result<T> = std::result::Result<T, StatsError>;
