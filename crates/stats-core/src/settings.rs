use clap::{CommandFactory, FromArgMatches, Parser};
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatsError};

/// Directory searched for yearly order reports when nothing else is configured.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default file-name suffix: reports are named `<yyyy>_<suffix>.csv`.
pub const DEFAULT_SUFFIX: &str = "amazon_orders";

/// Configuration-file key for the data directory.
pub const KEY_DATA_DIR: &str = "data_dir";

/// Configuration-file key for the report suffix.
pub const KEY_SUFFIX: &str = "suffix";

/// Keys accepted in a configuration file.
pub const CONFIG_KEYS: [&str; 2] = [KEY_DATA_DIR, KEY_SUFFIX];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Statistical analysis of yearly order reports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "order-stats",
    about = "Statistical analysis of yearly order reports",
    version
)]
pub struct Settings {
    /// Analyses to run, comma separated (ALL, CC, ME, MC). Without any, the
    /// reports are printed
    #[arg(short, long, value_delimiter = ',', value_parser = ["ALL", "CC", "ME", "MC"])]
    pub analysis: Vec<String>,

    /// Load the specified configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding the yearly reports
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Report file-name suffix
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Chart theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Print measures as JSON
    #[arg(long)]
    pub json: bool,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Logging level
    #[arg(
        long,
        default_value = "WARNING",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Analyses ───────────────────────────────────────────────────────────────────

/// The analyses selected with `--analysis`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyses {
    /// `CC`: cumulated consumption curve.
    pub cumulated: bool,
    /// `ME`: descriptive measures.
    pub measures: bool,
    /// `MC`: monthly consumption bar charts.
    pub monthly: bool,
}

impl Analyses {
    /// Combine analysis codes; `ALL` selects everything.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self> {
        let mut selected = Analyses::default();
        for code in codes {
            match code.as_ref() {
                "ALL" => {
                    selected.cumulated = true;
                    selected.measures = true;
                    selected.monthly = true;
                }
                "CC" => selected.cumulated = true,
                "ME" => selected.measures = true,
                "MC" => selected.monthly = true,
                other => {
                    return Err(StatsError::Config(format!(
                        "invalid analysis parameter '{other}'"
                    )))
                }
            }
        }
        Ok(selected)
    }

    /// `true` when no analysis was requested; the reports are printed instead.
    pub fn is_empty(&self) -> bool {
        !(self.cumulated || self.measures || self.monthly)
    }

    /// `true` when at least one chart view is needed.
    pub fn has_charts(&self) -> bool {
        self.cumulated || self.monthly
    }
}

// ── ConfigFile ─────────────────────────────────────────────────────────────────

/// Values read from a `key = value` configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub suffix: Option<String>,
}

impl ConfigFile {
    /// Read and parse the configuration file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| StatsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse configuration text.
    ///
    /// Blank lines and `#` comments are skipped; all whitespace inside a line
    /// is dropped, as is anything after a `#`. Only [`CONFIG_KEYS`] are
    /// accepted.
    pub fn parse(content: &str) -> Result<Self> {
        let skip = Regex::new(r"^[ \t]*(#.*)?$").expect("regex is valid");
        let mut config = ConfigFile::default();

        for (number, line) in content.lines().enumerate() {
            if skip.is_match(line) {
                continue;
            }
            let entry: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            let entry = entry.split('#').next().unwrap_or_default();

            let (key, value) = entry.split_once('=').ok_or_else(|| {
                StatsError::Config(format!("line {}: expected key=value", number + 1))
            })?;
            if value.contains('=') {
                return Err(StatsError::Config(format!(
                    "line {}: more than one '='",
                    number + 1
                )));
            }

            match key {
                KEY_DATA_DIR => config.data_dir = Some(PathBuf::from(value)),
                KEY_SUFFIX => config.suffix = Some(value.to_string()),
                other => {
                    return Err(StatsError::Config(format!(
                        "invalid configuration option '{other}', expected one of: {}",
                        CONFIG_KEYS.join(", ")
                    )))
                }
            }
        }

        Ok(config)
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and merge the configuration file, if any.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    ///
    /// Precedence: explicit command-line value, then configuration file, then
    /// built-in default. `--debug` forces `DEBUG` logging.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        let matches = Settings::command().get_matches_from(args);
        let mut settings =
            Settings::from_arg_matches(&matches).map_err(|e| StatsError::Config(e.to_string()))?;

        if let Some(path) = settings.config.clone() {
            let file = ConfigFile::load_from(&path)?;
            if !is_arg_explicitly_set(&matches, "data_dir") {
                if let Some(v) = file.data_dir {
                    settings.data_dir = v;
                }
            }
            if !is_arg_explicitly_set(&matches, "suffix") {
                if let Some(v) = file.suffix {
                    settings.suffix = v;
                }
            }
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// The selected analyses.
    pub fn analyses(&self) -> Analyses {
        // clap already restricts the values, so this cannot fail.
        Analyses::from_codes(self.analysis.as_slice()).unwrap_or_default()
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
