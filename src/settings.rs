use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;
use tracing::level_filters::LevelFilter;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".distance-log";
/// Log file written when logging is switched on.
const LOG_FILE_NAME: &str = "debug.log";

/// Command-line options for the terminal front-end. Records never touch disk;
/// the only configurable output is the debug log.
#[derive(Parser, Debug, Clone)]
#[command(name = "distance-log")]
#[command(about = "Log daily travel distances in the terminal")]
#[command(version)]
pub struct Settings {
    /// Log level for the debug log (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "off")]
    pub log_level: LevelFilter,

    /// Where to write the debug log [default: ~/.distance-log/debug.log]
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    pub fn logging_enabled(&self) -> bool {
        self.log_level != LevelFilter::OFF
    }

    /// Resolve the log destination, falling back to the data directory in the
    /// user's home.
    pub fn log_file_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(LOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_off_by_default() {
        let settings = Settings::try_parse_from(["distance-log"]).unwrap();
        assert_eq!(settings.log_level, LevelFilter::OFF);
        assert!(!settings.logging_enabled());
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_log_options() {
        let settings = Settings::try_parse_from([
            "distance-log",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/distance.log",
        ])
        .unwrap();
        assert_eq!(settings.log_level, LevelFilter::DEBUG);
        assert!(settings.logging_enabled());
        assert_eq!(
            settings.log_file_path().unwrap(),
            PathBuf::from("/tmp/distance.log")
        );
    }

    #[test]
    fn test_rejects_unknown_level() {
        assert!(Settings::try_parse_from(["distance-log", "--log-level", "loud"]).is_err());
    }
}
