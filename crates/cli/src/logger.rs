//! Logger for the command line harness: timestamped lines on stderr, and
//! optionally appended to a file.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub struct CliLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl CliLogger {
    /// Create a logger, opening `log_file` for appending if given.
    pub fn new(level: LevelFilter, log_file: Option<&Path>) -> Result<Self> {
        let file = match log_file {
            Some(path) => {
                if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                    create_dir_all(dir).with_context(|| {
                        format!("Failed to create log directory: {}", dir.display())
                    })?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?;
                Some(Mutex::new(file))
            }
            None => None,
        };
        Ok(Self { level, file })
    }

    /// Install the logger as the global `log` backend.
    pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
        let logger = Self::new(level, log_file)?;
        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        if let Some(path) = log_file {
            log::debug!("Log file: {}", path.display());
        }
        Ok(())
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Self::format(record);

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // A failed log write must not take the command down with it
                let _ = writeln!(file, "{}", message);
            }
        }
        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_level_filtering() {
        let logger = CliLogger::new(LevelFilter::Info, None).unwrap();
        let enabled = |level: Level| {
            logger.enabled(&Metadata::builder().level(level).target("test").build())
        };
        assert!(enabled(Level::Warn));
        assert!(enabled(Level::Info));
        assert!(!enabled(Level::Debug));
    }

    #[test]
    fn test_init_installs_global_logger_once() {
        CliLogger::init(LevelFilter::Warn, None).unwrap();
        assert_eq!(log::max_level(), LevelFilter::Warn);

        let err = CliLogger::init(LevelFilter::Debug, None).unwrap_err();
        assert!(err.to_string().contains("Failed to set logger"));
        assert_eq!(log::max_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_writes_to_file() {
        let path = std::env::temp_dir().join(format!("regions-cli-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let logger = CliLogger::new(LevelFilter::Debug, Some(&path)).unwrap();
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("replay")
                .args(format_args!("staged O2"))
                .build(),
        );
        logger.flush();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO [replay] staged O2"));
        let _ = std::fs::remove_file(&path);
    }
}
