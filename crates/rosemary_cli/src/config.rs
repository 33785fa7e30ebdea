//! Runtime configuration resolved from flags and environment.

use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "data/rosemary-data.json";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// JSON snapshot loaded before and saved after mutating commands.
    pub data_file: PathBuf,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
}

impl CliConfig {
    pub fn new(data_file: PathBuf, log_dir: Option<PathBuf>, log_level: Option<String>) -> Self {
        Self {
            data_file,
            log_dir: log_dir.filter(|dir| !dir.as_os_str().is_empty()),
            log_level: log_level
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| rosemary_core::default_log_level().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CliConfig;
    use std::path::PathBuf;

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = CliConfig::new(
            PathBuf::from("notes.json"),
            Some(PathBuf::new()),
            Some("  ".to_string()),
        );
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, rosemary_core::default_log_level());
    }
}
