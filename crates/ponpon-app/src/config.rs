use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use time::Weekday;

const APP_DIR: &str = "ponpon-journal";
const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.json";

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl AppConfig {
    /// Default location: `<config dir>/ponpon-journal/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`default_path`](Self::default_path) when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    /// Load configuration from a known file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.storage.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_valid_state_file()
    }
}

/// Where the habit record is kept.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default)]
    state_file: Option<PathBuf>,
}

impl StorageConfig {
    /// Storage pointing at an explicit state file.
    pub fn with_state_file(path: impl Into<PathBuf>) -> Self {
        Self {
            state_file: Some(path.into()),
        }
    }

    /// Configured state file, or `<data dir>/ponpon-journal/state.json`.
    pub fn state_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(STATE_FILE))
            .ok_or_else(|| anyhow!("could not determine a data directory; set storage.state_file"))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if let Some(path) = &self.state_file
            && path.is_relative()
        {
            self.state_file = Some(base.join(path));
        }
    }

    fn ensure_valid_state_file(&self) -> Result<()> {
        if self
            .state_file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            bail!("storage.state_file must not be empty");
        }
        Ok(())
    }
}

/// When the periodic activities fall due.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub weekly_review_day: WeekdayName,
}

/// Calendar rendering preferences.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
pub struct CalendarConfig {
    #[serde(default)]
    pub week_starts_on: WeekdayName,
}

/// Weekday as written in configuration files.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayName {
    #[default]
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekdayName {
    pub const fn weekday(self) -> Weekday {
        match self {
            Self::Sunday => Weekday::Sunday,
            Self::Monday => Weekday::Monday,
            Self::Tuesday => Weekday::Tuesday,
            Self::Wednesday => Weekday::Wednesday,
            Self::Thursday => Weekday::Thursday,
            Self::Friday => Weekday::Friday,
            Self::Saturday => Weekday::Saturday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let cfg = AppConfig::from_file(dir.path().join(CONFIG_FILE))?;
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.schedule.weekly_review_day.weekday(), Weekday::Sunday);
        assert_eq!(cfg.calendar.week_starts_on.weekday(), Weekday::Sunday);
        Ok(())
    }

    #[test]
    fn load_config_with_all_sections() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        let mut file = fs::File::create(&path)?;
        writeln!(
            file,
            "[storage]\nstate_file = \"/var/tmp/journal.json\"\n\n[schedule]\nweekly_review_day = \"saturday\"\n\n[calendar]\nweek_starts_on = \"monday\""
        )?;

        let cfg = AppConfig::from_file(&path)?;
        assert_eq!(cfg.storage.state_file()?, PathBuf::from("/var/tmp/journal.json"));
        assert_eq!(cfg.schedule.weekly_review_day, WeekdayName::Saturday);
        assert_eq!(cfg.calendar.week_starts_on.weekday(), Weekday::Monday);
        Ok(())
    }

    #[test]
    fn relative_state_file_is_resolved_next_to_config() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[storage]\nstate_file = \"data/state.json\"\n")?;

        let cfg = AppConfig::from_file(&path)?;
        assert_eq!(cfg.storage.state_file()?, dir.path().join("data/state.json"));
        Ok(())
    }

    #[test]
    fn empty_state_file_is_rejected() {
        let Err(err) = AppConfig::from_toml_str("[storage]\nstate_file = \"\"\n") else {
            panic!("empty state file should error");
        };
        assert!(err.to_string().contains("storage.state_file must not be empty"));
    }

    #[test]
    fn unknown_weekday_is_rejected() {
        assert!(AppConfig::from_toml_str("[schedule]\nweekly_review_day = \"someday\"\n").is_err());
    }

    #[test]
    fn parse_errors_name_the_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[schedule\n")?;

        let Err(err) = AppConfig::from_file(&path) else {
            panic!("broken toml should error");
        };
        assert!(err.to_string().contains("failed to parse"));
        Ok(())
    }
}
