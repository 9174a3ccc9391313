//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_string_parses_plan_sections() {
        let content = r#"
[plan]
challenge_name = FTMO 100k Aggressive
account_size = 100000
risk_profile = Striker
min_trading_days = 5

[sqlite]
path = plans.db

[identity]
owner = trader-1
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("plan", "challenge_name"),
            Some("FTMO 100k Aggressive".to_string())
        );
        assert_eq!(adapter.get_double("plan", "account_size", 0.0), 100_000.0);
        assert_eq!(adapter.get_int("plan", "min_trading_days", 0), 5);
        assert_eq!(
            adapter.get_string("identity", "owner"),
            Some("trader-1".to_string())
        );
    }

    #[test]
    fn missing_keys_return_none_or_default() {
        let adapter = FileConfigAdapter::from_string("[plan]\naccount_size = 50000\n").unwrap();
        assert_eq!(adapter.get_string("plan", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
        assert_eq!(adapter.get_int("plan", "missing", 42), 42);
        assert_eq!(adapter.get_double("plan", "missing", 9.5), 9.5);
    }

    #[test]
    fn non_numeric_values_fall_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[plan]\naccount_size = lots\nmin_trading_days = few\n")
                .unwrap();
        assert_eq!(adapter.get_double("plan", "account_size", 1.0), 1.0);
        assert_eq!(adapter.get_int("plan", "min_trading_days", 3), 3);
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[sqlite]\npath = /tmp/propplan.db\n").unwrap();

        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("sqlite", "path"),
            Some("/tmp/propplan.db".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/propplan.ini");
        assert!(result.is_err());
    }
}
