//! INI file configuration adapter.

use configparser::ini::Ini;
use std::path::Path;

use crate::domain::error::TicksimError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TicksimError> {
        let mut config = Ini::new();
        config.load(&path).map_err(|e| TicksimError::ConfigParse {
            file: path.as_ref().display().to_string(),
            reason: e,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, TicksimError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| TicksimError::ConfigParse {
                file: "<inline>".into(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
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

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[simulation]
data_dir = ./data
symbol = SOLUSD
starting_equity = 10000.0

[strategy]
name = Momentum Scalp
entry = ma_crossover(3, 8)
exit = profit_target(2.0)

[risk]
max_holding_bars = 5
stop_loss_pct = 3.0
allow_same_bar_reentry = no
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "symbol"),
            Some("SOLUSD".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "name"),
            Some("Momentum Scalp".to_string())
        );
        assert_eq!(
            adapter.get_string("strategy", "entry"),
            Some("ma_crossover(3, 8)".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("simulation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_int("risk", "max_holding_bars", 0), 5);
        assert_eq!(adapter.get_int("risk", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[risk]\nmax_holding_bars = abc\n").unwrap();
        assert_eq!(adapter.get_int("risk", "max_holding_bars", 42), 42);
    }

    #[test]
    fn get_double_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_double("simulation", "starting_equity", 0.0),
            10000.0
        );
        assert_eq!(adapter.get_double("risk", "stop_loss_pct", 0.0), 3.0);
        assert_eq!(adapter.get_double("risk", "take_profit_pct", 1.5), 1.5);
    }

    #[test]
    fn get_bool_variants() {
        let adapter =
            FileConfigAdapter::from_string("[risk]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\n")
                .unwrap();
        assert!(adapter.get_bool("risk", "a", false));
        assert!(adapter.get_bool("risk", "b", false));
        assert!(adapter.get_bool("risk", "c", false));
        assert!(!adapter.get_bool("risk", "d", true));
        assert!(!adapter.get_bool("risk", "e", true));
        assert!(!adapter.get_bool("risk", "f", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[risk]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("risk", "missing", true));
        assert!(!adapter.get_bool("risk", "x", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("simulation", "data_dir"),
            Some("./data".to_string())
        );
    }

    #[test]
    fn from_file_errors_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(TicksimError::ConfigParse { .. })));
    }
}
