pub mod types;

use std::path::Path;

use crate::error::{HomefinderError, Result};
use types::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        HomefinderError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    let config: Config = serde_yml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    use types::Destination;

    #[test]
    fn load_config_missing_file_returns_defaults() {
        let result = load_config(Path::new("/tmp/nonexistent_homefinder_config_12345.yaml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert!((config.scraper.rate_limit_per_second - 0.5).abs() < f64::EPSILON);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn load_config_valid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "scraper:\n  max_retries: 5\n  max_pages: 3\ncache:\n  max_entries: 200\nprofiles:\n  - name: boston\n    search_url: https://example.com/boston\n    destination:\n      type: sheet\n      url: https://docs.google.com/spreadsheets/d/xyz/edit\n      append: false"
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scraper.max_retries, 5);
        assert_eq!(config.scraper.max_pages, 3);
        assert_eq!(config.cache.max_entries, 200);
        assert_eq!(config.profiles.len(), 1);
        let Destination::Sheet(sheet) = &config.profiles[0].destination else {
            panic!("expected sheet destination");
        };
        assert!(!sheet.append);
        assert_eq!(sheet.worksheet, "Sheet1");
    }

    #[test]
    fn load_config_partial_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "scraper:\n  max_retries: 10").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scraper.max_retries, 10);
        assert_eq!(config.scraper.request_timeout_secs, 30);
        assert_eq!(config.cache.page_ttl_secs, 300);
    }

    #[test]
    fn load_config_empty_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp).unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scraper.max_retries, 2);
        assert_eq!(config.cache.max_entries, 100);
    }

    #[test]
    fn load_config_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(tmp, "{{{{invalid yaml: [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn load_config_unknown_destination_type_fails() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            tmp,
            "profiles:\n  - name: x\n    destination:\n      type: carrier-pigeon"
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }
}
