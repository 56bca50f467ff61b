//! INI to [`ConfigFile`] conversion.
//!
//! Starts from [`ConfigFile::default`] and overlays every key found in the
//! file. Unknown keys are ignored; malformed values are rejected.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::{ConfigFile, ConfigFileError};
use super::size::parse_size;
use crate::coord::MAX_ZOOM;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses `key` as a number, rejecting values below `min`.
fn number<T>(
    props: &Properties,
    section: &str,
    key: &str,
    min: T,
    reason: &str,
) -> Result<Option<T>, ConfigFileError>
where
    T: FromStr + PartialOrd,
{
    let Some(raw) = props.get(key) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(v) if v >= min => Ok(Some(v)),
        _ => Err(invalid(section, key, raw, reason)),
    }
}

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(props) = ini.section(Some("map")) {
        if let Some(zoom) = number::<u8>(props, "map", "zoom", 0, "must be 0-19")? {
            if zoom > MAX_ZOOM {
                return Err(invalid("map", "zoom", &zoom.to_string(), "must be 0-19"));
            }
            config.map.zoom = zoom;
        }
    }

    if let Some(props) = ini.section(Some("provider")) {
        if let Some(url) = props.get("url").map(str::trim).filter(|v| !v.is_empty()) {
            if !["{z}", "{x}", "{y}"].iter().all(|p| url.contains(p)) {
                return Err(invalid(
                    "provider",
                    "url",
                    url,
                    "must contain {z}, {x} and {y} placeholders",
                ));
            }
            config.provider.url = url.to_string();
        }
        if let Some(agent) = props
            .get("user_agent")
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            config.provider.user_agent = agent.to_string();
        }
        if let Some(timeout) = number(
            props,
            "provider",
            "timeout",
            1u64,
            "must be a positive integer (seconds)",
        )? {
            config.provider.timeout = timeout;
        }
    }

    if let Some(props) = ini.section(Some("cache")) {
        if let Some(dir) = props
            .get("directory")
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            config.cache.directory = expand_tilde(dir);
        }
        if let Some(raw) = props.get("memory_size") {
            config.cache.memory_size = parse_size(raw).map_err(|_| {
                invalid(
                    "cache",
                    "memory_size",
                    raw,
                    "expected format like '512MB', '2GB', or '1024KB'",
                )
            })?;
        }
        if let Some(n) = number(
            props,
            "cache",
            "disk_io_concurrency",
            1usize,
            "must be a positive integer",
        )? {
            config.cache.disk_io_concurrency = n;
        }
    }

    if let Some(props) = ini.section(Some("download")) {
        if let Some(n) = number(
            props,
            "download",
            "max_concurrent",
            1usize,
            "must be a positive integer",
        )? {
            config.download.max_concurrent = n;
        }
        if let Some(n) = number(
            props,
            "download",
            "max_retries",
            0u32,
            "must be a non-negative integer",
        )? {
            config.download.max_retries = n;
        }
        if let Some(ms) = number(
            props,
            "download",
            "retry_base_delay_ms",
            0u64,
            "must be a non-negative integer (milliseconds)",
        )? {
            config.download.retry_base_delay_ms = ms;
        }
        if let Some(secs) = number(
            props,
            "download",
            "deadline",
            1u64,
            "must be a positive integer (seconds)",
        )? {
            config.download.deadline = secs;
        }
    }

    if let Some(props) = ini.section(Some("mosaic")) {
        if let Some(ratio) = number(
            props,
            "mosaic",
            "min_success_ratio",
            0.0f64,
            "must be between 0.0 and 1.0",
        )? {
            if ratio > 1.0 {
                return Err(invalid(
                    "mosaic",
                    "min_success_ratio",
                    &ratio.to_string(),
                    "must be between 0.0 and 1.0",
                ));
            }
            config.mosaic.min_success_ratio = ratio;
        }
    }

    Ok(config)
}

/// Expands a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(content).unwrap())
    }

    fn invalid_key(result: Result<ConfigFile, ConfigFileError>) -> String {
        match result {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                format!("{}.{}", section, key)
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[map]\nzoom = 16\n\
             [provider]\nurl = http://localhost:8080/{z}/{x}/{y}.png\nuser_agent = test-agent\ntimeout = 5\n\
             [cache]\ndirectory = /tmp/tiles\nmemory_size = 64MB\ndisk_io_concurrency = 4\n\
             [download]\nmax_concurrent = 2\nmax_retries = 0\nretry_base_delay_ms = 10\ndeadline = 30\n\
             [mosaic]\nmin_success_ratio = 0.5\n",
        )
        .unwrap();

        assert_eq!(config.map.zoom, 16);
        assert_eq!(config.provider.url, "http://localhost:8080/{z}/{x}/{y}.png");
        assert_eq!(config.provider.user_agent, "test-agent");
        assert_eq!(config.provider.timeout, 5);
        assert_eq!(config.cache.directory, PathBuf::from("/tmp/tiles"));
        assert_eq!(config.cache.memory_size, 64 * 1024 * 1024);
        assert_eq!(config.cache.disk_io_concurrency, 4);
        assert_eq!(config.download.max_concurrent, 2);
        assert_eq!(config.download.max_retries, 0);
        assert_eq!(config.download.retry_base_delay_ms, 10);
        assert_eq!(config.download.deadline, 30);
        assert_eq!(config.mosaic.min_success_ratio, 0.5);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse("[download]\nmax_concurrent = 3\n").unwrap();
        let defaults = ConfigFile::default();
        assert_eq!(config.download.max_concurrent, 3);
        assert_eq!(config.download.deadline, defaults.download.deadline);
        assert_eq!(config.map, defaults.map);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(invalid_key(parse("[map]\nzoom = 20\n")), "map.zoom");
        assert_eq!(invalid_key(parse("[map]\nzoom = high\n")), "map.zoom");
        assert_eq!(
            invalid_key(parse("[provider]\nurl = https://tiles.example/{z}.png\n")),
            "provider.url"
        );
        assert_eq!(
            invalid_key(parse("[provider]\ntimeout = 0\n")),
            "provider.timeout"
        );
        assert_eq!(
            invalid_key(parse("[cache]\nmemory_size = lots\n")),
            "cache.memory_size"
        );
        assert_eq!(
            invalid_key(parse("[download]\nmax_concurrent = 0\n")),
            "download.max_concurrent"
        );
        assert_eq!(
            invalid_key(parse("[mosaic]\nmin_success_ratio = 1.5\n")),
            "mosaic.min_success_ratio"
        );
        assert_eq!(
            invalid_key(parse("[mosaic]\nmin_success_ratio = -0.1\n")),
            "mosaic.min_success_ratio"
        );
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/tiles"), home.join("tiles"));
        }
    }
}
