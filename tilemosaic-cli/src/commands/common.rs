//! Helpers shared across CLI commands.

use std::path::{Path, PathBuf};

use tilemosaic::config::ConfigFile;
use tilemosaic::coord::GeoPoint;

use crate::error::CliError;

/// Loads the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Parses a `LAT,LON` pair.
pub fn parse_point(input: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = input
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", input))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    Ok(GeoPoint::new(lat, lon))
}

/// Reads one `LAT,LON` pair per line. Blank lines and `#` comments are skipped.
pub fn read_points_file(path: &Path) -> Result<Vec<GeoPoint>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::PointsFile {
        path: path.to_path_buf(),
        line: 0,
        reason: e.to_string(),
    })?;
    parse_points(&content).map_err(|(line, reason)| CliError::PointsFile {
        path: path.to_path_buf(),
        line,
        reason,
    })
}

fn parse_points(content: &str) -> Result<Vec<GeoPoint>, (usize, String)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| parse_point(line).map_err(|reason| (n, reason)))
        .collect()
}

/// Sidecar metadata path: `<output>.json`.
pub fn metadata_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".json");
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(
            parse_point("37.8,-122.4").unwrap(),
            GeoPoint::new(37.8, -122.4)
        );
        assert_eq!(
            parse_point(" -33.9 , 151.2 ").unwrap(),
            GeoPoint::new(-33.9, 151.2)
        );
        assert!(parse_point("37.8").is_err());
        assert!(parse_point("north,west").is_err());
    }

    #[test]
    fn test_parse_points_skips_comments() {
        let points = parse_points("# drive 1\n37.8,-122.4\n\n37.801,-122.401\n").unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_parse_points_reports_line() {
        let err = parse_points("37.8,-122.4\n# ok\nbad\n").unwrap_err();
        assert_eq!(err.0, 3);
    }

    #[test]
    fn test_read_points_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("drive.csv");
        std::fs::write(&path, "37.8,-122.4\n37.7995,-122.3995\n").unwrap();
        assert_eq!(read_points_file(&path).unwrap().len(), 2);

        let missing = temp_dir.path().join("missing.csv");
        assert!(matches!(
            read_points_file(&missing),
            Err(CliError::PointsFile { line: 0, .. })
        ));
    }

    #[test]
    fn test_metadata_path() {
        assert_eq!(
            metadata_path(Path::new("out/drive.png")),
            PathBuf::from("out/drive.png.json")
        );
    }

    #[test]
    fn test_load_config_from_missing_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&temp_dir.path().join("none.ini"))).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
