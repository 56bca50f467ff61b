//! Human-readable byte sizes such as `512MB` or `2GB`.

use thiserror::Error;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid size '{input}': expected a byte count or a KB/MB/GB value such as '512MB'")]
pub struct SizeParseError {
    input: String,
}

/// Parses a byte size.
///
/// Accepts a bare byte count or a number followed by `K`/`KB`, `M`/`MB` or
/// `G`/`GB` (binary multiples, case-insensitive, optional whitespace).
///
/// ```
/// use tilemosaic::config::parse_size;
///
/// assert_eq!(parse_size("512MB").unwrap(), 512 * 1024 * 1024);
/// assert_eq!(parse_size("4 k").unwrap(), 4096);
/// ```
pub fn parse_size(input: &str) -> Result<u64, SizeParseError> {
    let err = || SizeParseError {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    let upper = trimmed.to_ascii_uppercase();
    let digits_end = upper
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(upper.len());
    let (number, suffix) = upper.split_at(digits_end);

    let multiplier = match suffix.trim() {
        "" | "B" => 1,
        "K" | "KB" => KB,
        "M" | "MB" => MB,
        "G" | "GB" => GB,
        _ => return Err(err()),
    };

    let value: u64 = number.parse().map_err(|_| err())?;
    value.checked_mul(multiplier).ok_or_else(err)
}

/// Formats a byte count using the largest exact unit.
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= GB && b % GB == 0 => format!("{}GB", b / GB),
        b if b >= MB && b % MB == 0 => format!("{}MB", b / MB),
        b if b >= KB && b % KB == 0 => format!("{}KB", b / KB),
        b => b.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("512mb").unwrap(), 512 * MB);
        assert_eq!(parse_size(" 2 GB ").unwrap(), 2 * GB);
        assert_eq!(parse_size("3G").unwrap(), 3 * GB);
        assert_eq!(parse_size("100B").unwrap(), 100);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("12TB").is_err());
        assert!(parse_size("-5MB").is_err());
        assert!(parse_size("1.5GB").is_err());
    }

    #[test]
    fn test_parse_overflow() {
        assert!(parse_size("99999999999999GB").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(format_size(512 * MB), "512MB");
        assert_eq!(format_size(2 * GB), "2GB");
        assert_eq!(format_size(1536), "1536");
        assert_eq!(format_size(4 * KB), "4KB");
        assert_eq!(format_size(0), "0");
    }

    #[test]
    fn test_format_parses_back() {
        for bytes in [0, 1, 4 * KB, 700 * MB, 3 * GB] {
            assert_eq!(parse_size(&format_size(bytes)).unwrap(), bytes);
        }
    }
}
