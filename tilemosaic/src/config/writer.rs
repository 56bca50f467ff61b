//! [`ConfigFile`] to commented INI text.

use super::file::ConfigFile;
use super::size::format_size;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[map]
; Tile zoom level used when a request does not name one (0-19)
zoom = {zoom}

[provider]
; XYZ tile URL template, must contain {{z}}, {{x}} and {{y}}
url = {url}
; User-Agent sent with every tile request
user_agent = {user_agent}
; HTTP timeout in seconds
timeout = {timeout}

[cache]
; Root of the on-disk tile cache (tiles live under <directory>/Tiles)
directory = {directory}
; Memory budget for decoded tiles, e.g. 512MB or 2GB
memory_size = {memory_size}
; Concurrent disk reads and writes
disk_io_concurrency = {disk_io}

[download]
; Tiles resolved concurrently per request
max_concurrent = {max_concurrent}
; Retries after a failed download (0 disables retrying)
max_retries = {max_retries}
; First retry delay in milliseconds, doubled on each further retry
retry_base_delay_ms = {retry_delay}
; Seconds a request may spend fetching tiles
deadline = {deadline}

[mosaic]
; Fraction of tiles that must resolve before a mosaic is stitched.
; 1.0 requires every tile; lower values allow partial mosaics.
min_success_ratio = {ratio}
"#,
        zoom = config.map.zoom,
        url = config.provider.url,
        user_agent = config.provider.user_agent,
        timeout = config.provider.timeout,
        directory = config.cache.directory.display(),
        memory_size = format_size(config.cache.memory_size),
        disk_io = config.cache.disk_io_concurrency,
        max_concurrent = config.download.max_concurrent,
        max_retries = config.download.max_retries,
        retry_delay = config.download.retry_base_delay_ms,
        deadline = config.download.deadline,
        ratio = config.mosaic.min_success_ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[map]", "[provider]", "[cache]", "[download]", "[mosaic]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("memory_size = 512MB"));
        assert!(text.contains("url = https://tile.openstreetmap.org/{z}/{x}/{y}.png"));
    }

    #[test]
    fn test_ratio_written_as_float() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("min_success_ratio = 1"));
    }
}
