//! Common utilities and helpers

use std::time::Duration;

use crate::domain::model::Seconds;

/// Utility functions for BgClip
pub struct Utils;

impl Utils {
    /// Elapsed wall time: `12.3s` under a minute, `M:SS` or `H:MM:SS` above
    pub fn format_duration(duration: Duration) -> String {
        if duration.as_secs() < 60 {
            format!("{:.1}s", duration.as_secs_f64())
        } else {
            Self::format_offset(duration.as_secs())
        }
    }

    /// Format an offset in whole seconds as `M:SS` or `H:MM:SS`
    pub fn format_offset(offset: Seconds) -> String {
        let hours = offset / 3600;
        let minutes = (offset % 3600) / 60;
        let seconds = offset % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }

    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Last `count` non-empty lines of tool output, joined with `; `
    pub fn tail_lines(output: &str, count: usize) -> String {
        let lines: Vec<&str> = output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let start = lines.len().saturating_sub(count);
        lines[start..].join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(Utils::format_file_size(512), "512 B");
        assert_eq!(Utils::format_file_size(2048), "2.00 KB");
        assert_eq!(Utils::format_file_size(5 * 1024 * 1024 + 512 * 1024), "5.50 MB");
    }

    #[test]
    fn test_format_offset() {
        assert_eq!(Utils::format_offset(20), "0:20");
        assert_eq!(Utils::format_offset(150), "2:30");
        assert_eq!(Utils::format_offset(3725), "1:02:05");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(12_340)), "12.3s");
        assert_eq!(Utils::format_duration(Duration::from_millis(61_250)), "1:01");
    }

    #[test]
    fn test_tail_lines() {
        let stderr = "line one\n\nline two\nline three\n";
        assert_eq!(Utils::tail_lines(stderr, 2), "line two; line three");
        assert_eq!(Utils::tail_lines("", 3), "");
    }
}
