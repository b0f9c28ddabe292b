//! Time labels for player surfaces.

use std::time::Duration;

/// `m:ss`, truncating to whole seconds. Minutes are not wrapped into hours.
pub fn format_time(time: Duration) -> String {
    let total_seconds = time.as_secs();
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// `position / duration`, with an unknown duration shown as `0:00`.
pub fn time_label(position: Duration, duration: Option<Duration>) -> String {
    format!(
        "{} / {}",
        format_time(position),
        format_time(duration.unwrap_or_default())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_millis(9_999)), "0:09");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_secs(3_725)), "62:05");
    }

    #[test]
    fn test_time_label() {
        assert_eq!(
            time_label(Duration::from_secs(60), Some(Duration::from_secs(120))),
            "1:00 / 2:00"
        );
        assert_eq!(time_label(Duration::from_secs(3), None), "0:03 / 0:00");
    }
}
