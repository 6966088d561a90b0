//! Duration presentation

/// How a duration is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationStyle {
    /// `1h 5m` above an hour, `5m 30s` below
    #[default]
    Compact,
    /// Zero-padded clock: `01:05:30` above an hour, `05:30` below
    Clock,
}

/// Render a number of seconds
pub fn format_duration(seconds: u64, style: DurationStyle) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    match style {
        DurationStyle::Compact if hours > 0 => format!("{}h {}m", hours, minutes),
        DurationStyle::Compact => format!("{}m {}s", minutes, secs),
        DurationStyle::Clock if hours > 0 => {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        }
        DurationStyle::Clock => format!("{:02}:{:02}", minutes, secs),
    }
}

/// "1 minute", "12 minutes"
pub fn minutes_label(minutes: u64) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

/// "1 day", "3 days"
pub fn days_label(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_boundaries() {
        assert_eq!(format_duration(0, DurationStyle::Compact), "0m 0s");
        assert_eq!(format_duration(59, DurationStyle::Compact), "0m 59s");
        assert_eq!(format_duration(60, DurationStyle::Compact), "1m 0s");
        assert_eq!(format_duration(330, DurationStyle::Compact), "5m 30s");
        assert_eq!(format_duration(3599, DurationStyle::Compact), "59m 59s");
        assert_eq!(format_duration(3600, DurationStyle::Compact), "1h 0m");
        assert_eq!(format_duration(3930, DurationStyle::Compact), "1h 5m");
    }

    #[test]
    fn test_clock_boundaries() {
        assert_eq!(format_duration(0, DurationStyle::Clock), "00:00");
        assert_eq!(format_duration(330, DurationStyle::Clock), "05:30");
        assert_eq!(format_duration(3599, DurationStyle::Clock), "59:59");
        assert_eq!(format_duration(3600, DurationStyle::Clock), "01:00:00");
        assert_eq!(format_duration(3930, DurationStyle::Clock), "01:05:30");
        // Hours are not capped at two digits
        assert_eq!(format_duration(360_000, DurationStyle::Clock), "100:00:00");
    }

    #[test]
    fn test_default_style_is_compact() {
        assert_eq!(DurationStyle::default(), DurationStyle::Compact);
    }

    #[test]
    fn test_labels() {
        assert_eq!(minutes_label(0), "0 minutes");
        assert_eq!(minutes_label(1), "1 minute");
        assert_eq!(minutes_label(25), "25 minutes");
        assert_eq!(days_label(1), "1 day");
        assert_eq!(days_label(7), "7 days");
    }
}
