//! Human-readable labels for window lengths.

/// Label shown for the disabled window.
pub const DISABLED_WINDOW_LABEL: &str = "None (disabled)";

/// Number of units kept in a label, e.g. "1 hour 30 minutes".
const GRANULARITY: usize = 2;

const UNITS: &[(u32, &str, &str)] = &[
    (31_536_000, "year", "years"),
    (2_592_000, "month", "months"),
    (604_800, "week", "weeks"),
    (86_400, "day", "days"),
    (3_600, "hour", "hours"),
    (60, "minute", "minutes"),
    (1, "second", "seconds"),
];

/// Formats a window length in seconds as a label such as `"3 hours"`.
///
/// Units are emitted largest first. Once a unit has been emitted, a skipped
/// unit still consumes granularity, so `3601` renders as `"1 hour"` rather
/// than `"1 hour 1 second"`.
#[must_use]
pub fn format_window(seconds: u32) -> String {
    if seconds == 0 {
        return DISABLED_WINDOW_LABEL.to_owned();
    }

    let mut remaining = seconds;
    let mut granularity = GRANULARITY;
    let mut parts = Vec::with_capacity(GRANULARITY);

    for &(unit_seconds, singular, plural) in UNITS {
        if remaining >= unit_seconds {
            let count = remaining / unit_seconds;
            remaining %= unit_seconds;
            let unit = if count == 1 { singular } else { plural };
            parts.push(format!("{count} {unit}"));
            granularity -= 1;
        } else if !parts.is_empty() {
            granularity -= 1;
        }

        if granularity == 0 {
            break;
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{DISABLED_WINDOW_LABEL, format_window};
    use crate::ALLOWED_WINDOWS;

    #[test]
    fn disabled_window_has_fixed_label() {
        assert_eq!(format_window(0), DISABLED_WINDOW_LABEL);
    }

    #[test]
    fn allowed_windows_render_in_largest_unit() {
        assert_eq!(format_window(60), "1 minute");
        assert_eq!(format_window(180), "3 minutes");
        assert_eq!(format_window(2700), "45 minutes");
        assert_eq!(format_window(3600), "1 hour");
        assert_eq!(format_window(32400), "9 hours");
        assert_eq!(format_window(86400), "1 day");
    }

    #[test]
    fn mixed_units_keep_two_parts() {
        assert_eq!(format_window(5400), "1 hour 30 minutes");
        assert_eq!(format_window(90061), "1 day 1 hour");
        assert_eq!(format_window(3601), "1 hour");
        assert_eq!(format_window(45), "45 seconds");
    }

    #[test]
    fn every_allowed_window_has_a_distinct_label() {
        let labels: HashSet<String> = ALLOWED_WINDOWS
            .iter()
            .map(|seconds| format_window(*seconds))
            .collect();

        assert_eq!(labels.len(), ALLOWED_WINDOWS.len());
        assert!(labels.iter().all(|label| !label.is_empty()));
    }
}
