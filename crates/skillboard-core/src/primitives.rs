//! # Engine Primitives
//!
//! Compile-time constants for the Skillboard engine.
//!
//! These values are fixed in the binary; nothing in the store or the
//! configuration changes them at runtime.

// =============================================================================
// AGGREGATION WINDOWS
// =============================================================================

/// Number of most recent snapshots shown by the growth-per-skill view.
pub const GROWTH_HISTORY_SNAPSHOTS: usize = 4;

/// Number of snapshots (current included) a monthly report looks back over.
pub const MONTHLY_SNAPSHOT_WINDOW: usize = 5;

/// Length of the weekly report period, in days.
pub const WEEKLY_PERIOD_DAYS: i64 = 7;

/// Length of the monthly report period, in days.
pub const MONTHLY_PERIOD_DAYS: i64 = 30;

// =============================================================================
// REPORT BUCKETS
// =============================================================================

/// Skills listed in a report's "top skills" section.
pub const REPORT_TOP_SKILLS: usize = 10;

/// Skills listed in a report's "highest growth" section.
pub const REPORT_HIGHEST_GROWTH: usize = 5;

/// Skills listed in a report's "no progress" section.
pub const REPORT_NO_PROGRESS: usize = 5;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length (in characters) for names and roles.
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum length for member initials.
pub const MAX_INITIALS_LENGTH: usize = 4;

/// Maximum length for icon identifiers.
pub const MAX_ICON_LENGTH: usize = 64;

/// Maximum length for color strings (`#4f46e5`, `rgb(...)`, named colors).
pub const MAX_COLOR_LENGTH: usize = 32;

/// Maximum length for setting keys.
pub const MAX_SETTING_KEY_LENGTH: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_window_covers_growth_history() {
        assert!(MONTHLY_SNAPSHOT_WINDOW > GROWTH_HISTORY_SNAPSHOTS);
        assert!(MONTHLY_PERIOD_DAYS > WEEKLY_PERIOD_DAYS);
    }

    #[test]
    fn report_buckets_are_bounded() {
        assert_eq!(REPORT_TOP_SKILLS, 10);
        assert_eq!(REPORT_HIGHEST_GROWTH, 5);
        assert_eq!(REPORT_NO_PROGRESS, 5);
    }
}
