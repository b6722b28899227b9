use std::env;

#[derive(Debug, Clone, Copy)]
pub struct ReminderConfig {
    /// Seconds between scans. One minute by default, matching the
    /// exact-match HH:MM comparison granularity.
    pub interval_seconds: u64,
    /// Wall-clock offset from UTC in minutes for reminder matching and
    /// same-day tracking windows.
    pub utc_offset_minutes: i32,
}

impl ReminderConfig {
    pub fn from_env() -> Self {
        let interval_seconds = env::var("REMINDER_INTERVAL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let utc_offset_minutes = env::var("UTC_OFFSET_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|m: &i32| (-14 * 60..=14 * 60).contains(m))
            .unwrap_or(0);

        Self {
            interval_seconds,
            utc_offset_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        std::env::remove_var("REMINDER_INTERVAL_SECONDS");
        std::env::remove_var("UTC_OFFSET_MINUTES");
        let cfg = ReminderConfig::from_env();
        assert_eq!(cfg.interval_seconds, 60);
        assert_eq!(cfg.utc_offset_minutes, 0);
    }
}
