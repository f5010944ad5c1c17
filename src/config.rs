use std::env;
use std::time::Duration;

use fleet_motion::MotionConfig;

/// Session settings derived from the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub motion: MotionConfig,

    /// Publish `geo-position-update` messages when the viewport moves.
    pub viewport_updates: bool,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = MotionConfig::default();
        let motion = MotionConfig {
            tick_interval: env_millis("TICK_INTERVAL_MS", defaults.tick_interval),
            initial_window: env_millis("INITIAL_WINDOW_MS", defaults.initial_window),
            batch_buffer: env_usize("BATCH_BUFFER", defaults.batch_buffer),
        };

        Self { motion, viewport_updates: env_bool("VIEWPORT_UPDATES", false) }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_millis(key: &str, default: Duration) -> Duration {
    parse_millis(env::var(key).ok().as_deref()).unwrap_or_else(|| {
        tracing::trace!("{key} not set, using default: {default:?}");
        default
    })
}

fn env_usize(key: &str, default: usize) -> usize {
    parse_positive(env::var(key).ok().as_deref()).unwrap_or_else(|| {
        tracing::trace!("{key} not set, using default: {default}");
        default
    })
}

fn env_bool(key: &str, default: bool) -> bool {
    parse_bool(env::var(key).ok().as_deref()).unwrap_or_else(|| {
        tracing::trace!("{key} not set, using default: {default}");
        default
    })
}

fn parse_millis(value: Option<&str>) -> Option<Duration> {
    value.and_then(|v| v.trim().parse::<u64>().ok()).filter(|ms| *ms > 0).map(Duration::from_millis)
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    value.and_then(|v| v.trim().parse::<usize>().ok()).filter(|v| *v > 0)
}

fn parse_bool(value: Option<&str>) -> Option<bool> {
    let normalized = value?.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some(matches!(normalized.as_str(), "1" | "true" | "yes" | "on"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn millis() {
        assert_eq!(parse_millis(Some("25")), Some(Duration::from_millis(25)));
        assert_eq!(parse_millis(Some(" 100 ")), Some(Duration::from_millis(100)));
        assert_eq!(parse_millis(Some("0")), None);
        assert_eq!(parse_millis(Some("-5")), None);
        assert_eq!(parse_millis(Some("fast")), None);
        assert_eq!(parse_millis(None), None);
    }

    #[test]
    fn flags() {
        assert_eq!(parse_bool(Some("TRUE")), Some(true));
        assert_eq!(parse_bool(Some("on")), Some(true));
        assert_eq!(parse_bool(Some("no")), Some(false));
        assert_eq!(parse_bool(Some("")), None);
        assert_eq!(parse_bool(None), None);
    }
}
