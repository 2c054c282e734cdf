use chrono::NaiveDate;
use frailty_screen::config::ScreeningConfig;
use frailty_screen::screening::{InMemoryHistoryStore, StoreLimits};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn history_store(config: &ScreeningConfig) -> InMemoryHistoryStore {
    InMemoryHistoryStore::with_limits(StoreLimits {
        history_cap: config.history_cap,
        max_sessions: Some(config.max_sessions),
        idle_timeout: Some(config.session_idle_timeout),
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn history_store_applies_screening_limits() {
        let config = ScreeningConfig {
            history_cap: Some(40),
            max_sessions: 3,
            session_idle_timeout: Duration::from_secs(600),
        };

        let limits = history_store(&config).limits();
        assert_eq!(limits.history_cap, Some(40));
        assert_eq!(limits.max_sessions, Some(3));
        assert_eq!(limits.idle_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date(" 2025-06-02 "),
            Ok(NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date"))
        );
        assert!(parse_date("02/06/2025").is_err());
    }
}
