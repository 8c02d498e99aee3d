use shared::{DropPolicy, NOTICE_DURATION_MS};

/// Runtime settings for the admin front-end
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL of the school REST API
    pub api_base_url: String,
    /// Where the static timetable seed is served from
    pub timetable_source_url: String,
    pub notice_duration_ms: u32,
    /// Viewports narrower than this get the single-day carousel
    pub mobile_breakpoint_px: f64,
    /// Minimum horizontal travel for a touch to count as a swipe
    pub swipe_threshold_px: f64,
    pub drop_policy: DropPolicy,
    /// Most verbose `log` level forwarded to the console
    pub log_level: log::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_base_url = option_env!("SCHOOL_API_URL")
            .unwrap_or("http://localhost:3000")
            .trim_end_matches('/')
            .to_string();

        Self {
            timetable_source_url: format!("{}/data/timetable.json", api_base_url),
            api_base_url,
            notice_duration_ms: NOTICE_DURATION_MS,
            mobile_breakpoint_px: 768.0,
            swipe_threshold_px: 50.0,
            drop_policy: DropPolicy::Swap,
            log_level: if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_config_default() {
        let config = AppConfig::default();
        assert!(!config.api_base_url.ends_with('/'));
        assert!(config.timetable_source_url.starts_with(&config.api_base_url));
        assert_eq!(config.notice_duration_ms, 3000);
        assert_eq!(config.drop_policy, DropPolicy::Swap);
        assert!(config.log_level >= log::Level::Info);
    }
}
