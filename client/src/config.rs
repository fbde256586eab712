use mathboard_shared::protocol::DEFAULT_API_URL;
use mathboard_shared::ClientConfig;

/// Recognizer base URL baked in at build time, if any.
pub const BUILD_API_URL: Option<&str> = option_env!("MATHBOARD_API_URL");

/// Host-served config wins over the build-time value, which wins over the
/// default. Blank values are skipped.
pub fn resolve_api_url(served: Option<&ClientConfig>, build_time: Option<&str>) -> String {
    served
        .map(|config| config.api_url.trim())
        .filter(|url| !url.is_empty())
        .or_else(|| build_time.map(str::trim).filter(|url| !url.is_empty()))
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}

pub fn debug_enabled(search: &str) -> bool {
    search
        .trim_start_matches('?')
        .split('&')
        .any(|pair| matches!(pair, "debug=1" | "debug=true" | "log=1" | "log=true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn served_config_takes_precedence() {
        let served = ClientConfig {
            api_url: "https://served.example".to_string(),
        };
        assert_eq!(
            resolve_api_url(Some(&served), Some("https://built.example")),
            "https://served.example"
        );
    }

    #[test]
    fn falls_back_to_build_time_then_default() {
        let blank = ClientConfig {
            api_url: "  ".to_string(),
        };
        assert_eq!(
            resolve_api_url(Some(&blank), Some("https://built.example")),
            "https://built.example"
        );
        assert_eq!(resolve_api_url(None, None), DEFAULT_API_URL);
        assert_eq!(resolve_api_url(None, Some("")), DEFAULT_API_URL);
    }

    #[test]
    fn debug_flag_from_query() {
        assert!(debug_enabled("?debug=1"));
        assert!(debug_enabled("?a=b&log=true"));
        assert!(!debug_enabled("?debug=0"));
        assert!(!debug_enabled(""));
    }
}
