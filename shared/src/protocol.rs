use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CALCULATE_PATH: &str = "/calculate";
pub const DEFAULT_API_URL: &str = "http://localhost:8900";

/// Body of `POST {api_url}/calculate`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CalculateRequest {
    pub image: String,
    pub dict_of_vars: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecognitionEntry {
    pub expr: String,
    pub result: String,
    #[serde(default)]
    pub assign: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CalculateResponse {
    #[serde(default)]
    pub data: Vec<RecognitionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Served by the host as `/config.json`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

pub fn calculate_url(api_url: &str) -> String {
    format!("{}{CALCULATE_PATH}", api_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_backend_field_names() {
        let mut vars = BTreeMap::new();
        vars.insert("x".to_string(), "5".to_string());
        let request = CalculateRequest {
            image: "data:image/png;base64,AAAA".to_string(),
            dict_of_vars: vars,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"], "data:image/png;base64,AAAA");
        assert_eq!(json["dict_of_vars"]["x"], "5");
    }

    #[test]
    fn response_tolerates_extra_and_missing_fields() {
        let text = r#"{"message":"Image processed","status":"success","data":[{"expr":"x","result":"4","assign":true},{"expr":"2+2","result":"4"}]}"#;
        let response: CalculateResponse = serde_json::from_str(text).unwrap();
        assert_eq!(response.data.len(), 2);
        assert!(response.data[0].assign);
        assert!(!response.data[1].assign);
        assert_eq!(response.status.as_deref(), Some("success"));

        let empty: CalculateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_empty());
    }

    #[test]
    fn calculate_url_trims_trailing_slash() {
        assert_eq!(
            calculate_url("http://api.example.com/"),
            "http://api.example.com/calculate"
        );
        assert_eq!(calculate_url("http://h:1"), "http://h:1/calculate");
    }

    #[test]
    fn client_config_round_trips_through_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_url":"https://calc.example"}"#).unwrap();
        assert_eq!(config.api_url, "https://calc.example");
        assert_eq!(ClientConfig::default().api_url, DEFAULT_API_URL);
    }
}
