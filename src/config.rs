use std::path::PathBuf;
use std::time::Duration;

pub const DEMO_KEY: &str = "DEMO_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub text_model: String,
    pub image_model: String,
    pub model_timeout: Duration,
    pub upload_dir: PathBuf,
    pub public_base_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub port: u16,
}

impl Config {
    /// Reads settings from the environment (and `.env`, when present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let timeout_secs = non_empty("GEMINI_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(60);

        Self {
            api_key: non_empty("GEMINI_API_KEY").unwrap_or_else(|| DEMO_KEY.into()),
            api_base: non_empty("GEMINI_API_BASE")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".into())
                .trim_end_matches('/')
                .to_string(),
            text_model: non_empty("GEMINI_TEXT_MODEL").unwrap_or_else(|| "gemini-2.0-flash-lite".into()),
            image_model: non_empty("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash-image-preview".into()),
            model_timeout: Duration::from_secs(timeout_secs),
            upload_dir: PathBuf::from(non_empty("UPLOAD_DIR").unwrap_or_else(|| "uploads".into())),
            public_base_url: non_empty("PUBLIC_BASE_URL").map(|v| v.trim_end_matches('/').to_string()),
            cors_origins: non_empty("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            port: non_empty("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
        }
    }

    pub fn is_demo(&self) -> bool {
        self.api_key == DEMO_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_put_client_in_demo_mode() {
        let config = config_from(&[]);
        assert!(config.is_demo());
        assert_eq!(config.port, 8080);
        assert_eq!(config.text_model, "gemini-2.0-flash-lite");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.model_timeout, Duration::from_secs(60));
    }

    #[test]
    fn reads_overrides_and_splits_origins() {
        let config = config_from(&[
            ("GEMINI_API_KEY", "abc"),
            ("GEMINI_API_BASE", "http://localhost:9000/"),
            ("CORS_ORIGINS", "http://localhost:3000, http://localhost:5173,"),
            ("PUBLIC_BASE_URL", "https://api.example.com/"),
            ("PORT", "3001"),
        ]);
        assert!(!config.is_demo());
        assert_eq!(config.api_base, "http://localhost:9000");
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "http://localhost:5173"]);
        assert_eq!(config.public_base_url.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.port, 3001);
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "eighty"), ("GEMINI_TIMEOUT_SECS", "-1")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.model_timeout, Duration::from_secs(60));
    }
}
