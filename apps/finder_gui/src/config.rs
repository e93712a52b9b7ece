use std::{collections::HashMap, fs};

/// Runtime configuration for the finder.
///
/// Defaults point at the public GitHub API. Overrides are layered in order:
/// `finder.toml` in the working directory, then environment variables, then
/// command-line flags (applied by `main`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".into(),
            request_timeout_secs: 10,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("finder.toml") {
        apply_file_overrides(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("FINDER_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("FINDER_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
    if let Ok(v) = std::env::var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

/// Values in `finder.toml` are plain strings, e.g.
/// `api_base_url = "https://api.github.com"` and
/// `request_timeout_secs = "10"`. Unknown keys and unparsable values are
/// ignored in favor of the defaults.
fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("api_base_url") {
            settings.api_base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("request_timeout_secs") {
            if let Ok(parsed) = v.parse::<u64>() {
                settings.request_timeout_secs = parsed;
            }
        }
    }
}

pub fn is_supported_api_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
