use std::{collections::HashMap, fs, path::Path};

use chess_shared::domain::{Color, TimeControl};

pub const SETTINGS_FILE: &str = "chess_client.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub username: String,
    pub player_color: Color,
    pub time_control: TimeControl,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            username: "Player".into(),
            player_color: Color::White,
            time_control: TimeControl::TenMinutes,
            log_filter: "info".into(),
        }
    }
}

/// Command-line values; any `Some` wins over file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub server_url: Option<String>,
    pub username: Option<String>,
    pub player_color: Option<Color>,
    pub time_control: Option<TimeControl>,
}

pub fn load_settings(path: &Path, overrides: Overrides) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());
    settings.apply_overrides(overrides);

    settings
}

impl Settings {
    pub(crate) fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
            return;
        };

        if let Some(v) = file_cfg.get("server_url") {
            self.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("username").and_then(|v| non_blank(v)) {
            self.username = v;
        }
        if let Some(parsed) = file_cfg.get("player_color").and_then(|v| v.parse().ok()) {
            self.player_color = parsed;
        }
        if let Some(parsed) = file_cfg.get("time_control").and_then(|v| v.parse().ok()) {
            self.time_control = parsed;
        }
        if let Some(v) = file_cfg.get("log_filter") {
            self.log_filter = v.clone();
        }
    }

    pub(crate) fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("CHESS_SERVER_URL") {
            self.server_url = v;
        }
        if let Some(v) = var("APP__SERVER_URL") {
            self.server_url = v;
        }

        if let Some(v) = var("CHESS_USERNAME").as_deref().and_then(non_blank) {
            self.username = v;
        }
        if let Some(v) = var("APP__USERNAME").as_deref().and_then(non_blank) {
            self.username = v;
        }

        if let Some(v) = var("APP__PLAYER_COLOR") {
            if let Ok(parsed) = v.parse::<Color>() {
                self.player_color = parsed;
            }
        }
        if let Some(v) = var("APP__TIME_CONTROL") {
            if let Ok(parsed) = v.parse::<TimeControl>() {
                self.time_control = parsed;
            }
        }

        if let Some(v) = var("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }

    pub(crate) fn apply_overrides(&mut self, overrides: Overrides) {
        if let Some(v) = overrides.server_url {
            self.server_url = v;
        }
        if let Some(v) = overrides.username.as_deref().and_then(non_blank) {
            self.username = v;
        }
        if let Some(v) = overrides.player_color {
            self.player_color = v;
        }
        if let Some(v) = overrides.time_control {
            self.time_control = v;
        }
    }
}

/// Blank names are ignored; the previous value stays.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
