//! Platform abstraction layer
//!
//! Host bridges around the simulation core:
//! - `web`: wasm-bindgen handle driven by a browser frame loop
//!
//! The native host is the headless runner in `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::error::ConfigError;
use crate::sim::GameMode;

/// Parse a host-supplied mode name, defaulting to timed for unknown values
pub fn parse_mode(name: &str) -> GameMode {
    GameMode::from_str(name).unwrap_or_else(|| {
        log::warn!("Unknown game mode '{}', using timed", name);
        GameMode::Timed
    })
}

/// Settings from an optional JSON blob handed over by the host
pub fn settings_from_host(json: Option<&str>) -> Result<crate::Settings, ConfigError> {
    match json {
        Some(json) if !json.trim().is_empty() => crate::Settings::from_json(json),
        _ => Ok(crate::Settings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_falls_back() {
        assert_eq!(parse_mode("survival"), GameMode::Survival);
        assert_eq!(parse_mode("zen"), GameMode::Timed);
    }

    #[test]
    fn test_settings_from_host() {
        assert_eq!(settings_from_host(None).unwrap().max_lives, 5);
        assert_eq!(settings_from_host(Some("  ")).unwrap().max_lives, 5);
        assert!(settings_from_host(Some("{oops")).is_err());
    }
}
