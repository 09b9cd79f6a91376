//! Environment configuration, resolved once at startup.

use std::env;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Forces the plain pass-through sink even on a terminal.
    pub force_plain: bool,
    /// Explicit theme override (`dark` / `light`).
    pub theme_override: Option<String>,
    /// Raw `COLORFGBG` value for background detection.
    pub colorfgbg: Option<String>,
}

impl EnvConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            force_plain: env_flag("MDCHAT_PLAIN") || env::var_os("NO_COLOR").is_some(),
            theme_override: env_string_opt("MDCHAT_THEME"),
            colorfgbg: env_string_opt("COLORFGBG"),
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::EnvConfig;

    #[test]
    fn default_config_is_interactive_friendly() {
        let config = EnvConfig::default();
        assert!(!config.force_plain);
        assert!(config.theme_override.is_none());
        assert!(config.colorfgbg.is_none());
    }
}
