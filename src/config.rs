//! Startup configuration: a YAML settings document loaded once and passed
//! explicitly into the dispatcher and scheduler constructors.
//!
//! A missing or malformed document is fatal; the process prints the
//! diagnostic and exits rather than run with undefined settings.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

mod error;

pub use error::{Error, Result};

fn default_interval() -> u64 {
    20
}

/// Immutable settings value constructed once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Polling interval in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// `true`: one grouped message per entity class and poll cycle;
    /// `false`: one message per change event.
    #[serde(default)]
    pub group_events: bool,
    #[serde(default)]
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub discord: DiscordSettings,
    #[serde(default)]
    pub gotify: GotifySettings,
    #[serde(default)]
    pub ntfy: NtfySettings,
    #[serde(default)]
    pub pushbullet: PushbulletSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub chat_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscordSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GotifySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NtfySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "NtfySettings::default_server")]
    pub server: String,
    #[serde(default)]
    pub topic: String,
}

impl NtfySettings {
    fn default_server() -> String {
        "https://ntfy.sh".to_owned()
    }
}

impl Default for NtfySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            server: Self::default_server(),
            topic: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushbulletSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub api_key: String,
}

impl Settings {
    /// Loads and validates the settings document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the file cannot be read, [`Error::Parse`]
    /// if it is not valid YAML for this schema, and [`Error::Invalid`] if a
    /// value is out of range (e.g. a zero polling interval).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_yaml::from_str(&raw).map_err(Error::Parse)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Invalid(
                "interval_secs must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Names of the enabled transports, for the startup notification.
    pub fn enabled_transports(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.telegram.enabled {
            names.push("telegram");
        }
        if self.discord.enabled {
            names.push("discord");
        }
        if self.gotify.enabled {
            names.push("gotify");
        }
        if self.ntfy.enabled {
            names.push("ntfy");
        }
        if self.pushbullet.enabled {
            names.push("pushbullet");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_full_document() {
        let yaml = "\
interval_secs: 30
group_events: true
telegram:
  enabled: true
  token: \"123:abc\"
  chat_id: \"-100200300\"
ntfy:
  enabled: true
  topic: \"homelab\"
";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        settings.validate().unwrap();

        assert_eq!(settings.interval_secs, 30);
        assert!(settings.group_events);
        assert!(settings.telegram.enabled);
        assert_eq!(settings.telegram.chat_id, "-100200300");
        assert_eq!(settings.ntfy.server, "https://ntfy.sh");
        assert_eq!(settings.ntfy.topic, "homelab");
        assert!(!settings.discord.enabled);
        assert_eq!(settings.enabled_transports(), vec!["telegram", "ntfy"]);
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.interval_secs, 20);
        assert!(!settings.group_events);
        assert!(settings.enabled_transports().is_empty());
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let settings: Settings = serde_yaml::from_str("interval_secs: 0").unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: std::result::Result<Settings, _> =
            serde_yaml::from_str("poll_interval: 20");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = Settings::load("/definitely/does/not/exist.yml").unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
