use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::color::{Rgb, parse_hex_color};
use crate::error::{Error, Result};
use crate::pattern::HeartPattern;
use crate::trigger::{LaunchPolicy, TriggerMode};

/// Runtime settings, loaded from an optional TOML file and overridden by flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub mode: TriggerMode,
    pub bg_color: String, // RRGGBB
    /// Opacity of the per-frame overlay; lower values leave longer trails.
    pub trail_alpha: f32,
    pub bulk_initial: usize,
    pub bulk_interval_ms: u64,
    pub burst_count: usize,
    pub burst_spacing_ms: u64,
    pub start_delay_ms: u64,
    pub scale: f32, // surface units per terminal pixel
    pub fps: u32,
    pub heart: HeartPattern,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: TriggerMode::Bulk,
            bg_color: "000000".to_string(),
            trail_alpha: 0.1,
            bulk_initial: 30,
            bulk_interval_ms: 200,
            burst_count: 5,
            burst_spacing_ms: 1000,
            start_delay_ms: 0,
            scale: 4.0,
            fps: 60,
            heart: HeartPattern::Ring,
            seed: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Checks value ranges the TOML types cannot express.
    pub fn validate(&self) -> Result<()> {
        if parse_hex_color(&self.bg_color).is_none() {
            return Err(Error::InvalidConfig(format!(
                "bg_color must be RRGGBB, got {:?}",
                self.bg_color
            )));
        }
        if !(self.trail_alpha > 0.0 && self.trail_alpha <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "trail_alpha must be in (0, 1], got {}",
                self.trail_alpha
            )));
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return Err(Error::InvalidConfig(format!("scale must be positive, got {}", self.scale)));
        }
        if self.fps == 0 {
            return Err(Error::InvalidConfig("fps must be at least 1".to_string()));
        }
        if self.bulk_interval_ms == 0 {
            return Err(Error::InvalidConfig("bulk_interval_ms must be positive".to_string()));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(Error::InvalidConfig(format!("unknown log level {:?}", self.log_level)));
        }
        Ok(())
    }

    pub fn background(&self) -> Rgb {
        parse_hex_color(&self.bg_color).unwrap_or((0, 0, 0))
    }

    pub fn launch_policy(&self) -> LaunchPolicy {
        LaunchPolicy {
            bulk_initial: self.bulk_initial,
            bulk_interval: Duration::from_millis(self.bulk_interval_ms),
            burst_count: self.burst_count,
            burst_spacing: Duration::from_millis(self.burst_spacing_ms),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.launch_policy(), LaunchPolicy::default());
        assert_eq!(config.background(), (0, 0, 0));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            mode = "burst"
            bg_color = "1a1b26"
            heart = "curve"
            seed = 7
            burst_count = 9
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, TriggerMode::Burst);
        assert_eq!(config.background(), (0x1a, 0x1b, 0x26));
        assert_eq!(config.heart, HeartPattern::Curve);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.burst_count, 9);
        assert_eq!(config.bulk_initial, 30);
        assert_eq!(config.trail_alpha, 0.1);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = Config::from_toml("colour = \"red\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad = [
            Config { trail_alpha: 0.0, ..Config::default() },
            Config { trail_alpha: 1.5, ..Config::default() },
            Config { fps: 0, ..Config::default() },
            Config { scale: -1.0, ..Config::default() },
            Config { bulk_interval_ms: 0, ..Config::default() },
            Config { bg_color: "nope".to_string(), ..Config::default() },
            Config { log_level: "loud".to_string(), ..Config::default() },
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{config:?}");
        }
    }

    #[test]
    fn test_frame_duration() {
        let config = Config { fps: 50, ..Config::default() };
        assert_eq!(config.frame_duration(), Duration::from_millis(20));
    }
}
