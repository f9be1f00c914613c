//! Threshold configuration

use crate::ThresholdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in alert timbres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSound {
    /// Two short sine beeps
    #[default]
    Default,
    /// Three ascending tones
    Chime,
    /// Fundamental with decaying harmonics
    Bell,
    /// Sawtooth sweeps
    Siren,
}

impl AlertSound {
    /// All timbres, in settings-menu order
    pub const ALL: [AlertSound; 4] = [
        AlertSound::Default,
        AlertSound::Chime,
        AlertSound::Bell,
        AlertSound::Siren,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSound::Default => "default",
            AlertSound::Chime => "chime",
            AlertSound::Bell => "bell",
            AlertSound::Siren => "siren",
        }
    }
}

impl fmt::Display for AlertSound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSound {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AlertSound::ALL
            .into_iter()
            .find(|sound| sound.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ThresholdError::UnknownSound(name.to_string()))
    }
}

/// Alert thresholds and sound preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    /// Minimum acceptable temperature (°C)
    pub temp_min: f64,
    /// Maximum acceptable temperature (°C)
    pub temp_max: f64,
    /// Minimum acceptable relative humidity (%)
    pub humidity_min: f64,
    /// Maximum acceptable relative humidity (%)
    pub humidity_max: f64,
    /// Maximum acceptable air quality reading (ppm)
    pub air_max: f64,
    /// Timbre used for alert and background sounds
    #[serde(default)]
    pub alert_sound: AlertSound,
    /// Play heartbeat loops for cards in warning/critical state
    #[serde(default = "enabled")]
    pub heartbeat_sound: bool,
    /// Play the configured timbre on repeat while a metric is alerting
    #[serde(default = "enabled")]
    pub background_alert_sound: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            temp_min: 15.0,
            temp_max: 35.0,
            humidity_min: 30.0,
            humidity_max: 80.0,
            air_max: 600.0,
            alert_sound: AlertSound::Default,
            heartbeat_sound: true,
            background_alert_sound: true,
        }
    }
}

impl ThresholdConfig {
    /// Midpoint of the temperature band
    pub fn temp_midpoint(&self) -> f64 {
        (self.temp_max + self.temp_min) / 2.0
    }

    /// Midpoint of the humidity band
    pub fn humidity_midpoint(&self) -> f64 {
        (self.humidity_max + self.humidity_min) / 2.0
    }

    /// Check that every bound is finite and each band is ordered
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let fields = [
            ("tempMin", self.temp_min),
            ("tempMax", self.temp_max),
            ("humidityMin", self.humidity_min),
            ("humidityMax", self.humidity_max),
            ("airMax", self.air_max),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ThresholdError::NotANumber {
                    field,
                    input: value.to_string(),
                });
            }
        }

        if self.temp_min > self.temp_max {
            return Err(ThresholdError::InvalidRange {
                metric: "temperature",
                min: self.temp_min,
                max: self.temp_max,
            });
        }
        if self.humidity_min > self.humidity_max {
            return Err(ThresholdError::InvalidRange {
                metric: "humidity",
                min: self.humidity_min,
                max: self.humidity_max,
            });
        }
        Ok(())
    }
}

/// Raw values as entered in the settings panel
#[derive(Debug, Clone, Default)]
pub struct SettingsForm {
    pub temp_min: String,
    pub temp_max: String,
    pub humidity_min: String,
    pub humidity_max: String,
    pub air_max: String,
    pub alert_sound: String,
    pub heartbeat_sound: bool,
    pub background_alert_sound: bool,
}

impl SettingsForm {
    /// Pre-fill the form from an existing configuration
    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self {
            temp_min: config.temp_min.to_string(),
            temp_max: config.temp_max.to_string(),
            humidity_min: config.humidity_min.to_string(),
            humidity_max: config.humidity_max.to_string(),
            air_max: config.air_max.to_string(),
            alert_sound: config.alert_sound.to_string(),
            heartbeat_sound: config.heartbeat_sound,
            background_alert_sound: config.background_alert_sound,
        }
    }
}

fn parse_number(field: &'static str, input: &str) -> Result<f64, ThresholdError> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ThresholdError::NotANumber {
            field,
            input: input.to_string(),
        }),
    }
}

impl TryFrom<&SettingsForm> for ThresholdConfig {
    type Error = ThresholdError;

    fn try_from(form: &SettingsForm) -> Result<Self, Self::Error> {
        let config = ThresholdConfig {
            temp_min: parse_number("tempMin", &form.temp_min)?,
            temp_max: parse_number("tempMax", &form.temp_max)?,
            humidity_min: parse_number("humidityMin", &form.humidity_min)?,
            humidity_max: parse_number("humidityMax", &form.humidity_max)?,
            air_max: parse_number("airMax", &form.air_max)?,
            alert_sound: form.alert_sound.parse()?,
            heartbeat_sound: form.heartbeat_sound,
            background_alert_sound: form.background_alert_sound,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SettingsForm {
        SettingsForm::from_config(&ThresholdConfig::default())
    }

    #[test]
    fn test_default_thresholds() {
        let config = ThresholdConfig::default();
        assert_eq!(config.temp_min, 15.0);
        assert_eq!(config.temp_max, 35.0);
        assert_eq!(config.humidity_min, 30.0);
        assert_eq!(config.humidity_max, 80.0);
        assert_eq!(config.air_max, 600.0);
        assert_eq!(config.alert_sound, AlertSound::Default);
        assert!(config.heartbeat_sound);
        assert!(config.background_alert_sound);
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = serde_json::to_value(ThresholdConfig::default()).unwrap();
        assert_eq!(json["tempMin"], 15.0);
        assert_eq!(json["airMax"], 600.0);
        assert_eq!(json["alertSound"], "default");
        assert_eq!(json["heartbeatSound"], true);
        assert_eq!(json["backgroundAlertSound"], true);
    }

    #[test]
    fn test_blob_without_background_flag() {
        let blob = r#"{"tempMin":10,"tempMax":30,"humidityMin":20,"humidityMax":70,
            "airMax":500,"alertSound":"bell","heartbeatSound":false}"#;
        let config: ThresholdConfig = serde_json::from_str(blob).unwrap();
        assert_eq!(config.alert_sound, AlertSound::Bell);
        assert!(!config.heartbeat_sound);
        assert!(config.background_alert_sound);
    }

    #[test]
    fn test_form_parses_numbers() {
        let mut form = form();
        form.temp_max = " 32.5 ".to_string();
        form.alert_sound = "Siren".to_string();
        let config = ThresholdConfig::try_from(&form).unwrap();
        assert_eq!(config.temp_max, 32.5);
        assert_eq!(config.alert_sound, AlertSound::Siren);
    }

    #[test]
    fn test_form_rejects_non_numeric() {
        let mut form = form();
        form.humidity_max = "abc".to_string();
        let err = ThresholdConfig::try_from(&form).unwrap_err();
        assert_eq!(
            err,
            ThresholdError::NotANumber {
                field: "humidityMax",
                input: "abc".to_string()
            }
        );

        form.humidity_max = "NaN".to_string();
        assert!(matches!(
            ThresholdConfig::try_from(&form),
            Err(ThresholdError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_form_rejects_inverted_band() {
        let mut form = form();
        form.temp_min = "40".to_string();
        assert!(matches!(
            ThresholdConfig::try_from(&form),
            Err(ThresholdError::InvalidRange { metric: "temperature", .. })
        ));
    }

    #[test]
    fn test_unknown_sound() {
        assert_eq!(
            "klaxon".parse::<AlertSound>(),
            Err(ThresholdError::UnknownSound("klaxon".to_string()))
        );
    }
}
