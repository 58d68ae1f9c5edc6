use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Border outline used by the rasterizers: a full pill (semicircular ends)
/// or a rounded rectangle with a fractional corner radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeSetting {
    Pill,
    RoundedRect,
}

impl Default for ShapeSetting {
    fn default() -> Self {
        Self::Pill
    }
}

impl fmt::Display for ShapeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeSetting::Pill => f.write_str("pill"),
            ShapeSetting::RoundedRect => f.write_str("rounded-rect"),
        }
    }
}

pub fn parse_shape(raw: &str) -> Result<ShapeSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "pill" => Ok(ShapeSetting::Pill),
        "rounded-rect" | "rounded" | "rect" => Ok(ShapeSetting::RoundedRect),
        other => Err(format!(
            "invalid shape '{other}'; expected 'pill' or 'rounded-rect'"
        )),
    }
}

/// Parameters for one glass filter (optics solver + rasterizers + assembler).
///
/// Every field is optional in TOML and falls back to the assembler defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    pub glass_thickness: f32,
    pub bezel_width: f32,
    pub refractive_index: f32,
    pub blur: f32,
    pub scale_ratio: f32,
    pub specular_opacity: f32,
    pub specular_saturation: f32,
    pub shape: ShapeSetting,
    pub corner_radius: f32,
    pub samples: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            glass_thickness: 120.0,
            bezel_width: 30.0,
            refractive_index: 1.5,
            blur: 0.3,
            scale_ratio: 1.0,
            specular_opacity: 0.4,
            specular_saturation: 4.0,
            shape: ShapeSetting::Pill,
            corner_radius: 0.5,
            samples: 128,
        }
    }
}

impl FilterSettings {
    pub fn validate(&self, context: &str) -> Result<(), ConfigError> {
        if self.glass_thickness <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{context}: glass_thickness must be > 0"
            )));
        }
        if self.bezel_width <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{context}: bezel_width must be > 0"
            )));
        }
        if self.refractive_index <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "{context}: refractive_index must be > 0"
            )));
        }
        if !(0.0..=1.0).contains(&self.corner_radius) {
            return Err(ConfigError::Invalid(format!(
                "{context}: corner_radius must lie in [0, 1]"
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::Invalid(format!(
                "{context}: samples must be > 0"
            )));
        }
        Ok(())
    }
}

/// Geometry preset for a nav bar instance. The stock preset matches the
/// reference "medium" bar; TOML may override any field.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SizePreset {
    pub height: f32,
    pub item_width: f32,
    pub thumb_height: f32,
    pub thumb_bezel: f32,
    pub background_bezel: f32,
    pub thumb_glass_thickness: f32,
    pub font_size: String,
    pub icon_size: f32,
    pub thumb_scale: f32,
    pub thumb_scale_y: f32,
}

impl SizePreset {
    pub fn medium() -> Self {
        Self {
            height: 54.0,
            item_width: 80.0,
            thumb_height: 50.0,
            thumb_bezel: 8.0,
            background_bezel: 30.0,
            thumb_glass_thickness: 110.0,
            font_size: "0.57rem".to_string(),
            icon_size: 20.0,
            thumb_scale: 1.3,
            thumb_scale_y: 1.1,
        }
    }

    /// Thumb width leaves a 2px inset on each side of an item slot.
    pub fn thumb_width(&self) -> f32 {
        self.item_width - 4.0
    }
}

impl Default for SizePreset {
    fn default() -> Self {
        Self::medium()
    }
}

/// Timers owned by the thumb controller's state machine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Timing {
    /// How long the enlarged "glass" emphasis window stays visible after an
    /// interaction before the thumb relaxes back.
    #[serde(
        default = "default_glass_hide",
        deserialize_with = "deserialize_duration"
    )]
    pub glass_hide: Duration,
    /// Delay between committing a selection and following its link, so the
    /// settle animation is visible before navigation.
    #[serde(
        default = "default_navigate_delay",
        deserialize_with = "deserialize_duration"
    )]
    pub navigate_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            glass_hide: default_glass_hide(),
            navigate_delay: default_navigate_delay(),
        }
    }
}

fn default_glass_hide() -> Duration {
    Duration::from_millis(280)
}

fn default_navigate_delay() -> Duration {
    Duration::from_millis(200)
}

/// One nav destination as declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavItemConfig {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_href")]
    pub href: String,
}

fn default_href() -> String {
    "#".to_string()
}

/// Root configuration for a nav bar: the item set plus optional overrides
/// for geometry, timing, and the two per-bar filters.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavConfig {
    pub version: u32,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub preset: SizePreset,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<FilterSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<FilterSettings>,
    #[serde(default)]
    pub items: Vec<NavItemConfig>,
}

impl NavConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: NavConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.preset.item_width <= 0.0 || self.preset.height <= 0.0 {
            return Err(ConfigError::Invalid(
                "preset dimensions must be greater than zero".into(),
            ));
        }

        if self.preset.thumb_width() <= 0.0 {
            return Err(ConfigError::Invalid(
                "preset item_width leaves no room for the thumb".into(),
            ));
        }

        for item in &self.items {
            if item.id.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "nav item with empty id".into(),
                ));
            }
            let duplicates = self
                .items
                .iter()
                .filter(|other| other.id == item.id)
                .count();
            if duplicates > 1 {
                return Err(ConfigError::Invalid(format!(
                    "duplicate nav item id '{}'",
                    item.id
                )));
            }
        }

        if let Some(active) = &self.active {
            if !self.items.iter().any(|item| &item.id == active) {
                return Err(ConfigError::Invalid(format!(
                    "active references unknown item id '{active}'"
                )));
            }
        }

        if let Some(background) = &self.background {
            background.validate("background filter")?;
        }
        if let Some(thumb) = &self.thumb {
            thumb.validate("thumb filter")?;
        }

        Ok(())
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1
active = "home"

[preset]
item_width = 96

[timing]
glass_hide = "350ms"
navigate_delay = "150ms"

[thumb]
bezel_width = 10
specular_saturation = 12

[[items]]
id = "home"
label = "Home"
href = "/home"

[[items]]
id = "search"
label = "Search"

[[items]]
id = "profile"
label = "Profile"
href = "/profile"
"#;

    #[test]
    fn parses_sample_config() {
        let config = NavConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.active.as_deref(), Some("home"));
        assert_eq!(config.preset.item_width, 96.0);
        assert_eq!(config.preset.height, 54.0, "unset preset fields keep medium defaults");
        assert_eq!(config.timing.glass_hide, Duration::from_millis(350));
        assert_eq!(config.items.len(), 3);
        assert_eq!(config.items[1].href, "#", "missing href defaults to inert");
        let thumb = config.thumb.expect("thumb override");
        assert_eq!(thumb.bezel_width, 10.0);
        assert_eq!(thumb.specular_saturation, 12.0);
        assert_eq!(thumb.refractive_index, 1.5, "unset filter fields keep defaults");
    }

    #[test]
    fn rejects_unknown_active_id() {
        let config = r#"
version = 1
active = "missing"

[[items]]
id = "home"
label = "Home"
"#;
        let err = NavConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_item_ids() {
        let config = r#"
version = 1

[[items]]
id = "home"
label = "Home"

[[items]]
id = "home"
label = "Also Home"
"#;
        let err = NavConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_version() {
        let err = NavConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn numeric_durations_are_seconds() {
        let config = NavConfig::from_toml_str(
            r#"
version = 1

[timing]
glass_hide = 1
"#,
        )
        .unwrap();
        assert_eq!(config.timing.glass_hide, Duration::from_secs(1));
        assert_eq!(
            config.timing.navigate_delay,
            Duration::from_millis(200),
            "unset timing keeps defaults"
        );
    }

    #[test]
    fn filter_settings_default_matches_assembler_contract() {
        let settings = FilterSettings::default();
        assert_eq!(settings.glass_thickness, 120.0);
        assert_eq!(settings.bezel_width, 30.0);
        assert_eq!(settings.refractive_index, 1.5);
        assert_eq!(settings.samples, 128);
        assert_eq!(settings.shape, ShapeSetting::Pill);
        settings.validate("defaults").expect("defaults validate");
    }

    #[test]
    fn shape_parser_accepts_aliases() {
        assert_eq!(parse_shape("pill").unwrap(), ShapeSetting::Pill);
        assert_eq!(parse_shape("Rounded-Rect").unwrap(), ShapeSetting::RoundedRect);
        assert_eq!(parse_shape("rect").unwrap(), ShapeSetting::RoundedRect);
        assert!(parse_shape("blob").is_err());
    }

    #[test]
    fn empty_item_list_parses() {
        let config = NavConfig::from_toml_str("version = 1").expect("parse");
        assert!(config.items.is_empty());
    }
}
