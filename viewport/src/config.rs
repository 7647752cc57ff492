use crate::Result;
use crate::ViewportError;
use crate::session::Viewport;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Mode code of the Material Design theme.
pub const MATERIAL_THEME: &str = "md";

/// Material Design mode crops full-page screenshots of mobile Chrome on
/// Linux by roughly this many pixels. Measured, not derived.
pub const MATERIAL_CROP_CORRECTION_PX: i64 = 80;

/// User agents that show the Material Design crop.
pub const QUIRK_USER_AGENT_PATTERN: &str = "Linux|Chrome";

/// Base size used when the engine cannot report the current viewport.
pub const FALLBACK_VIEWPORT: Viewport = Viewport::new(640, 480);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionConfig {
    #[serde(default = "default_material_theme")]
    pub material_theme: String,

    #[serde(default = "default_material_crop_correction_px")]
    pub material_crop_correction_px: i64,

    /// Regex matched (case-sensitive) against the device profile's user agent.
    #[serde(default = "default_quirk_user_agent_pattern")]
    pub quirk_user_agent_pattern: String,

    #[serde(default = "default_fallback_viewport")]
    pub fallback_viewport: Viewport,

    /// Never shrink below the viewport the correction started from.
    #[serde(default = "default_clamp_to_original")]
    pub clamp_to_original: bool,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            material_theme: default_material_theme(),
            material_crop_correction_px: default_material_crop_correction_px(),
            quirk_user_agent_pattern: default_quirk_user_agent_pattern(),
            fallback_viewport: default_fallback_viewport(),
            clamp_to_original: default_clamp_to_original(),
        }
    }
}

impl CorrectionConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| ViewportError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

fn default_material_theme() -> String {
    MATERIAL_THEME.to_string()
}

fn default_material_crop_correction_px() -> i64 {
    MATERIAL_CROP_CORRECTION_PX
}

fn default_quirk_user_agent_pattern() -> String {
    QUIRK_USER_AGENT_PATTERN.to_string()
}

fn default_fallback_viewport() -> Viewport {
    FALLBACK_VIEWPORT
}

fn default_clamp_to_original() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = CorrectionConfig::from_toml_str("").expect("parse empty config");
        assert_eq!(config, CorrectionConfig::default());
        assert_eq!(config.material_crop_correction_px, 80);
        assert_eq!(config.fallback_viewport, Viewport::new(640, 480));
    }

    #[test]
    fn overrides_are_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(
            file,
            r#"
material_crop_correction_px = 96
clamp_to_original = false

[fallback_viewport]
width = 800
height = 600
"#
        )
        .expect("write config");

        let config = CorrectionConfig::load(file.path()).expect("load config");
        assert_eq!(config.material_crop_correction_px, 96);
        assert!(!config.clamp_to_original);
        assert_eq!(config.fallback_viewport, Viewport::new(800, 600));
        assert_eq!(config.material_theme, "md");
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = CorrectionConfig::from_toml_str("clamp_to_original = \"yes\"")
            .expect_err("string is not a bool");
        assert!(matches!(err, ViewportError::Config(_)));
    }
}
