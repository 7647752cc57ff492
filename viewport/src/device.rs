use crate::Result;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Trimmed snapshot of Playwright's device descriptors.
const BUNDLED_DEVICES_JSON: &str = include_str!("data/devices.json");

static BUNDLED_CATALOG: OnceCell<DeviceCatalog> = OnceCell::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// One emulated device, in Playwright's descriptor shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub user_agent: String,

    /// Physical screen size. Absent for devices whose screen and viewport
    /// are not modelled separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<ScreenSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<ScreenSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_scale_factor: Option<f64>,

    #[serde(default)]
    pub is_mobile: bool,

    #[serde(default)]
    pub has_touch: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_browser_type: Option<String>,
}

impl DeviceProfile {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            screen: None,
            viewport: None,
            device_scale_factor: None,
            is_mobile: false,
            has_touch: false,
            default_browser_type: None,
        }
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = Some(ScreenSize { width, height });
        self
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some(ScreenSize { width, height });
        self
    }

    pub fn mobile(mut self, is_mobile: bool) -> Self {
        self.is_mobile = is_mobile;
        self
    }
}

/// Named device profiles. Iteration follows declaration order, which is
/// what breaks ties between several matching profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceCatalog {
    devices: IndexMap<String, DeviceProfile>,
}

impl DeviceCatalog {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DEVICES_JSON)
    }

    /// The bundled catalog, parsed on first use and shared afterwards.
    pub fn bundled_shared() -> Result<&'static Self> {
        BUNDLED_CATALOG.get_or_try_init(Self::bundled)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn with_device(mut self, name: impl Into<String>, profile: DeviceProfile) -> Self {
        self.devices.insert(name.into(), profile);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DeviceProfile> {
        self.devices.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DeviceProfile)> {
        self.devices.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl FromIterator<(String, DeviceProfile)> for DeviceCatalog {
    fn from_iter<I: IntoIterator<Item = (String, DeviceProfile)>>(iter: I) -> Self {
        Self {
            devices: iter.into_iter().collect(),
        }
    }
}
