use ion_viewport::DeviceProfile;
use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_viewport")]
    pub viewport: ViewportConfig,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Catalog name of the device to emulate, e.g. "Pixel 5". Its user
    /// agent and metrics take precedence over `user_agent` and `viewport`.
    #[serde(default)]
    pub device: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>, // leave None to let Chrome decide

    /// Connect to an already-running Chrome DevTools WS endpoint
    /// e.g. ws://127.0.0.1:9222/devtools/browser/XXXXXXXX
    #[serde(default)]
    pub connect_ws: Option<String>,

    /// Use a persistent profile instead of Chrome's default temp profile.
    #[serde(default)]
    pub user_data_dir: Option<PathBuf>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Per-attempt timeout for WS connect to Chrome (milliseconds)
    #[serde(default = "default_connect_attempt_timeout_ms")]
    pub connect_attempt_timeout_ms: u64,

    /// Number of WS connect attempts before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            viewport: default_viewport(),
            headless: default_headless(),
            device: None,
            user_agent: None,
            connect_ws: None,
            user_data_dir: None,
            request_timeout_ms: default_request_timeout_ms(),
            connect_attempt_timeout_ms: default_connect_attempt_timeout_ms(),
            connect_attempts: default_connect_attempts(),
        }
    }
}

impl BrowserConfig {
    pub fn is_external(&self) -> bool {
        self.connect_ws.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,

    #[serde(default = "default_device_scale_factor")]
    pub device_scale_factor: f64,

    #[serde(default)]
    pub mobile: bool,
}

impl ViewportConfig {
    /// Metrics a device profile asks for. `None` when it declares no viewport.
    pub fn from_profile(profile: &DeviceProfile) -> Option<Self> {
        let viewport = profile.viewport?;
        Some(Self {
            width: viewport.width,
            height: viewport.height,
            device_scale_factor: profile
                .device_scale_factor
                .unwrap_or_else(default_device_scale_factor),
            mobile: profile.is_mobile,
        })
    }
}

fn default_viewport() -> ViewportConfig {
    ViewportConfig {
        width: 1280,
        height: 720,
        device_scale_factor: 1.0,
        mobile: false,
    }
}

fn default_headless() -> bool {
    true
}

fn default_device_scale_factor() -> f64 {
    1.0
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_connect_attempt_timeout_ms() -> u64 {
    3000
}

fn default_connect_attempts() -> u32 {
    3
}
