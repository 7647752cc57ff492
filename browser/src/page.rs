use crate::BrowserError;
use crate::Result;
use crate::config::BrowserConfig;
use crate::config::ViewportConfig;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::emulation::SetTouchEmulationEnabledParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::page::Page as CdpPage;
use ion_viewport::DeviceProfile;
use ion_viewport::Viewport;
use ion_viewport::ViewportSession;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use tracing::debug;

const VIEWPORT_PROBE_JS: &str =
    "(() => ({ w: (window.innerWidth|0), h: (window.innerHeight|0) }))()";

pub struct Page {
    cdp_page: Arc<CdpPage>,
    config: BrowserConfig,
    // Last device metrics override we applied; Chrome has no getter for it.
    metrics: Arc<Mutex<Option<ViewportConfig>>>,
    user_agent: Arc<RwLock<Option<String>>>,
}

impl Page {
    pub fn new(cdp_page: CdpPage, config: BrowserConfig) -> Self {
        Self {
            cdp_page: Arc::new(cdp_page),
            config,
            metrics: Arc::new(Mutex::new(None)),
            user_agent: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the document with `html`.
    pub async fn set_content(&self, html: &str) -> Result<()> {
        self.cdp_page.set_content(html).await?;
        Ok(())
    }

    pub async fn inject_js(&self, script: &str) -> Result<serde_json::Value> {
        let result = self.cdp_page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    pub async fn set_viewport(&self, viewport: SetViewportParams) -> Result<()> {
        self.apply_metrics(ViewportConfig {
            width: viewport.width,
            height: viewport.height,
            device_scale_factor: viewport.device_scale_factor.unwrap_or(1.0),
            mobile: viewport.mobile.unwrap_or(false),
        })
        .await
    }

    pub async fn set_user_agent(&self, user_agent: &str) -> Result<()> {
        let params = SetUserAgentOverrideParams::builder()
            .user_agent(user_agent)
            .build()
            .map_err(BrowserError::CdpError)?;
        self.cdp_page.execute(params).await?;
        *self.user_agent.write().await = Some(user_agent.to_string());
        Ok(())
    }

    /// Apply a catalog device: user agent, metrics and touch input.
    pub async fn emulate_device(&self, profile: &DeviceProfile) -> Result<()> {
        self.set_user_agent(&profile.user_agent).await?;
        if let Some(metrics) = ViewportConfig::from_profile(profile) {
            self.apply_metrics(metrics).await?;
        }
        self.cdp_page
            .execute(SetTouchEmulationEnabledParams::new(profile.has_touch))
            .await?;
        Ok(())
    }

    /// Measure the CSS viewport in the page. `None` if the page reports zero.
    pub async fn probe_viewport(&self) -> Result<Option<Viewport>> {
        let probe = self.inject_js(VIEWPORT_PROBE_JS).await?;
        Ok(parse_viewport_probe(&probe))
    }

    async fn apply_metrics(&self, metrics: ViewportConfig) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(metrics.width))
            .height(i64::from(metrics.height))
            .device_scale_factor(metrics.device_scale_factor)
            .mobile(metrics.mobile)
            .build()
            .map_err(|e| BrowserError::CdpError(format!("Failed to build viewport params: {e}")))?;
        debug!(
            "Applying device metrics override: {}x{} @ {} (mobile={})",
            metrics.width, metrics.height, metrics.device_scale_factor, metrics.mobile
        );
        self.cdp_page.execute(params).await?;
        *self.metrics.lock().await = Some(metrics);
        Ok(())
    }
}

fn parse_viewport_probe(probe: &serde_json::Value) -> Option<Viewport> {
    let width = probe.get("w").and_then(serde_json::Value::as_u64)?;
    let height = probe.get("h").and_then(serde_json::Value::as_u64)?;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Viewport::new(
        u32::try_from(width).ok()?,
        u32::try_from(height).ok()?,
    ))
}

#[async_trait]
impl ViewportSession for Page {
    async fn identity(&self) -> ion_viewport::Result<String> {
        if let Some(user_agent) = self.user_agent.read().await.clone() {
            return Ok(user_agent);
        }
        match self.inject_js("navigator.userAgent").await? {
            serde_json::Value::String(user_agent) => Ok(user_agent),
            other => Err(BrowserError::UnexpectedResult(other).into()),
        }
    }

    async fn viewport(&self) -> ion_viewport::Result<Option<Viewport>> {
        if let Some(metrics) = *self.metrics.lock().await {
            return Ok(Some(Viewport::new(metrics.width, metrics.height)));
        }
        Ok(self.probe_viewport().await?)
    }

    async fn evaluate(&self, script: &str) -> ion_viewport::Result<serde_json::Value> {
        Ok(self.inject_js(script).await?)
    }

    async fn set_viewport(&self, viewport: Viewport) -> ion_viewport::Result<()> {
        // Keep DPR and mobile emulation from the device we are emulating.
        let base = self.metrics.lock().await.unwrap_or(self.config.viewport);
        self.apply_metrics(ViewportConfig {
            width: viewport.width,
            height: viewport.height,
            ..base
        })
        .await?;
        Ok(())
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct SetViewportParams {
    pub width: u32,
    pub height: u32,
    pub device_scale_factor: Option<f64>,
    pub mobile: Option<bool>,
}
