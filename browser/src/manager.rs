use crate::BrowserError;
use crate::Result;
use crate::config::BrowserConfig;
use crate::page::Page;
use crate::page::SetViewportParams;
use chromiumoxide::Browser;
use chromiumoxide::BrowserConfig as CdpConfig;
use chromiumoxide::browser::HeadlessMode;
use futures::StreamExt;
use ion_viewport::DeviceCatalog;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Owns the Chrome connection and hands out pages set up for the
/// configured device.
pub struct BrowserManager {
    pub config: BrowserConfig,
    catalog: DeviceCatalog,
    browser: Arc<Mutex<Option<Browser>>>,
    event_task: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl BrowserManager {
    pub fn new(config: BrowserConfig, catalog: DeviceCatalog) -> Self {
        Self {
            config,
            catalog,
            browser: Arc::new(Mutex::new(None)),
            event_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Manager over the bundled device catalog.
    pub fn with_bundled_devices(config: BrowserConfig) -> Result<Self> {
        let catalog = DeviceCatalog::bundled_shared()
            .map_err(|e| BrowserError::ConfigError(format!("bundled device catalog: {e}")))?;
        Ok(Self::new(config, catalog.clone()))
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub async fn start(&self) -> Result<()> {
        if self.browser.lock().await.is_some() {
            return Ok(());
        }

        let (browser, mut handler) = match self.config.connect_ws.clone() {
            Some(ws) => self.connect(ws).await?,
            None => self.launch().await?,
        };

        let task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });
        *self.event_task.lock().await = Some(task);
        *self.browser.lock().await = Some(browser);
        Ok(())
    }

    async fn connect(&self, ws: String) -> Result<(Browser, chromiumoxide::handler::Handler)> {
        info!("Connecting to Chrome via WebSocket: {}", ws);
        let attempt_timeout = Duration::from_millis(self.config.connect_attempt_timeout_ms);
        let attempts = self.config.connect_attempts.max(1);
        let mut last_err: Option<String> = None;

        for attempt in 1..=attempts {
            debug!(
                "WS connect attempt {}/{} (timeout={}ms)",
                attempt,
                attempts,
                attempt_timeout.as_millis()
            );
            match tokio::time::timeout(attempt_timeout, Browser::connect(ws.clone())).await {
                Ok(Ok(connected)) => {
                    info!("WS connect attempt {} succeeded", attempt);
                    return Ok(connected);
                }
                Ok(Err(e)) => {
                    let msg = format!("CDP WebSocket connect failed: {e}");
                    warn!("{}", msg);
                    last_err = Some(msg);
                }
                Err(_) => {
                    warn!(
                        "WS connect attempt {} timed out after {}ms",
                        attempt,
                        attempt_timeout.as_millis()
                    );
                }
            }
            sleep(Duration::from_millis(200)).await;
        }

        let base = "CDP WebSocket connect failed after all attempts".to_string();
        let msg = match last_err {
            Some(e) => format!("{base}: {e}"),
            None => base,
        };
        Err(BrowserError::CdpError(msg))
    }

    async fn launch(&self) -> Result<(Browser, chromiumoxide::handler::Handler)> {
        info!("Launching new browser instance");
        let mut builder = CdpConfig::builder();

        if let Some(dir) = &self.config.user_data_dir {
            builder = builder.user_data_dir(dir.clone());
        }

        builder = if self.config.headless {
            builder.headless_mode(HeadlessMode::New)
        } else {
            builder.with_head()
        };

        builder = builder
            .window_size(self.config.viewport.width, self.config.viewport.height)
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--hide-scrollbars")
            .arg("--disable-background-networking")
            .arg("--disable-background-timer-throttling")
            .request_timeout(Duration::from_millis(self.config.request_timeout_ms));

        let browser_config = builder.build().map_err(BrowserError::CdpError)?;
        Browser::launch(browser_config).await.map_err(|e| {
            #[cfg(target_os = "macos")]
            let hint = "Ensure Google Chrome or Chromium is installed and runnable (e.g., /Applications/Google Chrome.app).";
            #[cfg(target_os = "linux")]
            let hint = "Ensure google-chrome or chromium is installed and available on PATH.";
            #[cfg(target_os = "windows")]
            let hint = "Ensure Chrome is installed and chrome.exe is available (typically in Program Files).";
            #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
            let hint = "Ensure Chrome/Chromium is installed and available on PATH.";
            BrowserError::CdpError(format!("Failed to launch browser: {e}. Hint: {hint}"))
        })
    }

    /// Open a blank tab with the configured device (or user agent and
    /// viewport) applied.
    pub async fn new_page(&self) -> Result<Page> {
        let profile = match &self.config.device {
            Some(name) => Some(self.catalog.get(name).ok_or_else(|| {
                BrowserError::ConfigError(format!("unknown device {name:?}"))
            })?),
            None => None,
        };

        self.start().await?;

        let cdp_page = {
            let guard = self.browser.lock().await;
            let browser = guard.as_ref().ok_or(BrowserError::NotInitialized)?;
            browser.new_page("about:blank").await?
        };
        let page = Page::new(cdp_page, self.config.clone());

        if let Some(profile) = profile {
            info!("Emulating device with user agent {:?}", profile.user_agent);
            page.emulate_device(profile).await?;
            return Ok(page);
        }

        if let Some(user_agent) = &self.config.user_agent {
            page.set_user_agent(user_agent).await?;
        }
        let viewport = self.config.viewport;
        page.set_viewport(SetViewportParams {
            width: viewport.width,
            height: viewport.height,
            device_scale_factor: Some(viewport.device_scale_factor),
            mobile: Some(viewport.mobile),
        })
        .await?;
        Ok(page)
    }

    pub async fn stop(&self) -> Result<()> {
        if let Some(task) = self.event_task.lock().await.take() {
            task.abort();
        }

        let mut browser_guard = self.browser.lock().await;
        if let Some(mut browser) = browser_guard.take() {
            if self.config.is_external() {
                info!("Disconnecting from external Chrome (not closing it)");
            } else {
                info!("Stopping browser we launched");
                browser.close().await?;
            }
        }
        Ok(())
    }
}
