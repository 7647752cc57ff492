use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

/// Size of the visible browsing area in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Per-test metadata supplied by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Mode code of the active theme, e.g. `"ios"` or `"md"`.
    #[serde(alias = "mode")]
    pub theme: String,
}

impl RunContext {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

/// The slice of a live page the correction needs.
///
/// Implemented by the Chrome backend; tests substitute an in-memory fake.
#[async_trait]
pub trait ViewportSession: Send + Sync {
    /// User agent the session reports.
    async fn identity(&self) -> Result<String>;

    /// Current viewport, or `None` when the engine does not know it.
    async fn viewport(&self) -> Result<Option<Viewport>>;

    /// Evaluate `script` in the page and return its JSON result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    async fn set_viewport(&self, viewport: Viewport) -> Result<()>;
}
