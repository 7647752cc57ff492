#![allow(dead_code)]

use async_trait::async_trait;
use ion_viewport::Result;
use ion_viewport::Viewport;
use ion_viewport::ViewportError;
use ion_viewport::ViewportSession;
use serde_json::Value;
use std::sync::Mutex;

/// What the measurement script sees when it runs in the fake page.
#[derive(Debug, Clone)]
pub enum PageModel {
    /// No `ion-content` on the page.
    NoContent,
    /// The page reports this value regardless of the viewport.
    Fixed(Value),
    /// `ion-content` fills the viewport and scrolls `height` pixels of content.
    Content { height: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Identity,
    Viewport,
    Evaluate,
    SetViewport(Viewport),
}

/// In-memory stand-in for a browser page.
pub struct FakeSession {
    user_agent: String,
    viewport: Mutex<Option<Viewport>>,
    page: PageModel,
    fail_on: Option<&'static str>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSession {
    pub fn new(user_agent: &str, viewport: Option<Viewport>, page: PageModel) -> Self {
        Self {
            user_agent: user_agent.to_string(),
            viewport: Mutex::new(viewport),
            page,
            fail_on: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make the named operation fail with a session error.
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn resizes(&self) -> Vec<Viewport> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SetViewport(viewport) => Some(viewport),
                _ => None,
            })
            .collect()
    }

    pub fn current_viewport(&self) -> Option<Viewport> {
        *self.viewport.lock().expect("viewport lock")
    }

    fn record(&self, call: Call, op: &'static str) -> Result<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.fail_on == Some(op) {
            return Err(ViewportError::Session(format!("{op} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl ViewportSession for FakeSession {
    async fn identity(&self) -> Result<String> {
        self.record(Call::Identity, "identity")?;
        Ok(self.user_agent.clone())
    }

    async fn viewport(&self) -> Result<Option<Viewport>> {
        self.record(Call::Viewport, "viewport")?;
        Ok(self.current_viewport())
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.record(Call::Evaluate, "evaluate")?;
        assert!(script.contains("ion-content"), "unexpected script: {script}");
        Ok(match &self.page {
            PageModel::NoContent => Value::from(0),
            PageModel::Fixed(value) => value.clone(),
            PageModel::Content { height } => {
                let client = self.current_viewport().map_or(480, |v| i64::from(v.height));
                Value::from((*height).max(client) - client)
            }
        })
    }

    async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
        self.record(Call::SetViewport(viewport), "set_viewport")?;
        *self.viewport.lock().expect("viewport lock") = Some(viewport);
        Ok(())
    }
}
