use crate::Result;
use crate::ViewportError;
use crate::config::CorrectionConfig;
use crate::device::DeviceCatalog;
use crate::offset::OffsetCalculator;
use crate::session::RunContext;
use crate::session::Viewport;
use crate::session::ViewportSession;
use once_cell::sync::OnceCell;
use tracing::debug;
use tracing::info;

/// Height of `ion-content`'s shadow `.inner-scroll` body that does not fit in
/// the host's client area, or 0 when the page has no `ion-content`.
pub const MEASURE_OVERFLOW_JS: &str = include_str!("js/measure_overflow.js");

static DEFAULT_CORRECTOR: OnceCell<ViewportCorrector> = OnceCell::new();

/// Grows the viewport so a full-page screenshot covers everything that
/// `ion-content` would otherwise keep scrolled out of view.
#[derive(Debug, Clone)]
pub struct ViewportCorrector {
    offsets: OffsetCalculator,
    fallback_viewport: Viewport,
    clamp_to_original: bool,
}

impl ViewportCorrector {
    pub fn new(catalog: DeviceCatalog, config: &CorrectionConfig) -> Result<Self> {
        Ok(Self {
            offsets: OffsetCalculator::new(catalog, config)?,
            fallback_viewport: config.fallback_viewport,
            clamp_to_original: config.clamp_to_original,
        })
    }

    /// Bundled device catalog and default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            DeviceCatalog::bundled_shared()?.clone(),
            &CorrectionConfig::default(),
        )
    }

    /// Process-wide [`Self::with_defaults`], built on first use.
    pub fn shared_default() -> Result<&'static Self> {
        DEFAULT_CORRECTOR.get_or_try_init(Self::with_defaults)
    }

    pub fn offsets(&self) -> &OffsetCalculator {
        &self.offsets
    }

    /// Measure, compute and resize. Returns the viewport that was submitted.
    pub async fn correct<S>(&self, session: &S, run: &RunContext) -> Result<Viewport>
    where
        S: ViewportSession + ?Sized,
    {
        let original = match session.viewport().await? {
            Some(viewport) => viewport,
            None => {
                debug!(
                    "No current viewport reported; assuming {}x{}",
                    self.fallback_viewport.width, self.fallback_viewport.height
                );
                self.fallback_viewport
            }
        };

        let overflow = measure_overflow(session).await?;
        let offset = self.offsets.compute_offset(session, run).await?;
        let corrected = Viewport::new(
            original.width,
            self.corrected_height(original, overflow, offset),
        );

        info!(
            "Correcting viewport {}x{} -> {}x{} (overflow {overflow}px, device offset {offset}px)",
            original.width, original.height, corrected.width, corrected.height
        );
        session.set_viewport(corrected).await?;
        Ok(corrected)
    }

    fn corrected_height(&self, original: Viewport, overflow: i64, offset: i64) -> u32 {
        let base = i64::from(original.height);
        let mut height = base.saturating_add(overflow).saturating_add(offset);
        if self.clamp_to_original {
            height = height.max(base);
        }
        u32::try_from(height.clamp(1, i64::from(u32::MAX))).unwrap_or(u32::MAX)
    }
}

/// Run [`MEASURE_OVERFLOW_JS`] and read its result as whole pixels.
pub async fn measure_overflow<S>(session: &S) -> Result<i64>
where
    S: ViewportSession + ?Sized,
{
    let value = session.evaluate(MEASURE_OVERFLOW_JS).await?;
    if let Some(px) = value.as_i64() {
        return Ok(px);
    }
    match value.as_f64() {
        Some(px) if px.is_finite() => Ok(px.round() as i64),
        _ => Err(ViewportError::InvalidMeasurement(value)),
    }
}

/// Correct `session` using the bundled device catalog and default settings.
pub async fn set_ion_viewport<S>(session: &S, run: &RunContext) -> Result<Viewport>
where
    S: ViewportSession + ?Sized,
{
    ViewportCorrector::shared_default()?.correct(session, run).await
}
