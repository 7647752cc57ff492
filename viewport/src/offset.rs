use crate::Result;
use crate::ViewportError;
use crate::config::CorrectionConfig;
use crate::device::DeviceCatalog;
use crate::device::DeviceProfile;
use crate::resolver::DeviceResolver;
use crate::session::RunContext;
use crate::session::ViewportSession;
use regex::Regex;
use tracing::debug;

/// Emulated mobile devices report a viewport shorter than their screen; the
/// browser chrome lives in the difference. Full-page screenshots are cut by
/// that amount unless the viewport is grown to cover it.
#[derive(Debug, Clone)]
pub struct OffsetCalculator {
    catalog: DeviceCatalog,
    material_theme: String,
    material_crop_correction_px: i64,
    quirk_user_agent: Regex,
    fallback_height: u32,
}

impl OffsetCalculator {
    pub fn new(catalog: DeviceCatalog, config: &CorrectionConfig) -> Result<Self> {
        let quirk_user_agent = Regex::new(&config.quirk_user_agent_pattern).map_err(|e| {
            ViewportError::Config(format!(
                "invalid quirk_user_agent_pattern {:?}: {e}",
                config.quirk_user_agent_pattern
            ))
        })?;
        Ok(Self {
            catalog,
            material_theme: config.material_theme.clone(),
            material_crop_correction_px: config.material_crop_correction_px,
            quirk_user_agent,
            fallback_height: config.fallback_viewport.height,
        })
    }

    pub fn catalog(&self) -> &DeviceCatalog {
        &self.catalog
    }

    pub fn resolver(&self) -> DeviceResolver<'_> {
        DeviceResolver::new(&self.catalog)
    }

    /// Offset for a resolved profile. Profiles without a screen need none.
    pub fn offset_for(&self, profile: &DeviceProfile, viewport_height: u32, theme: &str) -> i64 {
        let Some(screen) = profile.screen else {
            return 0;
        };

        // Taken as-is; a screen shorter than the viewport yields a negative offset.
        let mut offset = i64::from(screen.height) - i64::from(viewport_height);

        if profile.is_mobile
            && theme == self.material_theme
            && self.quirk_user_agent.is_match(&profile.user_agent)
        {
            debug!(
                "Adding {}px material crop correction",
                self.material_crop_correction_px
            );
            offset += self.material_crop_correction_px;
        }

        offset
    }

    pub async fn compute_offset<S>(&self, session: &S, run: &RunContext) -> Result<i64>
    where
        S: ViewportSession + ?Sized,
    {
        let viewport_height = session
            .viewport()
            .await?
            .map_or(self.fallback_height, |viewport| viewport.height);
        let user_agent = session.identity().await?;

        let offset = self
            .resolver()
            .resolve(&user_agent)
            .map_or(0, |profile| self.offset_for(profile, viewport_height, &run.theme));
        debug!("Device offset for viewport height {viewport_height}: {offset}px");
        Ok(offset)
    }
}
