//! Viewport correction for full-page screenshots of `ion-content` pages.
//!
//! Full-page screenshots only expand the document, not scrollable
//! containers inside it. `ion-content` scrolls inside its shadow root, so the
//! viewport has to be grown by the hidden overflow (plus a device-specific
//! offset for emulated mobile devices) before the screenshot is taken.

pub mod config;
pub mod corrector;
pub mod device;
pub mod offset;
pub mod resolver;
pub mod session;

pub use config::CorrectionConfig;
pub use corrector::MEASURE_OVERFLOW_JS;
pub use corrector::ViewportCorrector;
pub use corrector::set_ion_viewport;
pub use device::DeviceCatalog;
pub use device::DeviceProfile;
pub use device::ScreenSize;
pub use offset::OffsetCalculator;
pub use resolver::DeviceResolver;
pub use session::RunContext;
pub use session::Viewport;
pub use session::ViewportSession;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewportError {
    #[error("Session error: {0}")]
    Session(String),

    #[error("Overflow measurement returned a non-numeric value: {0}")]
    InvalidMeasurement(serde_json::Value),

    #[error("Invalid device catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewportError>;
