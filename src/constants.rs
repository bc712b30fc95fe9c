//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "PCB Preview";

/// The binary name of the application.
pub const APP_BINARY_NAME: &str = "pcbpreview";

/// Rendered image width in pixels; height follows the board aspect ratio.
pub const RENDER_WIDTH_PX: u32 = 1024;

/// Canvas margin around the board outline, in millimeters.
pub const RENDER_MARGIN_MM: f64 = 2.0;
