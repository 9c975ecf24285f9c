//! One-time font registration for the `ab_glyph` text backend.

use std::path::PathBuf;
use std::sync::OnceLock;

use plotters::style::{FontStyle, register_font};
use tracing::{debug, warn};

/// Family name charts draw text with.
pub(crate) const FAMILY: &str = "sans-serif";

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Registers the first loadable font from `paths`.
///
/// Runs once per process; later calls return the first outcome regardless of
/// the paths they pass.
pub(crate) fn ensure_font(paths: &[PathBuf]) -> bool {
    *FONT_READY.get_or_init(|| {
        for path in paths {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if register_font(FAMILY, FontStyle::Normal, bytes).is_ok() {
                debug!(path = %path.display(), "Registered chart font");
                return true;
            }
            warn!(path = %path.display(), "Font file could not be parsed");
        }
        warn!("No usable font found, charts will be drawn without labels");
        false
    })
}
