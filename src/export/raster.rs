/// Scene rasterization
///
/// Turns a [`Scene`] into PNG bytes with resvg. Fonts that cannot be
/// loaded are skipped; a label without glyphs is better than no export.

use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};
use std::path::PathBuf;
use std::sync::Arc;

use super::scene::Scene;
use crate::error::ExportError;
use crate::state::settings::{ExportSettings, Rgb};

/// Opaque background behind the board
pub const BACKGROUND: Rgb = Rgb::new(0x0f, 0x17, 0x2a);
/// Output pixels per layout pixel
pub const PIXEL_RATIO: f32 = 2.0;
/// Padding around the board, in layout pixels
pub const PADDING: f32 = 20.0;

/// Parameters for one rasterization
#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub background: Rgb,
    pub pixel_ratio: f32,
    pub padding: f32,
    /// Only system fonts; `font_files` are not attempted
    pub skip_fonts: bool,
    pub font_files: Vec<PathBuf>,
}

impl RasterOptions {
    /// The fixed export parameters plus the user's font settings
    pub fn for_export(settings: &ExportSettings) -> Self {
        Self {
            background: BACKGROUND,
            pixel_ratio: PIXEL_RATIO,
            padding: PADDING,
            skip_fonts: settings.skip_fonts,
            font_files: settings.font_files.clone(),
        }
    }

    /// Output size in pixels for a scene
    pub fn output_size(&self, scene: &Scene) -> (u32, u32) {
        let scale = |len: f32| ((len + 2.0 * self.padding) * self.pixel_ratio).ceil() as u32;
        (scale(scene.width), scale(scene.height))
    }
}

/// Build the font database used for labels
fn font_database(options: &RasterOptions) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    if !options.skip_fonts {
        for path in &options.font_files {
            if let Err(e) = db.load_font_file(path) {
                log::warn!("Skipping font {}: {}", path.display(), e);
            }
        }
    }

    if db.is_empty() {
        log::warn!("No fonts available; tier labels will be drawn without text");
    }
    db
}

/// Render the scene and encode it as PNG
pub fn rasterize(scene: &Scene, options: &RasterOptions) -> Result<Vec<u8>, ExportError> {
    let mut usvg_options = usvg::Options::default();
    usvg_options.fontdb = Arc::new(font_database(options));

    let tree = usvg::Tree::from_str(&scene.svg, &usvg_options)
        .map_err(|e| ExportError::Scene(e.to_string()))?;

    let (width, height) = options.output_size(scene);
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(ExportError::Surface { width, height })?;

    let bg = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, 255));

    let transform = tiny_skia::Transform::from_scale(options.pixel_ratio, options.pixel_ratio)
        .pre_translate(options.padding, options.padding);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Encode(e.to_string()))
}
