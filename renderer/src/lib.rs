//! Turns a decoded map, and optionally a path, into a PNG.

#[macro_use]
extern crate serde_derive;

use std::collections::BTreeSet;
use std::io::Cursor;

use decoder::{Map, Path};
use image::{DynamicImage, ImageOutputFormat, RgbImage, RgbaImage};
use log::debug;

mod errors;
pub mod map_raster;
pub mod palette;
pub mod path_layer;
pub mod viewport;

pub use crate::errors::{RenderError, Result};
pub use crate::palette::{Palette, RoomColors};
pub use crate::path_layer::PATH_SCALE;
pub use crate::viewport::Viewport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub viewport: Option<Viewport>,
    pub room_colors: RoomColors,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub width: u32,
    pub height: u32,
    /// Pixel codes drawn with the sentinel colour.
    pub unknown_codes: BTreeSet<u8>,
    /// Declared and decoded point counts of the rendered path.
    pub path_counts: Option<(usize, usize)>,
}

pub struct Rendered {
    pub png: Vec<u8>,
    pub report: RenderReport,
}

/// Upscale the map raster to the path layer's resolution and draw the layer
/// over it.
pub fn compose(map_raster: &RgbImage, path_layer: &RgbaImage) -> RgbaImage {
    let mut canvas = RgbaImage::from_fn(
        map_raster.width() * PATH_SCALE,
        map_raster.height() * PATH_SCALE,
        |x, y| {
            let [r, g, b] = map_raster.get_pixel(x / PATH_SCALE, y / PATH_SCALE).0;
            image::Rgba([r, g, b, 255])
        },
    );
    image::imageops::overlay(&mut canvas, path_layer, 0, 0);
    canvas
}

/// Render to an in-memory image without encoding it.
pub fn render_image(
    map: &Map,
    path: Option<&Path>,
    options: &RenderOptions,
) -> Result<(RgbaImage, RenderReport)> {
    let header = map.header();
    let palette = Palette::with_room_colors(&options.room_colors)?;

    let (map_raster, unknown_codes) = map_raster::render_map(map, &palette);
    let layer = path_layer::render_path(
        path,
        header.origin,
        header.width.into(),
        header.height.into(),
    )?;
    let mut image = compose(&map_raster, &layer);

    if let Some(viewport) = &options.viewport {
        image = viewport::crop(&image, header.origin, viewport)?;
    }

    let report = RenderReport {
        width: image.width(),
        height: image.height(),
        unknown_codes,
        path_counts: path.map(|path| (path.start_count(), path.current_count())),
    };
    debug!("rendered map {}: {:?}", header.id, report);

    Ok((image, report))
}

/// Render and encode as PNG.
pub fn render(map: &Map, path: Option<&Path>, options: &RenderOptions) -> Result<Rendered> {
    let (image, report) = render_image(map, path, options)?;

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

    Ok(Rendered { png, report })
}
