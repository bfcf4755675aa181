use decoder::{structures::Point, Error};
use image::{imageops, RgbaImage};

use crate::{errors::Result, path_layer::PATH_SCALE};

/// Largest crop edge accepted, in output pixels.
const MAX_VIEWPORT_PIXELS: f64 = 32768.0;

/// Crop window around the map origin. All values are in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Shift of the crop centre away from the origin.
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }

    pub fn with_offset(mut self, offset_x: f64, offset_y: f64) -> Self {
        self.offset_x = offset_x;
        self.offset_y = offset_y;
        self
    }

    /// Output size in pixels.
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        let scale = PATH_SCALE as f64;
        let width = (self.width * scale).round();
        let height = (self.height * scale).round();

        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value < 1.0 || value > MAX_VIEWPORT_PIXELS {
                return Err(Error::InvalidCoordinate {
                    reason: format!("viewport {} of {} pixels is out of range", name, value),
                }
                .into());
            }
        }
        Ok((width as u32, height as u32))
    }
}

/// Cut the viewport out of a composed image. Regions outside the image stay
/// transparent, so the result always has the requested size.
pub fn crop(image: &RgbaImage, origin: Point, viewport: &Viewport) -> Result<RgbaImage> {
    let (width, height) = viewport.pixel_size()?;

    let scale = PATH_SCALE as f64;
    let center_x = (origin.x + viewport.offset_x) * scale;
    let center_y = (origin.y + viewport.offset_y) * scale;
    if !center_x.is_finite() || !center_y.is_finite() {
        return Err(Error::InvalidCoordinate {
            reason: format!(
                "viewport offset ({}, {}) is not a finite position",
                viewport.offset_x, viewport.offset_y
            ),
        }
        .into());
    }

    let left = (center_x - width as f64 / 2.0).round() as i64;
    let top = (center_y - height as f64 / 2.0).round() as i64;

    let mut out = RgbaImage::new(width, height);
    imageops::replace(&mut out, image, -left, -top);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn crop_keeps_requested_size_and_pads() {
        let mut image = RgbaImage::new(80, 80);
        image.put_pixel(40, 40, Rgba([1, 2, 3, 255]));

        let viewport = Viewport::new(20.0, 10.0).with_offset(2.0, -1.0);
        let out = crop(&image, Point::new(5.0, 5.0), &viewport).unwrap();

        // Centre (56, 32), 160x80 window starting at (-24, -8).
        assert_eq!(out.dimensions(), (160, 80));
        assert_eq!(*out.get_pixel(64, 48), Rgba([1, 2, 3, 255]));
        assert_eq!(*out.get_pixel(150, 70), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn rejects_degenerate_viewports() {
        let image = RgbaImage::new(8, 8);
        for viewport in [
            Viewport::new(0.0, 10.0),
            Viewport::new(10.0, f64::NAN),
            Viewport::new(1e9, 10.0),
            Viewport::new(10.0, 10.0).with_offset(f64::INFINITY, 0.0),
        ] {
            assert!(matches!(
                crop(&image, Point::default(), &viewport),
                Err(crate::RenderError::Decode(Error::InvalidCoordinate { .. }))
            ));
        }
    }
}
